//! Presentation layer
//!
//! Nothing in here feeds back into the simulation. The sequencer reads
//! `SceneState` and `GameEvent`s and drives a retained `Stage`, which a
//! renderer paints and a host polls for sound requests.

pub mod assets;
pub mod sequencer;
pub mod stage;
pub mod tween;

pub use assets::AssetManifest;
pub use sequencer::{Presenter, SoundRequest};
pub use stage::{Drawable, SpriteId, Stage, Visual};
pub use tween::{Ease, Prop, Tween, TweenTag};
