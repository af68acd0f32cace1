//! Deterministic scene simulation
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time only arrives as `dt` (or through the virtual-clock `Scheduler`)
//! - Randomness only through an injected `Rng`
//! - No rendering, audio or platform dependencies

pub mod events;
pub mod motion;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timers;

pub use events::GameEvent;
pub use spawn::{hand_probability, is_covered, spawn_delay, spawn_target};
pub use state::{
    CatchPath, InteractionState, MotionPhase, PlayerAvatar, PointerTracker, Pose, Retreat,
    SceneState, Target, TargetKind,
};
pub use tick::{TickInput, tick, try_tap_catch};
pub use timers::{Scheduler, TimerHandle};
