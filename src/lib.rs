//! Cinema Hand - a timing minigame played over a looping film
//!
//! Core modules:
//! - `sim`: Deterministic scene logic (pointer, avatar, spawner, judge)
//! - `scene`: Controller driven by the host's frame loop and input events
//! - `present`: Retained stage, tweens and the presentation sequencer
//! - `tuning`: Data-driven gameplay constants
//! - `renderer`/`audio`: Browser backends (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod present;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod scene;
pub mod sim;
pub mod tuning;

pub use scene::{CinemaHand, Key, SceneCommand};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Scene configuration constants
pub mod consts {
    /// Native canvas size (matches the cinema backdrop art)
    pub const GAME_W: f32 = 1462.0;
    pub const GAME_H: f32 = 849.0;

    /// Floor for the pointer speed divisor
    pub const SPEED_EPSILON: f32 = 1e-6;

    /// Largest frame delta the hosts feed into the scene
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Linear interpolation (`t` is not clamped)
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Move a point a fraction of the way toward another
#[inline]
pub fn approach(from: Vec2, to: Vec2, t: f32) -> Vec2 {
    from + (to - from) * t
}

/// Sign of the 2D cross product of `dir` and `rel`.
///
/// Negative means `rel` lies to the left of `dir` in Y-down screen space.
#[inline]
pub fn cross(dir: Vec2, rel: Vec2) -> f32 {
    dir.x * rel.y - dir.y * rel.x
}
