//! Scene state and core simulation types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::SPEED_EPSILON;
use crate::tuning::Tuning;

/// Top-level interaction state of the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InteractionState {
    /// Nothing in progress
    Idle,
    /// Avatar is holding still next to the hand
    Holding,
    /// Hand pulled back after a too-fast approach
    Retracting { remaining: f32 },
    /// Hand caught (terminal)
    Success,
    /// Film ran out (terminal)
    Horror,
}

impl InteractionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, InteractionState::Success | InteractionState::Horror)
    }

    pub fn is_retracting(&self) -> bool {
        matches!(self, InteractionState::Retracting { .. })
    }
}

/// How the hand was caught
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatchPath {
    /// Held still near the hand for the required time
    Hold,
    /// Tapped the hand directly
    Tap,
}

/// Samples the pointer each frame and derives its speed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointerTracker {
    pub prev: Vec2,
    /// Last measured speed (px/s)
    pub speed: f32,
}

impl PointerTracker {
    pub fn new(start: Vec2) -> Self {
        Self {
            prev: start,
            speed: 0.0,
        }
    }

    /// Record a sample; returns the instantaneous speed
    pub fn sample(&mut self, pos: Vec2, dt: f32) -> f32 {
        self.speed = pos.distance(self.prev) / dt.max(SPEED_EPSILON);
        self.prev = pos;
        self.speed
    }
}

/// Avatar pose (selects the texture)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pose {
    /// Following the pointer
    Free,
    /// Frozen in place (hold-still gesture)
    Braced,
    /// Holding the caught hand
    Caught,
}

/// The player's hand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerAvatar {
    pub pos: Vec2,
    /// Radians; 0 at or below the base height, `max_tilt` at the top of the band
    pub tilt: f32,
    pub pose: Pose,
}

impl PlayerAvatar {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: tuning.avatar_base,
            tilt: 0.0,
            pose: Pose::Free,
        }
    }

    /// Track the pointer (with offset), clamped to the play band
    pub fn follow(&mut self, pointer: Vec2, tuning: &Tuning) {
        let p = pointer + tuning.pointer_offset;
        self.pos.x = p.x.clamp(0.0, tuning.avatar_max_x);
        self.pos.y = p.y.clamp(tuning.avatar_min_y, tuning.avatar_max_y);
    }

    /// Recompute tilt from height above the base
    pub fn update_tilt(&mut self, tuning: &Tuning) {
        let band = (tuning.avatar_max_y - tuning.avatar_min_y).max(SPEED_EPSILON);
        let t = ((tuning.avatar_base.y - self.pos.y) / band).clamp(0.0, 1.0);
        self.tilt = tuning.max_tilt * t;
    }
}

/// Kind of spawned target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    /// The neighbour's hand - the only thing that can be caught
    GrabbableHand,
    /// Popcorn bucket decoy
    Popcorn,
    /// Soda cup decoy
    Soda,
}

impl TargetKind {
    pub fn is_hand(&self) -> bool {
        *self == TargetKind::GrabbableHand
    }

    /// Texture key for this kind
    pub fn texture(&self) -> &'static str {
        match self {
            TargetKind::GrabbableHand => "T1",
            TargetKind::Popcorn => "corn",
            TargetKind::Soda => "coke",
        }
    }
}

/// Motion phase of the active target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionPhase {
    /// Sliding in from the right edge
    Entering,
    /// Parked at its stop X
    Exposed,
    /// Leaving the screen
    Exiting,
}

/// Direction an exiting target leaves in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Retreat {
    /// Back out the way it came (rightward)
    ToEntry,
    /// Onward across the screen (leftward)
    Across,
}

/// The single active target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub kind: TargetKind,
    pub pos: Vec2,
    pub phase: MotionPhase,
    /// Seconds spent in `Exposed`
    pub exposure: f32,
    pub retreat: Retreat,
}

impl Target {
    /// Create a target just beyond the right edge
    pub fn spawn(kind: TargetKind, tuning: &Tuning) -> Self {
        let offset = match kind {
            TargetKind::GrabbableHand => tuning.hand_offset_y,
            TargetKind::Popcorn => tuning.popcorn_offset_y,
            TargetKind::Soda => tuning.soda_offset_y,
        };
        Self {
            kind,
            pos: Vec2::new(tuning.spawn_entry_x, tuning.target_base.y + offset),
            phase: MotionPhase::Entering,
            exposure: 0.0,
            retreat: Retreat::ToEntry,
        }
    }

    /// A hand that can currently be caught
    pub fn is_catchable(&self) -> bool {
        self.kind.is_hand() && self.phase != MotionPhase::Exiting
    }

    pub fn begin_exit(&mut self, retreat: Retreat) {
        self.phase = MotionPhase::Exiting;
        self.retreat = retreat;
    }
}

/// Complete scene state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneState {
    pub pointer: PointerTracker,
    pub avatar: PlayerAvatar,
    /// At most one target exists; `None` exactly when no spawn is in flight
    pub target: Option<Target>,
    pub interaction: InteractionState,
    /// Progress toward a hold catch (seconds)
    pub hold: f32,
    /// Scene countdown (seconds)
    pub movie_left: f32,
    /// Hold-still gesture (pointer or key held down)
    pub freeze: bool,
    /// Set once the hand has been caught
    pub catch: Option<CatchPath>,
    /// Where the caught marker appears on a tap catch
    pub caught_marker: Option<Vec2>,
    /// Frames simulated
    pub time_ticks: u64,
}

impl SceneState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pointer: PointerTracker::new(tuning.avatar_base),
            avatar: PlayerAvatar::new(tuning),
            target: None,
            interaction: InteractionState::Idle,
            hold: 0.0,
            movie_left: tuning.movie_time,
            freeze: false,
            catch: None,
            caught_marker: None,
            time_ticks: 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.interaction.is_terminal()
    }

    pub fn target_kind(&self) -> Option<TargetKind> {
        self.target.as_ref().map(|t| t.kind)
    }

    /// Distance from the avatar to the target, if any
    pub fn target_distance(&self) -> Option<f32> {
        self.target.as_ref().map(|t| t.pos.distance(self.avatar.pos))
    }

    /// Fraction of the film remaining
    pub fn film_progress(&self, tuning: &Tuning) -> f32 {
        (self.movie_left / tuning.movie_time).clamp(0.0, 1.0)
    }
}
