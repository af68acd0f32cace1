//! Events the simulation emits for the presentation layer and host

use glam::Vec2;

use super::state::{CatchPath, TargetKind};

/// Something observable happened during a tick or an input callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A target entered from the right edge
    Spawned { kind: TargetKind },
    /// An exposed target started leaving
    TargetRetreating { kind: TargetKind },
    /// The active target left play; `rearm` asks for the next spawn to be queued
    Despawned { rearm: bool },
    /// The hand pulled back
    RetractStarted,
    /// Retraction finished, back to idle
    RetractEnded,
    /// Hand caught; `marker` is set for the tap path
    Success { via: CatchPath, marker: Option<Vec2> },
    /// The film ran out
    Horror,
    /// Pointer pressed anywhere (feedback click)
    PointerPressed,
}
