//! Per-frame scene update
//!
//! Rules run in a fixed order every frame: countdown, pointer and avatar,
//! the judge (too-fast retraction, hold progress, retraction countdown,
//! queued tap), then target motion and drift.

use glam::Vec2;

use super::events::GameEvent;
use super::motion::{despawn, drift_target, step_target};
use super::state::{CatchPath, InteractionState, Pose, SceneState};
use crate::tuning::Tuning;

/// Input sampled for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in scene coordinates
    pub pointer: Vec2,
    /// The hand sprite was tapped since the last frame
    pub tap: bool,
}

/// Advance the scene by one frame
pub fn tick(
    state: &mut SceneState,
    tuning: &Tuning,
    input: &TickInput,
    dt: f32,
    events: &mut Vec<GameEvent>,
) {
    if state.is_terminal() {
        return;
    }
    let dt = dt.max(0.0);
    state.time_ticks += 1;

    // Countdown outranks everything else
    state.movie_left -= dt;
    if state.movie_left <= 0.0 {
        state.movie_left = 0.0;
        enter_horror(state, events);
        return;
    }

    // A retraction started this frame begins counting down on the next one
    let was_retracting = state.interaction.is_retracting();

    state.pointer.sample(input.pointer, dt);
    if !state.freeze {
        state.avatar.follow(input.pointer, tuning);
    }

    judge(state, tuning, dt, was_retracting, events);
    if input.tap {
        try_tap_catch(state, events);
    }

    if !state.is_terminal() {
        step_target(state, tuning, dt, events);
        drift_target(state, tuning);
        state.avatar.pose = if state.freeze { Pose::Braced } else { Pose::Free };
    }
    state.avatar.pos.y = state.avatar.pos.y.clamp(tuning.avatar_min_y, tuning.avatar_max_y);
    state.avatar.update_tilt(tuning);
}

/// Retraction, hold progress and the retraction countdown
fn judge(
    state: &mut SceneState,
    tuning: &Tuning,
    dt: f32,
    was_retracting: bool,
    events: &mut Vec<GameEvent>,
) {
    let speed = state.pointer.speed;
    let avatar = state.avatar.pos;
    let catchable_dist = state
        .target
        .as_ref()
        .filter(|t| t.is_catchable())
        .map(|t| t.pos.distance(avatar));

    // Too-fast approach
    if !state.interaction.is_retracting()
        && catchable_dist.is_some_and(|d| d < tuning.close_dist)
        && speed > tuning.speed_retract
    {
        state.interaction = InteractionState::Retracting {
            remaining: tuning.retract_time,
        };
        state.hold = 0.0;
        log::debug!("Too fast ({:.0} px/s), hand retracts", speed);
        events.push(GameEvent::RetractStarted);
    }

    // Hold progress
    let can_hold = catchable_dist.is_some_and(|d| d <= tuning.near_dist)
        && state.freeze
        && speed <= tuning.speed_ok;
    if can_hold && !state.interaction.is_retracting() {
        state.interaction = InteractionState::Holding;
        state.hold += dt;
        if state.hold >= tuning.hold_time {
            enter_success(state, CatchPath::Hold, None, events);
            return;
        }
    } else {
        state.hold = (state.hold - dt * 0.5).max(0.0);
        if state.interaction == InteractionState::Holding {
            state.interaction = InteractionState::Idle;
        }
    }

    if was_retracting {
        if let InteractionState::Retracting { remaining } = &mut state.interaction {
            *remaining -= dt;
            if *remaining <= 0.0 {
                state.interaction = InteractionState::Idle;
                log::debug!("Retraction over");
                events.push(GameEvent::RetractEnded);
            }
        }
    }
}

/// Resolve a direct tap on the hand. Returns true if it caught.
pub fn try_tap_catch(state: &mut SceneState, events: &mut Vec<GameEvent>) -> bool {
    if state.is_terminal() {
        return false;
    }
    let Some(target) = state.target.as_ref().filter(|t| t.is_catchable()) else {
        return false;
    };
    let marker = (state.avatar.pos + target.pos) * 0.5;
    enter_success(state, CatchPath::Tap, Some(marker), events);
    true
}

fn enter_success(
    state: &mut SceneState,
    via: CatchPath,
    marker: Option<Vec2>,
    events: &mut Vec<GameEvent>,
) {
    state.interaction = InteractionState::Success;
    state.catch = Some(via);
    state.caught_marker = marker;
    state.avatar.pose = Pose::Caught;
    despawn(state, false, events);
    log::info!("Hand caught ({:?}) with {:.1}s of film left", via, state.movie_left);
    events.push(GameEvent::Success { via, marker });
}

fn enter_horror(state: &mut SceneState, events: &mut Vec<GameEvent>) {
    state.interaction = InteractionState::Horror;
    state.hold = 0.0;
    state.avatar.pose = Pose::Braced;
    despawn(state, false, events);
    log::info!("Film over without a catch");
    events.push(GameEvent::Horror);
}
