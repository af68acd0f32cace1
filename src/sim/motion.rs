//! Target motion: enter from the right, park, then retreat
//!
//! Also owns the vertical drift that pulls a retracting hand up behind the
//! seat and settles it back afterwards.

use super::events::GameEvent;
use super::state::{InteractionState, MotionPhase, Retreat, SceneState};
use crate::lerp;
use crate::tuning::Tuning;

/// Advance the active target's motion phase by `dt`
pub fn step_target(state: &mut SceneState, tuning: &Tuning, dt: f32, events: &mut Vec<GameEvent>) {
    let avatar_pos = state.avatar.pos;
    let avatar_speed = state.pointer.speed;
    let Some(target) = state.target.as_mut() else {
        return;
    };
    let hand = target.kind.is_hand();

    match target.phase {
        MotionPhase::Entering => {
            let stop_x = tuning.stop_x(hand);
            target.pos.x -= tuning.spawn_speed * dt;
            if target.pos.x <= stop_x {
                target.pos.x = stop_x;
                target.phase = MotionPhase::Exposed;
                target.exposure = 0.0;
            }
        }

        MotionPhase::Exposed => {
            target.exposure += dt;
            let dist = target.pos.distance(avatar_pos);
            let flees = hand
                && dist < tuning.flee_dist
                && avatar_speed > tuning.speed_retract * tuning.flee_speed_factor;
            let max_exposure = if hand {
                tuning.hand_expose_time
            } else {
                tuning.expose_time
            };
            let unreachable = hand
                && target.exposure <= tuning.grace_window
                && avatar_pos.x >= tuning.far_right_x;

            if flees || target.exposure >= max_exposure {
                target.begin_exit(Retreat::ToEntry);
                log::debug!("{:?} retreating after {:.2}s", target.kind, target.exposure);
                events.push(GameEvent::TargetRetreating { kind: target.kind });
            } else if unreachable {
                target.begin_exit(Retreat::ToEntry);
                events.push(GameEvent::TargetRetreating { kind: target.kind });
                state.interaction = InteractionState::Retracting {
                    remaining: tuning.retract_time,
                };
                state.hold = 0.0;
                log::debug!("Hand out of reach at arrival, retracting");
                events.push(GameEvent::RetractStarted);
            }
        }

        MotionPhase::Exiting => {
            let speed = if hand {
                tuning.spawn_speed * tuning.hand_retreat_boost
            } else {
                tuning.spawn_speed
            };
            let dir = match target.retreat {
                Retreat::ToEntry => 1.0,
                Retreat::Across => -1.0,
            };
            target.pos.x += dir * speed * dt;
            let gone = match target.retreat {
                Retreat::ToEntry => target.pos.x > tuning.exit_right_x,
                Retreat::Across => target.pos.x < tuning.exit_left_x,
            };
            if gone {
                despawn(state, true, events);
            }
        }
    }
}

/// Clear the target slot
pub fn despawn(state: &mut SceneState, rearm: bool, events: &mut Vec<GameEvent>) {
    if let Some(target) = state.target.take() {
        log::debug!("Despawned {:?}", target.kind);
        events.push(GameEvent::Despawned { rearm });
    }
}

/// Vertical drift of the target, then band clamps
pub fn drift_target(state: &mut SceneState, tuning: &Tuning) {
    let interaction = state.interaction;
    if let Some(target) = state.target.as_mut() {
        match interaction {
            InteractionState::Retracting { .. } => {
                target.pos.y = lerp(target.pos.y, tuning.target_min_y, tuning.retract_drift);
            }
            InteractionState::Idle | InteractionState::Holding => {
                target.pos.y = lerp(target.pos.y, tuning.target_base.y, tuning.settle_drift);
            }
            InteractionState::Success | InteractionState::Horror => {}
        }
        if target.kind.is_hand() {
            target.pos.y = target.pos.y.clamp(tuning.target_min_y, tuning.target_max_y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Target, TargetKind};
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn scene_with(kind: TargetKind) -> (SceneState, Tuning) {
        let t = Tuning::default();
        let mut s = SceneState::new(&t);
        s.target = Some(Target::spawn(kind, &t));
        (s, t)
    }

    fn run_until_exposed(s: &mut SceneState, t: &Tuning) {
        let mut events = Vec::new();
        for _ in 0..600 {
            step_target(s, t, DT, &mut events);
            if s.target.as_ref().unwrap().phase == MotionPhase::Exposed {
                return;
            }
        }
        panic!("target never reached its stop");
    }

    #[test]
    fn test_enters_and_parks_at_stop() {
        let (mut s, t) = scene_with(TargetKind::Popcorn);
        run_until_exposed(&mut s, &t);
        let target = s.target.as_ref().unwrap();
        assert_eq!(target.pos.x, t.bait_stop_x);
        assert_eq!(target.exposure, 0.0);
    }

    #[test]
    fn test_hand_exposure_shorter_than_decoy() {
        let mut frames = Vec::new();
        for kind in [TargetKind::GrabbableHand, TargetKind::Soda] {
            let (mut s, t) = scene_with(kind);
            run_until_exposed(&mut s, &t);
            let mut events = Vec::new();
            let mut n = 0;
            while s.target.as_ref().unwrap().phase == MotionPhase::Exposed {
                step_target(&mut s, &t, DT, &mut events);
                n += 1;
            }
            assert!(events.contains(&GameEvent::TargetRetreating { kind }));
            frames.push(n);
        }
        assert!(frames[0] < frames[1]);
    }

    #[test]
    fn test_hand_flees_fast_close_avatar() {
        let (mut s, t) = scene_with(TargetKind::GrabbableHand);
        run_until_exposed(&mut s, &t);
        s.avatar.pos = s.target.as_ref().unwrap().pos - Vec2::new(50.0, 0.0);
        s.pointer.speed = t.speed_retract;
        let mut events = Vec::new();
        step_target(&mut s, &t, DT, &mut events);
        assert_eq!(s.target.as_ref().unwrap().phase, MotionPhase::Exiting);
        assert_eq!(s.interaction, InteractionState::Idle);
    }

    #[test]
    fn test_decoy_ignores_fast_avatar() {
        let (mut s, t) = scene_with(TargetKind::Popcorn);
        run_until_exposed(&mut s, &t);
        s.avatar.pos = s.target.as_ref().unwrap().pos;
        s.pointer.speed = 10_000.0;
        let mut events = Vec::new();
        step_target(&mut s, &t, DT, &mut events);
        assert_eq!(s.target.as_ref().unwrap().phase, MotionPhase::Exposed);
    }

    #[test]
    fn test_unreachable_hand_retracts_at_arrival() {
        let (mut s, mut t) = scene_with(TargetKind::GrabbableHand);
        t.far_right_x = 300.0;
        run_until_exposed(&mut s, &t);
        s.avatar.pos = Vec2::new(400.0, t.avatar_base.y);
        s.hold = 0.3;
        let mut events = Vec::new();
        step_target(&mut s, &t, DT, &mut events);
        assert!(s.interaction.is_retracting());
        assert_eq!(s.hold, 0.0);
        assert_eq!(s.target.as_ref().unwrap().phase, MotionPhase::Exiting);
        assert!(events.contains(&GameEvent::RetractStarted));
    }

    #[test]
    fn test_exit_moves_away_and_despawns_once() {
        let (mut s, t) = scene_with(TargetKind::GrabbableHand);
        run_until_exposed(&mut s, &t);
        let stop_x = t.hand_stop_x;
        s.target.as_mut().unwrap().begin_exit(Retreat::ToEntry);

        let mut events = Vec::new();
        let mut last = 0.0;
        while s.target.is_some() {
            step_target(&mut s, &t, DT, &mut events);
            if let Some(target) = &s.target {
                let d = (target.pos.x - stop_x).abs();
                assert!(d > last);
                last = d;
            }
        }
        let despawns = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Despawned { rearm: true }))
            .count();
        assert_eq!(despawns, 1);
    }

    #[test]
    fn test_exit_across_leaves_left() {
        let (mut s, t) = scene_with(TargetKind::Soda);
        s.target.as_mut().unwrap().pos.x = 0.0;
        s.target.as_mut().unwrap().begin_exit(Retreat::Across);
        let mut events = Vec::new();
        for _ in 0..60 {
            step_target(&mut s, &t, DT, &mut events);
        }
        assert!(s.target.is_none());
    }

    #[test]
    fn test_drift_while_retracting_rises_and_clamps() {
        let (mut s, t) = scene_with(TargetKind::GrabbableHand);
        s.interaction = InteractionState::Retracting { remaining: 1.0 };
        for _ in 0..200 {
            drift_target(&mut s, &t);
        }
        let y = s.target.as_ref().unwrap().pos.y;
        assert!((y - t.target_min_y).abs() < 0.5);

        s.interaction = InteractionState::Idle;
        for _ in 0..400 {
            drift_target(&mut s, &t);
        }
        let y = s.target.as_ref().unwrap().pos.y;
        assert!((y - t.target_base.y).abs() < 0.5);
    }
}
