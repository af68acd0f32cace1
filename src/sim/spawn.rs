//! Target spawner
//!
//! Decides when the next target appears and whether it is the neighbour's hand
//! or one of the decoys. The hand becomes likelier the further the player's
//! hand hides (left, high, behind the seat line) and is suppressed as it
//! creeps toward the film.

use glam::Vec2;
use rand::Rng;

use super::events::GameEvent;
use super::state::{SceneState, Target, TargetKind};
use crate::cross;
use crate::tuning::Tuning;

/// Is the avatar on the covered side of the seat diagonal?
pub fn is_covered(pos: Vec2, tuning: &Tuning) -> bool {
    let [p1, p2] = tuning.cover_line;
    cross(p2 - p1, pos - p1) < 0.0
}

/// Probability that the next spawn is the grabbable hand
pub fn hand_probability(avatar: Vec2, pointer_x: f32, tuning: &Tuning) -> f32 {
    let center_x = tuning.center_x();
    let dist_norm = ((avatar.x - center_x).abs() / center_x).clamp(0.0, 1.0);
    let band = tuning.avatar_max_y - tuning.avatar_min_y;
    let cover_t = ((avatar.y - tuning.avatar_min_y) / band).clamp(0.0, 1.0);
    let base = (0.25 + 0.4 * dist_norm + 0.35 * (1.0 - cover_t)).clamp(0.25, 0.9);

    // 0.6 at the center line and right of it, 1.4 at the left edge
    let left_bias = ((center_x - avatar.x) / center_x).clamp(0.0, 1.0);
    let left_factor = 0.6 + 0.8 * left_bias;

    let cover_factor = if is_covered(avatar, tuning) {
        tuning.covered_factor
    } else {
        tuning.uncovered_factor
    };

    let mut prob = (base * left_factor * cover_factor).clamp(0.0, 1.0);
    if pointer_x >= tuning.veto_pointer_x {
        prob = 0.0;
    }
    if avatar.x >= tuning.hard_cap_x {
        prob = prob.min(tuning.hard_cap);
    } else if avatar.x >= tuning.soft_cap_x {
        prob = prob.min(tuning.soft_cap);
    }
    prob
}

/// Draw a target kind; decoys split evenly
pub fn choose_kind<R: Rng + ?Sized>(hand_prob: f32, rng: &mut R) -> TargetKind {
    if rng.random::<f32>() < hand_prob {
        TargetKind::GrabbableHand
    } else if rng.random_bool(0.5) {
        TargetKind::Popcorn
    } else {
        TargetKind::Soda
    }
}

/// Randomized delay before the next spawn
pub fn spawn_delay<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> f32 {
    rng.random_range(tuning.spawn_min..=tuning.spawn_max)
}

/// Spawn a target if the slot is free and the scene is live.
///
/// Returns the spawned kind.
pub fn spawn_target<R: Rng + ?Sized>(
    state: &mut SceneState,
    tuning: &Tuning,
    pointer_x: f32,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) -> Option<TargetKind> {
    if state.is_terminal() || state.target.is_some() {
        return None;
    }

    let prob = hand_probability(state.avatar.pos, pointer_x, tuning);
    let kind = choose_kind(prob, rng);
    state.target = Some(Target::spawn(kind, tuning));
    log::info!("Spawned {:?} (hand chance {:.2})", kind, prob);
    events.push(GameEvent::Spawned { kind });
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::InteractionState;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_cover_sides() {
        let t = Tuning::default();
        assert_ne!(
            is_covered(Vec2::new(100.0, 400.0), &t),
            is_covered(Vec2::new(900.0, 400.0), &t)
        );
        // Direction (154, 528); a point to the right at the same height gives a negative cross
        assert!(is_covered(Vec2::new(900.0, 400.0), &t));
        assert!(!is_covered(Vec2::new(100.0, 400.0), &t));
    }

    #[test]
    fn test_hard_cap() {
        let t = Tuning::default();
        let p = hand_probability(Vec2::new(t.hard_cap_x, t.avatar_min_y), 0.0, &t);
        assert!(p <= t.hard_cap);
        let p = hand_probability(Vec2::new(t.soft_cap_x, t.avatar_min_y), 0.0, &t);
        assert!(p <= t.soft_cap);
        assert!(p > t.hard_cap);
    }

    #[test]
    fn test_left_high_is_likely() {
        let t = Tuning::default();
        let p = hand_probability(Vec2::new(0.0, t.avatar_min_y), 0.0, &t);
        assert!(p > 0.8, "left edge at band top should favour the hand, got {p}");
    }

    #[test]
    fn test_choose_kind_extremes() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(choose_kind(1.0, &mut rng), TargetKind::GrabbableHand);
            assert_ne!(choose_kind(0.0, &mut rng), TargetKind::GrabbableHand);
        }
    }

    #[test]
    fn test_decoys_both_appear() {
        let mut rng = Pcg32::seed_from_u64(42);
        let kinds: Vec<_> = (0..200).map(|_| choose_kind(0.0, &mut rng)).collect();
        assert!(kinds.contains(&TargetKind::Popcorn));
        assert!(kinds.contains(&TargetKind::Soda));
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let t = Tuning::default();
        let draw = |seed| {
            let mut rng = Pcg32::seed_from_u64(seed);
            (0..20)
                .map(|_| (spawn_delay(&t, &mut rng), choose_kind(0.5, &mut rng)))
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(99), draw(99));
    }

    #[test]
    fn test_spawn_delay_in_window() {
        let t = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..500 {
            let d = spawn_delay(&t, &mut rng);
            assert!((t.spawn_min..=t.spawn_max).contains(&d));
        }
    }

    #[test]
    fn test_spawn_skips_when_busy_or_terminal() {
        let t = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut events = Vec::new();
        let mut state = SceneState::new(&t);

        assert!(spawn_target(&mut state, &t, 0.0, &mut rng, &mut events).is_some());
        assert!(spawn_target(&mut state, &t, 0.0, &mut rng, &mut events).is_none());
        assert_eq!(events.len(), 1);

        let mut state = SceneState::new(&t);
        state.interaction = InteractionState::Horror;
        assert!(spawn_target(&mut state, &t, 0.0, &mut rng, &mut events).is_none());
        assert!(state.target.is_none());
    }

    proptest! {
        #[test]
        fn prop_veto_forces_zero(
            x in -200.0f32..2000.0,
            y in -200.0f32..1200.0,
            pointer_x in 720.0f32..5000.0,
        ) {
            let t = Tuning::default();
            prop_assert_eq!(hand_probability(Vec2::new(x, y), pointer_x, &t), 0.0);
        }

        #[test]
        fn prop_vetoed_spawn_is_never_a_hand(seed in any::<u64>(), pointer_x in 720.0f32..5000.0) {
            let t = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut state = SceneState::new(&t);
            let mut events = Vec::new();
            let kind = spawn_target(&mut state, &t, pointer_x, &mut rng, &mut events);
            prop_assert!(kind.is_some());
            prop_assert_ne!(kind, Some(TargetKind::GrabbableHand));
        }

        #[test]
        fn prop_probability_is_unit(
            x in -200.0f32..2000.0,
            y in -200.0f32..1200.0,
            px in -100.0f32..719.0,
        ) {
            let t = Tuning::default();
            let p = hand_probability(Vec2::new(x, y), px, &t);
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }
}
