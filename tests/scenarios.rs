//! Scripted scenes driven through the public controller on a virtual clock

use cinema_hand::consts::GAME_W;
use cinema_hand::present::{AssetManifest, SpriteId};
use cinema_hand::sim::{CatchPath, GameEvent, InteractionState, MotionPhase};
use cinema_hand::{CinemaHand, Key, SceneCommand, Tuning};
use glam::Vec2;

const DT: f32 = 1.0 / 60.0;

/// Every spawn is a hand, the hand is reachable and lingers once parked
fn rigged() -> Tuning {
    let base = Tuning::default();
    Tuning {
        avatar_max_x: GAME_W,
        target_base: base.avatar_base,
        hand_expose_time: 30.0,
        far_right_x: 10_000.0,
        veto_pointer_x: 10_000.0,
        soft_cap_x: 10_000.0,
        hard_cap_x: 10_000.0,
        covered_factor: 10.0,
        uncovered_factor: 10.0,
        ..base
    }
}

/// Step frames until `done` holds; returns every event seen
fn run_until(
    scene: &mut CinemaHand,
    max_seconds: f32,
    mut done: impl FnMut(&CinemaHand) -> bool,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..(max_seconds / DT) as usize {
        scene.on_frame(DT);
        events.extend_from_slice(scene.last_events());
        if done(scene) {
            return events;
        }
    }
    panic!("condition not reached within {max_seconds}s");
}

fn run_for(scene: &mut CinemaHand, seconds: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..(seconds / DT).round() as usize {
        scene.on_frame(DT);
        events.extend_from_slice(scene.last_events());
    }
    events
}

fn hand_exposed(scene: &CinemaHand) -> bool {
    scene
        .state()
        .target
        .as_ref()
        .is_some_and(|t| t.kind.is_hand() && t.phase == MotionPhase::Exposed)
}

/// Pointer position that puts the avatar at `avatar`
fn pointer_for(t: &Tuning, avatar: Vec2) -> Vec2 {
    avatar - t.pointer_offset
}

#[test]
fn timeout_enters_horror_exactly_once() {
    let t = Tuning::default();
    let mut scene = CinemaHand::new(t.clone(), AssetManifest::complete(), 17);
    let mut elapsed = 0.0f32;
    let mut events = Vec::new();
    while !scene.is_terminal() {
        scene.on_frame(DT);
        elapsed += DT;
        events.extend_from_slice(scene.last_events());
        assert!(elapsed < t.movie_time + 1.0);
    }
    assert_eq!(scene.state().interaction, InteractionState::Horror);
    assert!((elapsed - t.movie_time).abs() < DT * 2.0);

    events.extend(run_for(&mut scene, 5.0));
    let horrors = events.iter().filter(|e| **e == GameEvent::Horror).count();
    assert_eq!(horrors, 1);
    assert!(scene.state().target.is_none());
    assert!(scene.presenter().game_over_active());
    assert!(scene.stage().is_visible(SpriteId::TryAgainButton));
    assert_eq!(scene.state().interaction, InteractionState::Horror);
}

#[test]
fn hold_still_next_to_hand_catches_it() {
    let t = rigged();
    let mut scene = CinemaHand::new(t.clone(), AssetManifest::complete(), 7);

    // Park the avatar where the hand will stop, then hold still
    let stop = Vec2::new(t.stop_x(true), t.target_base.y);
    scene.on_pointer_move(pointer_for(&t, stop));
    scene.on_frame(DT);
    scene.on_key_down(Key::Freeze);

    let events = run_until(&mut scene, 10.0, |s| s.is_terminal());
    assert_eq!(scene.state().interaction, InteractionState::Success);
    assert_eq!(scene.state().catch, Some(CatchPath::Hold));
    assert!(scene.state().target.is_none());
    let successes = events
        .iter()
        .filter(|e| matches!(e, GameEvent::Success { .. }))
        .count();
    assert_eq!(successes, 1);
    assert!(events.contains(&GameEvent::Despawned { rearm: false }));
    assert_eq!(scene.stage().texture(SpriteId::Avatar), Some("presa"));

    // Continue shows up after the post-success delay
    run_for(&mut scene, t.continue_delay - 0.1);
    assert!(!scene.presenter().continue_visible());
    run_for(&mut scene, 0.2);
    assert!(scene.presenter().continue_visible());

    // No more spawns once caught
    let later = run_for(&mut scene, 6.0);
    assert!(!later.iter().any(|e| matches!(e, GameEvent::Spawned { .. })));
    assert_eq!(scene.state().interaction, InteractionState::Success);

    let button = scene.stage().get(SpriteId::ContinueButton).unwrap().pos;
    scene.on_key_up(Key::Freeze);
    assert_eq!(scene.on_pointer_down(button), Some(SceneCommand::Restart));
}

#[test]
fn fast_approach_retracts_then_returns_to_idle() {
    let t = rigged();
    let mut scene = CinemaHand::new(t.clone(), AssetManifest::complete(), 23);

    let stop = Vec2::new(t.stop_x(true), t.target_base.y);
    let wait = stop - Vec2::new(100.0, 0.0);
    scene.on_pointer_move(pointer_for(&t, wait));
    run_until(&mut scene, 10.0, hand_exposed);

    // Lunge 50px in one frame: 3000 px/s, ending inside the close radius
    scene.on_pointer_move(pointer_for(&t, wait + Vec2::new(50.0, 0.0)));
    scene.on_frame(DT);
    assert!(scene.last_events().contains(&GameEvent::RetractStarted));
    assert_eq!(
        scene.state().interaction,
        InteractionState::Retracting {
            remaining: t.retract_time
        }
    );
    assert_eq!(scene.state().hold, 0.0);

    // Countdown spans retract_time
    let mut events = Vec::new();
    let mut frames = 0;
    while !scene.last_events().contains(&GameEvent::RetractEnded) {
        scene.on_frame(DT);
        events.extend_from_slice(scene.last_events());
        frames += 1;
        assert!(frames < 180, "retraction never ended");
    }
    let expected = t.retract_time / DT;
    assert!(
        (frames as f32 - expected).abs() <= 1.0,
        "retraction took {frames} frames, expected about {expected}"
    );
    assert_eq!(scene.state().interaction, InteractionState::Idle);

    events.extend(run_for(&mut scene, 0.5));
    assert!(events.contains(&GameEvent::Despawned { rearm: true }));
    assert!(!scene.is_terminal());
    // Re-armed after the hand left
    assert!(scene.pending_timers() >= 1);
}

#[test]
fn tap_on_hand_catches_immediately() {
    let t = rigged();
    let mut scene = CinemaHand::new(t.clone(), AssetManifest::complete(), 31);
    run_until(&mut scene, 10.0, hand_exposed);
    assert_eq!(scene.state().hold, 0.0);

    let hand = scene.state().target.as_ref().unwrap().pos;
    assert_eq!(scene.on_pointer_down(hand), None);
    scene.on_frame(DT);

    assert_eq!(scene.state().interaction, InteractionState::Success);
    assert_eq!(scene.state().catch, Some(CatchPath::Tap));
    let marker = scene.state().caught_marker.unwrap();
    assert!(scene.stage().is_visible(SpriteId::CaughtMarker));
    assert!(!scene.stage().is_visible(SpriteId::Avatar));

    // The marker eases toward its resting point
    run_for(&mut scene, 0.5);
    let rest = Vec2::new(t.screen_w * 0.45, t.screen_h * 0.55);
    let now = scene.stage().get(SpriteId::CaughtMarker).unwrap().pos;
    assert!(now.distance(rest) < marker.distance(rest));
}

#[test]
fn restart_cancels_pending_reveal() {
    let t = rigged();
    let mut scene = CinemaHand::new(t.clone(), AssetManifest::complete(), 41);
    run_until(&mut scene, 10.0, hand_exposed);
    let hand = scene.state().target.as_ref().unwrap().pos;
    scene.on_pointer_down(hand);
    scene.on_frame(DT);
    assert!(scene.is_terminal());

    scene.restart();
    assert_eq!(scene.state().interaction, InteractionState::Idle);
    assert_eq!(scene.state().movie_left, t.movie_time);
    // Only the fresh spawn timer survives
    assert_eq!(scene.pending_timers(), 1);

    scene.on_pointer_up(hand);
    run_for(&mut scene, t.continue_delay + 0.5);
    assert!(!scene.presenter().continue_visible());
    assert!(!scene.stage().is_visible(SpriteId::FirstEmoji));
}

#[test]
fn missing_optional_assets_degrade_quietly() {
    let t = rigged();
    let assets = AssetManifest::complete()
        .without_texture("filmLoop2")
        .without_audio("success")
        .without_audio("bgm");
    let mut scene = CinemaHand::new(t, assets, 5);
    assert!(scene.drain_sounds().is_empty());
    run_until(&mut scene, 10.0, hand_exposed);
    let hand = scene.state().target.as_ref().unwrap().pos;
    scene.on_pointer_down(hand);
    scene.on_frame(DT);
    assert!(scene.is_terminal());
    let sounds = scene.drain_sounds();
    assert!(sounds.iter().all(|s| s.name == "click"));
    assert!(scene.stage().is_visible(SpriteId::Film));
}
