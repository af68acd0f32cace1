//! Scene controller
//!
//! `CinemaHand` owns one scene's state, its timers, the presenter and the
//! random source. A host drives it with `on_frame` from its game loop and
//! forwards input through the `on_*` callbacks.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::present::{AssetManifest, Presenter, SoundRequest, SpriteId, Stage};
use crate::sim::{
    GameEvent, SceneState, Scheduler, TickInput, spawn_delay, spawn_target, tick,
};
use crate::tuning::Tuning;

/// Keys the scene cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Hold-still key (Space in the browser host)
    Freeze,
    Other,
}

/// Requests the scene makes of its host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    /// Tear the scene down and start it again
    Restart,
}

/// Delayed actions, owned by the scene's scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scheduled {
    Spawn,
    RevealContinue,
}

pub struct CinemaHand<R = Pcg32> {
    tuning: Tuning,
    assets: AssetManifest,
    state: SceneState,
    scheduler: Scheduler<Scheduled>,
    presenter: Presenter,
    rng: R,
    /// Latest pointer position from the host
    pointer: Vec2,
    tap_queued: bool,
    pointer_held: bool,
    key_held: bool,
    /// Events from the latest frame and the input callbacks since
    events: Vec<GameEvent>,
}

impl CinemaHand<Pcg32> {
    /// Scene with a seeded PCG random source
    pub fn new(tuning: Tuning, assets: AssetManifest, seed: u64) -> Self {
        Self::with_rng(tuning, assets, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> CinemaHand<R> {
    /// Scene with an injected random source; the first spawn is armed at once
    pub fn with_rng(tuning: Tuning, assets: AssetManifest, rng: R) -> Self {
        let presenter = Presenter::new(&tuning, assets.clone());
        let mut scene = Self {
            state: SceneState::new(&tuning),
            scheduler: Scheduler::new(),
            presenter,
            rng,
            pointer: Vec2::ZERO,
            tap_queued: false,
            pointer_held: false,
            key_held: false,
            events: Vec::new(),
            tuning,
            assets,
        };
        scene.reset_pointer();
        scene.arm_spawn();
        log::info!("Scene started ({:.0}s of film)", scene.tuning.movie_time);
        scene
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    pub fn stage(&self) -> &Stage {
        self.presenter.stage()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Timers still waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// Events from the latest frame (plus any input callbacks after it)
    pub fn last_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Sounds the host should play now
    pub fn drain_sounds(&mut self) -> Vec<SoundRequest> {
        self.presenter.drain_sounds()
    }

    /// Advance the scene by one frame
    pub fn on_frame(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.events.clear();

        // Timers first, so a spawn that came due is visible to this frame's rules
        for action in self.scheduler.advance(dt) {
            match action {
                Scheduled::Spawn => {
                    if !self.state.is_terminal() {
                        spawn_target(
                            &mut self.state,
                            &self.tuning,
                            self.pointer.x,
                            &mut self.rng,
                            &mut self.events,
                        );
                    }
                }
                Scheduled::RevealContinue => {
                    if self.state.catch.is_some() {
                        self.presenter.reveal_continue();
                    }
                }
            }
        }

        let input = TickInput {
            pointer: self.pointer,
            tap: std::mem::take(&mut self.tap_queued),
        };
        self.state.freeze = self.pointer_held || self.key_held;
        tick(&mut self.state, &self.tuning, &input, dt, &mut self.events);

        self.dispatch(0);
        self.presenter.sync(&self.state, &self.tuning);
        self.presenter.advance(dt);
    }

    /// Route events from `from` onward to the presenter and the scheduler
    fn dispatch(&mut self, from: usize) {
        for i in from..self.events.len() {
            let event = self.events[i];
            self.presenter.handle(&event);
            match event {
                GameEvent::Despawned { rearm: true } if !self.state.is_terminal() => {
                    self.arm_spawn();
                }
                GameEvent::Success { .. } => {
                    self.scheduler
                        .schedule_once(self.tuning.continue_delay, Scheduled::RevealContinue);
                }
                _ => {}
            }
        }
    }

    fn arm_spawn(&mut self) {
        let delay = spawn_delay(&self.tuning, &mut self.rng);
        self.scheduler.schedule_once(delay, Scheduled::Spawn);
        log::debug!("Next spawn in {:.2}s", delay);
    }

    /// Park the pointer where the avatar rests
    fn reset_pointer(&mut self) {
        self.pointer = self.tuning.avatar_base - self.tuning.pointer_offset;
        self.state.pointer.prev = self.pointer;
    }

    pub fn on_pointer_move(&mut self, pos: Vec2) {
        self.pointer = pos;
    }

    /// Pointer pressed. Returns a command when a scene control was activated.
    pub fn on_pointer_down(&mut self, pos: Vec2) -> Option<SceneCommand> {
        self.pointer = pos;
        let from = self.events.len();
        self.events.push(GameEvent::PointerPressed);
        self.dispatch(from);

        match self.presenter.stage().hit_test(pos) {
            Some(SpriteId::ContinueButton) | Some(SpriteId::TryAgainButton) => {
                return Some(SceneCommand::Restart);
            }
            Some(SpriteId::Hand) if !self.state.is_terminal() => {
                self.tap_queued = true;
            }
            _ => {}
        }
        self.pointer_held = true;
        None
    }

    pub fn on_pointer_up(&mut self, pos: Vec2) {
        self.pointer = pos;
        self.pointer_held = false;
    }

    pub fn on_key_down(&mut self, key: Key) {
        if key == Key::Freeze {
            self.key_held = true;
        }
    }

    pub fn on_key_up(&mut self, key: Key) {
        if key == Key::Freeze {
            self.key_held = false;
        }
    }

    /// Tear down and start over: pending timers and tweens are dropped
    pub fn restart(&mut self) {
        self.scheduler.cancel_all();
        self.state = SceneState::new(&self.tuning);
        self.presenter = Presenter::new(&self.tuning, self.assets.clone());
        self.tap_queued = false;
        self.pointer_held = false;
        self.key_held = false;
        self.events.clear();
        self.reset_pointer();
        self.arm_spawn();
        log::info!("Scene restarted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{InteractionState, TargetKind};

    const DT: f32 = 1.0 / 60.0;

    fn scene(seed: u64) -> CinemaHand {
        CinemaHand::new(Tuning::default(), AssetManifest::complete(), seed)
    }

    fn run(scene: &mut CinemaHand, seconds: f32) -> Vec<GameEvent> {
        let mut all = Vec::new();
        for _ in 0..(seconds / DT).round() as usize {
            scene.on_frame(DT);
            all.extend_from_slice(scene.last_events());
        }
        all
    }

    #[test]
    fn test_first_spawn_within_window() {
        let mut s = scene(5);
        assert_eq!(s.pending_timers(), 1);
        let mut first = None;
        for frame in 0..(4.0 / DT) as usize {
            s.on_frame(DT);
            if s.last_events().iter().any(|e| matches!(e, GameEvent::Spawned { .. })) {
                first = Some(frame as f32 * DT);
                break;
            }
        }
        let at = first.expect("no spawn within 4s");
        let t = Tuning::default();
        assert!(at >= t.spawn_min - DT && at <= t.spawn_max + DT);
    }

    #[test]
    fn test_same_seed_same_kinds() {
        let kinds = |seed| {
            let mut s = scene(seed);
            run(&mut s, 20.0)
                .into_iter()
                .filter_map(|e| match e {
                    GameEvent::Spawned { kind } => Some(kind),
                    _ => None,
                })
                .collect::<Vec<TargetKind>>()
        };
        let a = kinds(11);
        assert!(!a.is_empty());
        assert_eq!(a, kinds(11));
    }

    #[test]
    fn test_one_target_at_a_time() {
        let mut s = scene(3);
        let mut live = 0i32;
        for e in run(&mut s, 24.0) {
            match e {
                GameEvent::Spawned { .. } => live += 1,
                GameEvent::Despawned { .. } => live -= 1,
                _ => {}
            }
            assert!((0..=1).contains(&live));
        }
    }

    #[test]
    fn test_freeze_from_key_or_pointer() {
        let mut s = scene(1);
        s.on_key_down(Key::Freeze);
        s.on_frame(DT);
        assert!(s.state().freeze);
        s.on_key_up(Key::Freeze);
        s.on_key_down(Key::Other);
        s.on_frame(DT);
        assert!(!s.state().freeze);

        s.on_pointer_down(Vec2::new(10.0, 10.0));
        s.on_key_down(Key::Freeze);
        s.on_pointer_up(Vec2::new(10.0, 10.0));
        s.on_frame(DT);
        assert!(s.state().freeze, "key still held");
    }

    #[test]
    fn test_click_sound_on_press() {
        let mut s = scene(1);
        s.drain_sounds();
        s.on_pointer_down(Vec2::new(10.0, 10.0));
        let sounds = s.drain_sounds();
        assert_eq!(sounds.len(), 1);
        assert_eq!(sounds[0].name, "click");
        assert!(s.last_events().contains(&GameEvent::PointerPressed));
    }

    #[test]
    fn test_horror_then_try_again() {
        let mut s = scene(2);
        run(&mut s, 26.0);
        assert_eq!(s.state().interaction, InteractionState::Horror);
        assert!(s.presenter().game_over_active());

        // Let the try-again control pop in, then press it
        let button = s.stage().get(SpriteId::TryAgainButton).unwrap().pos;
        assert_eq!(s.on_pointer_down(button), Some(SceneCommand::Restart));
        s.restart();
        assert_eq!(s.state().interaction, InteractionState::Idle);
        assert!(!s.presenter().game_over_active());
        assert_eq!(s.pending_timers(), 1);
    }
}
