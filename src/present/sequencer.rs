//! Presentation sequencer
//!
//! Turns simulation events into one-shot sequences (emoji reveal, film swap,
//! game-over overlay) and mirrors the scene state onto the stage each frame.

use glam::Vec2;

use super::assets::AssetManifest;
use super::stage::{Drawable, SpriteId, Stage, Visual};
use super::tween::{Ease, Prop, Tween, TweenTag};
use crate::approach;
use crate::sim::{CatchPath, GameEvent, InteractionState, Pose, SceneState, TargetKind};
use crate::tuning::Tuning;

/// Layout and timing of the presentation
pub mod layout {
    use glam::Vec2;

    pub const AVATAR_SCALE: f32 = 0.5;
    pub const SPRITE_SCALE: f32 = 0.9;
    /// Decoys draw slightly smaller than the hand
    pub const ITEM_SCALE: f32 = SPRITE_SCALE * 0.9;

    pub const HAND_SIZE: Vec2 = Vec2::new(320.0, 240.0);
    pub const ITEM_SIZE: Vec2 = Vec2::new(180.0, 220.0);
    pub const EMOJI_SIZE: Vec2 = Vec2::new(360.0, 220.0);
    pub const BUTTON_SIZE: Vec2 = Vec2::new(300.0, 90.0);
    pub const GAMEOVER_SIZE: Vec2 = Vec2::new(640.0, 320.0);

    /// Film frame aspect (height / width)
    pub const FILM_ASPECT: f32 = 506.0 / 532.0;
    pub const FILM_ALT_ASPECT: f32 = 240.0 / 480.0;
    pub const FILM_PLAYBACK_RATE: f32 = 0.8;

    pub const EMOJI_POP: f32 = 0.52;
    pub const CONTINUE_FADE: f32 = 1.0;
    pub const TRY_AGAIN_POP: f32 = 0.32;
    pub const TRY_AGAIN_BOUNCE: f32 = 0.12;
    /// Per-frame easing of the caught marker toward its resting point
    pub const MARKER_DRIFT: f32 = 0.06;

    pub const BAR_MARGIN: f32 = 8.0;
    pub const BAR_HEIGHT: f32 = 10.0;

    pub const CLICK_VOLUME: f32 = 0.7;
    pub const SUCCESS_VOLUME: f32 = 0.8;
    pub const GAMEOVER_VOLUME: f32 = 0.6;
    pub const BGM_VOLUME: f32 = 0.05;

    pub const HINT: &str = "Mouse moves. Click/SPACE = hold still.";
}

/// A named sound the host should play
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundRequest {
    pub name: &'static str,
    pub volume: f32,
    pub looped: bool,
}

pub struct Presenter {
    stage: Stage,
    assets: AssetManifest,
    sounds: Vec<SoundRequest>,
    marker_rest: Vec2,
    bar_width: f32,
    try_again_y: f32,
    emojis_shown: bool,
    game_over: bool,
    continue_shown: bool,
}

impl Presenter {
    /// Build the stage for a fresh scene
    pub fn new(tuning: &Tuning, assets: AssetManifest) -> Self {
        use layout::*;

        let (w, h) = (tuning.screen_w, tuning.screen_h);
        let center = Vec2::new(w / 2.0, h / 2.0);
        let mut stage = Stage::new();

        stage.add(Drawable::new(
            SpriteId::Backdrop,
            Visual::Rect { color: 0x0b0b0b },
            center,
            Vec2::new(w, h),
            0.0,
        ));

        let film_pos = Vec2::new(center.x, h * 0.34);
        let film_size = Vec2::new(w * 0.20, w * 0.20 * FILM_ASPECT);
        let film = if assets.has_video("filmLoop") {
            Visual::Video {
                key: "filmLoop",
                playback_rate: FILM_PLAYBACK_RATE,
            }
        } else if assets.has_texture("filmGif") {
            Visual::Image { texture: "filmGif" }
        } else {
            Visual::Rect { color: 0x111111 }
        };
        stage.add(Drawable::new(SpriteId::Film, film, film_pos, film_size, 1.0));
        if assets.has_texture("filmLoop2") {
            let alt_w = film_size.x * 2.5;
            stage.add(
                Drawable::new(
                    SpriteId::FilmAlt,
                    Visual::Image { texture: "filmLoop2" },
                    film_pos,
                    Vec2::new(alt_w, alt_w * FILM_ALT_ASPECT),
                    1.1,
                )
                .hidden(),
            );
        }

        stage.add(Drawable::new(
            SpriteId::CinemaUnder,
            Visual::Image { texture: "cinemaUnder" },
            center,
            Vec2::new(w, h),
            5.0,
        ));

        stage.add(
            Drawable::new(
                SpriteId::Avatar,
                Visual::Image { texture: "F1" },
                tuning.avatar_base,
                HAND_SIZE,
                10.0,
            )
            .with_scale(AVATAR_SCALE),
        );
        stage.add(
            Drawable::new(
                SpriteId::Hand,
                Visual::Image { texture: "T1" },
                tuning.target_base,
                HAND_SIZE,
                10.0,
            )
            .with_scale(SPRITE_SCALE)
            .hidden()
            .interactive(),
        );
        stage.add(
            Drawable::new(
                SpriteId::Item,
                Visual::Image { texture: "corn" },
                tuning.target_base,
                ITEM_SIZE,
                10.0,
            )
            .with_scale(ITEM_SCALE)
            .hidden(),
        );
        stage.add(
            Drawable::new(
                SpriteId::CaughtMarker,
                Visual::Image { texture: "presa" },
                center,
                HAND_SIZE,
                10.0,
            )
            .with_scale(AVATAR_SCALE)
            .hidden(),
        );

        stage.add(
            Drawable::new(
                SpriteId::FirstEmoji,
                Visual::Image { texture: "emoji1" },
                Vec2::new(0.0, h * 0.35),
                EMOJI_SIZE,
                11.0,
            )
            .with_origin(Vec2::new(0.0, 0.5))
            .with_scale(0.0)
            .hidden(),
        );
        stage.add(
            Drawable::new(
                SpriteId::SecondEmoji,
                Visual::Image { texture: "emoji2" },
                Vec2::new(w, h * 0.30),
                EMOJI_SIZE,
                11.0,
            )
            .with_origin(Vec2::new(1.0, 0.5))
            .with_scale(0.0)
            .hidden(),
        );

        stage.add(Drawable::new(
            SpriteId::CinemaOver,
            Visual::Image { texture: "cinemaOver" },
            center,
            Vec2::new(w, h),
            20.0,
        ));

        stage.add(Drawable::new(
            SpriteId::Status,
            Visual::Text {
                content: String::new(),
                font_px: 14.0,
                color: 0xffffff,
            },
            Vec2::new(center.x, 22.0),
            Vec2::ZERO,
            30.0,
        ));
        stage.add(
            Drawable::new(
                SpriteId::Hint,
                Visual::Text {
                    content: HINT.to_string(),
                    font_px: 10.0,
                    color: 0xcccccc,
                },
                Vec2::new(center.x, h - 16.0),
                Vec2::ZERO,
                30.0,
            )
            .with_origin(Vec2::new(0.5, 1.0)),
        );

        let bar_width = w - BAR_MARGIN * 2.0;
        let bar_pos = Vec2::new(BAR_MARGIN, h - 10.0);
        stage.add(
            Drawable::new(
                SpriteId::TimeBarBg,
                Visual::Rect { color: 0x333333 },
                bar_pos,
                Vec2::new(bar_width, BAR_HEIGHT),
                25.0,
            )
            .with_origin(Vec2::new(0.0, 0.5)),
        );
        stage.add(
            Drawable::new(
                SpriteId::TimeBar,
                Visual::Rect { color: 0xffffff },
                bar_pos,
                Vec2::new(bar_width, BAR_HEIGHT),
                26.0,
            )
            .with_origin(Vec2::new(0.0, 0.5)),
        );

        stage.add(
            Drawable::new(
                SpriteId::ContinueButton,
                Visual::Image { texture: "continue" },
                Vec2::new(center.x - 120.0, h - 90.0),
                BUTTON_SIZE,
                40.0,
            )
            .with_scale(0.9)
            .with_alpha(0.0)
            .hidden()
            .interactive(),
        );

        stage.add(
            Drawable::new(
                SpriteId::GameOverShade,
                Visual::Rect { color: 0x000000 },
                center,
                Vec2::new(w, h),
                48.0,
            )
            .with_alpha(0.6)
            .hidden(),
        );
        stage.add(
            Drawable::new(
                SpriteId::GameOverImage,
                Visual::Image { texture: "gameover" },
                center - Vec2::new(0.0, 30.0),
                GAMEOVER_SIZE,
                49.0,
            )
            .hidden(),
        );
        let try_again_y = center.y - 60.0;
        stage.add(
            Drawable::new(
                SpriteId::TryAgainButton,
                Visual::Image { texture: "tryagain" },
                Vec2::new(center.x - 120.0, try_again_y),
                BUTTON_SIZE,
                50.0,
            )
            .with_scale(0.8)
            .hidden()
            .interactive(),
        );

        let mut presenter = Self {
            stage,
            assets,
            sounds: Vec::new(),
            marker_rest: Vec2::new(w * 0.45, h * 0.55),
            bar_width,
            try_again_y,
            emojis_shown: false,
            game_over: false,
            continue_shown: false,
        };
        presenter.play("bgm", BGM_VOLUME, true);
        presenter
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn assets(&self) -> &AssetManifest {
        &self.assets
    }

    pub fn game_over_active(&self) -> bool {
        self.game_over
    }

    pub fn continue_visible(&self) -> bool {
        self.stage.is_visible(SpriteId::ContinueButton)
    }

    /// Sounds requested since the last drain
    pub fn drain_sounds(&mut self) -> Vec<SoundRequest> {
        std::mem::take(&mut self.sounds)
    }

    fn play(&mut self, name: &'static str, volume: f32, looped: bool) {
        if self.assets.has_audio(name) {
            self.sounds.push(SoundRequest {
                name,
                volume,
                looped,
            });
        }
    }

    /// React to a simulation event
    pub fn handle(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::PointerPressed => {
                if !self.game_over {
                    self.play("click", layout::CLICK_VOLUME, false);
                }
            }
            GameEvent::Success { via, marker } => {
                self.stage.set_visible(SpriteId::Hand, false);
                self.stage.set_visible(SpriteId::Item, false);
                match via {
                    CatchPath::Hold => self.stage.set_texture(SpriteId::Avatar, "presa"),
                    CatchPath::Tap => {
                        self.stage.set_visible(SpriteId::Avatar, false);
                        if let Some(marker) = marker {
                            self.stage.set_position(SpriteId::CaughtMarker, marker);
                            self.stage.set_visible(SpriteId::CaughtMarker, true);
                        }
                    }
                }
                self.launch_emojis();
                self.switch_film();
                self.play("success", layout::SUCCESS_VOLUME, false);
            }
            GameEvent::Horror => {
                self.stage.set_texture(SpriteId::Avatar, "F2");
                if !self.game_over {
                    self.play("gameover", layout::GAMEOVER_VOLUME, false);
                }
                self.show_game_over();
            }
            GameEvent::Spawned { .. }
            | GameEvent::TargetRetreating { .. }
            | GameEvent::Despawned { .. }
            | GameEvent::RetractStarted
            | GameEvent::RetractEnded => {}
        }
    }

    /// Mirror the scene state onto the stage
    pub fn sync(&mut self, state: &SceneState, tuning: &Tuning) {
        let stage = &mut self.stage;
        stage.set_position(SpriteId::Avatar, state.avatar.pos);
        stage.set_rotation(SpriteId::Avatar, state.avatar.tilt);
        if let Some(target) = &state.target {
            stage.set_position(SpriteId::Hand, target.pos);
            stage.set_position(SpriteId::Item, target.pos);
        }
        stage.set_width(SpriteId::TimeBar, self.bar_width * state.film_progress(tuning));

        let status = match state.interaction {
            InteractionState::Horror => "HORROR SCENE",
            InteractionState::Success => "CAUGHT!",
            InteractionState::Retracting { .. } => "TOO FAST",
            _ if state.freeze => "HOLD STILL",
            _ => "",
        };
        stage.set_text(SpriteId::Status, status);

        match state.interaction {
            InteractionState::Success => {
                if state.avatar.pose == Pose::Caught {
                    stage.set_texture(SpriteId::Avatar, "presa");
                }
                stage.set_visible(SpriteId::Hand, false);
                stage.set_visible(SpriteId::Item, false);
                if let Some(marker) = stage.get_mut(SpriteId::CaughtMarker) {
                    if marker.visible {
                        marker.pos = approach(marker.pos, self.marker_rest, layout::MARKER_DRIFT);
                    }
                }
            }
            InteractionState::Horror => {}
            _ => {
                let avatar_tex = match state.avatar.pose {
                    Pose::Braced => "F2",
                    Pose::Free | Pose::Caught => "F1",
                };
                stage.set_texture(SpriteId::Avatar, avatar_tex);
                let hand_tex = if state.interaction.is_retracting() { "T2" } else { "T1" };
                stage.set_texture(SpriteId::Hand, hand_tex);

                match state.target_kind() {
                    Some(TargetKind::GrabbableHand) => {
                        stage.set_visible(SpriteId::Hand, true);
                        stage.set_visible(SpriteId::Item, false);
                    }
                    Some(kind) => {
                        stage.set_texture(SpriteId::Item, kind.texture());
                        stage.set_visible(SpriteId::Hand, false);
                        stage.set_visible(SpriteId::Item, true);
                    }
                    None => {
                        stage.set_visible(SpriteId::Hand, false);
                        stage.set_visible(SpriteId::Item, false);
                    }
                }
            }
        }
    }

    /// Step animations and chain follow-ups
    pub fn advance(&mut self, dt: f32) {
        for tag in self.stage.advance(dt) {
            match tag {
                TweenTag::FirstEmoji => {
                    self.stage.set_scale(SpriteId::SecondEmoji, 0.0);
                    self.stage.set_visible(SpriteId::SecondEmoji, true);
                    self.stage.tween(
                        Tween::new(
                            SpriteId::SecondEmoji,
                            Prop::Scale,
                            1.0,
                            layout::EMOJI_POP,
                            Ease::BackOut,
                        )
                        .tagged(TweenTag::SecondEmoji),
                    );
                }
                TweenTag::TryAgainPop => {
                    self.stage.tween(
                        Tween::new(
                            SpriteId::TryAgainButton,
                            Prop::Y,
                            self.try_again_y - 10.0,
                            layout::TRY_AGAIN_BOUNCE,
                            Ease::SineInOut,
                        )
                        .yoyo()
                        .repeat(1)
                        .tagged(TweenTag::TryAgainBounce),
                    );
                }
                TweenTag::SecondEmoji | TweenTag::ContinueFade | TweenTag::TryAgainBounce => {}
            }
        }
    }

    /// Show the continue control (fades in); idempotent
    pub fn reveal_continue(&mut self) {
        if self.continue_shown || self.game_over {
            return;
        }
        self.continue_shown = true;
        self.stage.set_visible(SpriteId::ContinueButton, true);
        self.stage.tween(
            Tween::new(
                SpriteId::ContinueButton,
                Prop::Alpha,
                1.0,
                layout::CONTINUE_FADE,
                Ease::SineOut,
            )
            .tagged(TweenTag::ContinueFade),
        );
    }

    fn launch_emojis(&mut self) {
        if self.emojis_shown {
            return;
        }
        self.emojis_shown = true;
        self.stage.set_scale(SpriteId::FirstEmoji, 0.0);
        self.stage.set_visible(SpriteId::FirstEmoji, true);
        self.stage.tween(
            Tween::new(SpriteId::FirstEmoji, Prop::Scale, 1.0, layout::EMOJI_POP, Ease::BackOut)
                .tagged(TweenTag::FirstEmoji),
        );
    }

    /// Swap to the alternate film, if there is one and it is not already up
    fn switch_film(&mut self) {
        if self.stage.contains(SpriteId::FilmAlt) && !self.stage.is_visible(SpriteId::FilmAlt) {
            self.stage.set_visible(SpriteId::Film, false);
            self.stage.set_visible(SpriteId::FilmAlt, true);
        }
    }

    fn show_game_over(&mut self) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        for id in [SpriteId::Avatar, SpriteId::Hand, SpriteId::Item] {
            self.stage.set_visible(id, false);
        }
        for id in [
            SpriteId::GameOverShade,
            SpriteId::GameOverImage,
            SpriteId::TryAgainButton,
        ] {
            self.stage.set_visible(id, true);
        }
        self.stage.set_scale(SpriteId::TryAgainButton, 0.0);
        self.stage.tween(
            Tween::new(
                SpriteId::TryAgainButton,
                Prop::Scale,
                0.8,
                layout::TRY_AGAIN_POP,
                Ease::BackOut,
            )
            .tagged(TweenTag::TryAgainPop),
        );
    }
}
