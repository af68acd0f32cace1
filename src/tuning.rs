//! Gameplay tuning
//!
//! Every constant the scene logic reads lives here. Defaults reproduce the
//! shipped scene on the native 1462x849 canvas; hosts may override any subset
//! from JSON (missing fields keep their default).

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{GAME_H, GAME_W};

/// Errors from loading a tuning override
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning field `{field}` is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Immutable scene configuration, loaded once at scene start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Judge ===
    /// Pointer speed above which a close approach makes the hand retract (px/s)
    pub speed_retract: f32,
    /// Pointer speed at or below which holding counts (px/s)
    pub speed_ok: f32,
    /// Max avatar/target distance for hold progress
    pub near_dist: f32,
    /// Distance under which a too-fast approach triggers a retraction
    pub close_dist: f32,
    /// Required accumulated hold (seconds)
    pub hold_time: f32,
    /// Duration of a retraction (seconds)
    pub retract_time: f32,
    /// Scene countdown (seconds)
    pub movie_time: f32,

    // === Target motion ===
    /// Distance under which an exposed hand flees a fast avatar
    pub flee_dist: f32,
    /// Fraction of `speed_retract` that counts as "too fast" for fleeing
    pub flee_speed_factor: f32,
    pub spawn_speed: f32,
    pub hand_retreat_boost: f32,
    pub bait_stop_x: f32,
    pub hand_stop_x: f32,
    pub expose_time: f32,
    pub hand_expose_time: f32,
    /// Exposed hand retreats at once if the avatar is already past this X...
    pub far_right_x: f32,
    /// ...within this long after the hand stopped
    pub grace_window: f32,
    pub spawn_entry_x: f32,
    pub exit_right_x: f32,
    pub exit_left_x: f32,
    pub hand_offset_y: f32,
    pub popcorn_offset_y: f32,
    pub soda_offset_y: f32,
    /// Per-frame lerp factor toward the band top while retracting
    pub retract_drift: f32,
    /// Per-frame lerp factor back toward the base height
    pub settle_drift: f32,

    // === Spawner ===
    pub spawn_min: f32,
    pub spawn_max: f32,
    /// Pointer X at or beyond which hands never spawn
    pub veto_pointer_x: f32,
    /// Avatar X thresholds and the hand probability ceilings they impose
    pub soft_cap_x: f32,
    pub soft_cap: f32,
    pub hard_cap_x: f32,
    pub hard_cap: f32,
    pub covered_factor: f32,
    pub uncovered_factor: f32,
    /// Diagonal partition line used by the cover test (screen space, Y down)
    pub cover_line: [Vec2; 2],

    // === Geometry ===
    pub screen_w: f32,
    pub screen_h: f32,
    pub avatar_base: Vec2,
    pub avatar_min_y: f32,
    pub avatar_max_y: f32,
    pub avatar_max_x: f32,
    pub pointer_offset: Vec2,
    /// Tilt at the top of the band (radians, negative tilts upward)
    pub max_tilt: f32,
    pub target_base: Vec2,
    pub target_min_y: f32,
    pub target_max_y: f32,

    // === Presentation timing ===
    pub continue_delay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        let avatar_base = Vec2::new(GAME_W * 0.34, GAME_H * 0.60);
        let target_base = Vec2::new(GAME_W * 0.62, GAME_H * 0.58);
        Self {
            speed_retract: 900.0,
            speed_ok: 250.0,
            near_dist: 15.0,
            close_dist: 60.0,
            hold_time: 0.7,
            retract_time: 1.2,
            movie_time: 25.0,

            flee_dist: 90.0,
            flee_speed_factor: 0.55,
            spawn_speed: 520.0,
            hand_retreat_boost: 1.8,
            bait_stop_x: GAME_W * 0.60,
            hand_stop_x: GAME_W * 0.63,
            expose_time: 0.8,
            hand_expose_time: 0.45,
            far_right_x: 720.0,
            grace_window: 0.05,
            spawn_entry_x: GAME_W + 160.0,
            exit_right_x: GAME_W + 200.0,
            exit_left_x: -160.0,
            hand_offset_y: 60.0,
            popcorn_offset_y: -160.0,
            soda_offset_y: -220.0,
            retract_drift: 0.18,
            settle_drift: 0.08,

            spawn_min: 1.5,
            spawn_max: 3.5,
            veto_pointer_x: 720.0,
            soft_cap_x: 500.0,
            soft_cap: 0.05,
            hard_cap_x: 580.0,
            hard_cap: 0.01,
            covered_factor: 1.2,
            uncovered_factor: 0.8,
            cover_line: [Vec2::new(366.0, 142.0), Vec2::new(520.0, 670.0)],

            screen_w: GAME_W,
            screen_h: GAME_H,
            avatar_base,
            avatar_min_y: avatar_base.y - 160.0,
            avatar_max_y: avatar_base.y + 40.0,
            avatar_max_x: GAME_W * 0.40,
            pointer_offset: Vec2::new(-200.0, -100.0),
            max_tilt: (-22.0f32).to_radians(),
            target_base,
            target_min_y: target_base.y - 80.0,
            target_max_y: target_base.y + 30.0,

            continue_delay: 1.0,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON override
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject configurations the scene logic cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, v: f32) -> Result<(), TuningError> {
            if v > 0.0 && v.is_finite() {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive number",
                })
            }
        }
        fn unit(field: &'static str, v: f32) -> Result<(), TuningError> {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must lie in [0, 1]",
                })
            }
        }

        for (field, v) in self.scalars() {
            if !v.is_finite() {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be finite",
                });
            }
        }
        for (field, v) in [
            ("avatar_base", self.avatar_base),
            ("pointer_offset", self.pointer_offset),
            ("target_base", self.target_base),
            ("cover_line", self.cover_line[0]),
            ("cover_line", self.cover_line[1]),
        ] {
            if !v.is_finite() {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be finite",
                });
            }
        }

        positive("screen_w", self.screen_w)?;
        positive("screen_h", self.screen_h)?;
        positive("hold_time", self.hold_time)?;
        positive("retract_time", self.retract_time)?;
        positive("movie_time", self.movie_time)?;
        positive("spawn_speed", self.spawn_speed)?;
        positive("hand_retreat_boost", self.hand_retreat_boost)?;
        positive("spawn_min", self.spawn_min)?;
        positive("spawn_max", self.spawn_max)?;
        positive("expose_time", self.expose_time)?;
        positive("hand_expose_time", self.hand_expose_time)?;
        if self.spawn_min > self.spawn_max {
            return Err(TuningError::Invalid {
                field: "spawn_max",
                reason: "must not be below spawn_min",
            });
        }
        if self.avatar_min_y >= self.avatar_max_y {
            return Err(TuningError::Invalid {
                field: "avatar_max_y",
                reason: "must be above avatar_min_y",
            });
        }
        if self.target_min_y > self.target_max_y {
            return Err(TuningError::Invalid {
                field: "target_max_y",
                reason: "must not be below target_min_y",
            });
        }
        if self.avatar_max_x < 0.0 {
            return Err(TuningError::Invalid {
                field: "avatar_max_x",
                reason: "must not be negative",
            });
        }
        if self.cover_line[0] == self.cover_line[1] {
            return Err(TuningError::Invalid {
                field: "cover_line",
                reason: "endpoints must differ",
            });
        }
        unit("soft_cap", self.soft_cap)?;
        unit("hard_cap", self.hard_cap)?;
        unit("retract_drift", self.retract_drift)?;
        unit("settle_drift", self.settle_drift)?;
        Ok(())
    }

    fn scalars(&self) -> [(&'static str, f32); 43] {
        [
            ("speed_retract", self.speed_retract),
            ("speed_ok", self.speed_ok),
            ("near_dist", self.near_dist),
            ("close_dist", self.close_dist),
            ("hold_time", self.hold_time),
            ("retract_time", self.retract_time),
            ("movie_time", self.movie_time),
            ("flee_dist", self.flee_dist),
            ("flee_speed_factor", self.flee_speed_factor),
            ("spawn_speed", self.spawn_speed),
            ("hand_retreat_boost", self.hand_retreat_boost),
            ("bait_stop_x", self.bait_stop_x),
            ("hand_stop_x", self.hand_stop_x),
            ("expose_time", self.expose_time),
            ("hand_expose_time", self.hand_expose_time),
            ("far_right_x", self.far_right_x),
            ("grace_window", self.grace_window),
            ("spawn_entry_x", self.spawn_entry_x),
            ("exit_right_x", self.exit_right_x),
            ("exit_left_x", self.exit_left_x),
            ("hand_offset_y", self.hand_offset_y),
            ("popcorn_offset_y", self.popcorn_offset_y),
            ("soda_offset_y", self.soda_offset_y),
            ("retract_drift", self.retract_drift),
            ("settle_drift", self.settle_drift),
            ("spawn_min", self.spawn_min),
            ("spawn_max", self.spawn_max),
            ("veto_pointer_x", self.veto_pointer_x),
            ("soft_cap_x", self.soft_cap_x),
            ("soft_cap", self.soft_cap),
            ("hard_cap_x", self.hard_cap_x),
            ("hard_cap", self.hard_cap),
            ("covered_factor", self.covered_factor),
            ("uncovered_factor", self.uncovered_factor),
            ("screen_w", self.screen_w),
            ("screen_h", self.screen_h),
            ("avatar_min_y", self.avatar_min_y),
            ("avatar_max_y", self.avatar_max_y),
            ("avatar_max_x", self.avatar_max_x),
            ("max_tilt", self.max_tilt),
            ("target_min_y", self.target_min_y),
            ("target_max_y", self.target_max_y),
            ("continue_delay", self.continue_delay),
        ]
    }

    /// Stop X for a kind of target
    pub fn stop_x(&self, hand: bool) -> f32 {
        if hand { self.hand_stop_x } else { self.bait_stop_x }
    }

    /// Screen center X
    pub fn center_x(&self) -> f32 {
        self.screen_w * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "movie_time": 10.0, "spawn_max": 2.0 }"#).unwrap();
        assert_eq!(t.movie_time, 10.0);
        assert_eq!(t.spawn_max, 2.0);
        assert_eq!(t.speed_ok, Tuning::default().speed_ok);
    }

    #[test]
    fn test_vec_fields_parse_as_arrays() {
        let t = Tuning::from_json(r#"{ "pointer_offset": [0.0, 0.0] }"#).unwrap();
        assert_eq!(t.pointer_offset, Vec2::ZERO);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_inverted_spawn_window_rejected() {
        let err = Tuning::from_json(r#"{ "spawn_min": 4.0, "spawn_max": 1.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "spawn_max", .. }));
    }

    #[test]
    fn test_overflowing_spawn_max_rejected() {
        // 1e39 overflows f32 to infinity
        let err = Tuning::from_json(r#"{ "spawn_max": 1e39 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "spawn_max",
                reason: "must be finite"
            }
        ));
    }

    #[test]
    fn test_non_finite_fields_rejected() {
        let t = Tuning {
            far_right_x: f32::NAN,
            ..Tuning::default()
        };
        assert!(matches!(
            t.validate(),
            Err(TuningError::Invalid { field: "far_right_x", .. })
        ));

        let t = Tuning {
            target_base: Vec2::new(f32::INFINITY, 0.0),
            ..Tuning::default()
        };
        assert!(matches!(
            t.validate(),
            Err(TuningError::Invalid { field: "target_base", .. })
        ));
    }

    #[test]
    fn test_degenerate_screen_rejected() {
        let err = Tuning::from_json(r#"{ "screen_w": 0.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "screen_w", .. }));
        let err = Tuning::from_json(r#"{ "screen_h": -849.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "screen_h", .. }));
    }

    #[test]
    fn test_zero_hold_time_rejected() {
        let err = Tuning::from_json(r#"{ "hold_time": 0.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "hold_time", .. }));
    }
}
