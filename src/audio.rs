//! Audio system using Web Audio API
//!
//! The scene's named cues are synthesised on the fly, so no sound files ship.

use std::cell::RefCell;

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::present::SoundRequest;

/// Cue names this backend can produce
pub const CUES: &[&str] = &["bgm", "click", "success", "gameover"];

/// Running background loop
struct Loop {
    oscs: Vec<OscillatorNode>,
    gain: GainNode,
}

/// Audio manager for the scene
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    bgm: RefCell<Option<Loop>>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            bgm: RefCell::new(None),
        }
    }

    /// Whether `name` can be played at all
    pub fn has(&self, name: &str) -> bool {
        self.ctx.is_some() && CUES.contains(&name)
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Play a cue the presenter asked for; unknown names are ignored
    pub fn play(&self, request: &SoundRequest) {
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let vol = self.master_volume * request.volume;
        match request.name {
            "bgm" => self.start_bgm(ctx, request.volume),
            _ if vol <= 0.0 => {}
            "click" => self.play_click(ctx, vol),
            "success" => self.play_success(ctx, vol),
            "gameover" => self.play_game_over(ctx, vol),
            other => log::debug!("No cue named {other}"),
        }
    }

    /// Stop the background loop (scene teardown)
    pub fn stop_bgm(&self) {
        if let Some(bgm) = self.bgm.borrow_mut().take() {
            for osc in bgm.oscs {
                osc.stop().ok();
            }
            bgm.gain.disconnect().ok();
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Low projector hum; a second request while one runs is a no-op
    fn start_bgm(&self, ctx: &AudioContext, level: f32) {
        if self.bgm.borrow().is_some() {
            return;
        }
        let Ok(bus) = ctx.create_gain() else { return };
        if bus.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }

        let mut oscs = Vec::new();
        for (freq, osc_type) in [(55.0, OscillatorType::Sine), (82.5, OscillatorType::Triangle)] {
            let Ok(osc) = ctx.create_oscillator() else { continue };
            let Ok(gain) = ctx.create_gain() else { continue };
            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            gain.gain().set_value(level * self.master_volume);
            if osc.connect_with_audio_node(&gain).is_err()
                || gain.connect_with_audio_node(&bus).is_err()
            {
                continue;
            }
            osc.start().ok();
            oscs.push(osc);
        }
        *self.bgm.borrow_mut() = Some(Loop { oscs, gain: bus });
    }

    /// Click - short tick
    fn play_click(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.04)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.05).ok();
    }

    /// Success - rising chime
    fn play_success(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.0, 659.0, 784.0, 1046.0].iter().enumerate() {
            let delay = i as f64 * 0.09;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }

    /// Game over - low descending sting
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [220.0, 196.0, 165.0, 110.0].iter().enumerate() {
            let delay = i as f64 * 0.22;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sawtooth) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.45).ok();
            }
        }
    }
}
