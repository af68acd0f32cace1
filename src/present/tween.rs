//! Property tweens with easing

use std::f32::consts::PI;

use super::stage::SpriteId;

/// Easing curves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Linear,
    /// Overshoots then settles (balloon pop)
    BackOut,
    SineOut,
    SineInOut,
}

impl Ease {
    /// Map linear progress `t` in [0, 1] to eased progress
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::BackOut => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                let u = t - 1.0;
                1.0 + c3 * u * u * u + c1 * u * u
            }
            Ease::SineOut => (t * PI / 2.0).sin(),
            Ease::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

/// Animatable drawable property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prop {
    Scale,
    Alpha,
    Y,
}

/// Identifies tweens whose completion the sequencer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenTag {
    FirstEmoji,
    SecondEmoji,
    ContinueFade,
    TryAgainPop,
    TryAgainBounce,
}

/// A running tween from the property's value at start toward `to`
#[derive(Debug, Clone)]
pub struct Tween {
    pub target: SpriteId,
    pub prop: Prop,
    pub to: f32,
    pub duration: f32,
    pub ease: Ease,
    /// Play back to the start value after reaching `to`
    pub yoyo: bool,
    /// Extra cycles after the first
    pub repeat: u32,
    pub tag: Option<TweenTag>,
    pub(super) from: f32,
    pub(super) elapsed: f32,
}

impl Tween {
    pub fn new(target: SpriteId, prop: Prop, to: f32, duration: f32, ease: Ease) -> Self {
        Self {
            target,
            prop,
            to,
            duration: duration.max(0.0),
            ease,
            yoyo: false,
            repeat: 0,
            tag: None,
            from: 0.0,
            elapsed: 0.0,
        }
    }

    pub fn yoyo(mut self) -> Self {
        self.yoyo = true;
        self
    }

    pub fn repeat(mut self, times: u32) -> Self {
        self.repeat = times;
        self
    }

    pub fn tagged(mut self, tag: TweenTag) -> Self {
        self.tag = Some(tag);
        self
    }

    fn cycle_len(&self) -> f32 {
        if self.yoyo { self.duration * 2.0 } else { self.duration }
    }

    /// Total running time including yoyo legs and repeats
    pub fn total(&self) -> f32 {
        self.cycle_len() * (self.repeat + 1) as f32
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.total()
    }

    /// Property value at the current elapsed time
    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 || self.finished() {
            return if self.yoyo { self.from } else { self.to };
        }
        let cycle_t = self.elapsed % self.cycle_len();
        let p = if cycle_t <= self.duration {
            cycle_t / self.duration
        } else {
            1.0 - (cycle_t - self.duration) / self.duration
        };
        crate::lerp(self.from, self.to, self.ease.apply(p))
    }

    pub(super) fn step(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_endpoints() {
        for ease in [Ease::Linear, Ease::BackOut, Ease::SineOut, Ease::SineInOut] {
            assert!(ease.apply(0.0).abs() < 1e-5, "{ease:?}");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-5, "{ease:?}");
        }
    }

    #[test]
    fn test_back_out_overshoots() {
        let peak = (1..100)
            .map(|i| Ease::BackOut.apply(i as f32 / 100.0))
            .fold(0.0f32, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_linear_midpoint() {
        let mut t = Tween::new(SpriteId::ContinueButton, Prop::Alpha, 1.0, 1.0, Ease::Linear);
        t.step(0.5);
        assert!((t.value() - 0.5).abs() < 1e-5);
        t.step(0.6);
        assert!(t.finished());
        assert_eq!(t.value(), 1.0);
    }

    #[test]
    fn test_yoyo_returns_to_start() {
        let mut t = Tween::new(SpriteId::TryAgainButton, Prop::Y, 10.0, 0.1, Ease::Linear)
            .yoyo()
            .repeat(1);
        assert!((t.total() - 0.4).abs() < 1e-6);
        t.step(0.15);
        assert!((t.value() - 5.0).abs() < 1e-3);
        t.step(1.0);
        assert!(t.finished());
        assert_eq!(t.value(), 0.0);
    }
}
