//! Retained 2D stage
//!
//! A flat list of drawables kept in depth order. The sequencer mutates it;
//! a renderer only reads it. Tweens live here too so a teardown of the
//! stage drops every running animation with it.

use glam::Vec2;

use super::tween::{Prop, Tween, TweenTag};

/// Every drawable the scene uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Backdrop,
    Film,
    FilmAlt,
    CinemaUnder,
    Avatar,
    Hand,
    Item,
    CaughtMarker,
    FirstEmoji,
    SecondEmoji,
    CinemaOver,
    Status,
    Hint,
    TimeBarBg,
    TimeBar,
    ContinueButton,
    GameOverShade,
    GameOverImage,
    TryAgainButton,
}

/// What a drawable looks like
#[derive(Debug, Clone, PartialEq)]
pub enum Visual {
    Image { texture: &'static str },
    /// Looping video, muted
    Video { key: &'static str, playback_rate: f32 },
    /// Filled rectangle, RGB color
    Rect { color: u32 },
    Text { content: String, font_px: f32, color: u32 },
}

#[derive(Debug, Clone)]
pub struct Drawable {
    pub id: SpriteId,
    pub visual: Visual,
    pub pos: Vec2,
    /// Display size at scale 1
    pub size: Vec2,
    /// Anchor within the box, (0.5, 0.5) is centered
    pub origin: Vec2,
    pub scale: f32,
    pub rotation: f32,
    pub alpha: f32,
    pub visible: bool,
    pub depth: f32,
    /// Takes part in hit testing
    pub interactive: bool,
}

impl Drawable {
    pub fn new(id: SpriteId, visual: Visual, pos: Vec2, size: Vec2, depth: f32) -> Self {
        Self {
            id,
            visual,
            pos,
            size,
            origin: Vec2::splat(0.5),
            scale: 1.0,
            rotation: 0.0,
            alpha: 1.0,
            visible: true,
            depth,
            interactive: false,
        }
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    /// Axis-aligned bounds (ignores rotation)
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let size = self.size * self.scale;
        let min = self.pos - size * self.origin;
        (min, min + size)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let (min, max) = self.bounds();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    fn get(&self, prop: Prop) -> f32 {
        match prop {
            Prop::Scale => self.scale,
            Prop::Alpha => self.alpha,
            Prop::Y => self.pos.y,
        }
    }

    fn set(&mut self, prop: Prop, v: f32) {
        match prop {
            Prop::Scale => self.scale = v,
            Prop::Alpha => self.alpha = v,
            Prop::Y => self.pos.y = v,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Stage {
    drawables: Vec<Drawable>,
    tweens: Vec<Tween>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert keeping depth order; equal depths keep insertion order
    pub fn add(&mut self, drawable: Drawable) {
        let idx = self
            .drawables
            .iter()
            .position(|d| d.depth > drawable.depth)
            .unwrap_or(self.drawables.len());
        self.drawables.insert(idx, drawable);
    }

    pub fn contains(&self, id: SpriteId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: SpriteId) -> Option<&Drawable> {
        self.drawables.iter().find(|d| d.id == id)
    }

    pub fn get_mut(&mut self, id: SpriteId) -> Option<&mut Drawable> {
        self.drawables.iter_mut().find(|d| d.id == id)
    }

    /// Drawables back to front
    pub fn drawables(&self) -> impl Iterator<Item = &Drawable> {
        self.drawables.iter()
    }

    pub fn is_visible(&self, id: SpriteId) -> bool {
        self.get(id).is_some_and(|d| d.visible)
    }

    pub fn set_visible(&mut self, id: SpriteId, visible: bool) {
        if let Some(d) = self.get_mut(id) {
            d.visible = visible;
        }
    }

    pub fn set_position(&mut self, id: SpriteId, pos: Vec2) {
        if let Some(d) = self.get_mut(id) {
            d.pos = pos;
        }
    }

    pub fn set_rotation(&mut self, id: SpriteId, rotation: f32) {
        if let Some(d) = self.get_mut(id) {
            d.rotation = rotation;
        }
    }

    pub fn set_scale(&mut self, id: SpriteId, scale: f32) {
        if let Some(d) = self.get_mut(id) {
            d.scale = scale;
        }
    }

    /// Swap an image's texture (no-op for other visuals)
    pub fn set_texture(&mut self, id: SpriteId, texture: &'static str) {
        if let Some(Drawable {
            visual: Visual::Image { texture: current },
            ..
        }) = self.get_mut(id)
        {
            *current = texture;
        }
    }

    pub fn texture(&self, id: SpriteId) -> Option<&'static str> {
        match self.get(id)?.visual {
            Visual::Image { texture } => Some(texture),
            _ => None,
        }
    }

    pub fn set_text(&mut self, id: SpriteId, text: &str) {
        if let Some(Drawable {
            visual: Visual::Text { content, .. },
            ..
        }) = self.get_mut(id)
        {
            if content.as_str() != text {
                content.clear();
                content.push_str(text);
            }
        }
    }

    pub fn set_width(&mut self, id: SpriteId, width: f32) {
        if let Some(d) = self.get_mut(id) {
            d.size.x = width.max(0.0);
        }
    }

    /// Start a tween from the property's current value
    pub fn tween(&mut self, mut tween: Tween) {
        if let Some(d) = self.get(tween.target) {
            tween.from = d.get(tween.prop);
            self.tweens.push(tween);
        }
    }

    pub fn active_tweens(&self) -> usize {
        self.tweens.len()
    }

    /// Step tweens; returns tags of the ones that completed, in start order
    pub fn advance(&mut self, dt: f32) -> Vec<TweenTag> {
        let mut done = Vec::new();
        for tween in &mut self.tweens {
            tween.step(dt);
            let value = tween.value();
            if let Some(d) = self.drawables.iter_mut().find(|d| d.id == tween.target) {
                d.set(tween.prop, value);
            }
            if tween.finished() {
                if let Some(tag) = tween.tag {
                    done.push(tag);
                }
            }
        }
        self.tweens.retain(|t| !t.finished());
        done
    }

    /// Topmost visible interactive drawable under `point`
    pub fn hit_test(&self, point: Vec2) -> Option<SpriteId> {
        self.drawables
            .iter()
            .rev()
            .find(|d| d.visible && d.interactive && d.contains(point))
            .map(|d| d.id)
    }
}
