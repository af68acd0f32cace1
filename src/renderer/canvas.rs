//! Canvas 2D stage painter

use std::collections::HashMap;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement, HtmlVideoElement,
};

use crate::present::{AssetManifest, Drawable, Stage, Visual};

/// Draws a `Stage` onto a canvas sized to the logical game resolution
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    document: Document,
    images: HashMap<&'static str, HtmlImageElement>,
    videos: HashMap<&'static str, HtmlVideoElement>,
}

fn css_color(rgb: u32) -> String {
    format!("#{:06x}", rgb & 0xff_ffff)
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, width: u32, height: u32) -> Result<Self, JsValue> {
        canvas.set_width(width);
        canvas.set_height(height);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;
        let document = canvas
            .owner_document()
            .ok_or_else(|| JsValue::from_str("canvas has no document"))?;
        Ok(Self {
            canvas,
            ctx,
            document,
            images: HashMap::new(),
            videos: HashMap::new(),
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Start loading everything the manifest lists
    pub fn preload(&mut self, manifest: &AssetManifest) {
        for &key in crate::present::assets::TEXTURES {
            if manifest.has_texture(key) {
                self.image(key);
            }
        }
        for &key in crate::present::assets::VIDEOS {
            if manifest.has_video(key) {
                self.video(key, 1.0);
            }
        }
    }

    fn image(&mut self, key: &'static str) -> Option<HtmlImageElement> {
        if !self.images.contains_key(key) {
            let img = HtmlImageElement::new().ok()?;
            img.set_src(&format!("assets/{key}.png"));
            self.images.insert(key, img);
        }
        self.images
            .get(key)
            .filter(|img| img.complete() && img.natural_width() > 0)
            .cloned()
    }

    fn video(&mut self, key: &'static str, rate: f32) -> Option<HtmlVideoElement> {
        if !self.videos.contains_key(key) {
            let video: HtmlVideoElement = self
                .document
                .create_element("video")
                .ok()?
                .dyn_into()
                .ok()?;
            video.set_src(&format!("assets/{key}.mp4"));
            video.set_muted(true);
            video.set_loop(true);
            video.set_playback_rate(rate as f64);
            if video.play().is_err() {
                log::warn!("Video {key} refused to autoplay");
            }
            self.videos.insert(key, video);
        }
        // HAVE_CURRENT_DATA
        self.videos.get(key).filter(|v| v.ready_state() >= 2).cloned()
    }

    /// Paint one frame
    pub fn render(&mut self, stage: &Stage) {
        let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
        self.ctx.set_global_alpha(1.0);
        self.ctx.set_fill_style_str("#000");
        self.ctx.fill_rect(0.0, 0.0, w, h);

        for d in stage.drawables() {
            if d.visible && d.alpha > 0.0 && d.scale != 0.0 {
                self.draw(d);
            }
        }
    }

    fn draw(&mut self, d: &Drawable) {
        self.ctx.save();
        self.ctx.set_global_alpha(d.alpha.clamp(0.0, 1.0) as f64);
        self.ctx.translate(d.pos.x as f64, d.pos.y as f64).ok();
        self.ctx.rotate(d.rotation as f64).ok();
        self.ctx.scale(d.scale as f64, d.scale as f64).ok();

        let (bw, bh) = (d.size.x as f64, d.size.y as f64);
        let (x, y) = (-bw * d.origin.x as f64, -bh * d.origin.y as f64);

        match d.visual {
            Visual::Image { texture } => {
                let drawn = match self.image(texture) {
                    Some(img) => self
                        .ctx
                        .draw_image_with_html_image_element_and_dw_and_dh(&img, x, y, bw, bh)
                        .is_ok(),
                    None => false,
                };
                if !drawn {
                    self.placeholder(texture, x, y, bw, bh);
                }
            }
            Visual::Video { key, playback_rate } => {
                let drawn = match self.video(key, playback_rate) {
                    Some(video) => self
                        .ctx
                        .draw_image_with_html_video_element_and_dw_and_dh(&video, x, y, bw, bh)
                        .is_ok(),
                    None => false,
                };
                if !drawn {
                    self.ctx.set_fill_style_str("#111");
                    self.ctx.fill_rect(x, y, bw, bh);
                }
            }
            Visual::Rect { color } => {
                self.ctx.set_fill_style_str(&css_color(color));
                self.ctx.fill_rect(x, y, bw, bh);
            }
            Visual::Text {
                ref content,
                font_px,
                color,
            } => {
                if !content.is_empty() {
                    self.ctx.set_font(&format!("{font_px}px monospace"));
                    self.ctx.set_text_align("center");
                    self.ctx
                        .set_text_baseline(if d.origin.y >= 1.0 { "bottom" } else { "middle" });
                    self.ctx.set_fill_style_str(&css_color(color));
                    self.ctx.fill_text(content, 0.0, 0.0).ok();
                }
            }
        }
        self.ctx.restore();
    }

    /// Outlined box with the texture key, for art that is missing or still loading
    fn placeholder(&self, key: &str, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.set_fill_style_str("rgba(255,255,255,0.08)");
        self.ctx.fill_rect(x, y, w, h);
        self.ctx.set_stroke_style_str("#888");
        self.ctx.set_line_width(2.0);
        self.ctx.stroke_rect(x, y, w, h);
        self.ctx.set_font("16px monospace");
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.set_fill_style_str("#ccc");
        self.ctx.fill_text(key, x + w / 2.0, y + h / 2.0).ok();
    }
}
