//! Canvas 2D rendering module
//!
//! Paints the presentation `Stage` back to front. Textures load lazily from
//! `assets/<key>.png`; anything not loaded yet is drawn as a placeholder box.

pub mod canvas;

pub use canvas::CanvasRenderer;
