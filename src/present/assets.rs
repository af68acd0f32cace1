//! Asset existence queries
//!
//! The scene never fails on a missing asset; it asks the manifest and picks a
//! fallback presentation instead.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Texture keys the scene can use
pub const TEXTURES: &[&str] = &[
    "cinemaUnder",
    "cinemaOver",
    "filmGif",
    "filmLoop2",
    "F1",
    "F2",
    "T1",
    "T2",
    "corn",
    "coke",
    "presa",
    "emoji1",
    "emoji2",
    "continue",
    "gameover",
    "tryagain",
];

/// Video keys the scene can use
pub const VIDEOS: &[&str] = &["filmLoop"];

/// Sound keys the scene can use
pub const SOUNDS: &[&str] = &["bgm", "click", "success", "gameover"];

/// Names of the assets that are actually available
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    pub textures: BTreeSet<String>,
    pub videos: BTreeSet<String>,
    pub audio: BTreeSet<String>,
}

impl AssetManifest {
    /// Every asset the scene knows about
    pub fn complete() -> Self {
        Self {
            textures: TEXTURES.iter().map(|s| s.to_string()).collect(),
            videos: VIDEOS.iter().map(|s| s.to_string()).collect(),
            audio: SOUNDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn has_texture(&self, key: &str) -> bool {
        self.textures.contains(key)
    }

    pub fn has_video(&self, key: &str) -> bool {
        self.videos.contains(key)
    }

    pub fn has_audio(&self, key: &str) -> bool {
        self.audio.contains(key)
    }

    pub fn without_texture(mut self, key: &str) -> Self {
        self.textures.remove(key);
        self
    }

    pub fn without_video(mut self, key: &str) -> Self {
        self.videos.remove(key);
        self
    }

    pub fn without_audio(mut self, key: &str) -> Self {
        self.audio.remove(key);
        self
    }
}
