//! Texture loading and animation metadata.

use crate::error::{RenderError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw texture data loaded from PNG.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels. For animated textures this covers every frame.
    pub height: u32,
    /// RGBA8 pixel data (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl TextureData {
    /// Create a new texture from RGBA data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Get a pixel at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Number of square frames stacked vertically.
    ///
    /// Fails when the strip height isn't a whole multiple of the width.
    pub fn frame_count(&self) -> Result<u32> {
        if self.width == 0 || self.height % self.width != 0 {
            return Err(RenderError::InvalidTexture(format!(
                "{}x{} is not a strip of square frames",
                self.width, self.height
            )));
        }
        Ok(self.height / self.width)
    }

    /// Nearest-neighbour sample.
    ///
    /// `u`/`v` are in model texture space (0-16 across the image); values
    /// outside are clamped to the edge.
    pub fn sample(&self, u: f32, v: f32) -> [u8; 4] {
        if self.width == 0 || self.height == 0 {
            return [0, 0, 0, 0];
        }
        let x = ((u * self.width as f32 / 16.0).floor() as i64).clamp(0, self.width as i64 - 1);
        let y = ((v * self.height as f32 / 16.0).floor() as i64).clamp(0, self.height as i64 - 1);
        self.get_pixel(x as u32, y as u32)
    }

    /// Copy out one frame of a vertical strip whose frames are `frame_height`
    /// rows tall. Frame indices wrap.
    pub fn frame(&self, index: u32, frame_height: u32) -> TextureData {
        let frame_height = frame_height.clamp(1, self.height.max(1));
        let frames = (self.height / frame_height).max(1);
        let row_bytes = (self.width * 4) as usize;
        let start = ((index % frames) * frame_height) as usize * row_bytes;
        let end = (start + frame_height as usize * row_bytes).min(self.pixels.len());

        Self::new(self.width, frame_height, self.pixels[start..end].to_vec())
    }
}

/// Load a texture from PNG bytes.
pub fn load_texture_from_bytes(data: &[u8]) -> Result<TextureData> {
    let img = image::load_from_memory(data)?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(TextureData::new(width, height, rgba.into_raw()))
}

/// The `animation` section of a `.png.mcmeta` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationMeta {
    /// Ticks each frame stays on screen.
    #[serde(default = "default_frametime")]
    pub frametime: u32,
    #[serde(default)]
    pub interpolate: bool,
    /// Explicit frame order. Parsed for completeness; playback is sequential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<Vec<AnimationFrame>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

fn default_frametime() -> u32 {
    1
}

impl Default for AnimationMeta {
    fn default() -> Self {
        Self {
            frametime: default_frametime(),
            interpolate: false,
            frames: None,
            width: None,
            height: None,
        }
    }
}

/// One entry of `animation.frames`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnimationFrame {
    Index(u32),
    Timed { index: u32, time: u32 },
}

/// Extract the animation section from a parsed `.png.mcmeta` document.
/// Returns `None` when the document has no `animation` key.
pub fn parse_mcmeta(document: &Value) -> Result<Option<AnimationMeta>> {
    match document.get("animation") {
        Some(section) => {
            let mut meta: AnimationMeta = serde_json::from_value(section.clone())?;
            // A zero frametime would stall playback.
            meta.frametime = meta.frametime.max(1);
            Ok(Some(meta))
        }
        None => Ok(None),
    }
}
