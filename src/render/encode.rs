//! PNG and APNG output.

use crate::error::{RenderError, Result};
use image::codecs::png::PngEncoder;
use image::{ImageEncoder, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Per-frame display time of an animated image, as a fraction of a second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameDelay {
    pub numerator: u16,
    pub denominator: u16,
}

impl FrameDelay {
    pub fn new(numerator: u16, denominator: u16) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// This delay held for `ticks` ticks.
    ///
    /// Falls back to whole seconds when the numerator no longer fits in
    /// 16 bits. A zero denominator means hundredths, as in APNG.
    pub fn times(self, ticks: u32) -> Self {
        let numerator = u32::from(self.numerator).saturating_mul(ticks);
        match u16::try_from(numerator) {
            Ok(numerator) => Self::new(numerator, self.denominator),
            Err(_) => {
                let denominator = match self.denominator {
                    0 => 100,
                    d => u32::from(d),
                };
                let seconds = (numerator / denominator).min(u32::from(u16::MAX));
                Self::new(seconds as u16, 1)
            }
        }
    }
}

impl Default for FrameDelay {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// Encode one RGBA image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}

/// Encode frames as an endlessly looping APNG, `delays[i]` being how long
/// frame `i` stays up. All frames must share the first frame's dimensions.
pub fn encode_apng(frames: &[RgbaImage], delays: &[FrameDelay]) -> Result<Vec<u8>> {
    let first = frames
        .first()
        .ok_or_else(|| RenderError::Encode("cannot encode an APNG without frames".into()))?;
    if delays.len() != frames.len() {
        return Err(RenderError::Encode(format!(
            "{} frames but {} delays",
            frames.len(),
            delays.len()
        )));
    }
    let (width, height) = first.dimensions();
    if let Some(frame) = frames.iter().find(|f| f.dimensions() != (width, height)) {
        return Err(RenderError::Encode(format!(
            "frame is {}x{}, expected {}x{}",
            frame.width(),
            frame.height(),
            width,
            height
        )));
    }

    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_animated(frames.len() as u32, 0)?;

        let mut writer = encoder.write_header()?;
        for (frame, delay) in frames.iter().zip(delays) {
            writer.set_frame_delay(delay.numerator, delay.denominator)?;
            writer.write_image_data(frame.as_raw())?;
        }
        writer.finish()?;
    }

    log::debug!("Encoded {} APNG frames ({}x{})", frames.len(), width, height);
    Ok(bytes)
}

/// The frames of one render.
///
/// Consecutive ticks that look the same share one frame; `frame_ticks`
/// holds how many ticks each frame covers.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedImage {
    pub frames: Vec<RgbaImage>,
    pub frame_ticks: Vec<u32>,
    /// Display time of one tick.
    pub frame_delay: FrameDelay,
}

impl RenderedImage {
    /// One tick per frame.
    pub fn new(frames: Vec<RgbaImage>, frame_delay: FrameDelay) -> Self {
        let frame_ticks = vec![1; frames.len()];
        Self {
            frames,
            frame_ticks,
            frame_delay,
        }
    }

    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }

    /// Ticks covered by every frame; missing entries count as one.
    pub fn ticks(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.frames.len()).map(|i| self.frame_ticks.get(i).copied().unwrap_or(1))
    }

    /// Total ticks across all frames.
    pub fn duration_ticks(&self) -> u64 {
        self.ticks().map(u64::from).sum()
    }

    /// PNG bytes for a single frame, APNG bytes otherwise.
    pub fn encode(&self) -> Result<Vec<u8>> {
        match self.frames.as_slice() {
            [single] => encode_png(single),
            frames => {
                let delays: Vec<FrameDelay> =
                    self.ticks().map(|ticks| self.frame_delay.times(ticks)).collect();
                encode_apng(frames, &delays)
            }
        }
    }

    /// Encode and write to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.encode()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn frame(shade: u8) -> RgbaImage {
        RgbaImage::from_pixel(4, 4, Rgba([shade, 0, 0, 255]))
    }

    fn has_chunk(bytes: &[u8], name: &[u8; 4]) -> bool {
        bytes.windows(4).any(|w| w == name)
    }

    #[test]
    fn test_single_frame_is_plain_png() {
        let image = RenderedImage::new(vec![frame(10)], FrameDelay::default());
        assert!(!image.is_animated());
        let bytes = image.encode().unwrap();
        assert!(!has_chunk(&bytes, b"acTL"));

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, frame(10));
    }

    #[test]
    fn test_multiple_frames_are_apng() {
        let image = RenderedImage::new(vec![frame(10), frame(20), frame(30)], FrameDelay::new(1, 20));
        assert!(image.is_animated());
        let bytes = image.encode().unwrap();
        assert!(has_chunk(&bytes, b"acTL"));
        assert!(has_chunk(&bytes, b"fcTL"));

        let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
        let reader = decoder.read_info().unwrap();
        let control = reader.info().animation_control.unwrap();
        assert_eq!(control.num_frames, 3);
        assert_eq!(control.num_plays, 0);
    }

    #[test]
    fn test_apng_rejects_empty_and_mismatched() {
        let delay = FrameDelay::default();
        assert!(matches!(encode_apng(&[], &[]), Err(RenderError::Encode(_))));
        let odd = RgbaImage::new(2, 2);
        assert!(matches!(
            encode_apng(&[frame(0), odd], &[delay, delay]),
            Err(RenderError::Encode(_))
        ));
        assert!(matches!(
            encode_apng(&[frame(0), frame(1)], &[delay]),
            Err(RenderError::Encode(_))
        ));
    }

    #[test]
    fn test_save_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets/minecraft/textures/block/stone.png");
        RenderedImage::new(vec![frame(5)], FrameDelay::default())
            .save(&path)
            .unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_frame_delay_default() {
        assert_eq!(FrameDelay::default(), FrameDelay::new(1, 10));
        let parsed: FrameDelay = serde_json::from_str(r#"{"numerator":1,"denominator":20}"#).unwrap();
        assert_eq!(parsed, FrameDelay::new(1, 20));
    }

    #[test]
    fn test_held_frames_get_longer_delays() {
        let image = RenderedImage {
            frames: vec![frame(10), frame(20)],
            frame_ticks: vec![1, 3],
            frame_delay: FrameDelay::new(1, 10),
        };
        assert_eq!(image.duration_ticks(), 4);
        let bytes = image.encode().unwrap();

        let mut reader = png::Decoder::new(std::io::Cursor::new(bytes))
            .read_info()
            .unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let mut delays = Vec::new();
        for _ in 0..2 {
            reader.next_frame(&mut buf).unwrap();
            let control = reader.info().frame_control.unwrap();
            delays.push((control.delay_num, control.delay_den));
        }
        assert_eq!(delays, vec![(1, 10), (3, 10)]);
    }

    #[test]
    fn test_frame_delay_times() {
        assert_eq!(FrameDelay::new(1, 10).times(300), FrameDelay::new(300, 10));
        // 1/20 s for u32::MAX ticks only fits as whole seconds.
        assert_eq!(
            FrameDelay::new(1, 20).times(u32::MAX),
            FrameDelay::new(u16::MAX, 1)
        );
        assert_eq!(FrameDelay::new(40_000, 0).times(2), FrameDelay::new(800, 1));
    }
}
