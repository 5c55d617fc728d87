// Background in, composed PNG out.
// Loading converts any format `image` decodes into a 0x00RRGGBB frame the
// renderer and the preview window both use; saving goes the other way.

use std::path::Path;

use image::{imageops::FilterType, ImageBuffer, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::types::{Color, FrameBuffer};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Resize the saved image to this width (aspect kept). `None` saves as rendered.
    pub save_width: Option<u32>,
    /// Canvas used when no background image is given.
    pub blank_width: u32,
    pub blank_height: u32,
    pub blank_color: Color,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            save_width: Some(1080),
            blank_width: 360,
            blank_height: 719,
            blank_color: Color::rgb(0xF2, 0xF2, 0xEE),
        }
    }
}

impl OutputConfig {
    pub fn validate(&self) -> Result<()> {
        if self.blank_width == 0 || self.blank_height == 0 {
            return Err(Error::config("output.blank_width and output.blank_height must be positive"));
        }
        if self.save_width == Some(0) {
            return Err(Error::config("output.save_width must be positive when set"));
        }
        Ok(())
    }

    pub fn blank_canvas(&self) -> FrameBuffer {
        FrameBuffer::filled(self.blank_width as usize, self.blank_height as usize, self.blank_color)
    }
}

/// Decode an image file into a frame at its natural size.
pub fn load_background(path: &Path) -> Result<FrameBuffer> {
    let img = image::open(path).map_err(|source| Error::ImageLoad { path: path.to_path_buf(), source })?;
    let rgb = img.to_rgb8();
    let frame = frame_from_rgb(&rgb);
    info!(path = %path.display(), width = frame.width, height = frame.height, "background loaded");
    Ok(frame)
}

pub fn frame_from_rgb(rgb: &RgbImage) -> FrameBuffer {
    let (w, h) = rgb.dimensions();
    let pixels = rgb
        .pixels()
        .map(|p| Color([p[0], p[1], p[2]]).to_u32())
        .collect();
    FrameBuffer { width: w as usize, height: h as usize, pixels }
}

pub fn rgb_from_frame(frame: &FrameBuffer) -> RgbImage {
    ImageBuffer::from_fn(frame.width as u32, frame.height as u32, |x, y| {
        let c = Color::from_u32(frame.pixels[y as usize * frame.width + x as usize]);
        Rgb(c.0)
    })
}

/// Scale to `width`, keeping aspect. Same-width requests return a copy.
pub fn resize_to_width(rgb: &RgbImage, width: u32) -> RgbImage {
    let (w, h) = rgb.dimensions();
    if w == width || w == 0 {
        return rgb.clone();
    }
    let height = ((h as f64) * (width as f64) / (w as f64)).round().max(1.0) as u32;
    image::imageops::resize(rgb, width, height, FilterType::Lanczos3)
}

/// Write `frame` as an image (format from the extension), resized if `save_width` is set.
pub fn save_frame(frame: &FrameBuffer, path: &Path, save_width: Option<u32>) -> Result<()> {
    let mut rgb = rgb_from_frame(frame);
    if let Some(width) = save_width {
        rgb = resize_to_width(&rgb, width);
    }
    rgb.save(path).map_err(|source| Error::ImageSave { path: path.to_path_buf(), source })?;
    info!(path = %path.display(), width = rgb.width(), height = rgb.height(), "image saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_and_image_agree_on_pixels() {
        let mut frame = FrameBuffer::filled(4, 3, Color::BLACK);
        frame.pixels[4 + 2] = Color::rgb(10, 20, 30).to_u32(); // (2, 1)
        let rgb = rgb_from_frame(&frame);
        assert_eq!(rgb.get_pixel(2, 1), &Rgb([10, 20, 30]));
        let back = frame_from_rgb(&rgb);
        assert_eq!(back.pixels, frame.pixels);
    }

    #[test]
    fn resize_keeps_aspect() {
        let rgb = rgb_from_frame(&OutputConfig::default().blank_canvas());
        let big = resize_to_width(&rgb, 1080);
        assert_eq!(big.dimensions(), (1080, 2157));
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!("trackmark-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.png");
        let frame = FrameBuffer::filled(8, 6, Color::rgb(38, 201, 154));
        save_frame(&frame, &path, Some(16)).unwrap();
        let loaded = load_background(&path).unwrap();
        assert_eq!((loaded.width, loaded.height), (16, 12));
        let c = loaded.get(8, 6).unwrap();
        for (got, want) in c.0.iter().zip([38u8, 201, 154]) {
            assert!(got.abs_diff(want) <= 1, "{c:?}");
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_background_reports_path() {
        let err = load_background(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, Error::ImageLoad { .. }));
        assert!(err.to_string().contains("not/here.png"));
    }
}
