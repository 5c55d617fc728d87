// Core types shared by the generator, the renderer and the surface.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A point in the 360-unit-wide logical canvas.
pub type TrackPoint = Vec2;

/// Width of the logical canvas the generator works in.
pub const LOGICAL_WIDTH: f32 = 360.0;

/// Tagged pen action. One `Down` first, one `Up` last, `Move` in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathAction {
    Down(TrackPoint),
    Move(TrackPoint),
    Up(TrackPoint),
}

impl PathAction {
    pub fn point(&self) -> TrackPoint {
        match *self {
            PathAction::Down(p) | PathAction::Move(p) | PathAction::Up(p) => p,
        }
    }
}

/// Inclusive `min..=max` bounds for a randomized parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span<T> {
    pub min: T,
    pub max: T,
}

impl<T> Span<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: PartialOrd> Span<T> {
    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

/// sRGB color, stored as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const WHITE: Color = Color([255, 255, 255]);
    pub const BLACK: Color = Color([0, 0, 0]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color([r, g, b])
    }

    /// Pack as 0x00RRGGBB.
    #[inline]
    pub fn to_u32(self) -> u32 {
        let [r, g, b] = self.0;
        ((r as u32) << 16) | ((g as u32) << 8) | b as u32
    }

    #[inline]
    pub fn from_u32(px: u32) -> Self {
        Color([((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8])
    }

    /// Straight per-channel mix in sRGB, `t` in [0,1].
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mut out = [0u8; 3];
        for (i, c) in out.iter_mut().enumerate() {
            let a = self.0[i] as f32;
            let b = other.0[i] as f32;
            *c = (a + (b - a) * t).round().clamp(0.0, 255.0) as u8;
        }
        Color(out)
    }
}

#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pub width: usize,      // image width in pixels
    pub height: usize,     // image height in pixels
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB (what minifb presents)
}

impl FrameBuffer {
    /// A canvas filled with one color.
    pub fn filled(width: usize, height: usize, color: Color) -> Self {
        Self { width, height, pixels: vec![color.to_u32(); width * height] }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Color::from_u32(self.pixels[y * self.width + x]))
    }
}
