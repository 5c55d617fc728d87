// The drawing surface the renderer paints on, plus a software
// implementation over `FrameBuffer`.
// Everything here is anti-aliased by distance: each pixel's coverage is how
// far its center sits inside the shape, blended in linear light.

use glam::Vec2;

use crate::gamma::GammaLut;
use crate::types::{Color, FrameBuffer};

/// Paint for one stroked segment. `Linear` runs from the segment's start to its end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear { from: Color, to: Color },
}

impl Paint {
    /// Color at position `t` along the segment.
    #[inline]
    pub fn at(&self, t: f32) -> Color {
        match *self {
            Paint::Solid(c) => c,
            Paint::Linear { from, to } => from.lerp(to, t),
        }
    }
}

/// A stroke is always round-capped. Consecutive segments share endpoints,
/// so their caps overlap into round joins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub paint: Paint,
}

/// What the renderer needs from a raster target, in pixel coordinates.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Stroke one straight segment as its own sub-path.
    fn stroke_segment(&mut self, from: Vec2, to: Vec2, stroke: &Stroke);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// Darken a blurred disc under where a marker goes.
    fn soft_shadow(&mut self, center: Vec2, radius: f32, blur: f32, opacity: f32);
}

/// Software surface: a frame plus the gamma tables used to blend into it.
pub struct Canvas {
    frame: FrameBuffer,
    lut: GammaLut,
}

impl Canvas {
    pub fn new(frame: FrameBuffer) -> Self {
        Self { frame, lut: GammaLut::new() }
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn into_frame(self) -> FrameBuffer {
        self.frame
    }

    /// Mix `color` into pixel (x,y) at `alpha`. Out of bounds is ignored.
    #[inline]
    fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || alpha <= 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.frame.width || y >= self.frame.height {
            return;
        }
        let idx = y * self.frame.width + x;
        let dst = Color::from_u32(self.frame.pixels[idx]);
        self.frame.pixels[idx] = self.lut.mix(dst, color, alpha).to_u32();
    }

    /// Pixel rows/columns touched by a box around `lo..hi`, clamped to the frame.
    fn pixel_bounds(&self, lo: Vec2, hi: Vec2) -> Option<(i32, i32, i32, i32)> {
        let x0 = (lo.x.floor() as i32).max(0);
        let y0 = (lo.y.floor() as i32).max(0);
        let x1 = (hi.x.ceil() as i32).min(self.frame.width as i32 - 1);
        let y1 = (hi.y.ceil() as i32).min(self.frame.height as i32 - 1);
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some((x0, y0, x1, y1))
    }
}

impl Surface for Canvas {
    fn width(&self) -> u32 {
        self.frame.width as u32
    }

    fn height(&self) -> u32 {
        self.frame.height as u32
    }

    fn stroke_segment(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        let half = stroke.width / 2.0;
        if half <= 0.0 || !from.is_finite() || !to.is_finite() {
            return;
        }
        let pad = Vec2::splat(half + 1.0);
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(from.min(to) - pad, from.max(to) + pad) else {
            return;
        };

        let seg = to - from;
        let len2 = seg.length_squared();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                // Clamping the projection turns the ends into half-discs.
                let t = if len2 > 0.0 { ((p - from).dot(seg) / len2).clamp(0.0, 1.0) } else { 0.0 };
                let d = p.distance(from + seg * t);
                let coverage = (half + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend_pixel(x, y, stroke.paint.at(t), coverage);
                }
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius <= 0.0 || !center.is_finite() {
            return;
        }
        let pad = Vec2::splat(radius + 1.0);
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(center - pad, center + pad) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
                self.blend_pixel(x, y, color, coverage);
            }
        }
    }

    fn soft_shadow(&mut self, center: Vec2, radius: f32, blur: f32, opacity: f32) {
        if radius <= 0.0 || opacity <= 0.0 || !center.is_finite() {
            return;
        }
        let sigma = blur.max(0.5);
        let denom = 2.0 * sigma * sigma;
        let reach = radius + 3.0 * sigma;
        let pad = Vec2::splat(reach + 1.0);
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(center - pad, center + pad) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                if d > reach {
                    continue;
                }
                // Solid inside the disc, Gaussian falloff outside it.
                let outside = (d - radius).max(0.0);
                let w = (-(outside * outside) / denom).exp();
                self.blend_pixel(x, y, Color::BLACK, opacity * w);
            }
        }
    }
}
