// Start/end dots: soft shadow, white halo, colored core.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::draw::Surface;
use crate::types::Color;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    pub start_color: Color,
    pub end_color: Color,
    /// Halo and core radii in logical units.
    pub outer_radius: f32,
    pub inner_radius: f32,
    /// In pixels, not scaled.
    pub shadow_blur: f32,
    pub shadow_opacity: f32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            start_color: Color::rgb(0x26, 0xC9, 0x9A),
            end_color: Color::rgb(0xFF, 0x5E, 0x5E),
            outer_radius: 6.0,
            inner_radius: 4.0,
            shadow_blur: 2.0,
            shadow_opacity: 0.3,
        }
    }
}

/// Paint one marker at `point` (pixel coordinates).
/// Visual: a colored dot ringed in white, lifted off the map by a faint shadow.
pub fn draw_marker(surface: &mut impl Surface, point: Vec2, color: Color, style: &MarkerStyle, scale: f32) {
    let outer = style.outer_radius * scale;
    surface.soft_shadow(point, outer, style.shadow_blur, style.shadow_opacity);
    surface.fill_circle(point, outer, Color::WHITE);
    surface.fill_circle(point, style.inner_radius * scale, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::Canvas;
    use crate::types::FrameBuffer;

    #[test]
    fn halo_ring_around_colored_core() {
        let mut c = Canvas::new(FrameBuffer::filled(60, 60, Color::BLACK));
        let style = MarkerStyle::default();
        let red = style.end_color;
        draw_marker(&mut c, Vec2::new(30.0, 30.0), red, &style, 2.0);
        let f = c.frame();
        // Core (r = 8) then halo (r = 12).
        assert_eq!(f.get(30, 30), Some(red));
        assert_eq!(f.get(40, 30), Some(Color::WHITE));
        assert_eq!(f.get(55, 30), Some(Color::BLACK));
    }
}
