// Gamma-correct blending for stroke edges and marker rims.
// Visual: anti-aliased edges fade evenly into the photo instead of leaving a
// dark fringe where sRGB values get averaged.

use crate::types::Color;

// Resolution of the linear -> sRGB table.
const ENCODE_STEPS: usize = 4096;

/// sRGB transfer curve on 0..1.
#[inline]
fn decode_srgb(c: f32) -> f32 {
    if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
}

#[inline]
fn encode_srgb(l: f32) -> f32 {
    if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 }
}

/// Table-driven sRGB <-> linear conversion used by every pixel blend.
pub struct GammaLut {
    decode: [f32; 256],
    encode: Box<[u8; ENCODE_STEPS]>,
}

impl GammaLut {
    pub fn new() -> Self {
        let decode = std::array::from_fn(|v| decode_srgb(v as f32 / 255.0));
        let encode = Box::new(std::array::from_fn(|i| {
            let l = i as f32 / (ENCODE_STEPS - 1) as f32;
            (encode_srgb(l) * 255.0).round().clamp(0.0, 255.0) as u8
        }));
        Self { decode, encode }
    }

    #[inline]
    fn to_linear(&self, channel: u8) -> f32 {
        self.decode[channel as usize]
    }

    #[inline]
    fn to_srgb(&self, linear: f32) -> u8 {
        let idx = (linear.clamp(0.0, 1.0) * (ENCODE_STEPS - 1) as f32).round() as usize;
        self.encode[idx]
    }

    /// `dst` covered by `src` at `alpha` (0 keeps dst, 1 replaces it).
    /// Visual: a half-covered edge pixel looks half as bright, not darker.
    #[inline]
    pub fn mix(&self, dst: Color, src: Color, alpha: f32) -> Color {
        if alpha >= 1.0 {
            return src;
        }
        if alpha <= 0.0 {
            return dst;
        }
        let [dr, dg, db] = dst.0;
        let [sr, sg, sb] = src.0;
        let channel = |d: u8, s: u8| {
            let (d, s) = (self.to_linear(d), self.to_linear(s));
            self.to_srgb(d + (s - d) * alpha)
        };
        Color([channel(dr, sr), channel(dg, sg), channel(db, sb)])
    }
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_keep_black_and_white() {
        let lut = GammaLut::new();
        for v in [0u8, 255] {
            assert_eq!(lut.to_srgb(lut.to_linear(v)), v);
        }
    }

    #[test]
    fn half_coverage_is_brighter_than_srgb_average() {
        let lut = GammaLut::new();
        let m = lut.mix(Color::BLACK, Color::WHITE, 0.5);
        // Linear-light midpoint of black and white is ~188 in sRGB, not 128.
        assert!(m.0[0] > 180 && m.0[0] < 195, "{m:?}");
        assert_eq!(lut.mix(Color::BLACK, Color::WHITE, 1.0), Color::WHITE);
        assert_eq!(lut.mix(Color::BLACK, Color::WHITE, 0.0), Color::BLACK);
    }

    #[test]
    fn mixing_a_color_with_itself_changes_nothing() {
        let lut = GammaLut::new();
        let c = Color::rgb(38, 201, 154);
        assert_eq!(lut.mix(c, c, 0.37), c);
    }
}
