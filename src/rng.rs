// Injectable randomness. Generation and rendering draw every random choice
// from a `RandomSource`, so a fixed seed reproduces the same track.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform source in [0,1). Helpers are built on top of `next_f32`.
pub trait RandomSource {
    fn next_f32(&mut self) -> f32;

    /// Uniform in [min, max).
    #[inline]
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// Uniform in [-1, 1).
    #[inline]
    fn signed(&mut self) -> f32 {
        2.0 * self.next_f32() - 1.0
    }

    /// Uniform integer in `min..=max`.
    #[inline]
    fn int_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f32;
        (min + (span * self.next_f32()) as u32).min(max)
    }

    /// True with probability `p`.
    #[inline]
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}

impl RandomSource for Pcg32 {
    #[inline]
    fn next_f32(&mut self) -> f32 {
        self.r#gen::<f32>()
    }
}

/// Deterministic source for a given seed.
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Returns the same value for every draw. Handy for predicting exact output.
#[cfg(test)]
pub(crate) struct Constant(pub f32);

#[cfg(test)]
impl RandomSource for Constant {
    fn next_f32(&mut self) -> f32 {
        self.0
    }
}
