// Entry and exit tails: short lead-in/lead-out strokes so the route looks
// like someone ran onto the track and off it again.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;
use crate::types::{Span, TrackPoint};

/// Points in the exit tail.
pub const EXIT_TAIL_POINTS: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TailConfig {
    pub points: Span<u32>,
    /// Start offset to the right of the target.
    pub offset_right: Span<f32>,
    /// Start offset above the target.
    pub offset_up: Span<f32>,
    /// Sideways bulge at mid-tail.
    pub bulge: Span<f32>,
    pub noise: f32,
    /// Distance between exit-tail points.
    pub exit_spacing: f32,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            points: Span::new(5, 12),
            offset_right: Span::new(15.0, 50.0),
            offset_up: Span::new(20.0, 60.0),
            bulge: Span::new(5.0, 10.0),
            noise: 1.5,
            exit_spacing: 3.0,
        }
    }
}

impl TailConfig {
    /// Longest chord a tail can start from.
    pub fn max_offset(&self) -> f32 {
        Vec2::new(self.offset_right.max, self.offset_up.max).length()
    }

    /// Upper bound on the gap between the last entry-tail point and its target.
    pub fn max_join_gap(&self) -> f32 {
        let rest = 1.0 - ease_in_out(1.0 - 1.0 / self.points.min as f32);
        self.max_offset() * rest + self.bulge.max * (PI * rest).sin() + 2f32.sqrt() * self.noise
    }

    /// Upper bound on the distance between consecutive tail points.
    pub fn max_step(&self) -> f32 {
        // Smoothstep's slope peaks at 1.5, so no eased gap exceeds 1.5 / n.
        let gap = 1.5 / self.points.min as f32;
        (self.max_offset() + PI * self.bulge.max) * gap + 2.0 * 2f32.sqrt() * self.noise
    }
}

/// Smoothstep: slow at both ends, fastest mid-way.
#[inline]
fn ease_in_out(u: f32) -> f32 {
    u * u * (3.0 - 2.0 * u)
}

/// Lead-in that starts up and to the right of `target` and curves into it.
///
/// Points are spaced on an ease-in-out curve as if `target` were the next
/// sample, so the runner starts gently, swings through the bulge and slows
/// into the track; the last point sits within `TailConfig::max_join_gap`
/// of `target`, which itself is not included. With `reference` (the next
/// point along the track) the bulge swings out against the direction of
/// travel.
pub fn build_entry_tail(
    target: TrackPoint,
    reference: Option<TrackPoint>,
    cfg: &TailConfig,
    rng: &mut impl RandomSource,
) -> Vec<TrackPoint> {
    let n = rng.int_inclusive(cfg.points.min, cfg.points.max) as usize;
    let start = target
        + Vec2::new(
            rng.range(cfg.offset_right.min, cfg.offset_right.max),
            -rng.range(cfg.offset_up.min, cfg.offset_up.max),
        );
    let amplitude = rng.range(cfg.bulge.min, cfg.bulge.max);

    let chord = target - start;
    let mut normal = chord.perp().normalize_or_zero();
    if let Some(next) = reference {
        if normal.dot(next - target) > 0.0 {
            normal = -normal;
        }
    }

    (0..n)
        .map(|i| {
            let t = ease_in_out(i as f32 / n as f32);
            let noise = Vec2::new(rng.signed(), rng.signed()) * cfg.noise;
            start + chord * t + normal * amplitude * (PI * t).sin() + noise
        })
        .collect()
}

/// Short lead-out walking away from `last`, heading down and to the right.
/// Visual: the route trails off the track instead of stopping dead on it.
pub fn build_exit_tail(last: TrackPoint, cfg: &TailConfig, rng: &mut impl RandomSource) -> Vec<TrackPoint> {
    // Somewhere between due right and 60° below it.
    let heading = Vec2::from_angle(rng.range(0.0, PI / 3.0));
    (1..=EXIT_TAIL_POINTS)
        .map(|i| {
            let noise = Vec2::new(rng.signed(), rng.signed()) * cfg.noise;
            last + heading * cfg.exit_spacing * i as f32 + noise
        })
        .collect()
}
