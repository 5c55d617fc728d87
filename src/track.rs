// Track path generator: laps + wander + cool-down + entry tail, then one
// rotation, GPS noise and an optional mirror, tagged as pen actions.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::{build_lap, mirror_about, rotate_about, LapShape, Wander};
use crate::rng::RandomSource;
use crate::tail::{build_entry_tail, build_exit_tail, TailConfig};
use crate::types::{PathAction, Span, TrackPoint};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// Nominal track center in logical units.
    pub center: Vec2,
    pub length: f32,
    pub radius: f32,
    pub step: f32,
    pub laps: Span<u32>,
    /// Per-lap center drift, each axis.
    pub center_jitter: f32,
    /// Per-lap lane change.
    pub radius_jitter: f32,
    /// Sideways roughness on the straights.
    pub lane_jitter: f32,
    pub wander_step: f32,
    pub wander_decay: f32,
    /// Fraction of an extra lap kept as cool-down.
    pub cooldown: Span<f32>,
    pub rotation_deg: f32,
    /// GPS noise, each axis.
    pub noise: f32,
    pub mirror_probability: f32,
    pub exit_tail: bool,
    pub tail: TailConfig,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            center: Vec2::new(178.0, 208.0),
            length: 115.0,
            radius: 61.0,
            step: 5.0,
            laps: Span::new(5, 9),
            center_jitter: 1.5,
            radius_jitter: 3.0,
            lane_jitter: 1.0,
            wander_step: 0.75,
            wander_decay: 0.95,
            cooldown: Span::new(0.1, 0.4),
            rotation_deg: -4.0,
            noise: 1.25,
            mirror_probability: 0.5,
            exit_tail: false,
            tail: TailConfig::default(),
        }
    }
}

impl TrackConfig {
    /// Reject anything that would produce an empty or NaN-laden path.
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [("length", self.length), ("radius", self.radius), ("step", self.step)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(Error::config(format!("track.{name} must be positive, got {v}")));
            }
        }
        if self.step >= self.radius {
            return Err(Error::config(format!(
                "track.step ({}) must be smaller than track.radius ({})",
                self.step, self.radius
            )));
        }
        if self.laps.min == 0 || !self.laps.is_ordered() {
            return Err(Error::config(format!(
                "track.laps must satisfy 1 <= min <= max, got {}..={}",
                self.laps.min, self.laps.max
            )));
        }
        if !(0.0..1.0).contains(&self.wander_decay) {
            return Err(Error::config(format!("track.wander_decay must be in [0, 1), got {}", self.wander_decay)));
        }
        if !self.cooldown.is_ordered() || self.cooldown.min < 0.0 || self.cooldown.max > 1.0 {
            return Err(Error::config("track.cooldown must be an ordered range within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.mirror_probability) {
            return Err(Error::config("track.mirror_probability must be in [0, 1]"));
        }
        for (name, v) in [
            ("center_jitter", self.center_jitter),
            ("radius_jitter", self.radius_jitter),
            ("lane_jitter", self.lane_jitter),
            ("wander_step", self.wander_step),
            ("noise", self.noise),
            ("tail.noise", self.tail.noise),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::config(format!("track.{name} must be non-negative, got {v}")));
            }
        }
        if self.radius_jitter >= self.radius {
            return Err(Error::config("track.radius_jitter must be smaller than track.radius"));
        }
        if !self.center.is_finite() {
            return Err(Error::config(format!("track.center must be finite, got {}", self.center)));
        }
        if !self.rotation_deg.is_finite() {
            return Err(Error::config(format!("track.rotation_deg must be finite, got {}", self.rotation_deg)));
        }
        let t = &self.tail;
        if t.points.min < 2 || !t.points.is_ordered() {
            return Err(Error::config("track.tail.points must satisfy 2 <= min <= max"));
        }
        for (name, span) in [("offset_right", t.offset_right), ("offset_up", t.offset_up), ("bulge", t.bulge)] {
            if !span.min.is_finite() || !span.max.is_finite() || !span.is_ordered() {
                return Err(Error::config(format!(
                    "track.tail.{name} must be a finite ordered range, got {}..{}",
                    span.min, span.max
                )));
            }
        }
        if t.bulge.min < 0.0 {
            return Err(Error::config("track.tail.bulge must be non-negative"));
        }
        if !t.exit_spacing.is_finite() || t.exit_spacing < 0.0 {
            return Err(Error::config(format!("track.tail.exit_spacing must be non-negative, got {}", t.exit_spacing)));
        }
        Ok(())
    }

    fn baseline_shape(&self) -> LapShape {
        LapShape::new(self.center, self.length, self.radius, self.step)
    }

    /// Bound on the distance between consecutive points of the laps and the
    /// cool-down.
    pub fn max_lap_step(&self) -> f32 {
        let sqrt2 = 2f32.sqrt();
        // Turns keep the nominal angular step, so a wider lane stretches chords.
        let turn = self.step * (1.0 + self.radius_jitter / self.radius);
        // Lap seam: less than a step of top straight left, plus lane and center changes.
        let seam = self.step + 2.0 * self.radius_jitter + 2.0 * sqrt2 * self.center_jitter;
        turn.max(seam) + 2.0 * self.lane_jitter + self.wander_drift() + 2.0 * sqrt2 * self.noise
    }

    /// Bound on the distance between consecutive points of either tail,
    /// including where a tail meets the laps.
    pub fn max_tail_step(&self) -> f32 {
        let sqrt2 = 2f32.sqrt();
        let entry = self.tail.max_step().max(self.tail.max_join_gap());
        let exit = self.tail.exit_spacing + 2.0 * sqrt2 * self.tail.noise;
        entry.max(exit) + 2.0 * sqrt2 * self.noise
    }

    /// Bound on the distance between any two consecutive generated points.
    pub fn max_step(&self) -> f32 {
        self.max_lap_step().max(self.max_tail_step())
    }

    // Wander changes by at most (1 + decay) steps per axis between points.
    fn wander_drift(&self) -> f32 {
        2f32.sqrt() * self.wander_step * (1.0 + self.wander_decay)
    }

    /// Point count when every random draw returns `sample`.
    ///
    /// Every lap samples the same number of points whatever its lane, so the
    /// total depends only on the count draws and is exact for a constant source.
    pub fn predicted_len(&self, sample: f32) -> usize {
        let pick = |s: Span<u32>| {
            if s.max <= s.min {
                s.min as usize
            } else {
                let span = (s.max - s.min + 1) as f32;
                (s.min + (span * sample) as u32).min(s.max) as usize
            }
        };
        let lap = self.baseline_shape().point_count();
        let laps = pick(self.laps);
        let fraction = self.cooldown.min + (self.cooldown.max - self.cooldown.min) * sample;
        let cooldown = ((lap as f32 * fraction).floor() as usize).clamp(1, lap);
        let exit = if self.exit_tail { crate::tail::EXIT_TAIL_POINTS } else { 0 };
        pick(self.tail.points) + laps * lap + cooldown + exit + 1
    }
}

/// Untagged points plus where the tails end, before they become pen actions.
struct Route {
    points: Vec<TrackPoint>,
    // Points before the first lap point.
    entry: usize,
    // Points after the last cool-down point.
    exit: usize,
}

/// Build a complete tagged route.
///
/// The result always starts with `Down`, ends with `Up` on top of the last
/// `Move`, and contains nothing but `Move` in between.
pub fn generate_track(config: &TrackConfig, rng: &mut impl RandomSource) -> Result<Vec<PathAction>> {
    let Route { points, entry, .. } = build_route(config, rng)?;

    let mut path: Vec<PathAction> = Vec::with_capacity(points.len() + 1);
    for (i, p) in points.iter().enumerate() {
        path.push(if i == 0 { PathAction::Down(*p) } else { PathAction::Move(*p) });
    }
    let last = points[points.len() - 1];
    path.push(PathAction::Up(last));

    debug!(points = path.len(), tail = entry, "track generated");
    Ok(path)
}

fn build_route(config: &TrackConfig, rng: &mut impl RandomSource) -> Result<Route> {
    config.validate()?;
    let base = config.baseline_shape();

    let laps = rng.int_inclusive(config.laps.min, config.laps.max);
    let mut points: Vec<TrackPoint> = Vec::with_capacity((laps as usize + 1) * base.point_count() + 32);

    // Every lap starts on its own top-right point and ends just short of it,
    // so laps chain without a seam.
    for _ in 0..laps {
        let shape = LapShape {
            center: base.center
                + Vec2::new(rng.signed() * config.center_jitter, rng.signed() * config.center_jitter),
            lane: rng.signed() * config.radius_jitter,
            ..base
        };
        points.extend(build_lap(&shape, config.lane_jitter, rng));
    }

    // Cool-down: a partial lap at the baseline lane.
    let mut cooldown = build_lap(&base, config.lane_jitter, rng);
    let fraction = rng.range(config.cooldown.min, config.cooldown.max);
    let keep = ((cooldown.len() as f32 * fraction).floor() as usize).clamp(1, cooldown.len());
    cooldown.truncate(keep);
    points.extend(cooldown);

    let mut wander = Wander::new(config.wander_decay, config.wander_step);
    wander.apply(&mut points, rng);
    debug!(laps, cooldown = keep, wander = ?wander.offset(), "laps built");

    let mut tail = build_entry_tail(points[0], points.get(1).copied(), &config.tail, rng);
    let entry = tail.len();
    tail.append(&mut points);
    let mut points = tail;

    let mut exit = 0;
    if config.exit_tail {
        let last = points[points.len() - 1];
        let lead_out = build_exit_tail(last, &config.tail, rng);
        exit = lead_out.len();
        points.extend(lead_out);
    }

    rotate_about(&mut points, config.center, config.rotation_deg.to_radians());
    for p in points.iter_mut() {
        *p += Vec2::new(rng.signed(), rng.signed()) * config.noise;
    }

    let mirrored = rng.chance(config.mirror_probability);
    if mirrored {
        mirror_about(&mut points, config.center);
    }
    debug!(mirrored, exit, "route transformed");

    Ok(Route { points, entry, exit })
}
