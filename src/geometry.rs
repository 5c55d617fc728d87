// Lap geometry plus the whole-path transforms (rotation, mirror, wander).

use std::f32::consts::PI;

use glam::Vec2;

use crate::rng::RandomSource;
use crate::types::TrackPoint;

/// Shape of one racetrack lap: two straights joined by two semicircles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LapShape {
    pub center: Vec2,
    pub length: f32, // straight-segment length
    pub radius: f32, // nominal turn radius; fixes the angular step
    pub step: f32,   // sampling distance along the track
    pub lane: f32,   // this lap's offset from the nominal radius
}

impl LapShape {
    pub fn new(center: Vec2, length: f32, radius: f32, step: f32) -> Self {
        Self { center, length, radius, step, lane: 0.0 }
    }

    // Samples sit at i*step (or i*angle_step) strictly before the piece's end,
    // so the next piece's first sample never lands on top of the previous one.
    #[inline]
    fn straight_samples(&self) -> usize {
        ((self.length / self.step).ceil() as usize).max(1)
    }

    #[inline]
    fn arc_samples(&self) -> usize {
        ((PI / self.angle_step()).ceil() as usize).max(1)
    }

    #[inline]
    fn angle_step(&self) -> f32 {
        self.step / self.radius
    }

    /// Radius the turns are actually drawn at.
    #[inline]
    pub fn lane_radius(&self) -> f32 {
        self.radius + self.lane
    }

    /// How many points `build_lap` emits. Independent of `lane` and `center`,
    /// so every lap of a track has the same count.
    pub fn point_count(&self) -> usize {
        2 * self.straight_samples() + 2 * self.arc_samples()
    }

    /// The point every lap starts from.
    pub fn top_right(&self) -> Vec2 {
        Vec2::new(self.center.x + self.length / 2.0, self.center.y - self.lane_radius())
    }
}

/// Sample one clockwise lap starting at its top-right point:
/// right turn (top to bottom), bottom straight (right to left),
/// left turn (bottom to top), top straight (left to right).
///
/// Straights get perpendicular jitter of up to `lane_jitter`; turns do not.
/// The last sample of each piece falls short of its endpoint by less than
/// one step. Turns use the nominal angular step even when `lane` moves them.
pub fn build_lap(shape: &LapShape, lane_jitter: f32, rng: &mut impl RandomSource) -> Vec<TrackPoint> {
    let LapShape { center: c, length, step, .. } = *shape;
    let radius = shape.lane_radius();
    let half = length / 2.0;
    let dtheta = shape.angle_step();
    let mut points = Vec::with_capacity(shape.point_count());

    // Right turn: -π/2 -> +π/2
    for i in 0..shape.arc_samples() {
        let a = -PI / 2.0 + i as f32 * dtheta;
        points.push(Vec2::new(c.x + half + radius * a.cos(), c.y + radius * a.sin()));
    }
    // Bottom straight, right to left
    for i in 0..shape.straight_samples() {
        let x = c.x + half - i as f32 * step;
        points.push(Vec2::new(x, c.y + radius + rng.signed() * lane_jitter));
    }
    // Left turn: +π/2 -> 3π/2
    for i in 0..shape.arc_samples() {
        let a = PI / 2.0 + i as f32 * dtheta;
        points.push(Vec2::new(c.x - half + radius * a.cos(), c.y + radius * a.sin()));
    }
    // Top straight, left to right
    for i in 0..shape.straight_samples() {
        let x = c.x - half + i as f32 * step;
        points.push(Vec2::new(x, c.y - radius + rng.signed() * lane_jitter));
    }

    points
}

/// Rigid rotation of every point about `center` (radians, y-down canvas).
pub fn rotate_about(points: &mut [TrackPoint], center: Vec2, angle: f32) {
    let rot = Vec2::from_angle(angle);
    for p in points.iter_mut() {
        *p = center + rot.rotate(*p - center);
    }
}

/// Point reflection through `center`. Applying it twice is the identity.
pub fn mirror_about(points: &mut [TrackPoint], center: Vec2) {
    for p in points.iter_mut() {
        *p = 2.0 * center - *p;
    }
}

/// Slowly decaying random walk layered under the lap geometry.
///
/// Each call adds a uniform increment in `[-step, step)` per axis, then
/// scales by `decay`. With `decay < 1` the offset never exceeds
/// `step / (1 - decay)` per axis.
#[derive(Debug, Clone)]
pub struct Wander {
    decay: f32,
    step: f32,
    offset: Vec2,
}

impl Wander {
    pub fn new(decay: f32, step: f32) -> Self {
        Self { decay, step, offset: Vec2::ZERO }
    }

    pub fn next(&mut self, rng: &mut impl RandomSource) -> Vec2 {
        self.offset.x += rng.signed() * self.step;
        self.offset.y += rng.signed() * self.step;
        self.offset *= self.decay;
        self.offset
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Per-axis bound on `offset()`.
    pub fn bound(&self) -> f32 {
        self.step / (1.0 - self.decay)
    }

    /// Displace every point by the running offset.
    pub fn apply(&mut self, points: &mut [TrackPoint], rng: &mut impl RandomSource) {
        for p in points.iter_mut() {
            *p += self.next(rng);
        }
    }
}
