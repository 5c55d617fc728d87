// Stroke renderer: walks the tagged path once, segment by segment, and
// every so often lets the line color pulse away from the baseline teal
// and back ("burst"), then drops start/end markers.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::draw::{Paint, Stroke, Surface};
use crate::marker::{draw_marker, MarkerStyle};
use crate::rng::RandomSource;
use crate::types::{Color, PathAction, Span, LOGICAL_WIDTH};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub baseline: Color,
    /// Line width in logical units (scaled with surface width).
    pub line_width: f32,
    pub bursts: bool,
    pub burst_probability: f32,
    pub burst_length: Span<u32>,
    /// Bursts only start while at least this many actions remain.
    pub trigger_margin: usize,
    /// Peak channel shift toward pink/red.
    pub warm_shift: [i16; 3],
    /// Peak channel shift toward indigo.
    pub cool_shift: [i16; 3],
    pub markers: MarkerStyle,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            baseline: Color::rgb(38, 201, 154),
            line_width: 5.0,
            bursts: true,
            burst_probability: 0.15,
            burst_length: Span::new(10, 30),
            trigger_margin: 32,
            warm_shift: [193, -110, -66],
            cool_shift: [27, 16, 94],
            markers: MarkerStyle::default(),
        }
    }
}

impl RenderStyle {
    pub fn validate(&self) -> crate::Result<()> {
        use crate::Error;
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(Error::config(format!("style.line_width must be positive, got {}", self.line_width)));
        }
        if !(0.0..=1.0).contains(&self.burst_probability) {
            return Err(Error::config("style.burst_probability must be in [0, 1]"));
        }
        if self.burst_length.min == 0 || !self.burst_length.is_ordered() {
            return Err(Error::config("style.burst_length must satisfy 1 <= min <= max"));
        }
        let m = &self.markers;
        if m.outer_radius <= 0.0 || m.inner_radius <= 0.0 || m.inner_radius > m.outer_radius {
            return Err(Error::config("style.markers radii must satisfy 0 < inner <= outer"));
        }
        Ok(())
    }
}

/// Color-burst sub-state.
/// Visual: the line warms toward red, peaks mid-burst, then settles back to teal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Burst {
    pub active: bool,
    pub elapsed: u32,
    pub length: u32,
    /// Peak deviation from baseline, per channel.
    pub target_delta: [f32; 3],
}

impl Burst {
    /// Start a burst. `r` in [-1, 1) picks warm (`r > 0`) or cool and how strong;
    /// `sqrt(|r|)` keeps most bursts subtle.
    pub fn start(r: f32, length: u32, style: &RenderStyle) -> Self {
        let curve = if r > 0.0 { style.warm_shift } else { style.cool_shift };
        let k = r.abs().sqrt();
        Self {
            active: true,
            elapsed: 0,
            length: length.max(1),
            target_delta: curve.map(|c| (c as f32 * k).floor()),
        }
    }

    #[inline]
    pub fn finished(&self) -> bool {
        self.active && self.elapsed >= self.length
    }

    /// Bump-shaped pulse: baseline at both ends, full delta at the midpoint.
    pub fn color(&self, baseline: Color) -> Color {
        let s = self.elapsed as f32 / self.length as f32;
        let bump = 4.0 * s * (1.0 - s);
        let mut out = [0u8; 3];
        for (i, c) in out.iter_mut().enumerate() {
            *c = (baseline.0[i] as f32 + self.target_delta[i] * bump).floor().clamp(0.0, 255.0) as u8;
        }
        Color(out)
    }
}

/// Everything the renderer carries from one segment to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    pub pen: Vec2,
    pub color: Color,
    pub burst: Burst,
}

impl RenderState {
    pub fn new(pen: Vec2, baseline: Color) -> Self {
        Self { pen, color: baseline, burst: Burst::default() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub segments: usize,
    pub bursts: usize,
}

/// Paint `path` onto `surface`, then the start and end markers.
///
/// Coordinates are logical units scaled by `surface.width() / 360`.
pub fn render_path(
    surface: &mut impl Surface,
    path: &[PathAction],
    style: &RenderStyle,
    rng: &mut impl RandomSource,
) -> RenderSummary {
    let mut summary = RenderSummary::default();
    if path.is_empty() {
        return summary;
    }
    if style.bursts && style.trigger_margin < style.burst_length.max as usize {
        warn!(
            margin = style.trigger_margin,
            max_burst = style.burst_length.max,
            "trigger margin shorter than the longest burst; late bursts get cut short"
        );
    }

    let scale = surface.width() as f32 / LOGICAL_WIDTH;
    let width = style.line_width * scale;
    let segment = |paint: Paint| Stroke { width, paint };
    let last_move = path.iter().rposition(|a| matches!(a, PathAction::Move(_)));

    let mut state = RenderState::new(path[0].point() * scale, style.baseline);
    let mut start = state.pen;

    for (index, action) in path.iter().enumerate() {
        match *action {
            PathAction::Down(p) => {
                state = RenderState::new(p * scale, style.baseline);
                start = state.pen;
            }
            PathAction::Move(p) => {
                let to = p * scale;
                let mut closed = false;

                if state.burst.finished() {
                    let paint = Paint::Linear { from: state.color, to: style.baseline };
                    surface.stroke_segment(state.pen, to, &segment(paint));
                    summary.segments += 1;
                    state.color = style.baseline;
                    state.burst = Burst::default();
                    closed = true;
                }

                if style.bursts
                    && !state.burst.active
                    && index + style.trigger_margin < path.len()
                    && rng.chance(style.burst_probability)
                {
                    let r = rng.signed();
                    let length = rng.int_inclusive(style.burst_length.min, style.burst_length.max);
                    state.burst = Burst::start(r, length, style);
                    summary.bursts += 1;
                }

                if state.burst.active {
                    // Out of path: land the pulse back on baseline here.
                    let forced = Some(index) == last_move;
                    let next = if forced { style.baseline } else { state.burst.color(style.baseline) };
                    let paint = Paint::Linear { from: state.color, to: next };
                    surface.stroke_segment(state.pen, to, &segment(paint));
                    summary.segments += 1;
                    state.color = next;
                    state.burst.elapsed += 1;
                    if forced {
                        state.burst = Burst::default();
                    }
                } else if !closed {
                    surface.stroke_segment(state.pen, to, &segment(Paint::Solid(style.baseline)));
                    summary.segments += 1;
                }
                state.pen = to;
            }
            PathAction::Up(_) => {}
        }
    }

    let end = path[path.len() - 1].point() * scale;
    draw_marker(surface, start, style.markers.start_color, &style.markers, scale);
    draw_marker(surface, end, style.markers.end_color, &style.markers, scale);

    debug!(segments = summary.segments, bursts = summary.bursts, "path rendered");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::Canvas;
    use crate::rng::{seeded, Constant};
    use crate::track::{generate_track, TrackConfig};
    use crate::types::FrameBuffer;

    /// Records calls instead of painting.
    #[derive(Default)]
    struct Recorder {
        strokes: Vec<(Vec2, Vec2, Stroke)>,
        circles: Vec<(Vec2, f32, Color)>,
        shadows: usize,
    }

    impl Surface for Recorder {
        fn width(&self) -> u32 {
            720
        }
        fn height(&self) -> u32 {
            1438
        }
        fn stroke_segment(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
            self.strokes.push((from, to, *stroke));
        }
        fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
            self.circles.push((center, radius, color));
        }
        fn soft_shadow(&mut self, _center: Vec2, _radius: f32, _blur: f32, _opacity: f32) {
            self.shadows += 1;
        }
    }

    fn line(n: usize) -> Vec<PathAction> {
        let mut path = vec![PathAction::Down(Vec2::new(0.0, 10.0))];
        for i in 1..n {
            path.push(PathAction::Move(Vec2::new(i as f32, 10.0)));
        }
        path.push(PathAction::Up(Vec2::new((n - 1) as f32, 10.0)));
        path
    }

    #[test]
    fn empty_path_draws_nothing() {
        let mut s = Recorder::default();
        let summary = render_path(&mut s, &[], &RenderStyle::default(), &mut seeded(1));
        assert_eq!(summary, RenderSummary::default());
        assert!(s.strokes.is_empty() && s.circles.is_empty() && s.shadows == 0);
    }

    #[test]
    fn single_point_only_gets_markers_on_top_of_each_other() {
        let mut s = Recorder::default();
        let p = Vec2::new(100.0, 50.0);
        render_path(&mut s, &[PathAction::Down(p)], &RenderStyle::default(), &mut seeded(1));
        assert!(s.strokes.is_empty());
        assert_eq!(s.circles.len(), 4);
        assert!(s.circles.iter().all(|(c, _, _)| *c == p * 2.0));
    }

    #[test]
    fn flat_path_without_bursts() {
        let style = RenderStyle { bursts: false, ..RenderStyle::default() };
        let mut s = Recorder::default();
        let summary = render_path(&mut s, &line(10), &style, &mut seeded(1));
        assert_eq!(summary.segments, 9);
        assert_eq!(summary.bursts, 0);
        for (_, _, stroke) in &s.strokes {
            assert_eq!(stroke.paint, Paint::Solid(style.baseline));
            // 5 logical units at 2x scale.
            assert!((stroke.width - 10.0).abs() < 1e-4);
        }
        // Start marker at Down, end marker at Up.
        assert_eq!(s.circles[0].0, Vec2::new(0.0, 20.0));
        assert_eq!(s.circles[2].0, Vec2::new(18.0, 20.0));
        assert_eq!(s.circles[1].2, style.markers.start_color);
        assert_eq!(s.circles[3].2, style.markers.end_color);
    }

    #[test]
    fn burst_color_is_baseline_at_both_ends() {
        let style = RenderStyle::default();
        for r in [-1.0, -0.3, 0.2, 0.999] {
            let mut b = Burst::start(r, 20, &style);
            assert_eq!(b.color(style.baseline), style.baseline);
            b.elapsed = 20;
            assert_eq!(b.color(style.baseline), style.baseline);
            b.elapsed = 10;
            assert_ne!(b.color(style.baseline), style.baseline);
        }
    }

    #[test]
    fn burst_peaks_at_midpoint() {
        let style = RenderStyle::default();
        let mut b = Burst::start(0.999_999, 20, &style);
        b.elapsed = 10;
        let peak = b.color(style.baseline);
        // Warm shift pushes red up, green and blue down.
        assert_eq!(peak.0[0], 230);
        assert!(peak.0[1] < style.baseline.0[1] && peak.0[2] < style.baseline.0[2]);
        b.elapsed = 5;
        assert!(b.color(style.baseline).0[0] < peak.0[0]);
    }

    #[test]
    fn small_draws_give_small_shifts() {
        let style = RenderStyle::default();
        let small = Burst::start(-0.01, 10, &style);
        let big = Burst::start(-1.0, 10, &style);
        assert!(small.target_delta[2] < big.target_delta[2]);
        assert_eq!(big.target_delta, [27.0, 16.0, 94.0]);
    }

    #[test]
    fn burst_runs_its_length_then_closes() {
        // Every draw is 0.0: trigger fires, r = -1 (cool), length = min.
        let style = RenderStyle { burst_length: Span::new(4, 4), trigger_margin: 2, ..RenderStyle::default() };
        let mut s = Recorder::default();
        let summary = render_path(&mut s, &line(12), &style, &mut Constant(0.0));
        // First burst: 4 pulse segments, close-out segment, then a new burst starts
        // on the same step and strokes again.
        assert!(summary.bursts >= 2);
        match s.strokes[4].2.paint {
            Paint::Linear { to, .. } => assert_eq!(to, style.baseline),
            other => panic!("expected close-out gradient, got {other:?}"),
        }
    }

    #[test]
    fn no_bursts_start_inside_margin() {
        let style = RenderStyle { trigger_margin: 100, ..RenderStyle::default() };
        let mut s = Recorder::default();
        let summary = render_path(&mut s, &line(50), &style, &mut Constant(0.0));
        assert_eq!(summary.bursts, 0);
        assert_eq!(summary.segments, 49);
    }

    #[test]
    fn late_burst_is_forced_back_to_baseline() {
        // Margin 0 lets a long burst start near the end.
        let style = RenderStyle { burst_length: Span::new(30, 30), trigger_margin: 0, ..RenderStyle::default() };
        let mut s = Recorder::default();
        render_path(&mut s, &line(8), &style, &mut Constant(0.0));
        match s.strokes.last().unwrap().2.paint {
            Paint::Linear { to, .. } => assert_eq!(to, style.baseline),
            other => panic!("expected gradient, got {other:?}"),
        }
    }

    #[test]
    fn segments_are_contiguous() {
        let path = generate_track(&TrackConfig::default(), &mut seeded(3)).unwrap();
        let mut s = Recorder::default();
        render_path(&mut s, &path, &RenderStyle::default(), &mut seeded(4));
        for w in s.strokes.windows(2) {
            // Either continues from the previous end or redraws it (close-out + new burst).
            assert!(w[1].0 == w[0].1 || w[1].0 == w[0].0);
        }
    }

    #[test]
    fn renders_generated_track_onto_canvas() {
        let path = generate_track(&TrackConfig::default(), &mut seeded(21)).unwrap();
        let bg = Color::rgb(240, 240, 240);
        let mut canvas = Canvas::new(FrameBuffer::filled(360, 719, bg));
        let summary = render_path(&mut canvas, &path, &RenderStyle::default(), &mut seeded(22));
        assert!(summary.segments >= path.len() - 2);
        let frame = canvas.into_frame();
        let painted = frame.pixels.iter().filter(|&&p| p != bg.to_u32()).count();
        assert!(painted > 1000);
        // Start marker core.
        let s = path[0].point();
        assert_eq!(frame.get(s.x as usize, s.y as usize), Some(RenderStyle::default().markers.start_color));
    }
}
