//! Fake GPS running-track overlays.
//!
//! [`generate_track`] builds a multi-lap racetrack route with GPS noise,
//! lane drift, an entry tail and a partial cool-down lap; [`render_path`]
//! strokes it onto any [`Surface`] with occasional color pulses and drops
//! start/end markers. [`Canvas`] is the software surface over a
//! [`FrameBuffer`].

pub mod background;
pub mod config;
pub mod draw;
pub mod error;
pub mod gamma;
pub mod geometry;
pub mod marker;
pub mod render;
pub mod rng;
pub mod tail;
pub mod track;
pub mod types;

pub use config::AppConfig;
pub use draw::{Canvas, Surface};
pub use error::{Error, Result};
pub use render::{render_path, RenderStyle, RenderSummary};
pub use rng::RandomSource;
pub use track::{generate_track, TrackConfig};
pub use types::{Color, FrameBuffer, PathAction, TrackPoint};

/// Generate a track and paint it over `background`.
pub fn compose(
    background: FrameBuffer,
    config: &AppConfig,
    rng: &mut impl RandomSource,
) -> Result<(FrameBuffer, RenderSummary)> {
    let path = generate_track(&config.track, rng)?;
    let mut canvas = Canvas::new(background);
    let summary = render_path(&mut canvas, &path, &config.style, rng);
    Ok((canvas.into_frame(), summary))
}
