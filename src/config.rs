//! Everything tunable, read once from a TOML file and then treated as
//! immutable input. Every field has a default, so a partial file (or no
//! file at all) works.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::background::OutputConfig;
use crate::error::{Error, Result};
use crate::render::RenderStyle;
use crate::track::TrackConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub track: TrackConfig,
    pub style: RenderStyle,
    pub output: OutputConfig,
}

impl AppConfig {
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(text).map_err(|source| Error::ConfigParse { path: origin.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text =
            std::fs::read_to_string(path).map_err(|source| Error::ConfigRead { path: path.to_path_buf(), source })?;
        let config = Self::from_toml_str(&text, path)?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.track.validate()?;
        self.style.validate()?;
        self.output.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, Span};

    fn parse(text: &str) -> Result<AppConfig> {
        AppConfig::from_toml_str(text, Path::new("test.toml"))
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.track.laps, Span::new(5, 9));
        assert_eq!(config.style.baseline, Color::rgb(38, 201, 154));
        assert_eq!(config.output.save_width, Some(1080));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse(
            r#"
            [track]
            center = [180.0, 210.0]
            radius = 82.0
            laps = { min = 3, max = 6 }

            [track.tail]
            noise = 0.5

            [style]
            bursts = false
            burst_length = { min = 30, max = 40 }
            baseline = [10, 20, 30]

            [style.markers]
            end_color = [255, 0, 0]
            "#,
        )
        .unwrap();
        assert_eq!(config.track.center, glam::Vec2::new(180.0, 210.0));
        assert_eq!(config.track.radius, 82.0);
        assert_eq!(config.track.length, 115.0);
        assert_eq!(config.track.laps, Span::new(3, 6));
        assert_eq!(config.track.tail.noise, 0.5);
        assert_eq!(config.track.tail.points, Span::new(5, 12));
        assert!(!config.style.bursts);
        assert_eq!(config.style.baseline, Color::rgb(10, 20, 30));
        assert_eq!(config.style.markers.end_color, Color::rgb(255, 0, 0));
        assert_eq!(config.style.markers.outer_radius, 6.0);
    }

    #[test]
    fn invalid_values_are_rejected_on_load() {
        let err = parse("[track]\nradius = -1.0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)), "{err}");
        let err = parse("[style]\nburst_probability = 1.5\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)), "{err}");
        let err = parse("[output]\nsave_width = 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)), "{err}");
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        for text in [
            "[track]\nrotation_deg = nan\n",
            "[track]\ncenter = [inf, 208.0]\n",
            "[track.tail]\noffset_up = { min = 20.0, max = inf }\n",
            "[track.tail]\nexit_spacing = nan\n",
        ] {
            let err = parse(text).unwrap_err();
            assert!(matches!(err, Error::InvalidConfig(_)), "{text}: {err}");
        }
    }

    #[test]
    fn malformed_toml_reports_parse_error() {
        let err = parse("[track\nradius = ").unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn missing_file_reports_read_error() {
        let err = AppConfig::load(Path::new("/no/such/trackmark.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }
}
