use std::path::Path;

use glyphfield_animation::BlendConfig;
use glyphfield_common::{AtlasLayout, LayoutError};
use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Glyphs drawn into the atlas when none are configured. Each is unique.
pub const DEFAULT_GLYPHS: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ!@#$%^&*()_+-=[]{}|:;?<>,.";

/// How the `time` parameter advances per update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TimeStep {
    /// Constant increment per update, independent of `dt`.
    Fixed { per_tick: f32 },
    /// `dt * factor` per update.
    Scaled { factor: f32 },
}

impl Default for TimeStep {
    fn default() -> Self {
        // 0.001 per frame at 60 Hz.
        TimeStep::Scaled { factor: 0.06 }
    }
}

impl TimeStep {
    pub fn validate(&self) -> Result<(), FieldError> {
        let (name, v) = match *self {
            TimeStep::Fixed { per_tick } => ("per_tick", per_tick),
            TimeStep::Scaled { factor } => ("factor", factor),
        };
        if !v.is_finite() || v < 0.0 {
            return Err(FieldError::InvalidTimeStep(format!(
                "{name} must be finite and non-negative, got {v}"
            )));
        }
        Ok(())
    }

    /// Time increment for a frame of length `dt`. Invalid `dt` counts as zero.
    pub fn advance(&self, dt: f32) -> f32 {
        match *self {
            TimeStep::Fixed { per_tick } => per_tick,
            TimeStep::Scaled { factor } if dt.is_finite() && dt > 0.0 => dt * factor,
            TimeStep::Scaled { .. } => 0.0,
        }
    }
}

/// Errors from loading or saving a field configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Construction parameters for a field and its atlas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of quads.
    pub num_cells: u32,
    /// Quad edge length in world units.
    pub cell_width: f32,
    /// Atlas glyph columns.
    pub grid_columns: u32,
    /// Atlas glyph cell size in pixels.
    pub cell_pixel_size: u32,
    /// Unique glyphs to rasterize into the atlas.
    pub glyphs: String,
    pub font_family: String,
    /// Seed for per-cell randoms; `None` draws from the thread RNG.
    pub seed: Option<u64>,
    pub time_step: TimeStep,
    pub blend: BlendConfig,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            num_cells: 1000,
            cell_width: 4.0,
            grid_columns: 16,
            cell_pixel_size: 128,
            glyphs: DEFAULT_GLYPHS.to_string(),
            font_family: "Cabin Sketch".to_string(),
            seed: None,
            time_step: TimeStep::default(),
            blend: BlendConfig::default(),
        }
    }
}

impl FieldConfig {
    /// Atlas layout implied by the glyph string and grid settings.
    pub fn glyph_layout(&self) -> Result<AtlasLayout, LayoutError> {
        let used_length = u32::try_from(self.glyphs.chars().count()).unwrap_or(u32::MAX);
        AtlasLayout::for_glyph_count(used_length, self.grid_columns, self.cell_pixel_size)
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        Ok(config)
    }

    /// Save the configuration as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphfield_animation::Easing;

    #[test]
    fn defaults_match_reference_scene() {
        let config = FieldConfig::default();
        assert_eq!(config.num_cells, 1000);
        assert_eq!(config.cell_width, 4.0);
        assert_eq!(config.grid_columns, 16);
        assert_eq!(config.glyphs.chars().count(), 62);
        assert_eq!(config.blend.easing, Easing::ExpoOut);
    }

    #[test]
    fn glyph_layout_rounds_rows_up() {
        let layout = FieldConfig::default().glyph_layout().unwrap();
        assert_eq!(layout.used_length, 62);
        assert_eq!(layout.columns, 16);
        assert_eq!(layout.rows, 4);

        let config = FieldConfig {
            glyphs: String::new(),
            ..FieldConfig::default()
        };
        assert_eq!(config.glyph_layout(), Err(LayoutError::EmptyAtlas));
    }

    #[test]
    fn time_step_advance() {
        let fixed = TimeStep::Fixed { per_tick: 0.001 };
        assert_eq!(fixed.advance(0.5), 0.001);
        assert_eq!(fixed.advance(f32::NAN), 0.001);

        let scaled = TimeStep::Scaled { factor: 2.0 };
        assert_eq!(scaled.advance(0.25), 0.5);
        assert_eq!(scaled.advance(-1.0), 0.0);
        assert_eq!(scaled.advance(f32::INFINITY), 0.0);
    }

    #[test]
    fn time_step_validation() {
        assert!(TimeStep::default().validate().is_ok());
        assert!(TimeStep::Fixed { per_tick: -0.1 }.validate().is_err());
        assert!(TimeStep::Scaled { factor: f32::NAN }.validate().is_err());
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let config = FieldConfig {
            num_cells: 64,
            seed: Some(5),
            time_step: TimeStep::Fixed { per_tick: 0.01 },
            ..FieldConfig::default()
        };
        config.save(tmp.path()).unwrap();

        let loaded = FieldConfig::load(tmp.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_json_takes_defaults() {
        let config: FieldConfig =
            serde_json::from_str(r#"{ "num_cells": 12, "blend": { "easing": "linear" } }"#)
                .unwrap();
        assert_eq!(config.num_cells, 12);
        assert_eq!(config.cell_width, 4.0);
        assert_eq!(config.blend.easing, Easing::Linear);
        assert_eq!(config.blend.duration, 1.0);
        assert!(config.seed.is_none());
    }
}
