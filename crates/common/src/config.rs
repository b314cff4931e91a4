//! Configuration model.
//!
//! The generation thresholds are empirically tuned; they are exposed as named
//! fields so they can be adjusted without touching the generators.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Noise frequencies, thresholds, and seed scales used by world generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Frequency of the primary terrain wave.
    pub terrain_frequency: f64,
    /// Primary wave values below this are water.
    pub water_threshold: f64,
    /// Frequency of the diagonal water-band wave.
    pub water_noise_frequency: f64,
    /// Water-band values above this are water.
    pub water_noise_threshold: f64,
    pub dirt_frequency_x: f64,
    pub dirt_frequency_y: f64,
    /// Dirt-patch values above this are dirt.
    pub dirt_threshold: f64,

    pub cover_seed_scale: f64,
    pub tall_grass_chance: f64,
    /// Upper bound (exclusive) of the short grass bucket; includes tall grass.
    pub short_grass_chance: f64,
    pub tree_seed_scale: f64,
    pub tree_chance: f64,
    pub rock_seed_scale: f64,
    pub rock_chance: f64,

    pub elevation_frequency: f64,
    pub elevation_offset: f64,
    /// Alpha lost per unit of elevation.
    pub elevation_shade: f64,
    pub elevation_shade_max: f64,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            terrain_frequency: 0.05,
            water_threshold: -0.5,
            water_noise_frequency: 0.03,
            water_noise_threshold: 0.8,
            dirt_frequency_x: 43.0,
            dirt_frequency_y: 0.01,
            dirt_threshold: 0.98,
            cover_seed_scale: 1000.0,
            tall_grass_chance: 0.10,
            short_grass_chance: 0.25,
            tree_seed_scale: 10000.0,
            tree_chance: 0.16,
            rock_seed_scale: 1.3,
            rock_chance: 0.025,
            elevation_frequency: 0.02,
            elevation_offset: 100.0,
            elevation_shade: 0.1,
            elevation_shade_max: 0.2,
        }
    }
}

/// Screen geometry, camera, and pacing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub tile_width: f32,
    pub tile_height: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Half-width, in tiles, of the square window drawn around the player.
    pub draw_range: i32,
    /// Fraction of the remaining distance the camera covers each frame.
    pub camera_smoothing: f32,
    pub move_cooldown_ms: u64,
    pub debug_marker: bool,
    pub vignette: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            tile_width: 72.0,
            tile_height: 32.0,
            viewport_width: 800.0,
            viewport_height: 600.0,
            draw_range: 30,
            camera_smoothing: 0.1,
            move_cooldown_ms: 110,
            debug_marker: true,
            vignette: false,
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub generation: GenConfig,
    pub view: ViewConfig,
}

impl WorldConfig {
    /// Load and validate a config from a JSON file. Missing fields take
    /// their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Save the config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let view = &self.view;
        if view.tile_width <= 0.0 || view.tile_height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tile size must be positive, got {}x{}",
                view.tile_width, view.tile_height
            )));
        }
        if view.viewport_width <= 0.0 || view.viewport_height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "viewport must be positive, got {}x{}",
                view.viewport_width, view.viewport_height
            )));
        }
        if view.draw_range < 0 {
            return Err(ConfigError::Invalid(format!(
                "draw_range must not be negative, got {}",
                view.draw_range
            )));
        }
        if !(view.camera_smoothing > 0.0 && view.camera_smoothing <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "camera_smoothing must be in (0, 1], got {}",
                view.camera_smoothing
            )));
        }
        let g = &self.generation;
        if g.elevation_shade < 0.0 || g.elevation_shade_max < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "elevation shading must not be negative, got {} capped at {}",
                g.elevation_shade, g.elevation_shade_max
            )));
        }
        if g.tall_grass_chance > g.short_grass_chance {
            return Err(ConfigError::Invalid(
                "tall_grass_chance must not exceed short_grass_chance".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(WorldConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: WorldConfig =
            serde_json::from_str(r#"{ "view": { "draw_range": 5 } }"#).unwrap();
        assert_eq!(config.view.draw_range, 5);
        assert_eq!(config.view.tile_width, 72.0);
        assert_eq!(config.generation, GenConfig::default());
    }

    #[test]
    fn rejects_bad_smoothing() {
        let mut config = WorldConfig::default();
        config.view.camera_smoothing = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        config.view.camera_smoothing = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_negative_range() {
        let mut config = WorldConfig::default();
        config.view.draw_range = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_negative_shade() {
        let mut config = WorldConfig::default();
        config.generation.elevation_shade_max = -0.1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = WorldConfig::default();
        config.generation.elevation_shade = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut config = WorldConfig::default();
        config.view.vignette = true;
        config.generation.tree_chance = 0.3;
        config.save(tmp.path()).unwrap();

        let loaded = WorldConfig::load(tmp.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_rejects_invalid_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), r#"{ "view": { "tile_width": -4 } }"#).unwrap();
        assert!(matches!(
            WorldConfig::load(tmp.path()),
            Err(ConfigError::Invalid(_))
        ));
    }
}
