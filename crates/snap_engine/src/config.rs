//! Configuration system
//!
//! File-backed configuration (TOML or RON) plus the engine's snap tuning
//! parameters. Malformed tuning values are rejected when a session is
//! built, never discovered as silent bad geometry at runtime.

pub use serde::{Deserialize, Serialize};

use crate::grid::DEFAULT_SEARCH_RADIUS_FACTOR;
use crate::overlap::DEFAULT_OVERLAP_FACTOR;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A tuning value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Tuning parameters for placement resolution and overlap gating
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SnapConfig {
    /// Maximum snap delta magnitude that still commits, in world units.
    /// Distinct from the per-cell search radius: this is the final
    /// "close enough to actually commit" gate.
    pub snap_distance: f32,

    /// Nearest-cell acceptance radius as a fraction of the cell size
    pub search_radius_factor: f32,

    /// Inter-shape overlap tolerance as a fraction of the cell size
    pub overlap_factor: f32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            snap_distance: 0.1,
            search_radius_factor: DEFAULT_SEARCH_RADIUS_FACTOR,
            overlap_factor: DEFAULT_OVERLAP_FACTOR,
        }
    }
}

impl SnapConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the snap commit threshold
    #[must_use]
    pub fn with_snap_distance(mut self, snap_distance: f32) -> Self {
        self.snap_distance = snap_distance;
        self
    }

    /// Set the nearest-cell acceptance radius factor
    #[must_use]
    pub fn with_search_radius_factor(mut self, factor: f32) -> Self {
        self.search_radius_factor = factor;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("snap_distance", self.snap_distance),
            ("search_radius_factor", self.search_radius_factor),
            ("overlap_factor", self.overlap_factor),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Config for SnapConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = SnapConfig::default();
        assert_eq!(config.snap_distance, 0.1);
        assert_eq!(config.search_radius_factor, 0.6);
        assert_eq!(config.overlap_factor, 0.08);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_nonpositive_values() {
        let config = SnapConfig::default().with_snap_distance(0.0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = SnapConfig::default().with_search_radius_factor(-0.5);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SnapConfig::default().with_snap_distance(0.25);
        let text = toml::to_string_pretty(&config).unwrap();
        let back: SnapConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.snap_distance, 0.25);
        assert_eq!(back.overlap_factor, config.overlap_factor);
    }

    #[test]
    fn test_unsupported_extension() {
        // save_to_file checks the extension before touching the filesystem
        assert!(matches!(
            SnapConfig::default().save_to_file("snap.yaml"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
