//! Configuration system

pub use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec2;
use crate::physics::shape::Rect;
use crate::spatial::QuadTreeConfig;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

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
}

/// Simulation configuration
///
/// Covers the play-area boundary used to root the per-frame quadtree
/// and the quadtree subdivision behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// World-space boundary of the play area
    pub boundary: Rect,

    /// Quadtree subdivision settings
    pub quadtree: QuadTreeConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            boundary: Rect::new(Vec2::new(-70.0, -40.0), Vec2::new(70.0, 40.0)),
            quadtree: QuadTreeConfig::default(),
        }
    }
}

impl Config for SimConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_boundary_matches_play_area() {
        let config = SimConfig::default();
        assert_eq!(config.boundary.min.x, -70.0);
        assert_eq!(config.boundary.max.y, 40.0);
        assert_eq!(config.quadtree.capacity, 8);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SimConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: SimConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.boundary.min, config.boundary.min);
        assert_eq!(parsed.quadtree.max_depth, config.quadtree.max_depth);
    }

    #[test]
    fn test_unsupported_format_is_rejected() {
        let err = SimConfig::default().save_to_file("settings.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
