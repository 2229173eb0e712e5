use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// World construction parameters. Validated once at startup; the running
/// simulation itself never errors.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Seed of the single RNG stream; identical seeds reproduce identical
    /// world trajectories tick for tick.
    pub seed: u64,
    /// Hexagon radius used for pixel-space projection.
    pub hex_size: f32,
    /// Rings generated around the origin at construction.
    pub world_radius: u32,
    pub initial_hares: usize,
    pub initial_foxes: usize,
    pub initial_wolves: usize,
    pub initial_salmon: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            hex_size: 18.0,
            world_radius: 12,
            initial_hares: 30,
            initial_foxes: 8,
            initial_wolves: 3,
            initial_salmon: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositiveHexSize(f32),
    ZeroWorldRadius,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveHexSize(size) => {
                write!(f, "hex_size must be positive and finite, got {size}")
            }
            ConfigError::ZeroWorldRadius => write!(f, "world_radius must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.hex_size.is_finite() || self.hex_size <= 0.0 {
            return Err(ConfigError::NonPositiveHexSize(self.hex_size));
        }
        if self.world_radius == 0 {
            return Err(ConfigError::ZeroWorldRadius);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(WorldConfig::default().validate().is_ok());
    }

    #[test]
    fn bad_hex_size_is_rejected() {
        let config = WorldConfig {
            hex_size: 0.0,
            ..WorldConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveHexSize(0.0))
        );

        let config = WorldConfig {
            hex_size: f32::NAN,
            ..WorldConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_radius_is_rejected() {
        let config = WorldConfig {
            world_radius: 0,
            ..WorldConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroWorldRadius));
    }
}
