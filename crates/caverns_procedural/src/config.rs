//! # World Configuration
//!
//! Every world parameter, loaded once at startup from TOML or built in code.
//!
//! ```toml
//! chunk_size_x = 8
//! chunk_size_y = 8
//! rock_percentage = 0.45
//! generations = 5
//! threshold = 5
//! world_seed = 1234
//! ```
//!
//! Missing keys take their defaults. `cell_size`, `movement_factor` and
//! `viewport_size` only matter to rendering and navigation collaborators;
//! the world itself ignores them.

use serde::{Deserialize, Serialize};

use crate::error::{WorldError, WorldResult};
use crate::seed::WorldSeed;

/// World parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Pixels per cell when rasterized.
    pub cell_size: u32,
    /// Chunk width in cells.
    pub chunk_size_x: i32,
    /// Chunk height in cells.
    pub chunk_size_y: i32,
    /// Cells moved per navigation step.
    pub movement_factor: i32,
    /// Side length, in cells, of the square viewport used by `World::render_at`.
    pub viewport_size: i32,
    /// Probability in `[0, 1]` that a seeded cell is rock.
    pub rock_percentage: f64,
    /// Evolution rounds applied to each chunk.
    pub generations: u32,
    /// Divisor of the 3x3 neighbourhood sum.
    pub threshold: i32,
    /// Seed shared by every chunk.
    pub world_seed: u64,
}

impl WorldConfig {
    /// Default pixels per cell.
    pub const DEFAULT_CELL_SIZE: u32 = 4;
    /// Default chunk side, in cells.
    pub const DEFAULT_CHUNK_SIZE: i32 = 8;
    /// Default navigation step.
    pub const DEFAULT_MOVEMENT_FACTOR: i32 = 32;
    /// Default viewport side.
    pub const DEFAULT_VIEWPORT_SIZE: i32 = 32;
    /// Default rock probability.
    pub const DEFAULT_ROCK_PERCENTAGE: f64 = 0.5;
    /// Default evolution rounds.
    pub const DEFAULT_GENERATIONS: u32 = 5;
    /// Default neighbourhood divisor.
    pub const DEFAULT_THRESHOLD: i32 = 5;
    /// Default world seed.
    pub const DEFAULT_WORLD_SEED: u64 = 42;

    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ConfigParse`] for malformed TOML or unknown keys,
    /// and [`WorldError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> WorldResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| WorldError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration back to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ConfigParse`] if serialization fails.
    pub fn to_toml_string(&self) -> WorldResult<String> {
        toml::to_string(self).map_err(|e| WorldError::ConfigParse(e.to_string()))
    }

    /// Checks every parameter the world depends on.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] naming the first bad parameter.
    pub fn validate(&self) -> WorldResult<()> {
        if self.chunk_size_x <= 0 || self.chunk_size_y <= 0 {
            return Err(WorldError::InvalidConfig(format!(
                "chunk size must be positive, got {}x{}",
                self.chunk_size_x, self.chunk_size_y
            )));
        }
        if self.threshold <= 0 {
            return Err(WorldError::InvalidConfig(format!(
                "threshold must be positive, got {}",
                self.threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.rock_percentage) {
            return Err(WorldError::InvalidConfig(format!(
                "rock percentage must lie in [0, 1], got {}",
                self.rock_percentage
            )));
        }
        if self.viewport_size <= 0 {
            return Err(WorldError::InvalidConfig(format!(
                "viewport size must be positive, got {}",
                self.viewport_size
            )));
        }
        Ok(())
    }

    /// Returns the world seed.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        WorldSeed::new(self.world_seed)
    }

    /// Sets both chunk dimensions.
    #[must_use]
    pub const fn with_chunk_size(mut self, size_x: i32, size_y: i32) -> Self {
        self.chunk_size_x = size_x;
        self.chunk_size_y = size_y;
        self
    }

    /// Sets the number of evolution rounds.
    #[must_use]
    pub const fn with_generations(mut self, generations: u32) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the neighbourhood divisor.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: i32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the rock probability.
    #[must_use]
    pub fn with_rock_percentage(mut self, rock_percentage: f64) -> Self {
        self.rock_percentage = rock_percentage;
        self
    }

    /// Sets the world seed.
    #[must_use]
    pub const fn with_seed(mut self, world_seed: u64) -> Self {
        self.world_seed = world_seed;
        self
    }

    /// Sets the viewport side.
    #[must_use]
    pub const fn with_viewport_size(mut self, viewport_size: i32) -> Self {
        self.viewport_size = viewport_size;
        self
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            cell_size: Self::DEFAULT_CELL_SIZE,
            chunk_size_x: Self::DEFAULT_CHUNK_SIZE,
            chunk_size_y: Self::DEFAULT_CHUNK_SIZE,
            movement_factor: Self::DEFAULT_MOVEMENT_FACTOR,
            viewport_size: Self::DEFAULT_VIEWPORT_SIZE,
            rock_percentage: Self::DEFAULT_ROCK_PERCENTAGE,
            generations: Self::DEFAULT_GENERATIONS,
            threshold: Self::DEFAULT_THRESHOLD,
            world_seed: Self::DEFAULT_WORLD_SEED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(WorldConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_chunk_size() {
        for (x, y) in [(0, 8), (8, 0), (-1, 8), (8, -4)] {
            let config = WorldConfig::default().with_chunk_size(x, y);
            assert!(matches!(config.validate(), Err(WorldError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_rejects_non_positive_threshold() {
        for threshold in [0, -5] {
            let config = WorldConfig::default().with_threshold(threshold);
            assert!(matches!(config.validate(), Err(WorldError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_rejects_rock_percentage_out_of_range() {
        for rock in [-0.1, 1.5, f64::NAN] {
            let config = WorldConfig::default().with_rock_percentage(rock);
            assert!(config.validate().is_err(), "accepted {rock}");
        }
        assert!(WorldConfig::default().with_rock_percentage(0.0).validate().is_ok());
        assert!(WorldConfig::default().with_rock_percentage(1.0).validate().is_ok());
    }

    #[test]
    fn test_from_toml_fills_defaults() {
        let config = WorldConfig::from_toml_str("generations = 0\nworld_seed = 1\n").unwrap();
        assert_eq!(config.generations, 0);
        assert_eq!(config.world_seed, 1);
        assert_eq!(config.chunk_size_x, WorldConfig::DEFAULT_CHUNK_SIZE);
        assert_eq!(config.threshold, WorldConfig::DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_from_toml_validates() {
        let result = WorldConfig::from_toml_str("threshold = 0\n");
        assert!(matches!(result, Err(WorldError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        assert!(matches!(
            WorldConfig::from_toml_str("chunk_size_x = \"wide\""),
            Err(WorldError::ConfigParse(_))
        ));
        assert!(matches!(
            WorldConfig::from_toml_str("gravity = 9.8"),
            Err(WorldError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = WorldConfig::default().with_seed(99).with_chunk_size(4, 6);
        let text = config.to_toml_string().unwrap();
        assert_eq!(WorldConfig::from_toml_str(&text).unwrap(), config);
    }
}
