//! Board and scoring configuration.
//!
//! Defaults come from [`crate::types`]. Each config can be overlaid from
//! environment variables (`MATCH3_*`); `from_lookup` takes the lookup as a
//! closure so tests never touch the process environment.

use std::str::FromStr;

use crate::error::ConfigError;
use crate::types::{
    DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, DEFAULT_COMBO_RATIO, DEFAULT_POWER_CHANCE,
    DEFAULT_SEED, DEFAULT_TILE_RATIO, DEFAULT_TILE_TYPES, MAX_BOARD_DIM, MAX_TILE_TYPES,
    MIN_TILE_TYPES,
};

pub const ENV_WIDTH: &str = "MATCH3_WIDTH";
pub const ENV_HEIGHT: &str = "MATCH3_HEIGHT";
pub const ENV_TILE_TYPES: &str = "MATCH3_TILE_TYPES";
pub const ENV_POWER_CHANCE: &str = "MATCH3_POWER_CHANCE";
pub const ENV_SEED: &str = "MATCH3_SEED";
pub const ENV_TILE_RATIO: &str = "MATCH3_TILE_RATIO";
pub const ENV_COMBO_RATIO: &str = "MATCH3_COMBO_RATIO";

/// Everything needed to reproduce a board from scratch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardConfig {
    pub width: u16,
    pub height: u16,
    pub tile_types: u8,
    pub power_chance: f32,
    pub seed: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            tile_types: DEFAULT_TILE_TYPES,
            power_chance: DEFAULT_POWER_CHANCE,
            seed: DEFAULT_SEED,
        }
    }
}

impl BoardConfig {
    pub fn new(width: u16, height: u16, tile_types: u8) -> Self {
        Self {
            width,
            height,
            tile_types,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_power_chance(mut self, power_chance: f32) -> Self {
        self.power_chance = power_chance;
        self
    }

    /// Reject configurations under which the no-initial-match invariant
    /// cannot be guaranteed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.width > MAX_BOARD_DIM || self.height > MAX_BOARD_DIM {
            return Err(ConfigError::DimensionTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        if self.tile_types < MIN_TILE_TYPES {
            return Err(ConfigError::TooFewTileTypes(self.tile_types));
        }
        if self.tile_types > MAX_TILE_TYPES {
            return Err(ConfigError::TooManyTileTypes(self.tile_types));
        }
        if !(0.0..=1.0).contains(&self.power_chance) {
            return Err(ConfigError::InvalidPowerChance(self.power_chance));
        }
        Ok(())
    }

    /// Defaults overlaid with `MATCH3_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(v) = parse_var(&lookup, ENV_WIDTH)? {
            config.width = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_HEIGHT)? {
            config.height = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_TILE_TYPES)? {
            config.tile_types = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_POWER_CHANCE)? {
            config.power_chance = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_SEED)? {
            config.seed = v;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Ratios of the external scoring formula
/// `tile_count * tile_ratio * combo * combo_ratio`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreConfig {
    pub tile_ratio: u32,
    pub combo_ratio: u32,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            tile_ratio: DEFAULT_TILE_RATIO,
            combo_ratio: DEFAULT_COMBO_RATIO,
        }
    }
}

impl ScoreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_ratio == 0 {
            return Err(ConfigError::ZeroScoreRatio("tile_ratio"));
        }
        if self.combo_ratio == 0 {
            return Err(ConfigError::ZeroScoreRatio("combo_ratio"));
        }
        Ok(())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(v) = parse_var(&lookup, ENV_TILE_RATIO)? {
            config.tile_ratio = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_COMBO_RATIO)? {
            config.combo_ratio = v;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Parse an optional variable; present-but-malformed is an error.
pub fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidEnv {
            key: key.to_string(),
            value: raw.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(BoardConfig::default().validate().is_ok());
        assert!(ScoreConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_dimensions() {
        let err = BoardConfig::new(0, 4, 5).validate().unwrap_err();
        assert_eq!(
            err,
            ConfigError::ZeroDimension {
                width: 0,
                height: 4
            }
        );
    }

    #[test]
    fn rejects_too_few_tile_types() {
        let err = BoardConfig::new(4, 4, 2).validate().unwrap_err();
        assert_eq!(err, ConfigError::TooFewTileTypes(2));
    }

    #[test]
    fn rejects_out_of_range_power_chance() {
        let err = BoardConfig::default()
            .with_power_chance(1.5)
            .validate()
            .unwrap_err();
        assert_eq!(err.code(), "invalid_power_chance");
        assert!(BoardConfig::default()
            .with_power_chance(f32::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn lookup_overrides_defaults() {
        let lookup = lookup_from(&[
            (ENV_WIDTH, "6"),
            (ENV_HEIGHT, " 9 "),
            (ENV_TILE_TYPES, "4"),
            (ENV_SEED, "42"),
        ]);
        let config = BoardConfig::from_lookup(lookup).unwrap();
        assert_eq!(config.width, 6);
        assert_eq!(config.height, 9);
        assert_eq!(config.tile_types, 4);
        assert_eq!(config.seed, 42);
        assert_eq!(config.power_chance, DEFAULT_POWER_CHANCE);
    }

    #[test]
    fn malformed_values_are_reported() {
        let lookup = lookup_from(&[(ENV_WIDTH, "wide")]);
        let err = BoardConfig::from_lookup(lookup).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEnv {
                key: ENV_WIDTH.to_string(),
                value: "wide".to_string()
            }
        );
    }

    #[test]
    fn score_lookup_rejects_zero_ratio() {
        let lookup = lookup_from(&[(ENV_COMBO_RATIO, "0")]);
        assert_eq!(
            ScoreConfig::from_lookup(lookup).unwrap_err(),
            ConfigError::ZeroScoreRatio("combo_ratio")
        );
    }
}
