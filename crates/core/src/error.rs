//! Construction-time errors.
//!
//! A board that cannot guarantee its invariants is never built; every
//! rejected configuration surfaces as a [`ConfigError`].

use thiserror::Error;

use crate::types::{MAX_BOARD_DIM, MAX_TILE_TYPES, MIN_TILE_TYPES};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Either board dimension is zero.
    #[error("board dimensions must be at least 1x1, got {width}x{height}")]
    ZeroDimension { width: u16, height: u16 },

    /// Either board dimension exceeds [`MAX_BOARD_DIM`].
    #[error("board dimensions must not exceed {max}, got {width}x{height}", max = MAX_BOARD_DIM)]
    DimensionTooLarge { width: u16, height: u16 },

    /// Fewer than [`MIN_TILE_TYPES`] tile types cannot avoid initial matches.
    #[error("at least {min} tile types are required, got {0}", min = MIN_TILE_TYPES)]
    TooFewTileTypes(u8),

    #[error("at most {max} tile types are supported, got {0}", max = MAX_TILE_TYPES)]
    TooManyTileTypes(u8),

    #[error("power chance must be within [0, 1], got {0}")]
    InvalidPowerChance(f32),

    /// `tile_ratio` or `combo_ratio` is zero, so no clear could ever score.
    #[error("score ratio '{0}' must be positive")]
    ZeroScoreRatio(&'static str),

    /// An environment override could not be parsed.
    #[error("invalid value for {key}: '{value}'")]
    InvalidEnv { key: String, value: String },
}

impl ConfigError {
    /// Short machine-readable identifier
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::ZeroDimension { .. } | ConfigError::DimensionTooLarge { .. } => {
                "invalid_dimensions"
            }
            ConfigError::TooFewTileTypes(_) | ConfigError::TooManyTileTypes(_) => {
                "invalid_tile_types"
            }
            ConfigError::InvalidPowerChance(_) => "invalid_power_chance",
            ConfigError::ZeroScoreRatio(_) => "invalid_score_ratio",
            ConfigError::InvalidEnv { .. } => "invalid_env",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = ConfigError::ZeroDimension {
            width: 0,
            height: 5,
        };
        assert!(err.to_string().contains("0x5"));
        assert_eq!(err.code(), "invalid_dimensions");

        let err = ConfigError::TooFewTileTypes(2);
        assert_eq!(err.to_string(), "at least 3 tile types are required, got 2");
    }
}
