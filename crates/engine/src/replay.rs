//! Replay logs - JSON record of a board config plus its accepted swaps
//!
//! Generation and resolution are deterministic per seed, so a log of the
//! starting config and every accepted swap reproduces a game exactly.
//!
//! ```json
//! {
//!   "version": 1,
//!   "config": { "width": 8, "height": 8, "tile_types": 5, "power_chance": 0.05, "seed": 1 },
//!   "swaps": [ { "a": [2, 1], "b": [2, 2] } ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use tui_match3_types::{
    Pos, DEFAULT_COMBO_RATIO, DEFAULT_POWER_CHANCE, DEFAULT_TILE_RATIO,
};
use tui_match3_core::{
    BoardConfig, BoardSnapshot, CascadeResolver, ConfigError, ScoreConfig, ScoreKeeper,
};

pub const REPLAY_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("invalid replay config: {0}")]
    Config(#[from] ConfigError),

    #[error("malformed replay log: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported replay version {0} (expected {expected})", expected = REPLAY_VERSION)]
    Version(u32),

    /// A recorded swap was refused, so the log does not belong to this config.
    #[error("swap #{index} was rejected: {reason}")]
    RejectedSwap { index: usize, reason: &'static str },
}

/// Serialized form of [`BoardConfig`] and [`ScoreConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayConfig {
    pub width: u16,
    pub height: u16,
    pub tile_types: u8,
    #[serde(default = "default_power_chance")]
    pub power_chance: f32,
    pub seed: u32,
    #[serde(default = "default_tile_ratio")]
    pub tile_ratio: u32,
    #[serde(default = "default_combo_ratio")]
    pub combo_ratio: u32,
}

fn default_power_chance() -> f32 {
    DEFAULT_POWER_CHANCE
}

fn default_tile_ratio() -> u32 {
    DEFAULT_TILE_RATIO
}

fn default_combo_ratio() -> u32 {
    DEFAULT_COMBO_RATIO
}

impl ReplayConfig {
    pub fn board(&self) -> BoardConfig {
        BoardConfig {
            width: self.width,
            height: self.height,
            tile_types: self.tile_types,
            power_chance: self.power_chance,
            seed: self.seed,
        }
    }

    pub fn score(&self) -> ScoreConfig {
        ScoreConfig {
            tile_ratio: self.tile_ratio,
            combo_ratio: self.combo_ratio,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRecord {
    pub a: [i16; 2],
    pub b: [i16; 2],
}

impl SwapRecord {
    pub fn new(a: Pos, b: Pos) -> Self {
        Self {
            a: [a.x, a.y],
            b: [b.x, b.y],
        }
    }

    pub fn positions(&self) -> (Pos, Pos) {
        (Pos::new(self.a[0], self.a[1]), Pos::new(self.b[0], self.b[1]))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayLog {
    #[serde(default = "default_version")]
    pub version: u32,
    pub config: ReplayConfig,
    #[serde(default)]
    pub swaps: Vec<SwapRecord>,
}

fn default_version() -> u32 {
    REPLAY_VERSION
}

impl ReplayLog {
    pub fn new(board: &BoardConfig, score: &ScoreConfig, swaps: Vec<SwapRecord>) -> Self {
        Self {
            version: REPLAY_VERSION,
            config: ReplayConfig {
                width: board.width,
                height: board.height,
                tile_types: board.tile_types,
                power_chance: board.power_chance,
                seed: board.seed,
                tile_ratio: score.tile_ratio,
                combo_ratio: score.combo_ratio,
            },
            swaps,
        }
    }

    pub fn from_json(s: &str) -> Result<Self, ReplayError> {
        let log: Self = serde_json::from_str(s)?;
        if log.version != REPLAY_VERSION {
            return Err(ReplayError::Version(log.version));
        }
        Ok(log)
    }

    pub fn to_json(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Final state of a replayed log
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub swaps_applied: usize,
    pub score: u32,
    pub snapshot: BoardSnapshot,
}

/// Rebuild the board from `log.config` and apply every swap, settling each
pub fn replay(log: &ReplayLog) -> Result<ReplayOutcome, ReplayError> {
    let score = log.config.score();
    score.validate()?;
    let mut resolver = CascadeResolver::new(&log.config.board(), ScoreKeeper::new(score))?;

    for (index, swap) in log.swaps.iter().enumerate() {
        let (a, b) = swap.positions();
        if let Err(reason) = resolver.validate_swap(a, b) {
            return Err(ReplayError::RejectedSwap {
                index,
                reason: reason.code(),
            });
        }
        resolver.swap_and_settle(a, b);
        debug!(index, score = resolver.sink().current(), "replayed swap");
    }

    Ok(ReplayOutcome {
        swaps_applied: log.swaps.len(),
        score: resolver.sink().current(),
        snapshot: resolver.snapshot(),
    })
}
