//! Scoring module - points per cleared pass
//!
//! Each clear pass scores `tile_count * tile_ratio * combo * combo_ratio`,
//! so later passes of a cascade are worth proportionally more. The high score
//! is only committed when a session ends.

use crate::config::ScoreConfig;
use crate::events::CascadeSink;
use crate::matcher::MatchSet;

/// Points for clearing `tile_count` tiles on pass `combo`
///
/// # Examples
///
/// ```
/// use tui_match3_core::{calculate_clear_score, ScoreConfig};
///
/// let config = ScoreConfig { tile_ratio: 10, combo_ratio: 1 };
/// assert_eq!(calculate_clear_score(3, 1, &config), 30);
/// assert_eq!(calculate_clear_score(4, 2, &config), 80);
/// ```
pub fn calculate_clear_score(tile_count: usize, combo: u32, config: &ScoreConfig) -> u32 {
    (tile_count as u32)
        .saturating_mul(config.tile_ratio)
        .saturating_mul(combo.saturating_mul(config.combo_ratio))
}

/// Record of the most recent scoring pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearScore {
    pub tile_count: u32,
    pub combo: u32,
    pub points: u32,
}

/// Running score fed by `on_match_cleared`
#[derive(Debug, Clone, Default)]
pub struct ScoreKeeper {
    config: ScoreConfig,
    current: u32,
    high: u32,
    last_clear: Option<ClearScore>,
}

impl ScoreKeeper {
    pub fn new(config: ScoreConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn high(&self) -> u32 {
        self.high
    }

    pub fn last_clear(&self) -> Option<ClearScore> {
        self.last_clear
    }

    pub fn config(&self) -> &ScoreConfig {
        &self.config
    }

    /// Add a clear pass and return the points it earned
    pub fn add_clear(&mut self, tile_count: usize, combo: u32) -> u32 {
        let points = calculate_clear_score(tile_count, combo, &self.config);
        self.current = self.current.saturating_add(points);
        self.last_clear = Some(ClearScore {
            tile_count: tile_count as u32,
            combo,
            points,
        });
        points
    }

    /// Raise the high score to the current score if it is larger
    pub fn commit_high_score(&mut self) {
        if self.current > self.high {
            self.high = self.current;
        }
    }

    /// Start a new session, keeping the high score
    pub fn reset_current(&mut self) {
        self.current = 0;
        self.last_clear = None;
    }
}

impl CascadeSink for ScoreKeeper {
    fn on_match_cleared(&mut self, tiles: &MatchSet, combo: u32) {
        self.add_clear(tiles.len(), combo);
    }

    fn on_game_over(&mut self) {
        self.commit_high_score();
    }
}
