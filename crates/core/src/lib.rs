//! Core cascade logic - pure, deterministic, and testable
//!
//! This crate contains the board model and every rule of a match-3 grid. It
//! has **no dependencies** on UI or I/O, making it:
//!
//! - **Deterministic**: the same seed and swap sequence produce the same game
//! - **Testable**: hand-built boards can be fed straight into the resolver
//! - **Portable**: runs headless as easily as behind the terminal front end
//!
//! # Module Structure
//!
//! - [`board`]: rectangular grid of tiles, bounds checks and swaps
//! - [`generator`]: seeded tile generation that never creates an immediate 3-run
//! - [`matcher`]: row/column sweeps and power-tile chain expansion
//! - [`resolver`]: the swap/match/clear/drop/refill state machine
//! - [`events`]: the [`CascadeSink`] notification seam
//! - [`scoring`]: per-pass clear scores and the session high score
//! - [`snapshot`]: render/replay view with a stable board hash
//! - [`config`] / [`error`]: validated board and score settings
//!
//! # Rules
//!
//! - A **match** is a straight horizontal or vertical run of 3+ live tiles of
//!   one type.
//! - A matched **row-clear** tile adds its whole row; a **column-clear** tile
//!   adds its whole column. Crossing an opposite-orientation power tile chains.
//! - A swap that produces no match is reverted. A swap that does runs passes
//!   until the board is settled; each pass increments the combo.
//!
//! # Example
//!
//! ```
//! use tui_match3_core::{Board, CascadeResolver, EventLog, TileGenerator};
//! use tui_match3_core::types::{Phase, Pos};
//!
//! let board = Board::from_rows(&[
//!     [0u8, 1, 0, 1],
//!     [2, 2, 1, 0],
//!     [0, 1, 2, 1],
//!     [1, 0, 1, 0],
//! ]);
//! let mut resolver =
//!     CascadeResolver::from_parts(board, TileGenerator::new(3, 0.0, 7), EventLog::new());
//!
//! assert!(resolver.swap_and_settle(Pos::new(2, 1), Pos::new(2, 2)));
//! assert_eq!(resolver.phase(), Phase::Idle);
//! assert_eq!(resolver.sink().combos()[0], 1);
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod events;
pub mod generator;
pub mod matcher;
pub mod resolver;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tui_match3_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::{BoardConfig, ScoreConfig};
pub use error::ConfigError;
pub use events::{CascadeEvent, CascadeSink, EventLog};
pub use generator::TileGenerator;
pub use matcher::{all_matches, is_settled, matches_at, scan_line, MatchSet, PowerChainExpander};
pub use resolver::{compact_columns, CascadeResolver, SwapRejection};
pub use rng::SimpleRng;
pub use scoring::{calculate_clear_score, ClearScore, ScoreKeeper};
pub use snapshot::BoardSnapshot;
