//! Cascade resolver - the swap/match/clear/drop/refill state machine
//!
//! The resolver is the only writer of its [`Board`] once constructed. Each call
//! to [`CascadeResolver::step`] completes exactly one phase and notifies the
//! sink, so a presentation layer may pace phases however it likes without the
//! board ever being observed half-written.
//!
//! ```text
//! Idle --request_swap--> SwapPending --no match--> Reverting --> Idle
//!                              |
//!                              +--match--> Matching -> Clearing -> Dropping -> Refilling
//!                                             ^                                  |
//!                                             +------------ more matches --------+
//!                                                                                |
//!                                                                  settled --> Idle
//! ```
//!
//! A game-over request takes effect the next time the machine is in `Idle` or
//! `SwapPending`; it never interrupts a cascade.

use tracing::{debug, info, trace};

use crate::board::Board;
use crate::config::BoardConfig;
use crate::error::ConfigError;
use crate::events::CascadeSink;
use crate::generator::TileGenerator;
use crate::matcher::{all_matches, MatchSet};
use crate::snapshot::BoardSnapshot;
use crate::types::{DropMove, Phase, Pos, Stage, Tile};

/// Why a swap request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapRejection {
    OutOfBounds,
    SameCell,
    NotAdjacent,
    Destroyed,
    Busy,
    GameOver,
}

impl SwapRejection {
    pub fn code(self) -> &'static str {
        match self {
            SwapRejection::OutOfBounds => "out_of_bounds",
            SwapRejection::SameCell => "same_cell",
            SwapRejection::NotAdjacent => "not_adjacent",
            SwapRejection::Destroyed => "destroyed",
            SwapRejection::Busy => "busy",
            SwapRejection::GameOver => "game_over",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            SwapRejection::OutOfBounds => "swap target is outside the board",
            SwapRejection::SameCell => "cannot swap a cell with itself",
            SwapRejection::NotAdjacent => "swap cells must share an edge",
            SwapRejection::Destroyed => "swap cell is awaiting refill",
            SwapRejection::Busy => "a resolution sequence is in progress",
            SwapRejection::GameOver => "the game is over",
        }
    }
}

/// Compact every column toward y = 0, preserving vertical order
///
/// Afterwards each column holds its live tiles at the bottom with no gaps and
/// its destroyed cells contiguous at the top. Returns one move per relocated
/// tile, ordered by column then by destination.
pub fn compact_columns(board: &mut Board) -> Vec<DropMove> {
    let mut moves = Vec::new();
    let (w, h) = (board.width() as i16, board.height() as i16);

    for x in 0..w {
        let mut write_y = 0i16;
        for read_y in 0..h {
            let from = Pos::new(x, read_y);
            let tile = board.get(from);
            if !tile.is_live() {
                continue;
            }
            if write_y != read_y {
                let to = Pos::new(x, write_y);
                board.set(to, tile);
                moves.push(DropMove { from, to });
            }
            write_y += 1;
        }
        for y in write_y..h {
            board.set(Pos::new(x, y), Tile::EMPTY);
        }
    }

    moves
}

/// Owns the board for the lifetime of a game and drives every mutation
#[derive(Debug, Clone)]
pub struct CascadeResolver<S: CascadeSink = ()> {
    board: Board,
    generator: TileGenerator,
    sink: S,
    phase: Phase,
    /// Clear passes completed in the current sequence.
    combo: u32,
    /// Swap awaiting evaluation or revert.
    pending: Option<(Pos, Pos)>,
    /// Input of the next `Matching` phase.
    matches: MatchSet,
    game_over_requested: bool,
    swaps_accepted: u32,
}

impl<S: CascadeSink> CascadeResolver<S> {
    /// Validate `config` and generate a board with no initial matches
    pub fn new(config: &BoardConfig, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut generator = TileGenerator::from_config(config);
        let mut board = Board::new(config.width, config.height);
        generator.fill(&mut board);
        debug!(
            width = config.width,
            height = config.height,
            tile_types = config.tile_types,
            seed = config.seed,
            "board generated"
        );
        Ok(Self::from_parts(board, generator, sink))
    }

    /// Wrap an existing board (e.g. a hand-built test layout)
    pub fn from_parts(board: Board, generator: TileGenerator, sink: S) -> Self {
        Self {
            board,
            generator,
            sink,
            phase: Phase::Idle,
            combo: 0,
            pending: None,
            matches: MatchSet::new(),
            game_over_requested: false,
            swaps_accepted: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Clear passes completed so far in the active sequence (0 when idle)
    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn game_over_requested(&self) -> bool {
        self.game_over_requested
    }

    /// Number of swaps accepted since construction
    pub fn swaps_accepted(&self) -> u32 {
        self.swaps_accepted
    }

    /// Positions queued for the next `Matching` phase
    pub fn pending_matches(&self) -> &MatchSet {
        &self.matches
    }

    pub fn generator(&self) -> &TileGenerator {
        &self.generator
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Check a swap request without changing anything
    pub fn validate_swap(&self, a: Pos, b: Pos) -> Result<(), SwapRejection> {
        match self.phase {
            Phase::GameOver => return Err(SwapRejection::GameOver),
            Phase::Idle => {}
            _ => return Err(SwapRejection::Busy),
        }
        if self.game_over_requested {
            return Err(SwapRejection::GameOver);
        }
        let (Some(ta), Some(tb)) = (self.board.try_get(a), self.board.try_get(b)) else {
            return Err(SwapRejection::OutOfBounds);
        };
        if a == b {
            return Err(SwapRejection::SameCell);
        }
        if !a.is_adjacent(b) {
            return Err(SwapRejection::NotAdjacent);
        }
        if !ta.is_live() || !tb.is_live() {
            return Err(SwapRejection::Destroyed);
        }
        Ok(())
    }

    /// Queue a swap; accepted requests move the machine to `SwapPending`
    ///
    /// Rejected requests leave the board and phase untouched.
    pub fn request_swap(&mut self, a: Pos, b: Pos) -> bool {
        if let Err(reason) = self.validate_swap(a, b) {
            debug!(?a, ?b, reason = reason.code(), "swap rejected");
            return false;
        }
        debug!(?a, ?b, "swap accepted");
        self.pending = Some((a, b));
        self.swaps_accepted = self.swaps_accepted.wrapping_add(1);
        self.set_phase(Phase::SwapPending);
        true
    }

    /// Request the terminal state at the next safe boundary
    pub fn notify_game_over(&mut self) {
        if self.phase == Phase::GameOver {
            return;
        }
        self.game_over_requested = true;
        if self.phase == Phase::Idle {
            self.enter_game_over();
        }
    }

    /// Run exactly one phase; returns false if there was nothing to do
    pub fn step(&mut self) -> bool {
        match self.phase {
            Phase::GameOver => false,
            Phase::Idle => {
                if self.game_over_requested {
                    self.enter_game_over();
                    true
                } else {
                    false
                }
            }
            Phase::SwapPending => {
                self.run_swap();
                true
            }
            Phase::Reverting => {
                if let Some((a, b)) = self.pending.take() {
                    self.board.swap(a, b);
                    self.sink.on_swap_reverted(a, b);
                }
                self.enter_idle();
                true
            }
            Phase::Resolving(Stage::Matching) => {
                self.combo += 1;
                self.matches.set_combo(self.combo);
                trace!(combo = self.combo, tiles = self.matches.len(), "match pass");
                self.sink.on_match_cleared(&self.matches, self.combo);
                self.set_phase(Phase::Resolving(Stage::Clearing));
                true
            }
            Phase::Resolving(Stage::Clearing) => {
                for pos in self.matches.iter() {
                    self.board.set(pos, Tile::EMPTY);
                }
                self.set_phase(Phase::Resolving(Stage::Dropping));
                true
            }
            Phase::Resolving(Stage::Dropping) => {
                let moves = compact_columns(&mut self.board);
                self.sink.on_tiles_dropped(&moves);
                self.set_phase(Phase::Resolving(Stage::Refilling));
                true
            }
            Phase::Resolving(Stage::Refilling) => {
                let fills = self.generator.refill(&mut self.board);
                self.sink.on_tiles_refilled(&fills);

                self.matches = all_matches(&self.board);
                if self.matches.is_empty() {
                    info!(combo = self.combo, "resolution settled");
                    self.sink.on_resolution_settled(self.combo);
                    self.combo = 0;
                    self.enter_idle();
                } else {
                    self.set_phase(Phase::Resolving(Stage::Matching));
                }
                true
            }
        }
    }

    /// Step until the machine rests in `Idle` or `GameOver`
    ///
    /// Returns the number of phases executed. Unbounded cascades are not
    /// guarded against.
    pub fn settle(&mut self) -> usize {
        let mut steps = 0;
        while self.step() {
            steps += 1;
        }
        steps
    }

    /// `request_swap` followed by `settle`
    pub fn swap_and_settle(&mut self, a: Pos, b: Pos) -> bool {
        if !self.request_swap(a, b) {
            return false;
        }
        self.settle();
        true
    }

    /// Write the render/replay view of the current state into `out`
    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        out.capture(&self.board);
        out.phase = self.phase;
        out.combo = self.combo;
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut snap = BoardSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    fn run_swap(&mut self) {
        let Some((a, b)) = self.pending else {
            self.enter_idle();
            return;
        };
        if self.game_over_requested {
            self.pending = None;
            self.enter_game_over();
            return;
        }

        self.board.swap(a, b);
        self.sink.on_swap_accepted(a, b);

        let found = all_matches(&self.board);
        if found.is_empty() {
            self.set_phase(Phase::Reverting);
        } else {
            self.pending = None;
            self.combo = 0;
            self.matches = found;
            self.set_phase(Phase::Resolving(Stage::Matching));
        }
    }

    fn enter_idle(&mut self) {
        self.set_phase(Phase::Idle);
        if self.game_over_requested {
            self.enter_game_over();
        }
    }

    fn enter_game_over(&mut self) {
        info!(swaps = self.swaps_accepted, "game over");
        self.set_phase(Phase::GameOver);
        self.sink.on_game_over();
    }

    fn set_phase(&mut self, next: Phase) {
        trace!(from = self.phase.as_str(), to = next.as_str(), "phase");
        self.phase = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{CascadeEvent, EventLog};
    use crate::types::{Power, EMPTY_TYPE_ID};

    const E: u8 = EMPTY_TYPE_ID;

    fn resolver_with(rows: &[[u8; 4]]) -> CascadeResolver<EventLog> {
        let board = Board::from_rows(rows);
        CascadeResolver::from_parts(board, TileGenerator::new(3, 0.0, 11), EventLog::new())
    }

    #[test]
    fn compact_columns_is_stable() {
        let mut board = Board::from_rows(&[[0u8, E], [E, 1], [2, E], [E, 0]]);
        let moves = compact_columns(&mut board);
        assert_eq!(board.to_rows(), vec![vec![0, 1], vec![2, 0], vec![E, E], vec![E, E]]);
        assert_eq!(
            moves,
            vec![
                DropMove {
                    from: Pos::new(0, 2),
                    to: Pos::new(0, 1)
                },
                DropMove {
                    from: Pos::new(1, 1),
                    to: Pos::new(1, 0)
                },
                DropMove {
                    from: Pos::new(1, 3),
                    to: Pos::new(1, 1)
                },
            ]
        );
    }

    #[test]
    fn compact_columns_keeps_powers_with_tiles() {
        let mut board = Board::from_rows(&[[E], [1]]);
        board.set(Pos::new(0, 1), Tile::new(1, Power::ColumnClear));
        compact_columns(&mut board);
        assert_eq!(board.get(Pos::new(0, 0)), Tile::new(1, Power::ColumnClear));
        assert_eq!(board.get(Pos::new(0, 1)), Tile::EMPTY);
    }

    #[test]
    fn rejects_invalid_requests_without_mutation() {
        let mut r = resolver_with(&[[0, 1, 0, 1], [1, 0, 1, 0], [0, 1, 0, 1], [1, 0, 1, 0]]);
        let before = r.board().clone();

        assert_eq!(
            r.validate_swap(Pos::new(0, 0), Pos::new(0, 0)),
            Err(SwapRejection::SameCell)
        );
        assert_eq!(
            r.validate_swap(Pos::new(0, 0), Pos::new(1, 1)),
            Err(SwapRejection::NotAdjacent)
        );
        assert_eq!(
            r.validate_swap(Pos::new(3, 3), Pos::new(4, 3)),
            Err(SwapRejection::OutOfBounds)
        );
        assert!(!r.request_swap(Pos::new(0, 0), Pos::new(2, 0)));

        assert_eq!(r.phase(), Phase::Idle);
        assert_eq!(r.board(), &before);
        assert!(r.sink().events().is_empty());
    }

    #[test]
    fn rejects_swaps_with_destroyed_cells() {
        let mut r = resolver_with(&[[0, 1, 0, 1], [1, 0, 1, 0], [0, 1, 0, E], [1, 0, 1, E]]);
        assert_eq!(
            r.validate_swap(Pos::new(2, 2), Pos::new(3, 2)),
            Err(SwapRejection::Destroyed)
        );
        assert!(!r.request_swap(Pos::new(3, 3), Pos::new(3, 2)));
    }

    #[test]
    fn busy_resolver_rejects_second_swap() {
        let mut r = resolver_with(&[[0, 1, 0, 1], [1, 0, 1, 0], [0, 1, 0, 1], [1, 0, 1, 0]]);
        assert!(r.request_swap(Pos::new(0, 0), Pos::new(1, 0)));
        assert_eq!(r.phase(), Phase::SwapPending);
        assert_eq!(
            r.validate_swap(Pos::new(2, 0), Pos::new(3, 0)),
            Err(SwapRejection::Busy)
        );
    }

    #[test]
    fn swap_without_match_reverts_exactly() {
        let mut r = resolver_with(&[[0, 1, 0, 1], [1, 0, 1, 0], [0, 1, 0, 1], [1, 0, 1, 0]]);
        let before = r.board().clone();

        assert!(r.request_swap(Pos::new(0, 0), Pos::new(1, 0)));
        assert!(r.step());
        assert_eq!(r.phase(), Phase::Reverting);
        assert_ne!(r.board(), &before);
        assert!(r.step());
        assert_eq!(r.phase(), Phase::Idle);
        assert_eq!(r.board(), &before);

        assert_eq!(
            r.sink().events(),
            &[
                CascadeEvent::SwapAccepted {
                    a: Pos::new(0, 0),
                    b: Pos::new(1, 0)
                },
                CascadeEvent::SwapReverted {
                    a: Pos::new(0, 0),
                    b: Pos::new(1, 0)
                },
            ]
        );
    }

    #[test]
    fn phases_run_in_order() {
        // Swapping (2,1)<->(2,2) completes a row of 2s at y=1.
        let mut r = resolver_with(&[[0, 1, 0, 1], [2, 2, 1, 0], [0, 1, 2, 1], [1, 0, 1, 0]]);
        assert!(r.request_swap(Pos::new(2, 1), Pos::new(2, 2)));

        let mut phases = Vec::new();
        while r.step() && phases.len() < 5 {
            phases.push(r.phase());
        }
        assert_eq!(
            &phases[..4],
            &[
                Phase::Resolving(Stage::Matching),
                Phase::Resolving(Stage::Clearing),
                Phase::Resolving(Stage::Dropping),
                Phase::Resolving(Stage::Refilling),
            ]
        );
        assert!(matches!(
            phases[4],
            Phase::Idle | Phase::Resolving(Stage::Matching)
        ));
    }

    #[test]
    fn clearing_marks_cells_destroyed_before_drop() {
        let mut r = resolver_with(&[[0, 1, 0, 1], [2, 2, 1, 0], [0, 1, 2, 1], [1, 0, 1, 0]]);
        assert!(r.request_swap(Pos::new(2, 1), Pos::new(2, 2)));
        r.step(); // SwapPending -> Matching
        r.step(); // Matching -> Clearing
        r.step(); // Clearing -> Dropping
        for x in 0..3 {
            assert!(!r.board().is_live(Pos::new(x, 1)));
        }
        r.step(); // Dropping -> Refilling
        for x in 0..3 {
            assert!(!r.board().is_live(Pos::new(x, 3)), "top of column {}", x);
            assert!(r.board().is_live(Pos::new(x, 1)));
        }
    }

    #[test]
    fn settle_leaves_no_matches() {
        let mut r = resolver_with(&[[0, 1, 0, 1], [2, 2, 1, 0], [0, 1, 2, 1], [1, 0, 1, 0]]);
        assert!(r.swap_and_settle(Pos::new(2, 1), Pos::new(2, 2)));
        assert_eq!(r.phase(), Phase::Idle);
        assert_eq!(r.combo(), 0);
        assert!(all_matches(r.board()).is_empty());
        assert_eq!(r.board().destroyed_count(), 0);

        let combos = r.sink().combos();
        assert_eq!(combos[0], 1);
        assert!(combos.windows(2).all(|w| w[1] == w[0] + 1));
        assert!(matches!(
            r.sink().events().last(),
            Some(CascadeEvent::ResolutionSettled { .. })
        ));
    }

    #[test]
    fn game_over_when_idle_is_immediate() {
        let mut r = resolver_with(&[[0, 1, 0, 1], [1, 0, 1, 0], [0, 1, 0, 1], [1, 0, 1, 0]]);
        r.notify_game_over();
        assert!(r.is_game_over());
        assert!(!r.request_swap(Pos::new(0, 0), Pos::new(1, 0)));
        assert_eq!(
            r.validate_swap(Pos::new(0, 0), Pos::new(1, 0)),
            Err(SwapRejection::GameOver)
        );
        assert!(!r.step());
        assert_eq!(r.sink().events(), &[CascadeEvent::GameOver]);
    }

    #[test]
    fn game_over_while_swap_pending_skips_swap() {
        let mut r = resolver_with(&[[0, 1, 0, 1], [2, 2, 1, 0], [0, 1, 2, 1], [1, 0, 1, 0]]);
        let before = r.board().clone();
        assert!(r.request_swap(Pos::new(2, 1), Pos::new(2, 2)));
        r.notify_game_over();
        assert_eq!(r.phase(), Phase::SwapPending);
        assert!(r.step());
        assert!(r.is_game_over());
        assert_eq!(r.board(), &before);
    }

    #[test]
    fn game_over_waits_for_cascade_to_finish() {
        let mut r = resolver_with(&[[0, 1, 0, 1], [2, 2, 1, 0], [0, 1, 2, 1], [1, 0, 1, 0]]);
        assert!(r.request_swap(Pos::new(2, 1), Pos::new(2, 2)));
        r.step(); // -> Matching
        r.notify_game_over();
        assert_eq!(r.phase(), Phase::Resolving(Stage::Matching));
        r.step(); // -> Clearing
        assert_eq!(r.phase(), Phase::Resolving(Stage::Clearing));

        r.settle();
        assert!(r.is_game_over());
        assert_eq!(r.board().destroyed_count(), 0);
        let events = r.sink().events();
        let settled = events
            .iter()
            .position(|e| matches!(e, CascadeEvent::ResolutionSettled { .. }))
            .unwrap();
        assert_eq!(events.last(), Some(&CascadeEvent::GameOver));
        assert!(settled < events.len() - 1);
    }

    #[test]
    fn new_rejects_invalid_config() {
        let err = CascadeResolver::new(&BoardConfig::new(4, 4, 2), ()).unwrap_err();
        assert_eq!(err, ConfigError::TooFewTileTypes(2));
    }
}
