//! Resolver notifications.
//!
//! The resolver finishes each phase synchronously and reports it through a
//! [`CascadeSink`]. Presentation, scoring and audio collaborators implement
//! the hooks they care about; every hook defaults to a no-op.

use crate::matcher::MatchSet;
use crate::types::{DropMove, Pos, Refill};

/// Receiver of resolver phase notifications
pub trait CascadeSink {
    /// A swap was accepted and written to the board.
    fn on_swap_accepted(&mut self, _a: Pos, _b: Pos) {}

    /// A swap produced no match and was undone.
    fn on_swap_reverted(&mut self, _a: Pos, _b: Pos) {}

    /// `tiles` are about to be cleared by pass number `combo` (1-based).
    fn on_match_cleared(&mut self, _tiles: &MatchSet, _combo: u32) {}

    /// Gravity relocated surviving tiles.
    fn on_tiles_dropped(&mut self, _moves: &[DropMove]) {}

    /// Destroyed cells received fresh tiles.
    fn on_tiles_refilled(&mut self, _fills: &[Refill]) {}

    /// The cascade ended with no remaining match after `combo` passes.
    fn on_resolution_settled(&mut self, _combo: u32) {}

    /// The resolver entered its terminal state.
    fn on_game_over(&mut self) {}
}

impl CascadeSink for () {}

impl<T: CascadeSink + ?Sized> CascadeSink for &mut T {
    fn on_swap_accepted(&mut self, a: Pos, b: Pos) {
        (**self).on_swap_accepted(a, b)
    }
    fn on_swap_reverted(&mut self, a: Pos, b: Pos) {
        (**self).on_swap_reverted(a, b)
    }
    fn on_match_cleared(&mut self, tiles: &MatchSet, combo: u32) {
        (**self).on_match_cleared(tiles, combo)
    }
    fn on_tiles_dropped(&mut self, moves: &[DropMove]) {
        (**self).on_tiles_dropped(moves)
    }
    fn on_tiles_refilled(&mut self, fills: &[Refill]) {
        (**self).on_tiles_refilled(fills)
    }
    fn on_resolution_settled(&mut self, combo: u32) {
        (**self).on_resolution_settled(combo)
    }
    fn on_game_over(&mut self) {
        (**self).on_game_over()
    }
}

/// Fan-out to two sinks, first `A` then `B`
impl<A: CascadeSink, B: CascadeSink> CascadeSink for (A, B) {
    fn on_swap_accepted(&mut self, a: Pos, b: Pos) {
        self.0.on_swap_accepted(a, b);
        self.1.on_swap_accepted(a, b);
    }
    fn on_swap_reverted(&mut self, a: Pos, b: Pos) {
        self.0.on_swap_reverted(a, b);
        self.1.on_swap_reverted(a, b);
    }
    fn on_match_cleared(&mut self, tiles: &MatchSet, combo: u32) {
        self.0.on_match_cleared(tiles, combo);
        self.1.on_match_cleared(tiles, combo);
    }
    fn on_tiles_dropped(&mut self, moves: &[DropMove]) {
        self.0.on_tiles_dropped(moves);
        self.1.on_tiles_dropped(moves);
    }
    fn on_tiles_refilled(&mut self, fills: &[Refill]) {
        self.0.on_tiles_refilled(fills);
        self.1.on_tiles_refilled(fills);
    }
    fn on_resolution_settled(&mut self, combo: u32) {
        self.0.on_resolution_settled(combo);
        self.1.on_resolution_settled(combo);
    }
    fn on_game_over(&mut self) {
        self.0.on_game_over();
        self.1.on_game_over();
    }
}

/// Owned copy of one notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeEvent {
    SwapAccepted { a: Pos, b: Pos },
    SwapReverted { a: Pos, b: Pos },
    MatchCleared { tiles: Vec<Pos>, combo: u32 },
    TilesDropped(Vec<DropMove>),
    TilesRefilled(Vec<Refill>),
    ResolutionSettled { combo: u32 },
    GameOver,
}

/// Sink that records every notification (consumed by observers and tests)
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<CascadeEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[CascadeEvent] {
        &self.events
    }

    /// Take all recorded events, leaving the log empty
    pub fn drain(&mut self) -> Vec<CascadeEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Combo indices of every `MatchCleared` event, in order
    pub fn combos(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                CascadeEvent::MatchCleared { combo, .. } => Some(*combo),
                _ => None,
            })
            .collect()
    }
}

impl CascadeSink for EventLog {
    fn on_swap_accepted(&mut self, a: Pos, b: Pos) {
        self.events.push(CascadeEvent::SwapAccepted { a, b });
    }
    fn on_swap_reverted(&mut self, a: Pos, b: Pos) {
        self.events.push(CascadeEvent::SwapReverted { a, b });
    }
    fn on_match_cleared(&mut self, tiles: &MatchSet, combo: u32) {
        self.events.push(CascadeEvent::MatchCleared {
            tiles: tiles.to_vec(),
            combo,
        });
    }
    fn on_tiles_dropped(&mut self, moves: &[DropMove]) {
        self.events.push(CascadeEvent::TilesDropped(moves.to_vec()));
    }
    fn on_tiles_refilled(&mut self, fills: &[Refill]) {
        self.events.push(CascadeEvent::TilesRefilled(fills.to_vec()));
    }
    fn on_resolution_settled(&mut self, combo: u32) {
        self.events.push(CascadeEvent::ResolutionSettled { combo });
    }
    fn on_game_over(&mut self) {
        self.events.push(CascadeEvent::GameOver);
    }
}
