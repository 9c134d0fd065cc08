//! Read-only view of a resolver, for rendering and replay checks.
//!
//! A snapshot is a plain value: the renderer never borrows the board, and two
//! snapshots can be compared (or hashed) to check that a replay reproduced the
//! same game.

use std::hash::Hasher;

use crate::board::Board;
use crate::types::{Phase, Pos, Power};

/// Stable 64-bit FNV-1a hasher for `board_hash`.
///
/// `DefaultHasher` output is not guaranteed stable across Rust versions.
#[derive(Debug, Clone)]
struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.state ^= *b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub width: u16,
    pub height: u16,
    /// Row-major (`y * width + x`): 0 for destroyed, `type_id + 1` otherwise.
    pub cells: Vec<u8>,
    pub powers: Vec<Power>,
    pub phase: Phase,
    pub combo: u32,
    pub board_hash: u64,
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
            powers: Vec::new(),
            phase: Phase::Idle,
            combo: 0,
            board_hash: Fnv1aHasher::OFFSET_BASIS,
        }
    }
}

impl BoardSnapshot {
    /// Copy the grid of `board`, reusing existing allocations
    pub fn capture(&mut self, board: &Board) {
        self.width = board.width();
        self.height = board.height();
        board.write_u8_grid(&mut self.cells);
        self.powers.clear();
        self.powers.extend(board.cells().iter().map(|t| t.power));
        self.board_hash = hash_grid(self.width, self.height, &self.cells, &self.powers);
    }

    pub fn from_board(board: &Board) -> Self {
        let mut snap = Self::default();
        snap.capture(board);
        snap
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Display value at `(x, y)`, or `None` outside the grid
    pub fn cell(&self, x: u16, y: u16) -> Option<u8> {
        self.index(x, y).map(|i| self.cells[i])
    }

    pub fn power(&self, x: u16, y: u16) -> Option<Power> {
        self.index(x, y).map(|i| self.powers[i])
    }

    pub fn cell_at(&self, pos: Pos) -> Option<u8> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        self.cell(pos.x as u16, pos.y as u16)
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    pub fn destroyed_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 0).count()
    }
}

fn hash_grid(width: u16, height: u16, cells: &[u8], powers: &[Power]) -> u64 {
    let mut h = Fnv1aHasher::new();
    h.write(&width.to_le_bytes());
    h.write(&height.to_le_bytes());
    h.write(cells);
    for p in powers {
        h.write_u8(match p {
            Power::None => 0,
            Power::RowClear => 1,
            Power::ColumnClear => 2,
        });
    }
    h.finish()
}
