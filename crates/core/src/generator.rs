//! Tile generation with the no-immediate-match constraint.
//!
//! Cells are filled in scan order (x ascending, then y ascending), so when a
//! cell is generated its two left neighbours and two lower neighbours are
//! already final. A candidate id is excluded if it would extend either pair
//! into a 3-run; right and upper neighbours are not consulted, which is what
//! lets refills start new cascades.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::config::BoardConfig;
use crate::rng::SimpleRng;
use crate::types::{Pos, Power, Refill, Tile, MAX_TILE_TYPES};

type Candidates = ArrayVec<u8, { MAX_TILE_TYPES as usize }>;

/// Produces tile values for construction and refill
#[derive(Debug, Clone)]
pub struct TileGenerator {
    tile_types: u8,
    power_chance: f32,
    rng: SimpleRng,
}

impl TileGenerator {
    /// `tile_types` is clamped to `1..=MAX_TILE_TYPES`; callers are expected to
    /// have validated it through [`BoardConfig::validate`].
    pub fn new(tile_types: u8, power_chance: f32, seed: u32) -> Self {
        Self {
            tile_types: tile_types.clamp(1, MAX_TILE_TYPES),
            power_chance,
            rng: SimpleRng::new(seed),
        }
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        Self::new(config.tile_types, config.power_chance, config.seed)
    }

    pub fn tile_types(&self) -> u8 {
        self.tile_types
    }

    pub fn power_chance(&self) -> f32 {
        self.power_chance
    }

    /// Current RNG state, usable as the seed of a follow-up board
    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    /// Ids allowed at `pos` given already-placed neighbours
    ///
    /// Falls back to the full id range if the constraint excludes everything
    /// (only possible with fewer than three tile types).
    pub fn candidates(&self, board: &Board, pos: Pos) -> Candidates {
        let left = run_pair_id(board, pos.offset(-1, 0), pos.offset(-2, 0));
        let below = run_pair_id(board, pos.offset(0, -1), pos.offset(0, -2));

        let mut out: Candidates = (0..self.tile_types)
            .filter(|&id| Some(id) != left && Some(id) != below)
            .collect();

        if out.is_empty() {
            out.extend(0..self.tile_types);
        }
        out
    }

    /// Generate a tile for `pos` without writing it
    pub fn generate(&mut self, board: &Board, pos: Pos) -> Tile {
        let candidates = self.candidates(board, pos);
        let pick = self.rng.next_range(candidates.len() as u32) as usize;
        let type_id = candidates[pick];
        let power = self.roll_power();
        Tile::new(type_id, power)
    }

    /// Overwrite every cell of `board` in scan order
    pub fn fill(&mut self, board: &mut Board) {
        let positions: Vec<Pos> = board.positions().collect();
        for pos in positions {
            let tile = self.generate(board, pos);
            board.set(pos, tile);
        }
    }

    /// Regenerate every destroyed cell in scan order
    pub fn refill(&mut self, board: &mut Board) -> Vec<Refill> {
        let empty: Vec<Pos> = board
            .positions()
            .filter(|&pos| !board.get(pos).is_live())
            .collect();

        let mut fills = Vec::with_capacity(empty.len());
        for pos in empty {
            let tile = self.generate(board, pos);
            board.set(pos, tile);
            fills.push(Refill { pos, tile });
        }
        fills
    }

    fn roll_power(&mut self) -> Power {
        if self.rng.next_f32() >= self.power_chance {
            return Power::None;
        }
        if self.rng.next_range(2) == 0 {
            Power::RowClear
        } else {
            Power::ColumnClear
        }
    }
}

/// The shared id of two live neighbours, if they form a pair
fn run_pair_id(board: &Board, near: Pos, far: Pos) -> Option<u8> {
    let a = board.try_get(near)?;
    let b = board.try_get(far)?;
    a.matches(&b).then_some(a.type_id)
}
