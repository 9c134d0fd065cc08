//! Match detection and power-chain expansion.
//!
//! Everything here is a pure function of the board. A match is a run of at
//! least [`MIN_MATCH_LEN`] live, same-typed tiles along one row or column.
//! Matched tiles that carry a power detonate their whole line, and any
//! opposite-orientation power tile on that line detonates in turn.

use std::collections::{BTreeSet, HashSet};

use crate::board::Board;
use crate::types::{Axis, Pos, MIN_MATCH_LEN};

/// Positions cleared by one detection pass
///
/// Backed by an ordered set, so iteration is in `(x, y)` scan order and
/// re-adding a position is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    cells: BTreeSet<Pos>,
    combo: u32,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.cells.contains(&pos)
    }

    /// Returns true if `pos` was not already present
    pub fn insert(&mut self, pos: Pos) -> bool {
        self.cells.insert(pos)
    }

    /// Positions in scan order
    pub fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells.iter().copied()
    }

    /// Combo index of the pass that cleared this set (0 until tagged)
    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn set_combo(&mut self, combo: u32) {
        self.combo = combo;
    }

    pub fn to_vec(&self) -> Vec<Pos> {
        self.iter().collect()
    }
}

impl Extend<Pos> for MatchSet {
    fn extend<I: IntoIterator<Item = Pos>>(&mut self, iter: I) {
        self.cells.extend(iter);
    }
}

impl FromIterator<Pos> for MatchSet {
    fn from_iter<I: IntoIterator<Item = Pos>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
            combo: 0,
        }
    }
}

/// Contiguous run of tiles sharing `pos`'s type along `axis`, including `pos`
///
/// Returned in ascending order. Empty if `pos` is out of bounds or destroyed.
pub fn scan_line(board: &Board, pos: Pos, axis: Axis) -> Vec<Pos> {
    let Some(origin) = board.try_get(pos) else {
        return Vec::new();
    };
    if !origin.is_live() {
        return Vec::new();
    }

    let walk = |delta: i16| {
        let mut run = Vec::new();
        let mut cur = pos.step(axis, delta);
        while let Some(tile) = board.try_get(cur) {
            if !tile.matches(&origin) {
                break;
            }
            run.push(cur);
            cur = cur.step(axis, delta);
        }
        run
    };

    let mut run = walk(-1);
    run.reverse();
    run.push(pos);
    run.extend(walk(1));
    run
}

/// The run through `pos` along `axis`, if it is long enough to match
pub fn line_match(board: &Board, pos: Pos, axis: Axis) -> Option<Vec<Pos>> {
    let run = scan_line(board, pos, axis);
    (run.len() >= MIN_MATCH_LEN).then_some(run)
}

/// Matches passing through `pos`, with power chains expanded
pub fn matches_at(board: &Board, pos: Pos) -> MatchSet {
    let mut out = MatchSet::new();
    for axis in [Axis::Horizontal, Axis::Vertical] {
        if let Some(run) = line_match(board, pos, axis) {
            out.extend(run);
        }
    }
    expand_powers(board, &mut out);
    out
}

/// Every matched position on the board, with power chains expanded
///
/// Runs are found by sweeping each row and column once; the result equals
/// the union of [`line_match`] over every cell.
pub fn all_matches(board: &Board) -> MatchSet {
    let mut out = MatchSet::new();
    let (w, h) = (board.width() as i16, board.height() as i16);

    for y in 0..h {
        sweep(board, Pos::new(0, y), Axis::Horizontal, w, &mut out);
    }
    for x in 0..w {
        sweep(board, Pos::new(x, 0), Axis::Vertical, h, &mut out);
    }

    expand_powers(board, &mut out);
    out
}

/// True when the board holds no match at all
pub fn is_settled(board: &Board) -> bool {
    all_matches(board).is_empty()
}

fn sweep(board: &Board, start: Pos, axis: Axis, len: i16, out: &mut MatchSet) {
    let mut run_start = 0i16;
    for i in 1..=len {
        if i < len {
            let a = board.get(start.step(axis, run_start));
            let b = board.get(start.step(axis, i));
            if a.matches(&b) {
                continue;
            }
        }
        let run_len = (i - run_start) as usize;
        if run_len >= MIN_MATCH_LEN && board.get(start.step(axis, run_start)).is_live() {
            out.extend((run_start..i).map(|j| start.step(axis, j)));
        }
        run_start = i;
    }
}

/// Detonate every power tile currently in `set`, in scan order
fn expand_powers(board: &Board, set: &mut MatchSet) {
    let triggers: Vec<Pos> = set
        .iter()
        .filter(|&pos| board.get(pos).power.is_some())
        .collect();
    if triggers.is_empty() {
        return;
    }

    let mut expander = PowerChainExpander::new(board);
    for pos in triggers {
        expander.expand(pos, set);
    }
}

/// Walks detonated lines, following opposite-orientation power tiles
///
/// The visited set spans every `expand` call on the same expander, so each
/// power tile detonates at most once per detection pass.
#[derive(Debug)]
pub struct PowerChainExpander<'a> {
    board: &'a Board,
    visited: HashSet<Pos>,
}

impl<'a> PowerChainExpander<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            visited: HashSet::new(),
        }
    }

    /// Add the line of the power tile at `origin` (and any chained lines) to `out`
    ///
    /// No-op if `origin` holds no live power tile or was already detonated.
    pub fn expand(&mut self, origin: Pos, out: &mut MatchSet) {
        let Some(tile) = self.board.try_get(origin) else {
            return;
        };
        if !tile.is_live() || !tile.power.is_some() || !self.visited.insert(origin) {
            return;
        }

        let mut stack = vec![origin];
        while let Some(pos) = stack.pop() {
            let power = self.board.get(pos).power;
            let Some(axis) = power.axis() else {
                continue;
            };
            let chained = power.opposite();

            for cell in self.line(pos, axis) {
                let tile = self.board.get(cell);
                // Gaps left by earlier clears are skipped, not blockers.
                if !tile.is_live() {
                    continue;
                }
                out.insert(cell);
                if tile.power == chained && self.visited.insert(cell) {
                    stack.push(cell);
                }
            }
        }
    }

    /// Number of distinct power tiles detonated so far
    pub fn detonations(&self) -> usize {
        self.visited.len()
    }

    fn line(&self, through: Pos, axis: Axis) -> impl Iterator<Item = Pos> {
        let (len, start) = match axis {
            Axis::Horizontal => (self.board.width() as i16, Pos::new(0, through.y)),
            Axis::Vertical => (self.board.height() as i16, Pos::new(through.x, 0)),
        };
        (0..len).map(move |i| start.step(axis, i))
    }
}
