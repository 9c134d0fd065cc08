//! Board module - owns the grid of tile slots
//!
//! The board is a `width x height` grid where every cell always holds a
//! [`Tile`] value; "empty" is a destroyed tile, never an absent one.
//! Uses a flat row-major vector (`y * width + x`) for cache locality.
//! Coordinates: x grows to the right, y grows upward (gravity pulls toward y = 0).
//!
//! The board does not interpret game rules. Generation, matching and gravity
//! live in the modules above it.

use crate::types::{Pos, Tile, EMPTY_TYPE_ID, MAX_BOARD_DIM};

/// The tile grid
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: u16,
    height: u16,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Tile>,
}

impl Board {
    /// Create a board with every cell destroyed (awaiting generation)
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero or above [`MAX_BOARD_DIM`].
    /// Validated configurations never reach this.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(
            (1..=MAX_BOARD_DIM).contains(&width) && (1..=MAX_BOARD_DIM).contains(&height),
            "board dimensions must be in 1..={}, got {}x{}",
            MAX_BOARD_DIM,
            width,
            height
        );
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![Tile::EMPTY; len],
        }
    }

    /// Build a board of plain live tiles from `rows[y][x]`
    ///
    /// `rows[0]` is the bottom row. A value of [`EMPTY_TYPE_ID`] produces a
    /// destroyed cell.
    ///
    /// # Panics
    ///
    /// Panics if `rows` is empty, ragged or larger than [`MAX_BOARD_DIM`].
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Self {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        assert!(
            rows.iter().all(|r| r.as_ref().len() == width),
            "rows must all have the same length"
        );

        let clamp = |n: usize| u16::try_from(n).unwrap_or(u16::MAX);
        let mut board = Self::new(clamp(width), clamp(height));
        for (y, row) in rows.iter().enumerate() {
            for (x, &id) in row.as_ref().iter().enumerate() {
                let tile = if id == EMPTY_TYPE_ID {
                    Tile::EMPTY
                } else {
                    Tile::plain(id)
                };
                board.set(Pos::new(x as i16, y as i16), tile);
            }
        }
        board
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width as i16 || pos.y >= self.height as i16 {
            return None;
        }
        Some((pos.y as usize) * (self.width as usize) + (pos.x as usize))
    }

    #[inline(always)]
    fn index_or_panic(&self, pos: Pos) -> usize {
        match self.index(pos) {
            Some(idx) => idx,
            None => panic!(
                "position ({}, {}) outside {}x{} board",
                pos.x, pos.y, self.width, self.height
            ),
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Check if position is within bounds
    pub fn contains(&self, pos: Pos) -> bool {
        self.index(pos).is_some()
    }

    /// Get tile at position, or None if out of bounds
    pub fn try_get(&self, pos: Pos) -> Option<Tile> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Get tile at position
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of bounds.
    pub fn get(&self, pos: Pos) -> Tile {
        self.cells[self.index_or_panic(pos)]
    }

    /// Overwrite the tile at position
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of bounds.
    pub fn set(&mut self, pos: Pos, tile: Tile) {
        let idx = self.index_or_panic(pos);
        self.cells[idx] = tile;
    }

    /// Exchange the values of two cells (no rule validation)
    ///
    /// # Panics
    ///
    /// Panics if either position is out of bounds.
    pub fn swap(&mut self, a: Pos, b: Pos) {
        let ia = self.index_or_panic(a);
        let ib = self.index_or_panic(b);
        self.cells.swap(ia, ib);
    }

    /// True if the cell is in bounds and holds a live tile
    pub fn is_live(&self, pos: Pos) -> bool {
        matches!(self.try_get(pos), Some(t) if t.is_live())
    }

    /// All positions in scan order: x ascending, then y ascending
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let (w, h) = (self.width as i16, self.height as i16);
        (0..w).flat_map(move |x| (0..h).map(move |y| Pos::new(x, y)))
    }

    /// Count destroyed cells
    pub fn destroyed_count(&self) -> usize {
        self.cells.iter().filter(|t| t.destroyed).count()
    }

    /// Get a reference to the internal cells array (row-major)
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    /// Write the display grid: 0 for destroyed, `type_id + 1` otherwise
    pub fn write_u8_grid(&self, out: &mut Vec<u8>) {
        out.clear();
        out.extend(self.cells.iter().map(|t| {
            if t.destroyed {
                0
            } else {
                t.type_id.saturating_add(1)
            }
        }));
    }

    /// Rows of type ids (`rows[y][x]`), EMPTY_TYPE_ID for destroyed cells
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        let width = self.width as usize;
        self.cells
            .chunks(width)
            .map(|row| {
                row.iter()
                    .map(|t| if t.destroyed { EMPTY_TYPE_ID } else { t.type_id })
                    .collect()
            })
            .collect()
    }
}
