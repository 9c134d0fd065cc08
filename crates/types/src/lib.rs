//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (cascade engine, terminal rendering, replay files).
//!
//! # Board Coordinates
//!
//! Boards are indexed by `(x, y)`:
//!
//! - **x**: column, `0..width`, left to right
//! - **y**: row, `0..height`, **bottom to top** (gravity pulls toward `y = 0`)
//!
//! Newly generated tiles therefore appear at the high-`y` end of a column.
//!
//! # Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_BOARD_WIDTH` | 8 | Columns |
//! | `DEFAULT_BOARD_HEIGHT` | 8 | Rows |
//! | `DEFAULT_TILE_TYPES` | 5 | Distinct tile identities |
//! | `DEFAULT_POWER_CHANCE` | 0.05 | Probability a generated tile carries a power |
//! | `DEFAULT_TILE_RATIO` | 10 | Score per cleared tile |
//! | `DEFAULT_COMBO_RATIO` | 1 | Score multiplier per combo step |
//! | `DEFAULT_SESSION_MS` | 60000 | Countdown before game over |
//! | `TICK_MS` | 16 | Fixed timestep of the interactive loop |
//! | `PHASE_DELAY_MS` | 120 | Pause between resolver phases in the terminal UI |
//!
//! # Examples
//!
//! ```
//! use tui_match3_types::{Axis, Pos, Power, Tile};
//!
//! let a = Pos::new(2, 2);
//! assert!(a.is_adjacent(Pos::new(2, 1)));
//! assert!(!a.is_adjacent(Pos::new(3, 3)));
//!
//! assert_eq!(Power::RowClear.axis(), Some(Axis::Horizontal));
//! assert_eq!(Power::RowClear.opposite(), Power::ColumnClear);
//!
//! let tile = Tile::plain(3);
//! assert!(tile.is_live());
//! assert!(!Tile::EMPTY.is_live());
//! ```

/// Default board width in cells
pub const DEFAULT_BOARD_WIDTH: u16 = 8;

/// Default board height in cells
pub const DEFAULT_BOARD_HEIGHT: u16 = 8;

/// Largest accepted board dimension (either axis)
pub const MAX_BOARD_DIM: u16 = 128;

/// Fewest tile types that still admit a board without an initial 3-run
pub const MIN_TILE_TYPES: u8 = 3;

/// Most tile types a board may use
pub const MAX_TILE_TYPES: u8 = 16;

/// Default number of tile types
pub const DEFAULT_TILE_TYPES: u8 = 5;

/// Default probability that a generated tile carries a power
pub const DEFAULT_POWER_CHANCE: f32 = 0.05;

/// Default RNG seed
pub const DEFAULT_SEED: u32 = 1;

/// Shortest run of equal tiles that counts as a match
pub const MIN_MATCH_LEN: usize = 3;

/// Sentinel `type_id` stored in destroyed cells
pub const EMPTY_TYPE_ID: u8 = u8::MAX;

/// Default score per cleared tile
pub const DEFAULT_TILE_RATIO: u32 = 10;

/// Default score multiplier per combo step
pub const DEFAULT_COMBO_RATIO: u32 = 1;

/// Default session countdown (60 seconds)
pub const DEFAULT_SESSION_MS: u32 = 60_000;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Pause between resolver phases when presenting a cascade
pub const PHASE_DELAY_MS: u32 = 120;


/// A board coordinate
///
/// Ordering is lexicographic on `(x, y)`, which is the scan order used
/// whenever several positions must be processed deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pos {
    pub x: i16,
    pub y: i16,
}

impl Pos {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Position shifted by `(dx, dy)` (may fall outside any board)
    pub const fn offset(self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Position `delta` cells away along `axis`
    pub fn step(self, axis: Axis, delta: i16) -> Self {
        let (dx, dy) = axis.unit();
        self.offset(dx * delta, dy * delta)
    }

    /// True when `other` shares an edge with `self` (4-adjacency)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_match3_types::Pos;
    ///
    /// assert!(Pos::new(0, 0).is_adjacent(Pos::new(1, 0)));
    /// assert!(!Pos::new(0, 0).is_adjacent(Pos::new(0, 0)));
    /// assert!(!Pos::new(0, 0).is_adjacent(Pos::new(1, 1)));
    /// ```
    pub fn is_adjacent(self, other: Pos) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        dx + dy == 1
    }

    /// The four edge neighbours: up, down, left, right
    pub fn neighbors(self) -> [Pos; 4] {
        [
            self.offset(0, 1),
            self.offset(0, -1),
            self.offset(-1, 0),
            self.offset(1, 0),
        ]
    }
}

/// Line direction on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Along a row (varying x)
    Horizontal,
    /// Along a column (varying y)
    Vertical,
}

impl Axis {
    /// Unit step `(dx, dy)` along this axis
    pub const fn unit(self) -> (i16, i16) {
        match self {
            Axis::Horizontal => (1, 0),
            Axis::Vertical => (0, 1),
        }
    }

    pub const fn other(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Special ability carried by a tile
///
/// - **None**: plain tile
/// - **RowClear**: when matched, destroys its entire row
/// - **ColumnClear**: when matched, destroys its entire column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Power {
    #[default]
    None,
    RowClear,
    ColumnClear,
}

impl Power {
    /// The line this power detonates along
    pub const fn axis(self) -> Option<Axis> {
        match self {
            Power::None => None,
            Power::RowClear => Some(Axis::Horizontal),
            Power::ColumnClear => Some(Axis::Vertical),
        }
    }

    /// The other orientation (`None` stays `None`)
    pub const fn opposite(self) -> Self {
        match self {
            Power::None => Power::None,
            Power::RowClear => Power::ColumnClear,
            Power::ColumnClear => Power::RowClear,
        }
    }

    pub const fn is_some(self) -> bool {
        !matches!(self, Power::None)
    }

    /// Parse power from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_match3_types::Power;
    ///
    /// assert_eq!(Power::from_str("row"), Some(Power::RowClear));
    /// assert_eq!(Power::from_str("Column"), Some(Power::ColumnClear));
    /// assert_eq!(Power::from_str("none"), Some(Power::None));
    /// assert_eq!(Power::from_str("bomb"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(Power::None),
            "row" | "rowclear" => Some(Power::RowClear),
            "column" | "col" | "columnclear" => Some(Power::ColumnClear),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Power::None => "none",
            Power::RowClear => "row",
            Power::ColumnClear => "column",
        }
    }
}

/// The value stored in one board cell
///
/// A tile has no identity beyond its cell: swaps exchange values between
/// cells and a refill overwrites the value in place. Destroyed cells keep a
/// tile value with `destroyed = true` and the [`EMPTY_TYPE_ID`] sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub type_id: u8,
    pub power: Power,
    pub destroyed: bool,
}

impl Tile {
    /// Destroyed slot awaiting refill
    pub const EMPTY: Tile = Tile {
        type_id: EMPTY_TYPE_ID,
        power: Power::None,
        destroyed: true,
    };

    pub const fn new(type_id: u8, power: Power) -> Self {
        Self {
            type_id,
            power,
            destroyed: false,
        }
    }

    /// Live tile without a power
    pub const fn plain(type_id: u8) -> Self {
        Self::new(type_id, Power::None)
    }

    pub const fn is_live(&self) -> bool {
        !self.destroyed
    }

    /// True when both tiles are live and share a `type_id`
    pub fn matches(&self, other: &Tile) -> bool {
        self.is_live() && other.is_live() && self.type_id == other.type_id
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::EMPTY
    }
}

/// A surviving tile relocated by gravity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DropMove {
    pub from: Pos,
    pub to: Pos,
}

/// A freshly generated tile written into a destroyed cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Refill {
    pub pos: Pos,
    pub tile: Tile,
}

/// Sub-phase of an active resolution sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Matching,
    Clearing,
    Dropping,
    Refilling,
}

/// Resolver state machine phase
///
/// `Idle → SwapPending → (Reverting → Idle) | (Resolving(..) → ... → Idle)`,
/// with `GameOver` terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    SwapPending,
    Resolving(Stage),
    Reverting,
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::SwapPending => "swapPending",
            Phase::Resolving(Stage::Matching) => "matching",
            Phase::Resolving(Stage::Clearing) => "clearing",
            Phase::Resolving(Stage::Dropping) => "dropping",
            Phase::Resolving(Stage::Refilling) => "refilling",
            Phase::Reverting => "reverting",
            Phase::GameOver => "gameOver",
        }
    }

    /// True while a swap or cascade is in flight
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            Phase::SwapPending | Phase::Resolving(_) | Phase::Reverting
        )
    }
}

/// Player-facing actions produced by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Move the cursor one cell toward higher y
    CursorUp,
    /// Move the cursor one cell toward lower y
    CursorDown,
    CursorLeft,
    CursorRight,
    /// Select the cell under the cursor (or swap with the selection)
    Select,
    /// Drop the current selection
    Cancel,
    /// Start a new session on a fresh board
    Restart,
}

impl InputAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_match3_types::InputAction;
    ///
    /// assert_eq!(InputAction::from_str("select"), Some(InputAction::Select));
    /// assert_eq!(InputAction::from_str("cursorLeft"), Some(InputAction::CursorLeft));
    /// assert_eq!(InputAction::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cursorup" => Some(InputAction::CursorUp),
            "cursordown" => Some(InputAction::CursorDown),
            "cursorleft" => Some(InputAction::CursorLeft),
            "cursorright" => Some(InputAction::CursorRight),
            "select" => Some(InputAction::Select),
            "cancel" => Some(InputAction::Cancel),
            "restart" => Some(InputAction::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputAction::CursorUp => "cursorUp",
            InputAction::CursorDown => "cursorDown",
            InputAction::CursorLeft => "cursorLeft",
            InputAction::CursorRight => "cursorRight",
            InputAction::Select => "select",
            InputAction::Cancel => "cancel",
            InputAction::Restart => "restart",
        }
    }
}
