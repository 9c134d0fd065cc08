//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::InputAction`] and turns
//! cursor actions into swap requests. Whether a request is honoured is the
//! resolver's decision; this crate only tracks the cursor and selection.

pub mod cursor;
pub mod map;

pub use tui_match3_types as types;

pub use cursor::Cursor;
pub use map::{handle_key_event, should_quit};
