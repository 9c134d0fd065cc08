//! Keyboard cursor and two-step tile selection.
//!
//! Selecting a tile marks it; selecting it again clears the mark. Selecting
//! an edge-adjacent tile while one is marked yields a swap request. Selecting
//! a non-adjacent tile moves the mark there.

use crate::types::{InputAction, Pos};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pos: Pos,
    selection: Option<Pos>,
    width: u16,
    height: u16,
}

impl Cursor {
    /// Starts at the bottom-left cell
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            pos: Pos::new(0, 0),
            selection: None,
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn selection(&self) -> Option<Pos> {
        self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Move by `(dx, dy)`, clamped to the board
    pub fn move_by(&mut self, dx: i16, dy: i16) {
        let max_x = self.width as i16 - 1;
        let max_y = self.height as i16 - 1;
        self.pos = Pos::new(
            (self.pos.x + dx).clamp(0, max_x),
            (self.pos.y + dy).clamp(0, max_y),
        );
    }

    /// Select the tile under the cursor; returns a swap pair when one forms
    pub fn select(&mut self) -> Option<(Pos, Pos)> {
        match self.selection {
            None => {
                self.selection = Some(self.pos);
                None
            }
            Some(sel) if sel == self.pos => {
                self.selection = None;
                None
            }
            Some(sel) if sel.is_adjacent(self.pos) => {
                self.selection = None;
                Some((sel, self.pos))
            }
            Some(_) => {
                self.selection = Some(self.pos);
                None
            }
        }
    }

    /// Apply a cursor action; `Restart` is left to the caller
    pub fn apply(&mut self, action: InputAction) -> Option<(Pos, Pos)> {
        match action {
            InputAction::CursorUp => self.move_by(0, 1),
            InputAction::CursorDown => self.move_by(0, -1),
            InputAction::CursorLeft => self.move_by(-1, 0),
            InputAction::CursorRight => self.move_by(1, 0),
            InputAction::Select => return self.select(),
            InputAction::Cancel => self.clear_selection(),
            InputAction::Restart => {}
        }
        None
    }

    /// Return to the starting cell with nothing selected
    pub fn reset(&mut self) {
        self.pos = Pos::new(0, 0);
        self.selection = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_clamps_to_board() {
        let mut cursor = Cursor::new(3, 2);
        cursor.apply(InputAction::CursorLeft);
        cursor.apply(InputAction::CursorDown);
        assert_eq!(cursor.pos(), Pos::new(0, 0));
        for _ in 0..5 {
            cursor.apply(InputAction::CursorRight);
            cursor.apply(InputAction::CursorUp);
        }
        assert_eq!(cursor.pos(), Pos::new(2, 1));
    }

    #[test]
    fn selecting_twice_deselects() {
        let mut cursor = Cursor::new(4, 4);
        assert_eq!(cursor.apply(InputAction::Select), None);
        assert_eq!(cursor.selection(), Some(Pos::new(0, 0)));
        assert_eq!(cursor.apply(InputAction::Select), None);
        assert_eq!(cursor.selection(), None);
    }

    #[test]
    fn adjacent_selection_yields_swap() {
        let mut cursor = Cursor::new(4, 4);
        cursor.apply(InputAction::Select);
        cursor.apply(InputAction::CursorUp);
        assert_eq!(
            cursor.apply(InputAction::Select),
            Some((Pos::new(0, 0), Pos::new(0, 1)))
        );
        assert_eq!(cursor.selection(), None);
    }

    #[test]
    fn distant_selection_moves_mark() {
        let mut cursor = Cursor::new(4, 4);
        cursor.apply(InputAction::Select);
        cursor.apply(InputAction::CursorUp);
        cursor.apply(InputAction::CursorRight);
        assert_eq!(cursor.apply(InputAction::Select), None);
        assert_eq!(cursor.selection(), Some(Pos::new(1, 1)));
    }

    #[test]
    fn cancel_clears_selection() {
        let mut cursor = Cursor::new(4, 4);
        cursor.apply(InputAction::Select);
        cursor.apply(InputAction::Cancel);
        assert_eq!(cursor.selection(), None);
    }
}
