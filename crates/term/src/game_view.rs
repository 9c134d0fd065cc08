//! GameView: maps a [`BoardSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Board row 0 is drawn at the bottom of the frame. Each cell is two columns
//! wide: the tile glyph followed by its power marker (`=` row, `‖` column).

use crate::core::BoardSnapshot;
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{Phase, Pos, Power};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Session numbers shown next to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HudView {
    pub score: u32,
    pub high_score: u32,
    /// `None` for an untimed session.
    pub remaining_ms: Option<u32>,
}

/// Cursor cell and the marked tile, in board coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorView {
    pub pos: Pos,
    pub selection: Option<Pos>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Terminal renderer for a match-3 board.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            cell_w: 2,
            anchor_y: AnchorY::Center,
        }
    }
}

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const CURSOR_BG: Rgb = Rgb::new(70, 70, 95);
const SELECTED_BG: Rgb = Rgb::new(120, 100, 40);

const GLYPHS: [char; 8] = ['●', '◆', '▲', '■', '★', '♥', '♣', '♠'];
const PALETTE: [Rgb; 6] = [
    Rgb::new(220, 80, 80),
    Rgb::new(80, 200, 120),
    Rgb::new(80, 140, 230),
    Rgb::new(240, 210, 80),
    Rgb::new(200, 120, 220),
    Rgb::new(80, 220, 220),
];

/// Top-left of the board frame for a given layout.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
    rows: u16,
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render into an existing framebuffer, resizing it to `viewport`.
    pub fn render_into(
        &self,
        snap: &BoardSnapshot,
        hud: &HudView,
        cursor: Option<&CursorView>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        let w = snap.width.saturating_mul(self.cell_w).saturating_add(2);
        let h = snap.height.saturating_add(2);
        let frame = Frame {
            x: viewport.width.saturating_sub(w) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(h) / 2,
                AnchorY::Top => 0,
            },
            w,
            h,
            rows: snap.height,
        };

        let border = CellStyle::new(Rgb::new(200, 200, 200), Rgb::BLACK);
        fb.draw_box(frame.x, frame.y, frame.w, frame.h, border);

        for y in 0..snap.height {
            for x in 0..snap.width {
                let pos = Pos::new(x as i16, y as i16);
                let bg = match cursor {
                    Some(c) if c.selection == Some(pos) => SELECTED_BG,
                    Some(c) if c.pos == pos => CURSOR_BG,
                    _ => BOARD_BG,
                };
                let value = snap.cell(x, y).unwrap_or(0);
                let power = snap.power(x, y).unwrap_or_default();
                self.draw_cell(fb, frame, x, y, value, power, bg);
            }
        }

        self.draw_side_panel(fb, snap, hud, viewport, frame);

        if snap.phase == Phase::GameOver {
            self.draw_overlay_text(fb, frame, "GAME OVER");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &BoardSnapshot,
        hud: &HudView,
        cursor: Option<&CursorView>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, hud, cursor, viewport, &mut fb);
        fb
    }

    /// Screen position of board cell `(x, y)`.
    fn cell_origin(&self, frame: Frame, x: u16, y: u16) -> (u16, u16) {
        let px = frame.x + 1 + x * self.cell_w;
        let py = frame.y + 1 + (frame.rows - 1 - y);
        (px, py)
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_cell(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        x: u16,
        y: u16,
        value: u8,
        power: Power,
        bg: Rgb,
    ) {
        let (px, py) = self.cell_origin(frame, x, y);
        let Some(type_id) = value.checked_sub(1) else {
            let style = CellStyle::new(Rgb::new(90, 90, 100), bg).dim();
            fb.fill_rect(px, py, self.cell_w, 1, ' ', style);
            fb.put_char(px, py, '·', style);
            return;
        };

        let idx = type_id as usize;
        let style = CellStyle::new(PALETTE[idx % PALETTE.len()], bg).bold();
        fb.fill_rect(px, py, self.cell_w, 1, ' ', style);
        fb.put_char(px, py, GLYPHS[idx % GLYPHS.len()], style);
        if self.cell_w > 1 {
            let marker = match power {
                Power::None => ' ',
                Power::RowClear => '=',
                Power::ColumnClear => '‖',
            };
            let marker_style = CellStyle::new(Rgb::new(255, 255, 255), bg).bold();
            fb.put_char(px + 1, py, marker, marker_style);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &BoardSnapshot,
        hud: &HudView,
        viewport: Viewport,
        frame: Frame,
    ) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::BLACK);

        let mut y = frame.y;
        fb.put_str(panel_x, y, "SCORE", label);
        fb.put_u32(panel_x, y + 1, hud.score, value);
        y = y.saturating_add(3);

        fb.put_str(panel_x, y, "HIGH", label);
        fb.put_u32(panel_x, y + 1, hud.high_score, value);
        y = y.saturating_add(3);

        fb.put_str(panel_x, y, "TIME", label);
        match hud.remaining_ms {
            Some(ms) => {
                let secs = ms.div_ceil(1000);
                let end = fb.put_u32(panel_x, y + 1, secs / 60, value);
                let end = fb.put_str(end, y + 1, ":", value);
                if secs % 60 < 10 {
                    fb.put_char(end, y + 1, '0', value);
                    fb.put_u32(end + 1, y + 1, secs % 60, value);
                } else {
                    fb.put_u32(end, y + 1, secs % 60, value);
                }
            }
            None => {
                fb.put_str(panel_x, y + 1, "--", value);
            }
        }
        y = y.saturating_add(3);

        if snap.combo > 0 {
            fb.put_str(panel_x, y, "COMBO", label);
            let end = fb.put_str(panel_x, y + 1, "x", value);
            fb.put_u32(end, y + 1, snap.combo, value);
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, frame: Frame, text: &str) {
        let mid_y = frame.y.saturating_add(frame.h / 2);
        let text_w = text.chars().count() as u16;
        let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::BLACK).bold();
        fb.put_str(x, mid_y, text, style);

        let hint = "R restart";
        let hx = frame.x.saturating_add(frame.w.saturating_sub(hint.len() as u16) / 2);
        fb.put_str(hx, mid_y.saturating_add(1), hint, style.dim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Board;

    #[test]
    fn power_markers_follow_glyph() {
        let mut board = Board::from_rows(&[[0u8, 1]]);
        board.set(Pos::new(0, 0), crate::types::Tile::new(0, Power::RowClear));
        board.set(Pos::new(1, 0), crate::types::Tile::new(1, Power::ColumnClear));
        let snap = BoardSnapshot::from_board(&board);

        let fb = GameView::default().render(&snap, &HudView::default(), None, Viewport::new(6, 3));
        assert_eq!(fb.row_string(1), "│●=◆‖│");
    }

    #[test]
    fn busy_phase_does_not_draw_overlay() {
        let mut snap = BoardSnapshot::from_board(&Board::from_rows(&[[0u8; 4]; 4]));
        snap.phase = Phase::Reverting;
        let fb = GameView::default().render(&snap, &HudView::default(), None, Viewport::new(10, 6));
        assert!(!(0..6).any(|y| fb.row_string(y).contains("GAME")));
    }
}
