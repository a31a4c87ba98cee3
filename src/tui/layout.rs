//! Board geometry for the terminal: fixed square dimensions, the split
//! between the board panel and the info panel, and the mapping between
//! terminal cells and board positions used by mouse input and the
//! animation overlay.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::rules::Position;

/// Terminal cells per square, horizontally.
pub const SQUARE_WIDTH: u16 = 4;
/// Terminal cells per square, vertically.
pub const SQUARE_HEIGHT: u16 = 2;
/// Outer size of the board frame (8 squares plus the border).
pub const BOARD_FRAME_WIDTH: u16 = 8 * SQUARE_WIDTH + 2;
pub const BOARD_FRAME_HEIGHT: u16 = 8 * SQUARE_HEIGHT + 2;

/// Minimum terminal size the renderer needs; below this the UI shows a
/// resize hint instead of the board.
pub const MIN_WIDTH: u16 = BOARD_FRAME_WIDTH + 2 + 24;
pub const MIN_HEIGHT: u16 = BOARD_FRAME_HEIGHT + 1;

/// Splits the screen into the board panel (frame plus label gutter) and
/// the info panel on the right.
pub fn split_main(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BOARD_FRAME_WIDTH + 2),
            Constraint::Min(24),
        ])
        .split(area);
    (chunks[0], chunks[1])
}

/// The board frame rect at the top-left of the board panel.
pub fn board_frame(panel: Rect) -> Rect {
    Rect {
        x: panel.x,
        y: panel.y,
        width: BOARD_FRAME_WIDTH.min(panel.width),
        height: BOARD_FRAME_HEIGHT.min(panel.height),
    }
}

/// Screen rect of one square inside the frame.
pub fn square_rect(frame: Rect, pos: Position) -> Rect {
    let row = 7 - pos.rank() as u16;
    Rect {
        x: frame.x + 1 + pos.file() as u16 * SQUARE_WIDTH,
        y: frame.y + 1 + row * SQUARE_HEIGHT,
        width: SQUARE_WIDTH,
        height: SQUARE_HEIGHT,
    }
}

/// Maps a terminal cell back to the square under it. Frame border and
/// label cells resolve to `None`.
pub fn position_at(frame: Rect, col: u16, row: u16) -> Option<Position> {
    let inner_x = frame.x + 1;
    let inner_y = frame.y + 1;
    if col < inner_x || row < inner_y {
        return None;
    }
    let file = (col - inner_x) / SQUARE_WIDTH;
    let board_row = (row - inner_y) / SQUARE_HEIGHT;
    if file < 8 && board_row < 8 {
        Some(Position::new(file as u8, (7 - board_row) as u8))
    } else {
        None
    }
}

/// Screen cell of the overlay glyph for fractional board coordinates
/// (row 0 = eighth rank). The glyph sits one cell into the square, where
/// the resting piece glyph is drawn.
pub fn overlay_cell(frame: Rect, row: f32, col: f32) -> (u16, u16) {
    let x = frame.x + 1 + (col * SQUARE_WIDTH as f32).round() as u16 + 1;
    let y = frame.y + 1 + (row * SQUARE_HEIGHT as f32).round() as u16;
    (x, y)
}
