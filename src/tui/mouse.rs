//! # Mouse Module
//!
//! Maps mouse events onto board squares. Only left clicks matter here;
//! everything else falls through. Clicks outside the board (frame border,
//! labels, side panels) are ignored, and the app itself ignores square
//! clicks while an animation is in flight or the endgame dialog is up.

use std::time::Instant;

use crossterm::event::{MouseButton, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::App;
use crate::tui::layout;

/// Handle mouse events for the application.
pub fn handle_mouse_event(app: &mut App, kind: MouseEventKind, col: u16, row: u16, terminal_size: Rect) {
    match kind {
        MouseEventKind::Down(MouseButton::Left) => {
            handle_click(app, col, row, terminal_size);
        }
        _ => {}
    }
}

fn handle_click(app: &mut App, col: u16, row: u16, terminal_size: Rect) {
    let (board_panel, _) = layout::split_main(terminal_size);
    let frame = layout::board_frame(board_panel);
    if let Some(pos) = layout::position_at(frame, col, row) {
        app.handle_square_click(pos, Instant::now());
    }
}
