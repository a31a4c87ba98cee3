//! # Input Handling Module
//!
//! Keyboard input for both screens. Board play itself is mouse-driven;
//! the keys cover the application-level actions (quit, new game, exports)
//! and the endgame dialog's two choices.

use crossterm::event::KeyCode;

use crate::app::{App, AppMode};

/// Handle a key press for the current application mode.
pub fn handle_key_press(app: &mut App, key: KeyCode) {
    match app.mode {
        AppMode::GameOver => match key {
            KeyCode::Enter | KeyCode::Char('n') => app.start_new_game(),
            KeyCode::Esc => app.dismiss_endgame(),
            KeyCode::Char('q') => app.should_quit = true,
            _ => {}
        },
        AppMode::InGame => match key {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('n') => app.start_new_game(),
            KeyCode::Char('f') => app.show_fen(),
            KeyCode::Char('p') => app.show_movetext(),
            KeyCode::Esc => app.notice = None,
            _ => {}
        },
    }
}
