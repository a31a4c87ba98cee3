//! # Terminal User Interface Module
//!
//! This module provides the terminal front end for the board controller,
//! built with Ratatui and crossterm. It owns terminal setup and teardown
//! and the single event loop that everything runs on: clicks, key presses,
//! the per-frame animation tick and rendering.
//!
//! The loop polls input with a short timeout so the 300 ms move animation
//! renders smoothly; every iteration first advances the animation (which
//! may run the commit completion) and then redraws.

use std::time::Instant;
use std::{io, time::Duration};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};

use crate::app::App;

pub mod input;
pub mod layout;
pub mod mouse;
pub mod widgets;

/// Main entry point for the terminal user interface.
///
/// Initializes the terminal, runs the event loop until the app asks to
/// quit, and restores the terminal on the way out.
///
/// # Errors
/// Returns an error if terminal initialization, event handling, or
/// cleanup fails.
pub fn run(app: &mut App) -> io::Result<()> {
    let mut terminal = init_terminal()?;

    loop {
        if app.should_quit {
            break;
        }

        app.tick(Instant::now());

        terminal.draw(|f| widgets::render(app, f, Instant::now()))?;

        if event::poll(Duration::from_millis(33))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press {
                        input::handle_key_press(app, key.code);
                    }
                }
                Event::Mouse(mouse) => {
                    let terminal_size = terminal.size()?;
                    let terminal_rect = Rect::new(0, 0, terminal_size.width, terminal_size.height);
                    mouse::handle_mouse_event(app, mouse.kind, mouse.column, mouse.row, terminal_rect);
                }
                _ => {}
            }
        }
    }

    restore_terminal(&mut terminal)
}

/// Initializes the terminal for raw mode operation: alternate screen,
/// mouse capture, hidden cursor.
fn init_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    execute!(
        handle,
        EnterAlternateScreen,
        EnableMouseCapture,
        crossterm::cursor::Hide
    )?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Restores the terminal to normal operation mode.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    terminal.show_cursor()?;
    disable_raw_mode()?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    execute!(
        handle,
        LeaveAlternateScreen,
        DisableMouseCapture,
        crossterm::cursor::Show
    )?;
    Ok(())
}
