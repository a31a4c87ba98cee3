//! Interactive chess board controller.
//!
//! The library half of the application: the square grid visual model, the
//! click-driven selection state machine, the move animator with its
//! commit-on-completion ordering contract, the board refresh projection,
//! the endgame flow, and the seam to the chess rules engine. The `tui`
//! module renders all of it in a terminal; everything below it is
//! UI-framework independent and drives identically under test.

pub mod animator;
pub mod app;
pub mod engine;
pub mod grid;
pub mod rules;
pub mod selection;
pub mod sound;
pub mod sync;
pub mod tui;

pub use app::{App, AppMode, Phase};
pub use engine::ChessEngine;
pub use grid::{HighlightVisual, PieceVisual, SquareGrid};
pub use rules::{Endgame, EndgameKind, Move, Piece, PieceColor, PieceKind, Position, Rules};
