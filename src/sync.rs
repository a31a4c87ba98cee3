//! Projection of the authoritative board model onto the grid's visual
//! layers: the full piece refresh plus the check and last-move markers.

use crate::grid::{HighlightVisual, PieceVisual, SquareGrid};
use crate::rules::{Move, PieceColor, Position, Rules};

/// Full refresh of the piece layer from the rules engine's occupancy.
///
/// Clears every square first, then sets each from the model. Always a full
/// O(64) pass; the board is small and refresh is not latency-critical, so
/// there is no incremental diffing. Runs after every committed move and
/// after every model replacement.
pub fn refresh(grid: &mut SquareGrid, rules: &dyn Rules) {
    for pos in Position::all() {
        grid.set_piece(pos, None);
    }
    for pos in Position::all() {
        grid.set_piece(pos, rules.piece_at(pos).map(PieceVisual::of));
    }
}

/// Draws the check marker on whichever king (if any) is in check.
///
/// Painted after the last-move highlight so that on a shared square the
/// check marker wins the single highlight slot.
pub fn paint_check(grid: &mut SquareGrid, rules: &dyn Rules) {
    for color in [PieceColor::White, PieceColor::Black] {
        if rules.in_check(color) {
            if let Some(king) = rules.king_square(color) {
                grid.set_highlight(king, Some(HighlightVisual::Check));
            }
        }
    }
}

/// Highlights both endpoints of the most recently committed move.
pub fn paint_last_move(grid: &mut SquareGrid, mv: &Move) {
    grid.set_highlight(mv.from, Some(HighlightVisual::LastMove));
    grid.set_highlight(mv.to, Some(HighlightVisual::LastMove));
}
