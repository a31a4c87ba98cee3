//! # Selection Controller
//!
//! Click-driven state machine over the board squares. Two states:
//!
//! - **Idle**: nothing selected.
//! - **Selected**: an origin square plus a map of destination squares to
//!   the legal move bound to each. The map entries are the transient
//!   per-destination bindings; they never outlive the selection that
//!   created them.
//!
//! Transitions, driven by [`SelectionController::handle_click`]:
//!
//! 1. Idle + click on a side-to-move piece with legal moves: select it,
//!    highlight the origin and every destination (captures get a distinct
//!    marker), bind each destination to its move.
//! 2. Selected + click on the origin: clear everything, back to Idle.
//! 3. Selected + click on a non-destination square: discard the selection
//!    and re-evaluate the click as rule (1), which may immediately
//!    reselect.
//! 4. Selected + click on a destination: hand the bound move to the
//!    caller for commit. Highlights and bindings are deliberately left in
//!    place; the commit lifecycle tears them down on animation completion,
//!    avoiding a visible flicker between clearing and redrawing.
//!
//! Clicks on empty squares, opponent pieces, or pieces without legal moves
//! are silent no-ops.

use std::collections::HashMap;

use crate::grid::{HighlightVisual, SquareGrid};
use crate::rules::{Move, Position, Rules};
use crate::sync;

/// Current selection, at most one live at a time.
pub enum SelectionState {
    Idle,
    Selected {
        origin: Position,
        targets: HashMap<Position, Move>,
    },
}

/// What a click resolved to.
#[derive(Debug, PartialEq)]
pub enum ClickAction {
    /// Nothing to commit; selection state and highlights already updated.
    None,
    /// A destination was clicked: commit this move.
    Commit(Move),
}

pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    pub fn new() -> Self {
        Self {
            state: SelectionState::Idle,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn is_selected(&self) -> bool {
        matches!(self.state, SelectionState::Selected { .. })
    }

    /// Number of live destination bindings.
    pub fn binding_count(&self) -> usize {
        match &self.state {
            SelectionState::Idle => 0,
            SelectionState::Selected { targets, .. } => targets.len(),
        }
    }

    /// Resolves a square click against the current state.
    pub fn handle_click(
        &mut self,
        pos: Position,
        rules: &dyn Rules,
        grid: &mut SquareGrid,
    ) -> ClickAction {
        match &self.state {
            SelectionState::Selected { origin, .. } if *origin == pos => {
                // Same tile clicked twice: deselect.
                self.clear(grid, rules);
                ClickAction::None
            }
            SelectionState::Selected { targets, .. } if targets.contains_key(&pos) => {
                // Teardown is deferred to the commit lifecycle.
                ClickAction::Commit(targets[&pos].clone())
            }
            _ => {
                self.clear(grid, rules);
                self.try_select(pos, rules, grid);
                ClickAction::None
            }
        }
    }

    /// Attempts rule (1): select `pos` if it holds a side-to-move piece
    /// with at least one legal move.
    fn try_select(&mut self, pos: Position, rules: &dyn Rules, grid: &mut SquareGrid) {
        match rules.piece_at(pos) {
            Some(piece) if piece.color == rules.side_to_move() => {}
            _ => return,
        }

        let moves = rules.legal_moves_from(pos);
        if moves.is_empty() {
            return;
        }

        grid.set_highlight(pos, Some(HighlightVisual::SelectedOrigin));
        let mut targets = HashMap::with_capacity(moves.len());
        for mv in moves {
            let marker = if mv.capture.is_some() {
                HighlightVisual::CaptureTarget
            } else {
                HighlightVisual::QuietTarget
            };
            grid.set_highlight(mv.to, Some(marker));
            targets.insert(mv.to, mv);
        }
        self.state = SelectionState::Selected {
            origin: pos,
            targets,
        };
    }

    /// Drops the selection and all transient bindings, wipes every
    /// highlight layer, then repaints the check marker from model truth
    /// (the marker must survive selection churn).
    pub fn clear(&mut self, grid: &mut SquareGrid, rules: &dyn Rules) {
        self.state = SelectionState::Idle;
        grid.clear_highlights();
        sync::paint_check(grid, rules);
    }
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fake::FakeRules;
    use crate::rules::{PieceColor, PieceKind};

    fn e2() -> Position {
        Position::new(4, 1)
    }

    fn scripted_start() -> FakeRules {
        let mut rules = FakeRules::starting();
        rules.script_move(e2(), Position::new(4, 2), "e3");
        rules.script_move(e2(), Position::new(4, 3), "e4");
        rules
    }

    #[test]
    fn selecting_a_piece_highlights_origin_and_every_destination() {
        let rules = scripted_start();
        let mut grid = SquareGrid::new();
        let mut sel = SelectionController::new();

        let action = sel.handle_click(e2(), &rules, &mut grid);
        assert_eq!(action, ClickAction::None);
        assert!(sel.is_selected());
        assert_eq!(sel.binding_count(), 2);
        // One origin highlight plus one per destination.
        assert_eq!(grid.highlight_count(), 3);
        assert_eq!(
            grid.square(e2()).highlight(),
            Some(HighlightVisual::SelectedOrigin)
        );
        assert_eq!(
            grid.square(Position::new(4, 3)).highlight(),
            Some(HighlightVisual::QuietTarget)
        );
    }

    #[test]
    fn capture_destinations_get_a_distinct_marker() {
        let mut rules = scripted_start();
        rules.script_capture(e2(), Position::new(3, 2), PieceKind::Pawn, "exd3");

        let mut grid = SquareGrid::new();
        let mut sel = SelectionController::new();
        sel.handle_click(e2(), &rules, &mut grid);

        assert_eq!(
            grid.square(Position::new(3, 2)).highlight(),
            Some(HighlightVisual::CaptureTarget)
        );
        assert_eq!(
            grid.square(Position::new(4, 3)).highlight(),
            Some(HighlightVisual::QuietTarget)
        );
    }

    #[test]
    fn clicking_the_origin_again_returns_to_idle() {
        let rules = scripted_start();
        let mut grid = SquareGrid::new();
        let mut sel = SelectionController::new();

        sel.handle_click(e2(), &rules, &mut grid);
        sel.handle_click(e2(), &rules, &mut grid);

        assert!(!sel.is_selected());
        assert_eq!(sel.binding_count(), 0);
        assert_eq!(grid.highlight_count(), 0);
    }

    #[test]
    fn clicking_another_own_piece_reselects_immediately() {
        let mut rules = scripted_start();
        let d2 = Position::new(3, 1);
        rules.script_move(d2, Position::new(3, 3), "d4");

        let mut grid = SquareGrid::new();
        let mut sel = SelectionController::new();
        sel.handle_click(e2(), &rules, &mut grid);
        sel.handle_click(d2, &rules, &mut grid);

        assert!(sel.is_selected());
        assert_eq!(sel.binding_count(), 1);
        assert_eq!(
            grid.square(d2).highlight(),
            Some(HighlightVisual::SelectedOrigin)
        );
        assert_eq!(grid.square(e2()).highlight(), None, "old selection fully discarded");
    }

    #[test]
    fn empty_and_opponent_squares_are_silent_noops() {
        let rules = scripted_start();
        let mut grid = SquareGrid::new();
        let mut sel = SelectionController::new();

        sel.handle_click(Position::new(4, 4), &rules, &mut grid);
        assert!(!sel.is_selected());
        assert_eq!(grid.highlight_count(), 0);

        // Black piece while White is to move.
        sel.handle_click(Position::new(4, 6), &rules, &mut grid);
        assert!(!sel.is_selected());
        assert_eq!(grid.highlight_count(), 0);
    }

    #[test]
    fn a_piece_without_legal_moves_is_not_selectable() {
        // Starting layout with no scripted moves at all.
        let rules = FakeRules::starting();
        let mut grid = SquareGrid::new();
        let mut sel = SelectionController::new();

        sel.handle_click(Position::new(0, 0), &rules, &mut grid);
        assert!(!sel.is_selected());
        assert_eq!(grid.highlight_count(), 0);
    }

    #[test]
    fn destination_click_hands_back_the_bound_move_and_keeps_highlights() {
        let rules = scripted_start();
        let mut grid = SquareGrid::new();
        let mut sel = SelectionController::new();

        sel.handle_click(e2(), &rules, &mut grid);
        let action = sel.handle_click(Position::new(4, 3), &rules, &mut grid);

        match action {
            ClickAction::Commit(mv) => assert_eq!(mv.san, "e4"),
            other => panic!("expected commit, got {:?}", other),
        }
        // Teardown happens at commit completion, not here.
        assert!(sel.is_selected());
        assert_eq!(grid.highlight_count(), 3);
    }

    #[test]
    fn clearing_repaints_the_check_marker() {
        let mut rules = scripted_start();
        rules.checked = Some(PieceColor::White);
        let mut grid = SquareGrid::new();
        let mut sel = SelectionController::new();

        sel.handle_click(e2(), &rules, &mut grid);
        sel.handle_click(e2(), &rules, &mut grid);

        let e1 = Position::new(4, 0);
        assert_eq!(grid.highlight_count(), 1);
        assert_eq!(grid.square(e1).highlight(), Some(HighlightVisual::Check));
    }
}
