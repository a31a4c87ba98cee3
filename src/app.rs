//! # Application State and Commit Sequencing
//!
//! This module owns the pieces of the board controller and enforces the
//! ordering contract between them. All input, the animation completion and
//! cue playback run on the single UI loop; nothing else touches board
//! state, so the sequencing below is the whole concurrency story:
//!
//! - A square click reaches the selection controller only while no
//!   animation is in flight; the single [`AnimationJob`] is the system's
//!   only backpressure, and it is enough because moves are never queued.
//! - [`App::tick`] is the one "on animation complete" transition: it
//!   applies the move to the rules engine (the sole model mutation in the
//!   system), refreshes the grid, repaints highlights, plays the cue and
//!   checks for an endgame, in that order.
//! - Assigning a new rules handle with [`App::set_rules`] is defined as a
//!   full reset and always wins over a pending completion.
//!
//! [`AnimationJob`]: crate::animator::AnimationJob

use std::time::Instant;

use crate::animator::MoveAnimator;
use crate::grid::SquareGrid;
use crate::rules::{Endgame, Move, PieceColor, Position, Rules};
use crate::selection::{ClickAction, SelectionController};
use crate::sound::SoundEngine;
use crate::sync;

/// Which top-level screen is active. The endgame dialog is modal: board
/// input is ignored while it is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    InGame,
    GameOver,
}

/// Combined phase of the board state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Selected,
    Animating,
}

/// One committed move as shown in the move-list panel.
#[derive(Debug, Clone)]
pub struct MoveHistoryEntry {
    pub number: u32,
    pub color: PieceColor,
    pub san: String,
}

/// Factory for fresh standard-start rules engines, used by the endgame
/// dialog's "new game" action.
pub type RulesFactory = Box<dyn Fn() -> Box<dyn Rules>>;

pub struct App {
    pub should_quit: bool,
    pub mode: AppMode,
    rules: Box<dyn Rules>,
    new_game: RulesFactory,
    /// Bumped on every rules-handle assignment; animation jobs spawned
    /// under an older epoch are discarded on completion.
    epoch: u64,
    pub grid: SquareGrid,
    pub selection: SelectionController,
    pub animator: MoveAnimator,
    pub move_history: Vec<MoveHistoryEntry>,
    sound: Option<SoundEngine>,
    endgame: Option<Endgame>,
    /// Transient one-line display (FEN or movetext on request).
    pub notice: Option<String>,
}

impl App {
    pub fn new(rules: Box<dyn Rules>, new_game: RulesFactory, muted: bool) -> Self {
        let mut grid = SquareGrid::new();
        sync::refresh(&mut grid, &*rules);
        sync::paint_check(&mut grid, &*rules);
        let sound = if muted { None } else { SoundEngine::new() };
        Self {
            should_quit: false,
            mode: AppMode::InGame,
            rules,
            new_game,
            epoch: 0,
            grid,
            selection: SelectionController::new(),
            animator: MoveAnimator::new(),
            move_history: Vec::new(),
            sound,
            endgame: None,
            notice: None,
        }
    }

    pub fn rules(&self) -> &dyn Rules {
        &*self.rules
    }

    pub fn endgame(&self) -> Option<&Endgame> {
        self.endgame.as_ref()
    }

    pub fn phase(&self) -> Phase {
        if self.animator.is_active() {
            Phase::Animating
        } else if self.selection.is_selected() {
            Phase::Selected
        } else {
            Phase::Idle
        }
    }

    /// Routes a board click. Ignored outright while the endgame dialog is
    /// up or an animation is in flight (board input is disabled for the
    /// job's entire lifetime).
    pub fn handle_square_click(&mut self, pos: Position, now: Instant) {
        if self.mode != AppMode::InGame || self.animator.is_active() {
            return;
        }
        match self.selection.handle_click(pos, &*self.rules, &mut self.grid) {
            ClickAction::None => {}
            ClickAction::Commit(mv) => self.commit(mv, now),
        }
    }

    /// Starts the animated commit of a bound move. The move-committed
    /// notification (the SAN entry for the move list) is emitted here, at
    /// commit start; the model itself mutates only on completion.
    fn commit(&mut self, mv: Move, now: Instant) {
        self.move_history.push(MoveHistoryEntry {
            number: self.move_history.len() as u32 + 1,
            color: self.rules.side_to_move(),
            san: mv.san.clone(),
        });
        self.notice = None;
        self.animator.commit(mv, &mut self.grid, self.epoch, now);
    }

    /// Per-frame advance. Runs the completion sequence when the in-flight
    /// animation has elapsed; otherwise a no-op.
    pub fn tick(&mut self, now: Instant) {
        if let Some(mv) = self.animator.take_completed(now, self.epoch) {
            self.finish_move(mv);
        }
    }

    /// The completion sequence: the only place the model mutates, with
    /// every visual derived from it strictly after the animation ended.
    fn finish_move(&mut self, mv: Move) {
        if self.rules.apply(&mv).is_err() {
            // Not expected for moves sourced from the legal-move query.
            // Repaint from model truth and carry on.
            self.selection.clear(&mut self.grid, &*self.rules);
            sync::refresh(&mut self.grid, &*self.rules);
            return;
        }

        sync::refresh(&mut self.grid, &*self.rules);
        self.selection.clear(&mut self.grid, &*self.rules);
        sync::paint_last_move(&mut self.grid, &mv);
        // Painted last: on a shared square the check marker wins the
        // single highlight slot.
        sync::paint_check(&mut self.grid, &*self.rules);

        if let Some(sound) = &self.sound {
            let to_move = self.rules.side_to_move();
            if self.rules.in_check(to_move) {
                sound.play_check();
            } else {
                sound.play_move(to_move);
            }
        }

        self.check_endgame();
    }

    /// Terminal-state bridge: polls the rules engine once per committed
    /// move and raises the modal dialog at most once per game.
    fn check_endgame(&mut self) {
        if self.endgame.is_some() {
            return;
        }
        if let Some(end) = self.rules.endgame() {
            self.endgame = Some(end);
            self.mode = AppMode::GameOver;
        }
    }

    /// Replaces the board-model handle. Assignment is defined as a full
    /// reset:
    ///
    /// - any in-flight animation is cancelled and its pending effects are
    ///   discarded (the epoch bump guards against a stale completion),
    /// - all highlights and transient destination bindings are cleared,
    /// - the grid is fully refreshed from the new model,
    /// - move history, endgame state and notices are dropped.
    ///
    /// Post: the controller is in the Idle phase against the new model.
    pub fn set_rules(&mut self, rules: Box<dyn Rules>) {
        self.rules = rules;
        self.epoch += 1;
        self.animator.cancel();
        self.selection.clear(&mut self.grid, &*self.rules);
        sync::refresh(&mut self.grid, &*self.rules);
        self.move_history.clear();
        self.endgame = None;
        self.notice = None;
        self.mode = AppMode::InGame;
    }

    /// Endgame dialog "new game": fresh standard starting position.
    pub fn start_new_game(&mut self) {
        let fresh = (self.new_game)();
        self.set_rules(fresh);
    }

    /// Endgame dialog "close": drop the modal, leave the finished game on
    /// the board. The dialog does not re-arm until the next reset.
    pub fn dismiss_endgame(&mut self) {
        if self.mode == AppMode::GameOver {
            self.mode = AppMode::InGame;
        }
    }

    pub fn show_fen(&mut self) {
        self.notice = Some(self.rules.fen());
    }

    pub fn show_movetext(&mut self) {
        self.notice = Some(self.rules.movetext());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::MOVE_ANIMATION;
    use crate::grid::HighlightVisual;
    use crate::rules::fake::FakeRules;
    use crate::rules::{EndgameKind, PieceKind};
    use std::time::Duration;

    fn e2() -> Position {
        Position::new(4, 1)
    }

    fn e4() -> Position {
        Position::new(4, 3)
    }

    fn scripted_app() -> App {
        let mut rules = FakeRules::starting();
        rules.script_move(e2(), e4(), "e4");
        App::new(
            Box::new(rules),
            Box::new(|| Box::new(FakeRules::starting()) as Box<dyn Rules>),
            true,
        )
    }

    #[test]
    fn model_mutates_only_after_the_animation_completes() {
        let mut app = scripted_app();
        let t0 = Instant::now();

        app.handle_square_click(e2(), t0);
        assert_eq!(app.phase(), Phase::Selected);
        app.handle_square_click(e4(), t0);
        assert_eq!(app.phase(), Phase::Animating);

        // Notification already out, model untouched, origin visual lifted.
        assert_eq!(app.move_history.len(), 1);
        assert_eq!(app.move_history[0].san, "e4");
        assert_eq!(app.move_history[0].color, PieceColor::White);
        assert!(app.rules().piece_at(e4()).is_none());
        assert!(app.grid.square(e2()).piece().is_none());

        app.tick(t0 + Duration::from_millis(150));
        assert!(app.rules().piece_at(e4()).is_none(), "mid-flight tick must not commit");

        app.tick(t0 + MOVE_ANIMATION + Duration::from_millis(10));
        assert_eq!(app.phase(), Phase::Idle);
        assert_eq!(app.rules().piece_at(e4()).unwrap().kind, PieceKind::Pawn);
        assert!(app.rules().piece_at(e2()).is_none());
        assert_eq!(app.rules().side_to_move(), PieceColor::Black);
    }

    #[test]
    fn completion_repaints_exactly_the_last_move_pair() {
        let mut app = scripted_app();
        let t0 = Instant::now();
        app.handle_square_click(e2(), t0);
        app.handle_square_click(e4(), t0);
        app.tick(t0 + MOVE_ANIMATION);

        assert_eq!(app.grid.piece_count(), 32);
        assert_eq!(app.grid.highlight_count(), 2);
        assert_eq!(app.grid.square(e2()).highlight(), Some(HighlightVisual::LastMove));
        assert_eq!(app.grid.square(e4()).highlight(), Some(HighlightVisual::LastMove));
        assert_eq!(app.selection.binding_count(), 0);
    }

    #[test]
    fn board_input_is_disabled_while_a_job_is_in_flight() {
        let mut app = scripted_app();
        let t0 = Instant::now();
        app.handle_square_click(e2(), t0);
        app.handle_square_click(e4(), t0);

        // A click that would normally select a piece is ignored outright.
        app.handle_square_click(Position::new(3, 1), t0 + Duration::from_millis(50));
        assert_eq!(app.phase(), Phase::Animating);
        assert_eq!(app.move_history.len(), 1);
    }

    #[test]
    fn replacing_the_model_mid_animation_wins_over_the_completion() {
        let mut app = scripted_app();
        let t0 = Instant::now();
        app.handle_square_click(e2(), t0);
        app.handle_square_click(e4(), t0);

        app.set_rules(Box::new(FakeRules::starting()));
        assert_eq!(app.phase(), Phase::Idle);
        assert_eq!(app.grid.highlight_count(), 0);
        assert_eq!(app.grid.piece_count(), 32);
        assert_eq!(app.move_history.len(), 0);

        // The stale completion must not leak into the new model.
        app.tick(t0 + MOVE_ANIMATION + Duration::from_millis(10));
        assert!(app.rules().piece_at(e4()).is_none());
        assert!(app.rules().piece_at(e2()).is_some());
    }

    #[test]
    fn replacing_the_model_from_a_live_selection_clears_everything() {
        let mut app = scripted_app();
        app.handle_square_click(e2(), Instant::now());
        assert_eq!(app.phase(), Phase::Selected);

        app.set_rules(Box::new(FakeRules::starting()));
        assert_eq!(app.phase(), Phase::Idle);
        assert_eq!(app.selection.binding_count(), 0);
        assert_eq!(app.grid.highlight_count(), 0);
    }

    #[test]
    fn endgame_dialog_is_single_flight_until_reset() {
        let mut rules = FakeRules::starting();
        rules.script_move(e2(), e4(), "e4");
        rules.end = Some(Endgame {
            kind: EndgameKind::Checkmate,
            winner: Some(PieceColor::White),
        });
        let mut app = App::new(
            Box::new(rules),
            Box::new(|| Box::new(FakeRules::starting()) as Box<dyn Rules>),
            true,
        );

        let t0 = Instant::now();
        app.handle_square_click(e2(), t0);
        app.handle_square_click(e4(), t0);
        app.tick(t0 + MOVE_ANIMATION);

        assert_eq!(app.mode, AppMode::GameOver);
        assert_eq!(app.endgame().unwrap().kind, EndgameKind::Checkmate);

        // Dismissing keeps the finished game; the dialog does not re-fire.
        app.dismiss_endgame();
        assert_eq!(app.mode, AppMode::InGame);
        app.tick(t0 + MOVE_ANIMATION * 2);
        assert_eq!(app.mode, AppMode::InGame);

        // A new game resets the flow entirely.
        app.start_new_game();
        assert_eq!(app.mode, AppMode::InGame);
        assert!(app.endgame().is_none());
        assert_eq!(app.move_history.len(), 0);
        assert_eq!(app.grid.piece_count(), 32);
    }

    #[test]
    fn board_clicks_are_ignored_while_the_dialog_is_up() {
        let mut rules = FakeRules::starting();
        rules.script_move(e2(), e4(), "e4");
        rules.end = Some(Endgame {
            kind: EndgameKind::Stalemate,
            winner: None,
        });
        let mut app = App::new(
            Box::new(rules),
            Box::new(|| Box::new(FakeRules::starting()) as Box<dyn Rules>),
            true,
        );
        let t0 = Instant::now();
        app.handle_square_click(e2(), t0);
        app.handle_square_click(e4(), t0);
        app.tick(t0 + MOVE_ANIMATION);
        assert_eq!(app.mode, AppMode::GameOver);

        app.handle_square_click(Position::new(3, 1), t0 + MOVE_ANIMATION * 2);
        assert_eq!(app.phase(), Phase::Idle);
    }
}
