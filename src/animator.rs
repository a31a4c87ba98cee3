//! # Move Animator
//!
//! Sequences the one-shot visual transition for a committed move. A commit
//! removes the piece visual from the origin square and arms a single
//! [`AnimationJob`]; while the job is in flight, board input is disabled
//! (the app ignores square clicks whenever [`MoveAnimator::is_active`]).
//!
//! The app's per-frame tick polls [`MoveAnimator::take_completed`]; once
//! the fixed 300 ms transition has elapsed the job is surrendered exactly
//! once, and only then does the app mutate the model and repaint. That
//! single poll point is the system's "on animation complete" transition:
//! model mutation and every derived visual are strictly ordered after the
//! visual completion, so model and screen are never observably
//! inconsistent with each other.
//!
//! Jobs carry the board epoch they were spawned under. A model replacement
//! bumps the epoch and cancels the job outright; should a stale job still
//! be polled, the epoch mismatch discards its effects, so a reset always
//! wins over a pending completion.

use std::time::{Duration, Instant};

use crate::grid::{PieceVisual, SquareGrid};
use crate::rules::Move;

/// Fixed duration of the piece transition.
pub const MOVE_ANIMATION: Duration = Duration::from_millis(300);

/// One in-flight piece transition. At most one exists at a time.
pub struct AnimationJob {
    mv: Move,
    /// Overlay visual of the moving piece. `None` if the origin square had
    /// no piece visual to lift; the transition then runs without an
    /// overlay and the completion effects are unaffected.
    piece: Option<PieceVisual>,
    started: Instant,
    epoch: u64,
}

/// Interpolated overlay state for rendering, in board rows and columns
/// (row 0 is the top of the board, the eighth rank).
pub struct Overlay {
    pub row: f32,
    pub col: f32,
    pub piece: PieceVisual,
}

pub struct MoveAnimator {
    job: Option<AnimationJob>,
}

impl MoveAnimator {
    pub fn new() -> Self {
        Self { job: None }
    }

    pub fn is_active(&self) -> bool {
        self.job.is_some()
    }

    /// Starts the transition for `mv`: lifts the piece visual off the
    /// origin square and arms the job. The caller must already have
    /// stopped routing square input while [`MoveAnimator::is_active`].
    pub fn commit(&mut self, mv: Move, grid: &mut SquareGrid, epoch: u64, now: Instant) {
        debug_assert!(self.job.is_none(), "a second move was committed mid-animation");
        let piece = grid.square(mv.from).piece();
        grid.set_piece(mv.from, None);
        self.job = Some(AnimationJob {
            mv,
            piece,
            started: now,
            epoch,
        });
    }

    /// Current overlay position, eased between origin and destination.
    /// `None` when no job is in flight or the origin had no visual.
    pub fn overlay(&self, now: Instant) -> Option<Overlay> {
        let job = self.job.as_ref()?;
        let piece = job.piece?;
        let t = progress(job.started, now);
        let eased = ease_in_out_cubic(t);
        let (from_row, from_col) = row_col(&job.mv, true);
        let (to_row, to_col) = row_col(&job.mv, false);
        Some(Overlay {
            row: from_row + (to_row - from_row) * eased,
            col: from_col + (to_col - from_col) * eased,
            piece,
        })
    }

    /// Surrenders the job once its transition has elapsed. Returns the
    /// committed move so the caller can run the completion sequence, or
    /// `None` if the job is still in flight. A job whose epoch does not
    /// match `epoch` is dropped without returning its move: the board it
    /// was committed against no longer exists.
    pub fn take_completed(&mut self, now: Instant, epoch: u64) -> Option<Move> {
        let done = matches!(&self.job, Some(job) if now >= job.started + MOVE_ANIMATION);
        if !done {
            return None;
        }
        let job = self.job.take()?;
        if job.epoch == epoch {
            Some(job.mv)
        } else {
            None
        }
    }

    /// Drops any in-flight job, discarding its pending effects.
    pub fn cancel(&mut self) {
        self.job = None;
    }
}

impl Default for MoveAnimator {
    fn default() -> Self {
        Self::new()
    }
}

fn progress(started: Instant, now: Instant) -> f32 {
    let elapsed = now.saturating_duration_since(started);
    (elapsed.as_secs_f32() / MOVE_ANIMATION.as_secs_f32()).min(1.0)
}

/// Board row/column of a move endpoint (row 0 = eighth rank).
fn row_col(mv: &Move, origin: bool) -> (f32, f32) {
    let pos = if origin { mv.from } else { mv.to };
    ((7 - pos.rank()) as f32, pos.file() as f32)
}

/// Cubic ease-in/ease-out over `t` in `[0, 1]`.
fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::SquareGrid;
    use crate::rules::{Piece, PieceColor, PieceKind, Position};

    fn quiet_move(from: Position, to: Position) -> Move {
        Move {
            from,
            to,
            capture: None,
            castling: false,
            san: "e4".to_string(),
        }
    }

    fn grid_with_pawn(at: Position) -> SquareGrid {
        let mut grid = SquareGrid::new();
        grid.set_piece(
            at,
            Some(crate::grid::PieceVisual::of(Piece {
                color: PieceColor::White,
                kind: PieceKind::Pawn,
            })),
        );
        grid
    }

    #[test]
    fn commit_lifts_the_origin_visual_and_activates_the_job() {
        let e2 = Position::new(4, 1);
        let e4 = Position::new(4, 3);
        let mut grid = grid_with_pawn(e2);
        let mut animator = MoveAnimator::new();
        let t0 = Instant::now();

        assert!(!animator.is_active());
        animator.commit(quiet_move(e2, e4), &mut grid, 0, t0);

        assert!(animator.is_active());
        assert!(grid.square(e2).piece().is_none());
    }

    #[test]
    fn overlay_moves_from_origin_to_destination() {
        let e2 = Position::new(4, 1);
        let e4 = Position::new(4, 3);
        let mut grid = grid_with_pawn(e2);
        let mut animator = MoveAnimator::new();
        let t0 = Instant::now();
        animator.commit(quiet_move(e2, e4), &mut grid, 0, t0);

        let start = animator.overlay(t0).unwrap();
        assert_eq!(start.row, 6.0);
        assert_eq!(start.col, 4.0);

        // The cubic curve passes through one half exactly at midpoint.
        let mid = animator.overlay(t0 + MOVE_ANIMATION / 2).unwrap();
        assert!((mid.row - 5.0).abs() < 1e-3);

        let end = animator.overlay(t0 + MOVE_ANIMATION).unwrap();
        assert!((end.row - 4.0).abs() < 1e-3);
        assert!((end.col - 4.0).abs() < 1e-3);
    }

    #[test]
    fn completion_fires_exactly_once() {
        let e2 = Position::new(4, 1);
        let e4 = Position::new(4, 3);
        let mut grid = grid_with_pawn(e2);
        let mut animator = MoveAnimator::new();
        let t0 = Instant::now();
        animator.commit(quiet_move(e2, e4), &mut grid, 0, t0);

        assert!(animator.take_completed(t0 + Duration::from_millis(150), 0).is_none());
        let mv = animator.take_completed(t0 + Duration::from_millis(301), 0);
        assert_eq!(mv.unwrap().to, e4);
        assert!(!animator.is_active());
        assert!(animator.take_completed(t0 + Duration::from_millis(400), 0).is_none());
    }

    #[test]
    fn a_stale_epoch_discards_the_completion() {
        let e2 = Position::new(4, 1);
        let e4 = Position::new(4, 3);
        let mut grid = grid_with_pawn(e2);
        let mut animator = MoveAnimator::new();
        let t0 = Instant::now();
        animator.commit(quiet_move(e2, e4), &mut grid, 3, t0);

        let mv = animator.take_completed(t0 + Duration::from_millis(301), 4);
        assert!(mv.is_none(), "reset must win over the pending completion");
        assert!(!animator.is_active());
    }

    #[test]
    fn cancel_drops_the_job() {
        let e2 = Position::new(4, 1);
        let mut grid = grid_with_pawn(e2);
        let mut animator = MoveAnimator::new();
        let t0 = Instant::now();
        animator.commit(quiet_move(e2, Position::new(4, 3)), &mut grid, 0, t0);

        animator.cancel();
        assert!(!animator.is_active());
        assert!(animator.take_completed(t0 + Duration::from_millis(301), 0).is_none());
    }

    #[test]
    fn missing_origin_visual_still_animates_and_completes() {
        // Grid deliberately left empty at the origin square.
        let mut grid = SquareGrid::new();
        let mut animator = MoveAnimator::new();
        let t0 = Instant::now();
        animator.commit(quiet_move(Position::new(4, 1), Position::new(4, 3)), &mut grid, 0, t0);

        assert!(animator.is_active());
        assert!(animator.overlay(t0).is_none());
        assert!(animator.take_completed(t0 + Duration::from_millis(301), 0).is_some());
    }

    #[test]
    fn easing_is_monotonic_and_clamped() {
        let mut last = 0.0;
        for i in 0..=20 {
            let t = i as f32 / 20.0;
            let v = ease_in_out_cubic(t);
            assert!(v >= last);
            last = v;
        }
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
    }
}
