//! Game rules for Magic Ball.
//!
//! Pure functions over a board, a hand, and a ball position. Rules are kept
//! apart from storage so the state machine and the opponent look-ahead share
//! one definition of winning, drawing, and applying effects.

pub mod draw;
pub mod win;

pub use draw::{evaluate_status, has_legal_move};
pub use win::check_winner;

use crate::ball::BallTracker;
use crate::board::Board;
use crate::cards::Effect;

/// Applies `effects` in order to `board` and `ball`.
pub fn apply_effects(board: &mut Board, ball: &mut BallTracker, effects: &[Effect]) {
    for effect in effects {
        match *effect {
            Effect::Relocate { from, to } => board.relocate(from, to),
            Effect::Remove { tile } => {
                board.clear_tile(tile);
            }
            Effect::Place { tile, side } => board.place_pawn(tile, side),
            Effect::ShiftBall { toward } => ball.apply_shift(toward),
        }
    }
}
