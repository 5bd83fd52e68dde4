//! Draw detection and end-of-move status.

use super::win::check_winner;
use crate::ball::BallPosition;
use crate::board::Board;
use crate::cards::Hand;
use crate::types::{GameStatus, Side};
use crate::validator::push_moves;
use tracing::instrument;

/// True if `side` has at least one push or playable card move.
#[instrument(skip(board, hand))]
pub fn has_legal_move(board: &Board, side: Side, hand: &Hand, ball: BallPosition) -> bool {
    !push_moves(board, side).is_empty()
        || hand
            .unused_indices()
            .any(|index| !hand.moves_for(index, board, side, ball).is_empty())
}

/// Status after a move: a white win, then a black win, then a draw if the
/// side about to move is stuck.
pub fn evaluate_status(
    board: &Board,
    side_to_move: Side,
    hand_to_move: &Hand,
    ball: BallPosition,
) -> GameStatus {
    if let Some(winner) = check_winner(board) {
        return GameStatus::won_by(winner);
    }
    if has_legal_move(board, side_to_move, hand_to_move, ball) {
        GameStatus::Ongoing
    } else {
        GameStatus::Draw
    }
}
