//! Win detection.

use crate::board::Board;
use crate::tile::Tile;
use crate::types::{Occupant, Side};
use tracing::instrument;

/// Returns the side with a pawn on its goal row.
///
/// White is checked first, so a board where both sides have arrived is a
/// white win.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Side> {
    [Side::White, Side::Black].into_iter().find(|&side| {
        Tile::row_tiles(side.goal_row()).any(|tile| board.occupant_at(tile) == Occupant::Pawn(side))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(s: &str) -> Tile {
        s.parse().unwrap()
    }

    #[test]
    fn test_no_winner_at_start() {
        assert_eq!(check_winner(&Board::new()), None);
    }

    #[test]
    fn test_white_wins_on_row_one() {
        let mut board = Board::empty();
        board.place_pawn(tile("D1"), Side::White);
        assert_eq!(check_winner(&board), Some(Side::White));
    }

    #[test]
    fn test_black_wins_on_row_five() {
        let mut board = Board::empty();
        board.place_pawn(tile("A5"), Side::Black);
        assert_eq!(check_winner(&board), Some(Side::Black));
    }

    #[test]
    fn test_white_takes_precedence() {
        let mut board = Board::empty();
        board.place_pawn(tile("B1"), Side::White);
        board.place_pawn(tile("B5"), Side::Black);
        assert_eq!(check_winner(&board), Some(Side::White));
    }

    #[test]
    fn test_own_home_row_is_not_a_win() {
        let mut board = Board::empty();
        board.place_pawn(tile("B1"), Side::Black);
        board.place_pawn(tile("B5"), Side::White);
        assert_eq!(check_winner(&board), None);
    }
}
