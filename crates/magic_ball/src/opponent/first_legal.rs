//! Deterministic opponent that plays the first legal move.

use super::OpponentPolicy;
use crate::action::MoveRequest;
use crate::game::GameState;
use tracing::debug;

/// Picks the first legal move: pushes in row-major order, then cards in hand order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLegal;

impl OpponentPolicy for FirstLegal {
    fn choose_move(&mut self, state: &GameState) -> Option<MoveRequest> {
        let request = state.legal_moves().into_iter().next();
        debug!(?request, "First legal move");
        request
    }

    fn name(&self) -> &str {
        "first_legal"
    }
}
