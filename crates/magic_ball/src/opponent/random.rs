//! Opponent that picks uniformly among legal moves.

use super::OpponentPolicy;
use crate::action::MoveRequest;
use crate::game::GameState;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Uniform random choice, reproducible from its seed.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: ChaCha8Rng,
}

impl RandomPolicy {
    /// Creates a policy seeded with `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl OpponentPolicy for RandomPolicy {
    fn choose_move(&mut self, state: &GameState) -> Option<MoveRequest> {
        let legal = state.legal_moves();
        let request = legal.choose(&mut self.rng).copied();
        debug!(?request, options = legal.len(), "Random move");
        request
    }

    fn name(&self) -> &str {
        "random"
    }
}
