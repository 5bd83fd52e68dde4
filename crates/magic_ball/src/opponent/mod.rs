//! Automated opponents.
//!
//! A policy reads the game state and proposes a move. It never mutates the
//! game: [`Game::play_automated`](crate::Game::play_automated) re-validates
//! whatever the policy returns before applying it.

mod first_legal;
mod heuristic;
mod random;

pub use first_legal::FirstLegal;
pub use heuristic::{HeuristicPolicy, ScoreWeights};
pub use random::RandomPolicy;

use crate::action::MoveRequest;
use crate::game::GameState;
use serde::{Deserialize, Serialize};

/// Strategy for choosing the automated side's move.
pub trait OpponentPolicy: Send + std::fmt::Debug {
    /// Picks a move for the side to move, or `None` if it has none.
    fn choose_move(&mut self, state: &GameState) -> Option<MoveRequest>;

    /// Returns the policy's display name.
    fn name(&self) -> &str;
}

/// Configurable choice of policy.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OpponentKind {
    /// Always the first legal move.
    FirstLegal,
    /// Uniformly random legal move.
    Random,
    /// One-ply scorer with a safety check.
    #[default]
    Heuristic,
}

impl OpponentKind {
    /// Builds the policy. `seed` drives any randomness it uses.
    pub fn build(self, seed: u64, weights: ScoreWeights) -> Box<dyn OpponentPolicy> {
        match self {
            OpponentKind::FirstLegal => Box::new(FirstLegal),
            OpponentKind::Random => Box::new(RandomPolicy::seeded(seed)),
            OpponentKind::Heuristic => Box::new(HeuristicPolicy::new(weights, seed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Game, GameSetup};
    use crate::types::GameStatus;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_policy_plays_only_legal_moves() {
        for kind in OpponentKind::iter() {
            let mut white = kind.build(3, ScoreWeights::default());
            let mut black = kind.build(4, ScoreWeights::default());
            let mut game = Game::new(GameSetup::human_vs_human());
            for _ in 0..40 {
                if game.state().status() != GameStatus::Ongoing {
                    break;
                }
                let policy = match game.state().current_player() {
                    crate::types::Side::White => &mut white,
                    crate::types::Side::Black => &mut black,
                };
                let request = policy.choose_move(game.state()).unwrap();
                assert!(game.legal_moves().contains(&request), "{kind} chose {request}");
                game.play(&request).unwrap();
            }
        }
    }

    #[test]
    fn test_kind_parses_from_config_name() {
        assert_eq!("first_legal".parse::<OpponentKind>().unwrap(), OpponentKind::FirstLegal);
        assert_eq!(OpponentKind::Heuristic.to_string(), "heuristic");
    }
}
