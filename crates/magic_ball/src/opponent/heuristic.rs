//! One-ply scoring opponent with a two-ply safety check.

use super::OpponentPolicy;
use crate::action::MoveRequest;
use crate::ball::{BallPosition, BallTracker};
use crate::game::GameState;
use crate::rules::{apply_effects, check_winner};
use crate::types::{GameStatus, Side};
use crate::validator::resolve;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const WIN: i64 = 1_000_000;
const GIVES_AWAY_WIN: i64 = -WIN / 2;

/// Weights of the position score terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Per unused card, own minus opponent's.
    pub unused_cards: i64,
    /// Ball at own end (+1) or the opponent's end (-1).
    pub ball: i64,
    /// Per row of total pawn advancement, own minus opponent's.
    pub advancement: i64,
    /// Per pawn, own minus opponent's.
    pub material: i64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            unused_cards: 10,
            ball: 5,
            advancement: 3,
            material: 8,
        }
    }
}

/// Scores every legal move by the position it leads to.
///
/// Winning moves come first and moves that hand the opponent an immediate win
/// come last. Among equal scores the seeded RNG decides.
#[derive(Debug, Clone)]
pub struct HeuristicPolicy {
    weights: ScoreWeights,
    rng: ChaCha8Rng,
}

impl HeuristicPolicy {
    /// Creates a policy with the given weights and tie-break seed.
    pub fn new(weights: ScoreWeights, seed: u64) -> Self {
        Self {
            weights,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn score(&self, next: &GameState, me: Side) -> i64 {
        match next.status() {
            GameStatus::Ongoing => {}
            GameStatus::Draw => return 0,
            status => {
                return if status.winner() == Some(me) { WIN } else { -WIN };
            }
        }
        if opponent_can_win(next) {
            return GIVES_AWAY_WIN;
        }
        self.position_score(next, me)
    }

    fn position_score(&self, state: &GameState, me: Side) -> i64 {
        let them = me.opponent();
        let board = state.board();
        let advancement = |side: Side| -> i64 {
            board
                .pawns(side)
                .map(|tile| side.advancement(tile.row()) as i64)
                .sum()
        };
        let ball = match state.ball() {
            BallPosition::Middle => 0,
            position if position == BallPosition::end_of(me) => 1,
            _ => -1,
        };

        self.weights.unused_cards
            * (state.hand(me).unused_count() as i64 - state.hand(them).unused_count() as i64)
            + self.weights.ball * ball
            + self.weights.advancement * (advancement(me) - advancement(them))
            + self.weights.material * (board.pawn_count(me) as i64 - board.pawn_count(them) as i64)
    }
}

/// True if the side to move in `state` has a move that wins on the spot.
fn opponent_can_win(state: &GameState) -> bool {
    let side = state.current_player();
    state.legal_moves().iter().any(|request| {
        let Ok(resolved) = resolve(request, state.board(), side, state.hand(side), state.ball()) else {
            return false;
        };
        let mut board = state.board().clone();
        let mut ball = BallTracker::at(state.ball());
        apply_effects(&mut board, &mut ball, &resolved.effects);
        check_winner(&board) == Some(side)
    })
}

impl OpponentPolicy for HeuristicPolicy {
    #[instrument(skip(self, state), fields(side = %state.current_player()))]
    fn choose_move(&mut self, state: &GameState) -> Option<MoveRequest> {
        let me = state.current_player();
        let mut best_score = i64::MIN;
        let mut best = Vec::new();
        for request in state.legal_moves() {
            let Ok(next) = state.preview(&request) else {
                continue;
            };
            let score = self.score(&next, me);
            if score > best_score {
                best_score = score;
                best.clear();
            }
            if score == best_score {
                best.push(request);
            }
        }
        let choice = best.choose(&mut self.rng).copied();
        debug!(?choice, score = best_score, tied = best.len(), "Heuristic move");
        choice
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}
