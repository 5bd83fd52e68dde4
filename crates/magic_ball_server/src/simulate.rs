//! Batch play between two automated policies.

use derive_getters::Getters;
use magic_ball::{
    CardKind, DealError, Game, GameSetup, GameStatus, OpponentKind, OpponentPolicy, ScoreWeights,
    Side, deal_hands,
};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// Games still running after this many plies are counted as unfinished.
pub const DEFAULT_MAX_PLIES: usize = 200;

/// Parameters of a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOptions {
    /// Number of games to play.
    pub games: usize,
    /// Policy for white.
    pub white: OpponentKind,
    /// Policy for black.
    pub black: OpponentKind,
    /// Master seed. Each game derives its own seed from it.
    pub seed: u64,
    /// Cards dealt to each side.
    pub cards_per_hand: usize,
    /// Cards available for dealing.
    pub card_pool: Vec<CardKind>,
    /// Weights for heuristic policies.
    pub score_weights: ScoreWeights,
    /// Ply cap per game.
    pub max_plies: usize,
}

/// Tally of a simulation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize)]
pub struct SimulationSummary {
    games: usize,
    white_wins: usize,
    black_wins: usize,
    draws: usize,
    unfinished: usize,
    total_plies: usize,
}

impl SimulationSummary {
    fn record(&mut self, status: GameStatus, plies: usize) {
        self.games += 1;
        self.total_plies += plies;
        match status {
            GameStatus::WhiteWin => self.white_wins += 1,
            GameStatus::BlackWin => self.black_wins += 1,
            GameStatus::Draw => self.draws += 1,
            GameStatus::Ongoing => self.unfinished += 1,
        }
    }

    /// Mean game length in plies.
    pub fn average_plies(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_plies as f64 / self.games as f64
        }
    }
}

impl fmt::Display for SimulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = |n: usize| {
            if self.games == 0 {
                0.0
            } else {
                100.0 * n as f64 / self.games as f64
            }
        };
        writeln!(f, "Games:      {}", self.games)?;
        writeln!(f, "White wins: {} ({:.1}%)", self.white_wins, pct(self.white_wins))?;
        writeln!(f, "Black wins: {} ({:.1}%)", self.black_wins, pct(self.black_wins))?;
        writeln!(f, "Draws:      {} ({:.1}%)", self.draws, pct(self.draws))?;
        if self.unfinished > 0 {
            writeln!(f, "Unfinished: {}", self.unfinished)?;
        }
        write!(f, "Avg plies:  {:.1}", self.average_plies())
    }
}

/// Plays `options.games` games and tallies the results.
#[instrument(skip(options), fields(games = options.games, white = %options.white, black = %options.black))]
pub fn run_simulation(options: &SimulationOptions) -> Result<SimulationSummary, DealError> {
    let mut master = ChaCha8Rng::seed_from_u64(options.seed);
    let mut summary = SimulationSummary::default();

    for index in 0..options.games {
        let mut rng = ChaCha8Rng::seed_from_u64(master.next_u64());
        let (status, plies) = play_one(options, &mut rng)?;
        debug!(game = index, ?status, plies, "Game finished");
        summary.record(status, plies);
    }

    info!(
        white_wins = summary.white_wins,
        black_wins = summary.black_wins,
        draws = summary.draws,
        unfinished = summary.unfinished,
        "Simulation complete"
    );
    Ok(summary)
}

fn play_one(
    options: &SimulationOptions,
    rng: &mut ChaCha8Rng,
) -> Result<(GameStatus, usize), DealError> {
    let (white_hand, black_hand) =
        deal_hands(&options.card_pool, options.cards_per_hand, None, None, rng)?;
    let mut game = Game::new(GameSetup::human_vs_human().with_hands(white_hand, black_hand));
    let mut white = options.white.build(rng.next_u64(), options.score_weights);
    let mut black = options.black.build(rng.next_u64(), options.score_weights);

    let mut plies = 0;
    while !game.state().status().is_terminal() && plies < options.max_plies {
        let policy: &mut dyn OpponentPolicy = match game.state().current_player() {
            Side::White => white.as_mut(),
            Side::Black => black.as_mut(),
        };
        let Some(request) = policy.choose_move(game.state()) else {
            break;
        };
        if let Err(rejection) = game.play(&request) {
            warn!(%request, %rejection, "Policy proposed an illegal move");
            break;
        }
        plies += 1;
    }
    Ok((game.state().status(), plies))
}
