//! Game state machine.
//!
//! Every accepted move is applied to a copy of the state, which replaces the
//! current state only once the move, the card use, the history entry, and the
//! status evaluation have all been computed. A rejected move leaves the state
//! untouched. Terminal states are absorbing.

use crate::action::{MoveRecord, MoveRequest, Rejection, ResolvedMove};
use crate::ball::{BallPosition, BallTracker};
use crate::board::Board;
use crate::cards::{CardMove, Hand};
use crate::opponent::OpponentPolicy;
use crate::rules::{apply_effects, evaluate_status};
use crate::types::{GameStatus, GameType, Side};
use crate::validator::{GameOngoing, MoveOrigin, TurnOwnership, legal_moves_for, resolve, validate};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// How to start a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSetup {
    /// Who is playing.
    pub game_type: GameType,
    /// The side driven by client requests in human-vs-AI games.
    pub human_side: Side,
    /// White's starting hand.
    pub white_hand: Hand,
    /// Black's starting hand.
    pub black_hand: Hand,
}

impl GameSetup {
    /// Two humans, no cards.
    pub fn human_vs_human() -> Self {
        Self {
            game_type: GameType::HumanVsHuman,
            human_side: Side::White,
            white_hand: Hand::default(),
            black_hand: Hand::default(),
        }
    }

    /// A human on `human_side` against the automated opponent, no cards.
    pub fn human_vs_ai(human_side: Side) -> Self {
        Self {
            game_type: GameType::HumanVsAi,
            human_side,
            white_hand: Hand::default(),
            black_hand: Hand::default(),
        }
    }

    /// Replaces both hands.
    pub fn with_hands(mut self, white_hand: Hand, black_hand: Hand) -> Self {
        self.white_hand = white_hand;
        self.black_hand = black_hand;
        self
    }
}

/// Full state of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    current_player: Side,
    ball: BallTracker,
    white_hand: Hand,
    black_hand: Hand,
    status: GameStatus,
    history: Vec<MoveRecord>,
    game_type: GameType,
    human_side: Side,
}

impl GameState {
    /// Initial state: standard layout, white to move, ball in the middle.
    pub fn new(setup: GameSetup) -> Self {
        Self {
            board: Board::new(),
            current_player: Side::White,
            ball: BallTracker::new(),
            white_hand: setup.white_hand,
            black_hand: setup.black_hand,
            status: GameStatus::Ongoing,
            history: Vec::new(),
            game_type: setup.game_type,
            human_side: setup.human_side,
        }
    }

    /// Replaces the board, for starting from a composed position.
    pub fn with_board(mut self, board: Board) -> Self {
        self.board = board;
        self
    }

    /// Replaces the side to move.
    pub fn with_current_player(mut self, side: Side) -> Self {
        self.current_player = side;
        self
    }

    /// Replaces the ball position.
    pub fn with_ball(mut self, position: BallPosition) -> Self {
        self.ball = BallTracker::at(position);
        self
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move.
    pub fn current_player(&self) -> Side {
        self.current_player
    }

    /// Current ball position.
    pub fn ball(&self) -> BallPosition {
        self.ball.current_position()
    }

    /// White's hand.
    pub fn white_hand(&self) -> &Hand {
        &self.white_hand
    }

    /// Black's hand.
    pub fn black_hand(&self) -> &Hand {
        &self.black_hand
    }

    /// Hand belonging to `side`.
    pub fn hand(&self, side: Side) -> &Hand {
        match side {
            Side::White => &self.white_hand,
            Side::Black => &self.black_hand,
        }
    }

    fn hand_mut(&mut self, side: Side) -> &mut Hand {
        match side {
            Side::White => &mut self.white_hand,
            Side::Black => &mut self.black_hand,
        }
    }

    /// Game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Accepted moves, oldest first.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Who is playing.
    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    /// The client-driven side in human-vs-AI games.
    pub fn human_side(&self) -> Side {
        self.human_side
    }

    /// Every legal move for the side to move. Empty once the game is over.
    pub fn legal_moves(&self) -> Vec<MoveRequest> {
        if self.status.is_terminal() {
            return Vec::new();
        }
        let side = self.current_player;
        legal_moves_for(&self.board, side, self.hand(side), self.ball())
    }

    /// The state that would follow `request`, ignoring who submitted it.
    ///
    /// Used for look-ahead; `self` is not modified.
    pub fn preview(&self, request: &MoveRequest) -> Result<GameState, Rejection> {
        GameOngoing::check(self)?;
        let side = self.current_player;
        let resolved = resolve(request, &self.board, side, self.hand(side), self.ball())?;
        Ok(self.advanced(&resolved).0)
    }

    fn advanced(&self, resolved: &ResolvedMove) -> (GameState, MoveRecord) {
        let mut next = self.clone();
        apply_effects(&mut next.board, &mut next.ball, &resolved.effects);
        if let Some(card_index) = resolved.card_index {
            next.hand_mut(resolved.side).mark_used(card_index);
        }
        let record = MoveRecord {
            ply: self.history.len() + 1,
            side: resolved.side,
            description: resolved.description.clone(),
        };
        next.history.push(record.clone());
        let waiting = resolved.side.opponent();
        next.status = evaluate_status(&next.board, waiting, next.hand(waiting), next.ball());
        if next.status == GameStatus::Ongoing {
            next.current_player = waiting;
        }
        (next, record)
    }
}

// ─────────────────────────────────────────────────────────────
//  Game driver
// ─────────────────────────────────────────────────────────────

/// A game in progress, owning its state.
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
}

impl Game {
    /// Starts a new game.
    #[instrument(skip(setup), fields(game_type = %setup.game_type, human_side = %setup.human_side))]
    pub fn new(setup: GameSetup) -> Self {
        info!("Starting game");
        Self {
            state: GameState::new(setup),
        }
    }

    /// Resumes from an existing state.
    pub fn from_state(state: GameState) -> Self {
        Self { state }
    }

    /// Read-only view of the state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// An owned copy of the state.
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    /// Applies a client move.
    pub fn play(&mut self, request: &MoveRequest) -> Result<MoveRecord, Rejection> {
        self.apply(request, MoveOrigin::Client)
    }

    /// Lets `policy` pick a move for the automated side, then validates and applies it.
    ///
    /// If the side to move has no legal move, the game is marked drawn and
    /// [`Rejection::GameAlreadyOver`] is returned without consulting the policy.
    #[instrument(skip(self, policy), fields(policy = policy.name()))]
    pub fn play_automated(
        &mut self,
        policy: &mut dyn OpponentPolicy,
    ) -> Result<MoveRecord, Rejection> {
        GameOngoing::check(&self.state)?;
        TurnOwnership::check(&self.state, MoveOrigin::Automated)?;

        let legal = self.state.legal_moves();
        let Some(&fallback) = legal.first() else {
            info!(side = %self.state.current_player, "No legal move for the automated side");
            return Err(Rejection::GameAlreadyOver);
        };
        let request = policy.choose_move(&self.state).unwrap_or_else(|| {
            warn!("Policy returned no move, using first legal move");
            fallback
        });
        self.apply(&request, MoveOrigin::Automated)
    }

    /// Moves of the card at `card_index` in the mover's hand.
    ///
    /// Empty when the card is used or the ball blocks the mover's cards.
    pub fn card_moves(&self, card_index: usize) -> Result<Vec<CardMove>, Rejection> {
        let side = self.state.current_player;
        let hand = self.state.hand(side);
        if hand.get(card_index).is_none() {
            return Err(Rejection::UnknownOrUsedCard);
        }
        Ok(hand.moves_for(card_index, &self.state.board, side, self.state.ball()))
    }

    /// Every legal move for the side to move.
    pub fn legal_moves(&self) -> Vec<MoveRequest> {
        self.state.legal_moves()
    }

    #[instrument(skip(self), fields(side = %self.state.current_player))]
    fn apply(&mut self, request: &MoveRequest, origin: MoveOrigin) -> Result<MoveRecord, Rejection> {
        let resolved = validate(request, &self.state, origin, self.state.ball())?;
        let (next, record) = self.state.advanced(&resolved);
        self.state = next;
        info!(
            ply = record.ply,
            description = %record.description,
            status = self.state.status.code(),
            ball = %self.state.ball(),
            "Move applied"
        );
        Ok(record)
    }
}
