//! Game session management.
//!
//! Each session id maps to its own `Arc<Mutex<GameSession>>`. The map lock is
//! held only long enough to look up or insert a session; game calls run under
//! the session's own lock, so different sessions never wait on each other.

use crate::config::ServerConfig;
use chrono::{DateTime, Utc};
use derive_more::{Display, Error};
use magic_ball::{
    Card, CardKind, CardMove, DealError, Game, GameSetup, GameState, GameType, MoveRequest,
    OpponentPolicy, Rejection, Side, Tile, deal_hands, select_card_move,
};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Session used when a request names none.
pub const DEFAULT_SESSION: &str = "default";

/// Parameters of a new-game request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameOptions {
    /// Who is playing.
    pub game_type: GameType,
    /// Client-driven side for human-vs-AI games. White when absent.
    #[serde(default)]
    pub human_player_side: Option<Side>,
    /// Explicit white hand, by card identifier.
    #[serde(default)]
    pub white_cards: Option<Vec<String>>,
    /// Explicit black hand, by card identifier.
    #[serde(default)]
    pub black_cards: Option<Vec<String>>,
}

impl NewGameOptions {
    /// Options for a game of `game_type` with dealt hands.
    pub fn new(game_type: GameType) -> Self {
        Self {
            game_type,
            human_player_side: None,
            white_cards: None,
            black_cards: None,
        }
    }
}

/// Result of an accepted move.
#[derive(Debug, Clone, Serialize)]
pub struct MoveOutcome {
    /// State after the move.
    pub game_state: GameState,
    /// What the move did.
    pub move_description: String,
}

/// Moves available for one card.
#[derive(Debug, Clone, Serialize)]
pub struct CardMoves {
    /// The card.
    pub card: CardKind,
    /// Whether it has been played.
    pub already_used: bool,
    /// Its legal moves for the side to move; empty when used or blocked.
    pub moves: Vec<CardMove>,
    /// Owner of the card, the side to move.
    pub side: Side,
    /// Who is playing.
    pub game_type: GameType,
    /// Client-driven side.
    pub human_side: Side,
}

/// Both hands, with enough context to decide what a client may see.
#[derive(Debug, Clone, Serialize)]
pub struct HandsView {
    /// White's cards in hand order.
    pub white_cards: Vec<Card>,
    /// Black's cards in hand order.
    pub black_cards: Vec<Card>,
    /// Who is playing.
    pub game_type: GameType,
    /// Client-driven side.
    pub human_side: Side,
}

/// Session-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// No game has been started under this id.
    #[display("no game in session {session_id:?}")]
    NoSession {
        /// The requested id.
        session_id: SessionId,
    },
    /// The engine refused the move.
    #[display("{_0}")]
    Rejected(Rejection),
    /// The hand configuration could not be dealt.
    #[display("invalid setup: {_0}")]
    InvalidSetup(DealError),
}

impl SessionError {
    /// Stable kebab-case code used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::NoSession { .. } => "no-session",
            SessionError::Rejected(rejection) => rejection.code(),
            SessionError::InvalidSetup(_) => "invalid-setup",
        }
    }
}

impl From<Rejection> for SessionError {
    fn from(rejection: Rejection) -> Self {
        SessionError::Rejected(rejection)
    }
}

impl From<DealError> for SessionError {
    fn from(error: DealError) -> Self {
        SessionError::InvalidSetup(error)
    }
}

/// One game plus the opponent and randomness that belong to it.
#[derive(Debug)]
pub struct GameSession {
    /// Session ID.
    pub id: SessionId,
    /// The game.
    pub game: Game,
    /// Policy for the automated side.
    pub opponent: Box<dyn OpponentPolicy>,
    /// When the current game started.
    pub started_at: DateTime<Utc>,
}

impl GameSession {
    /// Deals hands and starts a game.
    #[instrument(skip(config, rng, options), fields(game_type = %options.game_type))]
    pub fn new(
        id: SessionId,
        options: &NewGameOptions,
        config: &ServerConfig,
        rng: &mut ChaCha8Rng,
    ) -> Result<Self, SessionError> {
        let (white_hand, black_hand) = deal_hands(
            &config.resolved_card_pool(),
            *config.cards_per_hand(),
            options.white_cards.as_deref(),
            options.black_cards.as_deref(),
            rng,
        )?;
        let human_side = options.human_player_side.unwrap_or(Side::White);
        let setup = match options.game_type {
            GameType::HumanVsHuman => GameSetup::human_vs_human(),
            GameType::HumanVsAi => GameSetup::human_vs_ai(human_side),
        }
        .with_hands(white_hand, black_hand);

        let opponent = config.opponent().build(rng.next_u64(), *config.score_weights());
        info!(session_id = %id, opponent = opponent.name(), "Creating new game session");
        Ok(Self {
            id,
            game: Game::new(setup),
            opponent,
            started_at: Utc::now(),
        })
    }

    /// Applies a client move.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn make_move(&mut self, request: &MoveRequest) -> Result<MoveOutcome, SessionError> {
        let record = self.game.play(request)?;
        Ok(MoveOutcome {
            game_state: self.game.snapshot(),
            move_description: record.description,
        })
    }

    /// Lets the opponent policy move for the automated side.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn make_automated_move(&mut self) -> Result<MoveOutcome, SessionError> {
        let record = self.game.play_automated(self.opponent.as_mut())?;
        Ok(MoveOutcome {
            game_state: self.game.snapshot(),
            move_description: record.description,
        })
    }

    /// Resolves a card move by its markers, then applies it.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn make_marker_move(
        &mut self,
        card_index: usize,
        tile_marker_1: Tile,
        tile_marker_2: Option<Tile>,
    ) -> Result<MoveOutcome, SessionError> {
        let moves = self.game.card_moves(card_index)?;
        let move_index = select_card_move(&moves, tile_marker_1, tile_marker_2)?;
        self.make_move(&MoveRequest::Card {
            card_index,
            move_index,
        })
    }
}

/// Manages all game sessions.
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, Arc<Mutex<GameSession>>>>>,
    config: Arc<ServerConfig>,
    seed_rng: Arc<Mutex<ChaCha8Rng>>,
}

impl SessionManager {
    /// Creates a session manager for `config`.
    #[instrument(skip(config))]
    pub fn new(config: ServerConfig) -> Self {
        let seed_rng = match config.seed() {
            Some(seed) => ChaCha8Rng::seed_from_u64(*seed),
            None => ChaCha8Rng::from_entropy(),
        };
        info!(seeded = config.seed().is_some(), "Creating session manager");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            config: Arc::new(config),
            seed_rng: Arc::new(Mutex::new(seed_rng)),
        }
    }

    /// The configuration new games are created with.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    fn session(&self, id: &str) -> Result<Arc<Mutex<GameSession>>, SessionError> {
        let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.get(id).cloned().ok_or_else(|| {
            debug!(session_id = id, "Session not found");
            SessionError::NoSession {
                session_id: id.to_string(),
            }
        })
    }

    fn with_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut GameSession) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let session = self.session(id)?;
        let mut session = session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }

    /// Starts a new game, replacing any game already under `id`.
    #[instrument(skip(self, options))]
    pub fn new_game(&self, id: &str, options: &NewGameOptions) -> Result<GameState, SessionError> {
        let mut rng = {
            let mut seed_rng = self.seed_rng.lock().unwrap_or_else(PoisonError::into_inner);
            ChaCha8Rng::seed_from_u64(seed_rng.next_u64())
        };
        let session = GameSession::new(id.to_string(), options, &self.config, &mut rng)
            .inspect_err(|e| warn!(session_id = id, error = %e, "Could not start game"))?;
        let state = session.game.snapshot();
        let started_at = session.started_at;

        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.insert(id.to_string(), Arc::new(Mutex::new(session)));
        info!(session_id = id, %started_at, active = sessions.len(), "Game started");
        Ok(state)
    }

    /// Snapshot of the current state.
    #[instrument(skip(self))]
    pub fn get_state(&self, id: &str) -> Result<GameState, SessionError> {
        self.with_session(id, |session| Ok(session.game.snapshot()))
    }

    /// Validates and applies a client move.
    #[instrument(skip(self))]
    pub fn apply_move(&self, id: &str, request: &MoveRequest) -> Result<MoveOutcome, SessionError> {
        self.with_session(id, |session| session.make_move(request))
    }

    /// Validates and applies a card move selected by its markers.
    #[instrument(skip(self))]
    pub fn apply_marker_move(
        &self,
        id: &str,
        card_index: usize,
        tile_marker_1: Tile,
        tile_marker_2: Option<Tile>,
    ) -> Result<MoveOutcome, SessionError> {
        self.with_session(id, |session| {
            session.make_marker_move(card_index, tile_marker_1, tile_marker_2)
        })
    }

    /// Has the opponent policy move for the automated side.
    #[instrument(skip(self))]
    pub fn apply_automated_move(&self, id: &str) -> Result<MoveOutcome, SessionError> {
        self.with_session(id, GameSession::make_automated_move)
    }

    /// Moves of the card at `card_index` in the mover's hand.
    #[instrument(skip(self))]
    pub fn card_moves(&self, id: &str, card_index: usize) -> Result<CardMoves, SessionError> {
        self.with_session(id, |session| {
            let moves = session.game.card_moves(card_index)?;
            let state = session.game.state();
            let side = state.current_player();
            let card = state
                .hand(side)
                .get(card_index)
                .ok_or(Rejection::UnknownOrUsedCard)?;
            Ok(CardMoves {
                card: card.kind,
                already_used: card.already_used,
                moves,
                side,
                game_type: state.game_type(),
                human_side: state.human_side(),
            })
        })
    }

    /// Both hands with their used flags. Always reports true card names.
    #[instrument(skip(self))]
    pub fn cards(&self, id: &str) -> Result<HandsView, SessionError> {
        self.with_session(id, |session| {
            let state = session.game.state();
            Ok(HandsView {
                white_cards: state.white_hand().cards().to_vec(),
                black_cards: state.black_hand().cards().to_vec(),
                game_type: state.game_type(),
                human_side: state.human_side(),
            })
        })
    }

    /// Every legal move for the side to move.
    #[instrument(skip(self))]
    pub fn legal_moves(&self, id: &str) -> Result<Vec<MoveRequest>, SessionError> {
        self.with_session(id, |session| Ok(session.game.legal_moves()))
    }

    /// Lists all active session IDs.
    pub fn list_sessions(&self) -> Vec<SessionId> {
        let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.keys().cloned().collect()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}
