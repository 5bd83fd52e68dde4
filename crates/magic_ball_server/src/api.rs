//! JSON-over-HTTP interface.
//!
//! Routes live under `/api/game`. The optional `x-session-id` header picks the
//! session; without it requests go to the `default` session.

use crate::session::{DEFAULT_SESSION, NewGameOptions, SessionError, SessionManager};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use derive_more::{Display, Error};
use magic_ball::{
    BallPosition, Card, CardKind, GameState, GameStatus, GameType, MoveRecord, MoveRequest, Side,
    Tile,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument, warn};

/// Header naming the session a request targets.
pub const SESSION_HEADER: &str = "x-session-id";

/// Shown in place of a concealed card's name.
pub const CONCEALED: &str = "?";

/// Builds the application router.
pub fn router(manager: SessionManager) -> Router {
    Router::new()
        .route("/api/game/new", post(new_game))
        .route("/api/game/state", get(game_state))
        .route("/api/game/move", post(make_move))
        .route("/api/game/automated-move", post(automated_move))
        .route("/api/game/card-moves/{card_index}", get(card_moves))
        .route("/api/game/cards", get(cards))
        .route("/api/game/valid-moves", get(valid_moves))
        .with_state(manager)
}

// ─────────────────────────────────────────────────────────────
//  Errors
// ─────────────────────────────────────────────────────────────

/// Failure of an API call.
#[derive(Debug, Display, Error)]
pub enum ApiError {
    /// The engine or session manager refused the request.
    #[display("{_0}")]
    Session(SessionError),
    /// The body could not be read as a known request shape.
    #[display("malformed request: {_0}")]
    Malformed(#[error(not(source))] String),
}

impl From<SessionError> for ApiError {
    fn from(error: SessionError) -> Self {
        ApiError::Session(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Session(error) => error.code(),
            ApiError::Malformed(_) => "malformed-request",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Session(SessionError::NoSession { .. }) => StatusCode::NOT_FOUND,
            ApiError::Session(_) => StatusCode::BAD_REQUEST,
            ApiError::Malformed(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(code = self.code(), error = %self, "Request failed");
        let body = json!({
            "success": false,
            "error": self.code(),
            "message": self.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}

// ─────────────────────────────────────────────────────────────
//  Wire views
// ─────────────────────────────────────────────────────────────

/// A card as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    /// Card identifier, or `"?"` when concealed.
    pub name: String,
    /// Display name, or `"?"` when concealed.
    pub display_name: String,
    /// Rules text, or `"?"` when concealed.
    pub description: String,
    /// Whether the card has been played.
    pub already_used: bool,
}

impl CardView {
    fn new(card: &Card, conceal: bool) -> Self {
        if conceal && !card.already_used {
            return Self {
                name: CONCEALED.to_string(),
                display_name: CONCEALED.to_string(),
                description: CONCEALED.to_string(),
                already_used: false,
            };
        }
        Self {
            name: card.kind.to_string(),
            display_name: card.kind.name().to_string(),
            description: card.kind.description().to_string(),
            already_used: card.already_used,
        }
    }
}

/// The game state as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateView {
    /// Five rows, row index 0 first, of `"white"`, `"black"` or `null`.
    pub board: Vec<Vec<Option<Side>>>,
    /// Side to move.
    pub current_player: Side,
    /// Ball position.
    pub ball_position: BallPosition,
    /// 1 ongoing, 2 white win, 3 black win, 4 draw.
    pub game_status: GameStatus,
    /// Who is playing.
    pub game_type: GameType,
    /// Client-driven side, for human-vs-AI games.
    pub human_player_side: Option<Side>,
    /// White's cards.
    pub white_cards: Vec<CardView>,
    /// Black's cards.
    pub black_cards: Vec<CardView>,
    /// Accepted moves, oldest first.
    pub history: Vec<MoveRecord>,
}

/// Body of `GET /api/game/state`: the view's fields beside `success`.
#[derive(Debug, Clone, Serialize)]
struct StateResponse {
    success: bool,
    #[serde(flatten)]
    view: GameStateView,
}

/// Side whose unused cards are hidden from clients, if any.
fn concealed_side(game_type: GameType, human_side: Side, conceal: bool) -> Option<Side> {
    (conceal && game_type == GameType::HumanVsAi).then(|| human_side.opponent())
}

fn card_views(cards: &[Card], side: Side, concealed: Option<Side>) -> Vec<CardView> {
    cards
        .iter()
        .map(|card| CardView::new(card, concealed == Some(side)))
        .collect()
}

impl GameStateView {
    /// Builds the client view, hiding the automated side's unused cards when `conceal` is set.
    pub fn new(state: &GameState, conceal: bool) -> Self {
        let concealed = concealed_side(state.game_type(), state.human_side(), conceal);
        Self {
            board: state
                .board()
                .rows()
                .iter()
                .map(|row| row.iter().map(|occupant| occupant.side()).collect())
                .collect(),
            current_player: state.current_player(),
            ball_position: state.ball(),
            game_status: state.status(),
            game_type: state.game_type(),
            human_player_side: (state.game_type() == GameType::HumanVsAi).then(|| state.human_side()),
            white_cards: card_views(state.white_hand().cards(), Side::White, concealed),
            black_cards: card_views(state.black_hand().cards(), Side::Black, concealed),
            history: state.history().to_vec(),
        }
    }
}

/// Body of `POST /api/game/move`.
///
/// Card moves name either a `move_index` or the markers of the move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveBody {
    /// Advance a pawn.
    Push {
        /// Tile holding the pawn.
        source_tile: Tile,
        /// Tile one row ahead.
        target_tile: Tile,
    },
    /// Play a card.
    Card {
        /// Index of the card in hand.
        card_index: usize,
        /// Index into the card's moves.
        #[serde(default)]
        move_index: Option<usize>,
        /// First marker, when selecting by tiles.
        #[serde(default)]
        tile_marker_1: Option<Tile>,
        /// Second marker, when selecting by tiles.
        #[serde(default)]
        tile_marker_2: Option<Tile>,
    },
}

fn session_id(headers: &HeaderMap) -> &str {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|id| !id.is_empty())
        .unwrap_or(DEFAULT_SESSION)
}

// ─────────────────────────────────────────────────────────────
//  Handlers
// ─────────────────────────────────────────────────────────────

#[instrument(skip_all, fields(session_id = session_id(&headers)))]
async fn new_game(
    State(manager): State<SessionManager>,
    headers: HeaderMap,
    payload: Result<Json<NewGameOptions>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(options) = payload?;
    let state = manager.new_game(session_id(&headers), &options)?;
    let view = GameStateView::new(&state, *manager.config().conceal_opponent_cards());
    Ok(Json(json!({ "success": true, "game_state": view })))
}

#[instrument(skip_all, fields(session_id = session_id(&headers)))]
async fn game_state(
    State(manager): State<SessionManager>,
    headers: HeaderMap,
) -> Result<Json<StateResponse>, ApiError> {
    let state = manager.get_state(session_id(&headers))?;
    let view = GameStateView::new(&state, *manager.config().conceal_opponent_cards());
    Ok(Json(StateResponse {
        success: true,
        view,
    }))
}

#[instrument(skip_all, fields(session_id = session_id(&headers)))]
async fn make_move(
    State(manager): State<SessionManager>,
    headers: HeaderMap,
    payload: Result<Json<MoveBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(body) = payload?;
    let id = session_id(&headers);
    debug!(?body, "Move requested");
    let outcome = match body {
        MoveBody::Push {
            source_tile,
            target_tile,
        } => manager.apply_move(
            id,
            &MoveRequest::Push {
                source_tile,
                target_tile,
            },
        )?,
        MoveBody::Card {
            card_index,
            move_index: Some(move_index),
            ..
        } => manager.apply_move(
            id,
            &MoveRequest::Card {
                card_index,
                move_index,
            },
        )?,
        MoveBody::Card {
            card_index,
            move_index: None,
            tile_marker_1: Some(tile_marker_1),
            tile_marker_2,
        } => manager.apply_marker_move(id, card_index, tile_marker_1, tile_marker_2)?,
        MoveBody::Card { .. } => {
            return Err(ApiError::Malformed(
                "card move needs move_index or tile_marker_1".to_string(),
            ));
        }
    };
    let view = GameStateView::new(&outcome.game_state, *manager.config().conceal_opponent_cards());
    Ok(Json(json!({
        "success": true,
        "game_state": view,
        "move_description": outcome.move_description,
    })))
}

#[instrument(skip_all, fields(session_id = session_id(&headers)))]
async fn automated_move(
    State(manager): State<SessionManager>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let outcome = manager.apply_automated_move(session_id(&headers))?;
    let view = GameStateView::new(&outcome.game_state, *manager.config().conceal_opponent_cards());
    Ok(Json(json!({
        "success": true,
        "game_state": view,
        "move_description": outcome.move_description,
    })))
}

#[instrument(skip_all, fields(session_id = session_id(&headers)))]
async fn card_moves(
    State(manager): State<SessionManager>,
    headers: HeaderMap,
    card_index: Result<Path<usize>, PathRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Path(card_index) = card_index?;
    let card_moves = manager.card_moves(session_id(&headers), card_index)?;
    let concealed = concealed_side(
        card_moves.game_type,
        card_moves.human_side,
        *manager.config().conceal_opponent_cards(),
    );
    if concealed == Some(card_moves.side) && !card_moves.already_used {
        debug!(card_index, "Card moves concealed");
        return Ok(Json(json!({
            "success": true,
            "card_name": CONCEALED,
            "card_description": CONCEALED,
            "marker_shape": CONCEALED,
            "moves": [],
        })));
    }
    let card: CardKind = card_moves.card;
    let moves: Vec<_> = card_moves
        .moves
        .iter()
        .map(|mv| {
            json!({
                "tile_marker_1": mv.tile_marker_1,
                "tile_marker_2": mv.tile_marker_2,
                "description": mv.description,
            })
        })
        .collect();
    Ok(Json(json!({
        "success": true,
        "card_name": card.name(),
        "card_description": card.description(),
        "marker_shape": card.shape(),
        "moves": moves,
    })))
}

#[instrument(skip_all, fields(session_id = session_id(&headers)))]
async fn cards(
    State(manager): State<SessionManager>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let hands = manager.cards(session_id(&headers))?;
    let concealed = concealed_side(
        hands.game_type,
        hands.human_side,
        *manager.config().conceal_opponent_cards(),
    );
    Ok(Json(json!({
        "success": true,
        "white_cards": card_views(&hands.white_cards, Side::White, concealed),
        "black_cards": card_views(&hands.black_cards, Side::Black, concealed),
    })))
}

#[instrument(skip_all, fields(session_id = session_id(&headers)))]
async fn valid_moves(
    State(manager): State<SessionManager>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let moves = manager.legal_moves(session_id(&headers))?;
    Ok(Json(json!({ "success": true, "moves": moves })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use magic_ball::{CardKind, GameSetup, Hand};

    #[test]
    fn test_view_conceals_ai_cards_only() {
        let setup = GameSetup::human_vs_ai(Side::Black).with_hands(
            Hand::new([CardKind::Knife, CardKind::Jump]),
            Hand::new([CardKind::Tank]),
        );
        let state = GameState::new(setup);

        let view = GameStateView::new(&state, true);
        assert!(view.white_cards.iter().all(|card| card.name == CONCEALED));
        assert_eq!(view.black_cards[0].name, "tank");
        assert_eq!(view.human_player_side, Some(Side::Black));

        let view = GameStateView::new(&state, false);
        assert_eq!(view.white_cards[0].name, "knife");
    }

    #[test]
    fn test_view_board_rows() {
        let view = GameStateView::new(&GameState::new(GameSetup::human_vs_human()), true);
        assert_eq!(view.board.len(), 5);
        assert!(view.board[0].iter().all(|cell| *cell == Some(Side::Black)));
        assert!(view.board[2].iter().all(Option::is_none));
        assert_eq!(view.human_player_side, None);
        assert_eq!(view.game_status.code(), 1);
    }

    #[test]
    fn test_move_body_accepts_markers() {
        let body: MoveBody = serde_json::from_str(
            r#"{"type":"card","card_index":0,"tile_marker_1":"C5","tile_marker_2":"C3"}"#,
        )
        .unwrap();
        assert_eq!(
            body,
            MoveBody::Card {
                card_index: 0,
                move_index: None,
                tile_marker_1: Some("C5".parse().unwrap()),
                tile_marker_2: Some("C3".parse().unwrap()),
            }
        );
    }
}
