//! Move validation.
//!
//! Each rule is a zero-sized precondition with a `check` method. [`validate`]
//! runs them in a fixed order and stops at the first failure, so the reported
//! rejection is deterministic.

use crate::action::{MoveRequest, Rejection, ResolvedMove};
use crate::ball::BallPosition;
use crate::board::Board;
use crate::cards::{CardMove, Effect, Hand};
use crate::game::GameState;
use crate::tile::Tile;
use crate::types::{GameType, Occupant, Side};
use tracing::{instrument, warn};

/// Who submitted a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum MoveOrigin {
    /// A client request.
    Client,
    /// The automated opponent.
    Automated,
}

/// Precondition: the game is still in progress.
pub struct GameOngoing;

impl GameOngoing {
    /// Rejects once the game has a terminal status.
    pub fn check(state: &GameState) -> Result<(), Rejection> {
        if state.status().is_terminal() {
            return Err(Rejection::GameAlreadyOver);
        }
        Ok(())
    }
}

/// Precondition: the requester owns the current turn.
pub struct TurnOwnership;

impl TurnOwnership {
    /// In human-vs-AI games client moves belong to the human side and
    /// automated moves to the other. Human-vs-human games never accept
    /// automated moves.
    pub fn check(state: &GameState, origin: MoveOrigin) -> Result<(), Rejection> {
        let human_to_move = state.current_player() == state.human_side();
        let allowed = match (state.game_type(), origin) {
            (GameType::HumanVsHuman, MoveOrigin::Client) => true,
            (GameType::HumanVsHuman, MoveOrigin::Automated) => false,
            (GameType::HumanVsAi, MoveOrigin::Client) => human_to_move,
            (GameType::HumanVsAi, MoveOrigin::Automated) => !human_to_move,
        };
        if allowed {
            Ok(())
        } else {
            Err(Rejection::NotYourTurn)
        }
    }
}

/// Precondition: a push moves one of the mover's pawns one row straight ahead onto an empty tile.
pub struct PushIsLegal;

impl PushIsLegal {
    /// Checks source ownership, then the target tile.
    pub fn check(board: &Board, side: Side, source: Tile, target: Tile) -> Result<(), Rejection> {
        if board.occupant_at(source) != Occupant::Pawn(side) {
            return Err(Rejection::InvalidSource);
        }
        if source.offset(side.forward(), 0) != Some(target) || !board.is_vacant(target) {
            return Err(Rejection::InvalidTarget);
        }
        Ok(())
    }
}

/// Precondition: the card is in hand and unused, the ball permits card play,
/// and the move index exists.
pub struct CardIsPlayable;

impl CardIsPlayable {
    /// Returns the selected card move.
    pub fn check(
        hand: &Hand,
        card_index: usize,
        move_index: usize,
        board: &Board,
        side: Side,
        ball: BallPosition,
    ) -> Result<CardMove, Rejection> {
        let card = hand
            .get(card_index)
            .filter(|card| !card.already_used)
            .ok_or(Rejection::UnknownOrUsedCard)?;
        if ball == BallPosition::end_of(side.opponent()) {
            return Err(Rejection::CardsBlockedByBall);
        }
        card.kind
            .moves(board, side)
            .into_iter()
            .nth(move_index)
            .ok_or(Rejection::InvalidMoveIndex)
    }
}

/// Validates `request` against `state`, with the ball position passed explicitly.
///
/// Checks run in order: game ongoing, turn ownership, then the push or card
/// checks. Nothing is mutated.
#[instrument(skip(state), fields(side = %state.current_player()))]
pub fn validate(
    request: &MoveRequest,
    state: &GameState,
    origin: MoveOrigin,
    ball: BallPosition,
) -> Result<ResolvedMove, Rejection> {
    let outcome = GameOngoing::check(state)
        .and_then(|()| TurnOwnership::check(state, origin))
        .and_then(|()| {
            let side = state.current_player();
            resolve(request, state.board(), side, state.hand(side), ball)
        });
    if let Err(rejection) = outcome {
        warn!(code = rejection.code(), "Move rejected");
    }
    outcome
}

/// Push and card checks only, for a given mover.
pub(crate) fn resolve(
    request: &MoveRequest,
    board: &Board,
    side: Side,
    hand: &Hand,
    ball: BallPosition,
) -> Result<ResolvedMove, Rejection> {
    match *request {
        MoveRequest::Push {
            source_tile,
            target_tile,
        } => {
            PushIsLegal::check(board, side, source_tile, target_tile)?;
            Ok(ResolvedMove {
                side,
                card_index: None,
                effects: vec![Effect::Relocate {
                    from: source_tile,
                    to: target_tile,
                }],
                description: format!("{side} pushes {source_tile} -> {target_tile}"),
            })
        }
        MoveRequest::Card {
            card_index,
            move_index,
        } => {
            let card_move = CardIsPlayable::check(hand, card_index, move_index, board, side, ball)?;
            Ok(ResolvedMove {
                side,
                card_index: Some(card_index),
                effects: card_move.effects,
                description: format!("{side} plays {}", card_move.description),
            })
        }
    }
}

/// Every legal push for `side`, row-major by source.
pub fn push_moves(board: &Board, side: Side) -> Vec<MoveRequest> {
    board
        .pawns(side)
        .filter_map(|source_tile| {
            let target_tile = source_tile.offset(side.forward(), 0)?;
            board.is_vacant(target_tile).then_some(MoveRequest::Push {
                source_tile,
                target_tile,
            })
        })
        .collect()
}

/// Every legal move for `side`: pushes first, then each unused card's moves in hand order.
pub fn legal_moves_for(board: &Board, side: Side, hand: &Hand, ball: BallPosition) -> Vec<MoveRequest> {
    let mut moves = push_moves(board, side);
    for card_index in hand.unused_indices() {
        let count = hand.moves_for(card_index, board, side, ball).len();
        moves.extend((0..count).map(|move_index| MoveRequest::Card {
            card_index,
            move_index,
        }));
    }
    moves
}

/// Resolves a marker selection to a move index.
///
/// Moves are matched on the first marker; a second marker, when given,
/// narrows two-marker moves to that destination. No match is
/// [`Rejection::InvalidMoveIndex`], several are [`Rejection::AmbiguousMove`].
pub fn select_card_move(
    moves: &[CardMove],
    tile_marker_1: Tile,
    tile_marker_2: Option<Tile>,
) -> Result<usize, Rejection> {
    let mut matches = moves.iter().enumerate().filter(|(_, mv)| {
        mv.tile_marker_1 == tile_marker_1
            && (tile_marker_2.is_none() || mv.tile_marker_2.is_none() || mv.tile_marker_2 == tile_marker_2)
    });
    match (matches.next(), matches.next()) {
        (Some((index, _)), None) => Ok(index),
        (Some(_), Some(_)) => Err(Rejection::AmbiguousMove),
        (None, _) => Err(Rejection::InvalidMoveIndex),
    }
}
