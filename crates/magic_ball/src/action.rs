//! Move requests, resolved moves, and rejections.

use crate::cards::Effect;
use crate::tile::Tile;
use crate::types::Side;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// A move as proposed by a client or an opponent policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveRequest {
    /// Advance a pawn one row straight forward onto an empty tile.
    Push {
        /// Tile holding the pawn.
        source_tile: Tile,
        /// Empty tile one row ahead.
        target_tile: Tile,
    },
    /// Play one of the enumerated moves of a card in hand.
    Card {
        /// Index of the card in the mover's hand.
        card_index: usize,
        /// Index into the card's enumerated moves.
        move_index: usize,
    },
}

impl std::fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveRequest::Push {
                source_tile,
                target_tile,
            } => write!(f, "push {source_tile} -> {target_tile}"),
            MoveRequest::Card {
                card_index,
                move_index,
            } => write!(f, "card {card_index} move {move_index}"),
        }
    }
}

/// A validated move, ready to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMove {
    /// Side making the move.
    pub side: Side,
    /// Hand index to mark used, for card moves.
    pub card_index: Option<usize>,
    /// Effects in application order.
    pub effects: Vec<Effect>,
    /// Human-readable summary.
    pub description: String,
}

/// One entry in the append-only move history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 1-based ply number.
    pub ply: usize,
    /// Side that moved.
    pub side: Side,
    /// What happened.
    pub description: String,
}

/// Why a move was refused. The game state is never changed by a rejected move.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    Error,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Rejection {
    /// The game has a terminal status.
    #[display("the game is already over")]
    GameAlreadyOver,
    /// The request came from the side that is not to move.
    #[display("it is not your turn")]
    NotYourTurn,
    /// The push source does not hold a pawn of the side to move.
    #[display("the source tile does not hold one of your pawns")]
    InvalidSource,
    /// The push target is not the empty tile directly ahead.
    #[display("the target tile is not the empty tile directly ahead")]
    InvalidTarget,
    /// No unused card at that hand index.
    #[display("no unused card at that hand index")]
    UnknownOrUsedCard,
    /// The ball sits at the mover's far end.
    #[display("the ball blocks card play for this side")]
    CardsBlockedByBall,
    /// Move index outside the card's enumerated moves.
    #[display("that move is not available for this card")]
    InvalidMoveIndex,
    /// Several card moves match the chosen markers.
    #[display("more than one card move matches the chosen tiles")]
    AmbiguousMove,
}

impl Rejection {
    /// Stable kebab-case code used on the wire.
    pub fn code(self) -> &'static str {
        self.into()
    }
}
