//! The ball: a three-state marker that gates card play.
//!
//! The ball moves one step toward the opponent of whoever plays a card. When
//! it reaches a side's far end (the opponent's end), that side is out of card
//! plays until the opponent shoves it back.

use crate::types::Side;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where the ball sits.
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
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BallPosition {
    /// At white's end; black cannot play cards.
    White,
    /// Centered; both sides may play cards.
    #[default]
    Middle,
    /// At black's end; white cannot play cards.
    Black,
}

impl BallPosition {
    /// The end of the board belonging to `side`.
    pub fn end_of(side: Side) -> Self {
        match side {
            Side::White => BallPosition::White,
            Side::Black => BallPosition::Black,
        }
    }
}

/// Tracks the ball across a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BallTracker {
    position: BallPosition,
}

impl BallTracker {
    /// Starts with the ball in the middle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with the ball at `position`.
    pub fn at(position: BallPosition) -> Self {
        Self { position }
    }

    /// Current ball position.
    pub fn current_position(&self) -> BallPosition {
        self.position
    }

    /// Moves the ball one step toward `toward`'s end, clamped at the ends.
    pub fn apply_shift(&mut self, toward: Side) {
        let next = match (self.position, toward) {
            (BallPosition::Middle, side) => BallPosition::end_of(side),
            (end, side) if end == BallPosition::end_of(side) => end,
            _ => BallPosition::Middle,
        };
        debug!(from = %self.position, to = %next, toward = %toward, "Ball shifted");
        self.position = next;
    }

    /// True if `side` may play a card with the ball where it is.
    pub fn permits_cards(&self, side: Side) -> bool {
        self.position != BallPosition::end_of(side.opponent())
    }
}
