//! Effects and card moves.

use crate::tile::Tile;
use crate::types::Side;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// One atomic change a move makes to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// Move the pawn on `from` to `to`.
    Relocate {
        /// Origin tile.
        from: Tile,
        /// Destination tile.
        to: Tile,
    },
    /// Take the pawn on `tile` off the board.
    Remove {
        /// Tile to clear.
        tile: Tile,
    },
    /// Put a new pawn of `side` on `tile`.
    Place {
        /// Tile to fill.
        tile: Tile,
        /// Owner of the new pawn.
        side: Side,
    },
    /// Shift the ball one step toward `toward`'s end.
    ShiftBall {
        /// Side whose end the ball moves toward.
        toward: Side,
    },
}

/// A concrete move a card can make on the current board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct CardMove {
    /// Primary marker: the origin, or the only meaningful tile for single-marker cards.
    pub tile_marker_1: Tile,
    /// Destination marker for two-marker cards.
    pub tile_marker_2: Option<Tile>,
    /// Declared effects, applied in order.
    pub effects: Vec<Effect>,
    /// Human-readable summary.
    pub description: String,
}
