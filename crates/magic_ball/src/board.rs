//! Board representation.

use crate::tile::{BOARD_SIZE, Tile};
use crate::types::{Occupant, Side};
use serde::{Deserialize, Serialize};

const SIZE: usize = BOARD_SIZE as usize;

/// 5×5 pawn store indexed by [`Tile`].
///
/// Pure storage: placement and removal are unconditional, legality lives in
/// the validator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    tiles: [[Occupant; SIZE]; SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Initial layout: black on row index 0, white on row index 4.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for side in [Side::White, Side::Black] {
            for tile in Tile::row_tiles(side.home_row()) {
                board.place_pawn(tile, side);
            }
        }
        board
    }

    /// A board with no pawns.
    pub fn empty() -> Self {
        Self {
            tiles: [[Occupant::Empty; SIZE]; SIZE],
        }
    }

    /// Returns what sits on `tile`.
    pub fn occupant_at(&self, tile: Tile) -> Occupant {
        let (row, col) = tile.to_indices();
        self.tiles[row][col]
    }

    /// True if `tile` has no pawn.
    pub fn is_vacant(&self, tile: Tile) -> bool {
        self.occupant_at(tile) == Occupant::Empty
    }

    /// Puts a pawn of `side` on `tile`, replacing whatever was there.
    pub fn place_pawn(&mut self, tile: Tile, side: Side) {
        let (row, col) = tile.to_indices();
        self.tiles[row][col] = Occupant::Pawn(side);
    }

    /// Empties `tile`, returning its previous occupant.
    pub fn clear_tile(&mut self, tile: Tile) -> Occupant {
        let (row, col) = tile.to_indices();
        std::mem::take(&mut self.tiles[row][col])
    }

    /// Moves whatever sits on `from` to `to`.
    pub fn relocate(&mut self, from: Tile, to: Tile) {
        if let Occupant::Pawn(side) = self.clear_tile(from) {
            self.place_pawn(to, side);
        }
    }

    /// Tiles holding pawns of `side`, row-major.
    pub fn pawns(&self, side: Side) -> impl Iterator<Item = Tile> + '_ {
        Tile::all().filter(move |&tile| self.occupant_at(tile) == Occupant::Pawn(side))
    }

    /// Number of pawns `side` has on the board.
    pub fn pawn_count(&self, side: Side) -> usize {
        self.pawns(side).count()
    }

    /// True if no tile in `row` holds a pawn.
    pub fn row_is_vacant(&self, row: u8) -> bool {
        Tile::row_tiles(row).all(|tile| self.is_vacant(tile))
    }

    /// Raw rows, index 0 first.
    pub fn rows(&self) -> &[[Occupant; SIZE]; SIZE] {
        &self.tiles
    }

    /// Returns a text rendering of the board, row 1 at the top.
    pub fn display(&self) -> String {
        let mut out = String::from("  A B C D E\n");
        for (row, cells) in self.tiles.iter().enumerate() {
            out.push_str(&(row + 1).to_string());
            for cell in cells {
                out.push(' ');
                out.push(match cell {
                    Occupant::Empty => '.',
                    Occupant::Pawn(Side::White) => 'W',
                    Occupant::Pawn(Side::Black) => 'B',
                });
            }
            out.push('\n');
        }
        out
    }
}
