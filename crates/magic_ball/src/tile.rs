//! Tile coordinates.
//!
//! Internally a tile is a 0-based (row, col) grid index. The column-letter +
//! row-number notation (`"A1"`..`"E5"`) is a presentation mapping: column
//! letter is `"ABCDE"[col]` and row number is `row + 1`.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// Width and height of the board.
pub const BOARD_SIZE: u8 = 5;

const COLUMN_LETTERS: [char; BOARD_SIZE as usize] = ['A', 'B', 'C', 'D', 'E'];

/// A tile on the 5×5 board.
///
/// Ordering is row-major, which is also the enumeration order of every move
/// generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tile {
    row: u8,
    col: u8,
}

/// Error for strings that are not a tile in `A1`..`E5`.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("invalid tile coordinate {input:?} (expected A1..E5)")]
pub struct TileParseError {
    /// The rejected input.
    #[error(not(source))]
    pub input: String,
}

impl Tile {
    /// Creates a tile from grid indices, if both are on the board.
    pub fn from_indices(row: usize, col: usize) -> Option<Self> {
        let size = BOARD_SIZE as usize;
        (row < size && col < size).then(|| Self {
            row: row as u8,
            col: col as u8,
        })
    }

    /// Returns the (row, col) grid indices.
    pub fn to_indices(self) -> (usize, usize) {
        (self.row as usize, self.col as usize)
    }

    /// Row index (0 is black's home row).
    pub fn row(self) -> u8 {
        self.row
    }

    /// Column index (0 is column `A`).
    pub fn col(self) -> u8 {
        self.col
    }

    /// Column letter in presentation notation.
    pub fn column_letter(self) -> char {
        COLUMN_LETTERS[self.col as usize]
    }

    /// Row number in presentation notation (1-based).
    pub fn row_number(self) -> u8 {
        self.row + 1
    }

    /// Tile reached by stepping `d_row` rows and `d_col` columns, if still on the board.
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        let row = self.row as i16 + d_row as i16;
        let col = self.col as i16 + d_col as i16;
        if row < 0 || col < 0 {
            return None;
        }
        Self::from_indices(row as usize, col as usize)
    }

    /// All 25 tiles in row-major order.
    pub fn all() -> impl Iterator<Item = Tile> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Tile { row, col }))
    }

    /// The five tiles of a row, left to right.
    pub fn row_tiles(row: u8) -> impl Iterator<Item = Tile> {
        (0..BOARD_SIZE).map(move |col| Tile { row, col })
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.column_letter(), self.row_number())
    }
}

impl FromStr for Tile {
    type Err = TileParseError;

    #[instrument]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TileParseError {
            input: s.to_string(),
        };
        let mut chars = s.chars();
        let (Some(letter), Some(digit), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };
        let col = COLUMN_LETTERS
            .iter()
            .position(|&c| c == letter.to_ascii_uppercase())
            .ok_or_else(invalid)?;
        let row = digit
            .to_digit(10)
            .and_then(|n| (n as usize).checked_sub(1))
            .ok_or_else(invalid)?;
        Self::from_indices(row, col).ok_or_else(invalid)
    }
}

impl TryFrom<String> for Tile {
    type Error = TileParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tile> for String {
    fn from(tile: Tile) -> Self {
        tile.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_round_trip() {
        for row in 0..5 {
            for col in 0..5 {
                let tile = Tile::from_indices(row, col).unwrap();
                let parsed: Tile = tile.to_string().parse().unwrap();
                assert_eq!(parsed, tile);
                assert_eq!(parsed.to_indices(), (row, col));
            }
        }
    }

    #[test]
    fn test_notation_mapping() {
        let tile: Tile = "C4".parse().unwrap();
        assert_eq!(tile.to_indices(), (3, 2));
        assert_eq!(Tile::from_indices(0, 0).unwrap().to_string(), "A1");
        assert_eq!(Tile::from_indices(4, 4).unwrap().to_string(), "E5");
        assert_eq!("b2".parse::<Tile>().unwrap().to_string(), "B2");
    }

    #[test]
    fn test_rejects_off_board_input() {
        for input in ["", "A", "A0", "A6", "F1", "AA", "C44", "4C"] {
            assert!(input.parse::<Tile>().is_err(), "{input} should not parse");
        }
        assert_eq!(Tile::from_indices(5, 0), None);
    }

    #[test]
    fn test_rejects_surrounding_whitespace() {
        for input in [" C4", "C4 ", " C4 ", "C4\n"] {
            assert!(input.parse::<Tile>().is_err(), "{input:?} should not parse");
        }
        assert_eq!("c4".parse::<Tile>().unwrap().to_string(), "C4");
    }

    #[test]
    fn test_offset_stays_on_board() {
        let corner: Tile = "A1".parse().unwrap();
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(0, -1), None);
        assert_eq!(corner.offset(1, 1).unwrap().to_string(), "B2");
    }

    #[test]
    fn test_all_is_row_major() {
        let tiles: Vec<_> = Tile::all().collect();
        assert_eq!(tiles.len(), 25);
        assert!(tiles.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_serde_uses_notation() {
        let tile: Tile = "D2".parse().unwrap();
        assert_eq!(serde_json::to_string(&tile).unwrap(), "\"D2\"");
        let back: Tile = serde_json::from_str("\"D2\"").unwrap();
        assert_eq!(back, tile);
        assert!(serde_json::from_str::<Tile>("\"Z9\"").is_err());
    }
}
