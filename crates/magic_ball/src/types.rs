//! Core domain types for Magic Ball.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// A side of the board.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Side {
    /// White starts on row 5 and moves first.
    White,
    /// Black starts on row 1.
    Black,
}

impl Side {
    /// Returns the opposing side.
    pub fn opponent(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Row step taken by a pawn of this side when it advances.
    pub fn forward(self) -> i8 {
        match self {
            Side::White => -1,
            Side::Black => 1,
        }
    }

    /// Row index where this side's pawns start.
    pub fn home_row(self) -> u8 {
        match self {
            Side::White => 4,
            Side::Black => 0,
        }
    }

    /// Row index this side must reach to win.
    pub fn goal_row(self) -> u8 {
        self.opponent().home_row()
    }

    /// Rows of this side's own half: the home row and the two rows toward the middle.
    pub fn own_half(self) -> [u8; 3] {
        match self {
            Side::White => [2, 3, 4],
            Side::Black => [0, 1, 2],
        }
    }

    /// How many rows a pawn on `row` has advanced from this side's home row.
    pub fn advancement(self, row: u8) -> u8 {
        match self {
            Side::White => 4 - row,
            Side::Black => row,
        }
    }
}

/// Contents of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<Side>", into = "Option<Side>")]
pub enum Occupant {
    /// No pawn on the tile.
    #[default]
    Empty,
    /// A pawn owned by a side.
    Pawn(Side),
}

impl Occupant {
    /// Returns the owning side, if a pawn is present.
    pub fn side(self) -> Option<Side> {
        match self {
            Occupant::Empty => None,
            Occupant::Pawn(side) => Some(side),
        }
    }
}

impl From<Option<Side>> for Occupant {
    fn from(side: Option<Side>) -> Self {
        side.map_or(Occupant::Empty, Occupant::Pawn)
    }
}

impl From<Occupant> for Option<Side> {
    fn from(occupant: Occupant) -> Self {
        occupant.side()
    }
}

/// Who is playing a game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameType {
    /// Both sides are driven by client requests.
    HumanVsHuman,
    /// One side is played by the automated opponent.
    HumanVsAi,
}

/// Status of a game.
///
/// Serialized as its integer code: 1 ongoing, 2 white win, 3 black win, 4 draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum GameStatus {
    /// Moves are still accepted.
    Ongoing,
    /// A white pawn reached row index 0.
    WhiteWin,
    /// A black pawn reached row index 4.
    BlackWin,
    /// The side to move had no legal move.
    Draw,
}

impl GameStatus {
    /// Integer code used on the wire.
    pub fn code(self) -> u8 {
        match self {
            GameStatus::Ongoing => 1,
            GameStatus::WhiteWin => 2,
            GameStatus::BlackWin => 3,
            GameStatus::Draw => 4,
        }
    }

    /// Returns the winning side, if any.
    pub fn winner(self) -> Option<Side> {
        match self {
            GameStatus::WhiteWin => Some(Side::White),
            GameStatus::BlackWin => Some(Side::Black),
            GameStatus::Ongoing | GameStatus::Draw => None,
        }
    }

    /// Status for a win by `side`.
    pub fn won_by(side: Side) -> Self {
        match side {
            Side::White => GameStatus::WhiteWin,
            Side::Black => GameStatus::BlackWin,
        }
    }

    /// True once no further moves are accepted.
    pub fn is_terminal(self) -> bool {
        self != GameStatus::Ongoing
    }
}

/// Error for a status code outside 1..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("unknown game status code {_0}")]
pub struct UnknownStatusCode(#[error(not(source))] pub u8);

impl From<GameStatus> for u8 {
    fn from(status: GameStatus) -> Self {
        status.code()
    }
}

impl TryFrom<u8> for GameStatus {
    type Error = UnknownStatusCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(GameStatus::Ongoing),
            2 => Ok(GameStatus::WhiteWin),
            3 => Ok(GameStatus::BlackWin),
            4 => Ok(GameStatus::Draw),
            other => Err(UnknownStatusCode(other)),
        }
    }
}
