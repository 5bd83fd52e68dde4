//! Card catalog, hands, and move enumeration.

mod catalog;
mod effect;
mod patterns;

pub use catalog::{DealError, deal_hands};
pub use effect::{CardMove, Effect};

use crate::ball::BallPosition;
use crate::board::Board;
use crate::types::Side;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// How a card's moves are selected by markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MarkerShape {
    /// Origin then destination.
    TwoMarker,
    /// Only the first marker matters.
    SingleMarker,
}

/// Every card in the game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[allow(missing_docs)]
pub enum CardKind {
    Knife,
    Dagger,
    Charge,
    Bishop,
    Fire,
    SideStep,
    Jump,
    Tank,
    Kamikaze,
    Spawn,
    Peace,
    Knight,
    Scare,
}

impl CardKind {
    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            CardKind::Knife => "Knife",
            CardKind::Dagger => "Dagger",
            CardKind::Charge => "Charge",
            CardKind::Bishop => "Bishop",
            CardKind::Fire => "Fire",
            CardKind::SideStep => "Side Step",
            CardKind::Jump => "Jump",
            CardKind::Tank => "Tank",
            CardKind::Kamikaze => "Kamikaze",
            CardKind::Spawn => "Spawn",
            CardKind::Peace => "Peace",
            CardKind::Knight => "Knight",
            CardKind::Scare => "Scare",
        }
    }

    /// Rules text shown to players.
    pub fn description(self) -> &'static str {
        match self {
            CardKind::Knife => "Remove an opponent pawn orthogonally adjacent to one of yours.",
            CardKind::Dagger => "Remove an opponent pawn diagonally adjacent to one of yours.",
            CardKind::Charge => {
                "Move a pawn straight forward two or more tiles. Cannot land on either edge row."
            }
            CardKind::Bishop => {
                "Slide a pawn diagonally across empty tiles. Cannot land on your goal row."
            }
            CardKind::Fire => "Burn every pawn in one row of your own half.",
            CardKind::SideStep => "Slide a pawn sideways across empty tiles.",
            CardKind::Jump => "Move a pawn exactly two tiles forward onto an empty tile.",
            CardKind::Tank => "Step into an adjacent pawn, shoving it one tile further.",
            CardKind::Kamikaze => {
                "Sacrifice a pawn to remove the first opponent pawn in a straight or diagonal line."
            }
            CardKind::Spawn => "Place a new pawn on an empty tile of your own half.",
            CardKind::Peace => {
                "Remove one of your most advanced pawns and one of the opponent's most advanced pawns."
            }
            CardKind::Knight => "Move a pawn in an L-shape onto an empty tile.",
            CardKind::Scare => "Send an opponent pawn back to its home row in the same column.",
        }
    }

    /// Marker shape used when selecting one of this card's moves.
    pub fn shape(self) -> MarkerShape {
        match self {
            CardKind::Knife | CardKind::Dagger | CardKind::Fire | CardKind::Spawn => {
                MarkerShape::SingleMarker
            }
            _ => MarkerShape::TwoMarker,
        }
    }

    /// Every move this card could make for `side`, ignoring use and the ball.
    pub fn moves(self, board: &Board, side: Side) -> Vec<CardMove> {
        patterns::generate(self, board, side)
    }
}

/// A card held in a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Which card this is.
    pub kind: CardKind,
    /// Set once the card has been played this game.
    pub already_used: bool,
}

impl Card {
    /// A fresh, unused card.
    pub fn new(kind: CardKind) -> Self {
        Self {
            kind,
            already_used: false,
        }
    }
}

/// One side's ordered cards; the index is the addressing key for requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    /// A hand of unused cards in the given order.
    pub fn new(kinds: impl IntoIterator<Item = CardKind>) -> Self {
        Self {
            cards: kinds.into_iter().map(Card::new).collect(),
        }
    }

    /// All cards, used or not.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Card at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    /// Number of cards not yet played.
    pub fn unused_count(&self) -> usize {
        self.cards.iter().filter(|card| !card.already_used).count()
    }

    /// Indices of cards not yet played.
    pub fn unused_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, card)| !card.already_used)
            .map(|(index, _)| index)
    }

    /// Marks the card at `index` as played. Returns false if it was missing or already used.
    pub(crate) fn mark_used(&mut self, index: usize) -> bool {
        match self.cards.get_mut(index) {
            Some(card) if !card.already_used => {
                card.already_used = true;
                true
            }
            _ => false,
        }
    }

    /// Legal moves of the card at `index` for `side`.
    ///
    /// Empty when the index is missing, the card is used, or the ball blocks
    /// `side`'s cards.
    #[instrument(skip(self, board))]
    pub fn moves_for(
        &self,
        index: usize,
        board: &Board,
        side: Side,
        ball: BallPosition,
    ) -> Vec<CardMove> {
        let Some(card) = self.get(index).filter(|card| !card.already_used) else {
            return Vec::new();
        };
        if ball == BallPosition::end_of(side.opponent()) {
            return Vec::new();
        }
        let moves = card.kind.moves(board, side);
        debug!(card = %card.kind, count = moves.len(), "Enumerated card moves");
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_catalog_names_are_unique() {
        let mut names: Vec<_> = CardKind::iter().map(CardKind::name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), CardKind::iter().count());
    }

    #[test]
    fn test_kind_parses_from_identifier() {
        assert_eq!("side_step".parse::<CardKind>().unwrap(), CardKind::SideStep);
        assert_eq!("KNIFE".parse::<CardKind>().unwrap(), CardKind::Knife);
        assert!("wall".parse::<CardKind>().is_err());
    }

    #[test]
    fn test_used_card_has_no_moves() {
        let board = Board::new();
        let mut hand = Hand::new([CardKind::Jump]);
        assert!(!hand.moves_for(0, &board, Side::White, BallPosition::Middle).is_empty());
        assert!(hand.mark_used(0));
        assert!(!hand.mark_used(0));
        assert!(hand.moves_for(0, &board, Side::White, BallPosition::Middle).is_empty());
        assert_eq!(hand.unused_count(), 0);
    }

    #[test]
    fn test_ball_blocks_enumeration() {
        let board = Board::new();
        let hand = Hand::new([CardKind::Jump]);
        assert!(hand.moves_for(0, &board, Side::White, BallPosition::Black).is_empty());
        assert!(!hand.moves_for(0, &board, Side::White, BallPosition::White).is_empty());
        assert!(hand.moves_for(0, &board, Side::Black, BallPosition::White).is_empty());
    }

    #[test]
    fn test_missing_index_has_no_moves() {
        let hand = Hand::new([CardKind::Jump]);
        assert!(hand.moves_for(3, &Board::new(), Side::White, BallPosition::Middle).is_empty());
    }
}
