//! Dealing hands from a card pool.

use super::{CardKind, Hand};
use derive_more::{Display, Error};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

/// Bad hand configuration.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum DealError {
    /// A named card is not in the catalog.
    #[display("unknown card {name:?}")]
    UnknownCard {
        /// The name as given.
        name: String,
    },
    /// A named card is not in the configured pool.
    #[display("card {card} is not in the card pool")]
    NotInPool {
        /// The offending card.
        card: CardKind,
    },
    /// A card was named twice across the two hands.
    #[display("card {card} is dealt more than once")]
    Overlap {
        /// The repeated card.
        card: CardKind,
    },
    /// Not enough cards left in the pool.
    #[display("card pool has {available} cards left but {needed} are needed")]
    PoolTooSmall {
        /// Cards still required.
        needed: usize,
        /// Cards left after explicit hands.
        available: usize,
    },
}

fn parse_named(names: &[String]) -> Result<Vec<CardKind>, DealError> {
    names
        .iter()
        .map(|name| {
            name.parse::<CardKind>()
                .map_err(|_| DealError::UnknownCard { name: name.clone() })
        })
        .collect()
}

/// Deals a white and a black hand.
///
/// Sides with an explicit list get exactly those cards. Other sides draw
/// `cards_per_hand` distinct cards from what is left of `pool`. The two hands
/// never share a card. An empty pool deals empty hands.
#[instrument(skip(rng))]
pub fn deal_hands<R: Rng + ?Sized>(
    pool: &[CardKind],
    cards_per_hand: usize,
    white: Option<&[String]>,
    black: Option<&[String]>,
    rng: &mut R,
) -> Result<(Hand, Hand), DealError> {
    let white = white.map(parse_named).transpose()?;
    let black = black.map(parse_named).transpose()?;

    let mut remaining: Vec<CardKind> = Vec::with_capacity(pool.len());
    for &card in pool {
        if !remaining.contains(&card) {
            remaining.push(card);
        }
    }
    if remaining.is_empty() && white.is_none() && black.is_none() {
        debug!("Empty card pool, dealing empty hands");
        return Ok((Hand::default(), Hand::default()));
    }

    for card in white.iter().chain(black.iter()).flatten() {
        let Some(position) = remaining.iter().position(|c| c == card) else {
            return Err(if pool.contains(card) {
                DealError::Overlap { card: *card }
            } else {
                DealError::NotInPool { card: *card }
            });
        };
        remaining.remove(position);
    }

    let needed = [&white, &black].iter().filter(|hand| hand.is_none()).count() * cards_per_hand;
    if remaining.len() < needed {
        return Err(DealError::PoolTooSmall {
            needed,
            available: remaining.len(),
        });
    }
    remaining.shuffle(rng);
    let mut draw = remaining.into_iter();
    let white = white.unwrap_or_else(|| draw.by_ref().take(cards_per_hand).collect());
    let black = black.unwrap_or_else(|| draw.by_ref().take(cards_per_hand).collect());
    debug!(?white, ?black, "Dealt hands");
    Ok((Hand::new(white), Hand::new(black)))
}
