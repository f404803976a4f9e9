//! Card parsing from short tokens (e.g., "7H", "10D", "3S")

use std::str::FromStr;

use uuid::Uuid;

use super::cards_types::{Card, CardFace, CardId, Rank, Suit};
use crate::errors::domain::DomainError;
use crate::errors::ErrorCode;

fn parse_error(s: &str) -> DomainError {
    DomainError::validation(ErrorCode::BadRequest, format!("Parse card: {s}"))
}

impl FromStr for Rank {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rank::ALL
            .into_iter()
            .find(|r| r.symbol().eq_ignore_ascii_case(s))
            .ok_or_else(|| parse_error(s))
    }
}

impl FromStr for Suit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C" | "c" | "♣" => Ok(Suit::Clubs),
            "D" | "d" | "♦" => Ok(Suit::Diamonds),
            "H" | "h" | "♥" => Ok(Suit::Hearts),
            "S" | "s" | "♠" => Ok(Suit::Spades),
            _ => Err(parse_error(s)),
        }
    }
}

impl FromStr for CardFace {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .char_indices()
            .last()
            .map(|(idx, _)| idx)
            .filter(|idx| *idx > 0)
            .ok_or_else(|| parse_error(s))?;
        let (rank, suit) = s.split_at(split);
        Ok(CardFace {
            rank: rank.parse()?,
            suit: suit.parse()?,
        })
    }
}

impl Card {
    /// Mint a card with a fresh identity.
    pub fn mint(rank: Rank, suit: Suit) -> Self {
        Card {
            id: CardId(Uuid::new_v4()),
            rank,
            suit,
        }
    }
}

/// Parse tokens into freshly minted cards.
pub fn try_mint_cards<I, S>(tokens: I) -> Result<Vec<Card>, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|s| {
            let face: CardFace = s.as_ref().parse()?;
            Ok(Card::mint(face.rank, face.suit))
        })
        .collect()
}
