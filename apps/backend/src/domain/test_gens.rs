// Proptest generators for domain types.

use proptest::prelude::*;

use crate::domain::participants::ParticipantId;
use crate::domain::pile::Pile;
use crate::domain::validation::GameMode;
use crate::domain::{Card, CardFace, Rank, Suit};

pub fn suit() -> impl Strategy<Value = Suit> {
    prop_oneof![
        Just(Suit::Clubs),
        Just(Suit::Diamonds),
        Just(Suit::Hearts),
        Just(Suit::Spades),
    ]
}

/// Any rank below the special one.
pub fn ordinary_rank() -> impl Strategy<Value = Rank> {
    (0usize..12).prop_map(|i| Rank::ALL[i])
}

pub fn mode() -> impl Strategy<Value = GameMode> {
    prop_oneof![
        Just(GameMode::Traditional),
        Just(GameMode::Appending),
        Just(GameMode::ColorMatching),
    ]
}

/// `count` freshly minted cards of one rank (suits may repeat, as with
/// two decks).
pub fn set_of(rank: Rank, count: usize) -> impl Strategy<Value = Vec<Card>> {
    prop::collection::vec(suit(), count)
        .prop_map(move |suits| suits.into_iter().map(|s| Card::mint(rank, s)).collect())
}

/// A pile of `count` cards of `rank`, optionally raised.
pub fn pile(rank: Rank, count: usize) -> impl Strategy<Value = Pile> {
    (prop::collection::vec(suit(), count), any::<bool>()).prop_map(move |(suits, raised)| Pile {
        rank,
        count,
        shown: suits.into_iter().map(|suit| CardFace { rank, suit }).collect(),
        last_played_by: ParticipantId::new(),
        raised,
    })
}

/// Random pile with 1..=4 ordinary cards.
pub fn any_pile() -> impl Strategy<Value = Pile> {
    (ordinary_rank(), 1usize..=4).prop_flat_map(|(rank, count)| pile(rank, count))
}

/// Real participant count for a room.
pub fn real_count() -> impl Strategy<Value = usize> {
    2usize..=8
}
