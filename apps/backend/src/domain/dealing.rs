//! Deck construction and deterministic dealing.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Builder;

use crate::domain::cards_logic::sort_hand;
use crate::domain::{Card, CardId, Rank, Suit};
use crate::errors::domain::DomainError;

pub const DECK_SIZE: usize = 52;

/// Real-participant count from which a second deck is shuffled in.
const TWO_DECK_THRESHOLD: usize = 5;

/// Number of 52-card decks to use for a given number of real participants.
pub fn deck_count_for(real_participants: usize) -> usize {
    if real_participants >= TWO_DECK_THRESHOLD {
        2
    } else {
        1
    }
}

/// Build `decks` full decks in standard order. Every card gets an identity
/// drawn from `rng`, so duplicate rank/suit pairs stay distinguishable.
pub fn build_deck<R: Rng + ?Sized>(decks: usize, rng: &mut R) -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE * decks);
    for _ in 0..decks {
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                deck.push(Card {
                    id: CardId(Builder::from_random_bytes(rng.random()).into_uuid()),
                    rank,
                    suit,
                });
            }
        }
    }
    deck
}

/// Fisher-Yates shuffle.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Derive the dealing seed for the `game_no`-th game of a room.
pub fn derive_deal_seed(room_seed: u64, game_no: u32) -> u64 {
    room_seed
        .wrapping_add((game_no as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .rotate_left(17)
}

/// Result of a deal: one sorted hand per seat, plus how many cards were left
/// out to keep the split even.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub hands: Vec<Vec<Card>>,
    pub decks: usize,
    pub discarded: usize,
}

impl Deal {
    pub fn cards_in_play(&self) -> usize {
        self.hands.iter().map(Vec::len).sum()
    }
}

/// Shuffle and split the deck evenly over `seats` hands. Remainder cards are
/// discarded rather than handed out unevenly.
pub fn deal_hands(seats: usize, decks: usize, seed: u64) -> Result<Deal, DomainError> {
    if seats == 0 {
        return Err(DomainError::inconsistent("cannot deal to zero seats"));
    }
    if decks == 0 {
        return Err(DomainError::inconsistent("cannot deal from zero decks"));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut deck = build_deck(decks, &mut rng);
    shuffle(&mut deck, &mut rng);

    let per_hand = deck.len() / seats;
    let discarded = deck.len() - per_hand * seats;

    let hands = deck
        .chunks_exact(per_hand.max(1))
        .take(seats)
        .map(|chunk| {
            let mut hand = chunk.to_vec();
            sort_hand(&mut hand);
            hand
        })
        .collect::<Vec<_>>();

    Ok(Deal {
        hands,
        decks,
        discarded,
    })
}

/// Fresh entropy for a new room.
pub fn fresh_room_seed() -> u64 {
    rand::random()
}
