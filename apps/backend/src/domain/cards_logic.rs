//! Card logic: rank uniformity, colour counts, strength ordering within a hand

use std::cmp::Ordering;

use super::cards_types::{Card, CardFace, Rank};

/// The single rank shared by every card, or None for an empty or mixed set.
pub fn common_rank(cards: &[Card]) -> Option<Rank> {
    let first = cards.first()?.rank;
    cards.iter().all(|c| c.rank == first).then_some(first)
}

pub fn red_count(faces: &[CardFace]) -> usize {
    faces.iter().filter(|f| f.is_red()).count()
}

/// Display order: weakest first, suit as tiebreak.
pub fn by_strength(a: &Card, b: &Card) -> Ordering {
    a.rank.cmp(&b.rank).then(a.suit.cmp(&b.suit))
}

pub fn sort_hand(hand: &mut [Card]) {
    hand.sort_by(by_strength);
}

/// Up to `n` strongest cards of a hand, strongest first.
pub fn strongest(hand: &[Card], n: usize) -> Vec<Card> {
    let mut sorted = hand.to_vec();
    sorted.sort_by(|a, b| by_strength(b, a));
    sorted.truncate(n);
    sorted
}

/// Up to `n` weakest cards of a hand, weakest first.
pub fn weakest(hand: &[Card], n: usize) -> Vec<Card> {
    let mut sorted = hand.to_vec();
    sorted.sort_by(by_strength);
    sorted.truncate(n);
    sorted
}
