//! Between-game card exchange: the loser hands over their two strongest
//! cards, the winner returns their two weakest.

use serde::Serialize;

use crate::domain::cards_logic::{sort_hand, strongest, weakest};
use crate::domain::participants::{ParticipantId, Seating};
use crate::domain::{Card, CardFace, Rank};
use crate::errors::domain::DomainError;

pub const EXCHANGE_SIZE: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeSummary {
    pub winner: ParticipantId,
    pub loser: ParticipantId,
    /// From the loser to the winner.
    pub to_winner: Vec<CardFace>,
    /// From the winner to the loser.
    pub to_loser: Vec<CardFace>,
}

/// Cards each side gives up, computed from both hands before any mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangePlan {
    pub from_loser: Vec<Card>,
    pub from_winner: Vec<Card>,
}

pub fn plan_exchange(winner_hand: &[Card], loser_hand: &[Card]) -> ExchangePlan {
    ExchangePlan {
        from_loser: strongest(loser_hand, EXCHANGE_SIZE),
        from_winner: weakest(winner_hand, EXCHANGE_SIZE),
    }
}

/// Winner and loser if both are seated real participants.
pub fn eligible_pair(
    seating: &Seating,
    winner: Option<ParticipantId>,
    loser: Option<ParticipantId>,
) -> Option<(ParticipantId, ParticipantId)> {
    let (w, l) = (winner?, loser?);
    let real = |id| seating.get(id).is_some_and(|p| !p.is_filler());
    (w != l && real(w) && real(l)).then_some((w, l))
}

fn hand_over(hand: &mut Vec<Card>, give: &[Card], receive: &[Card]) {
    hand.retain(|c| !give.iter().any(|g| g.id == c.id));
    hand.extend_from_slice(receive);
    sort_hand(hand);
}

/// Execute the exchange between `winner` and `loser` in `seating`.
pub fn apply_exchange(
    seating: &mut Seating,
    winner: ParticipantId,
    loser: ParticipantId,
) -> Result<ExchangeSummary, DomainError> {
    let plan = plan_exchange(&seating.require(winner)?.hand, &seating.require(loser)?.hand);

    hand_over(
        &mut seating.require_mut(winner)?.hand,
        &plan.from_winner,
        &plan.from_loser,
    );
    hand_over(
        &mut seating.require_mut(loser)?.hand,
        &plan.from_loser,
        &plan.from_winner,
    );

    Ok(ExchangeSummary {
        winner,
        loser,
        to_winner: plan.from_loser.iter().map(CardFace::from).collect(),
        to_loser: plan.from_winner.iter().map(CardFace::from).collect(),
    })
}

/// Ranks as a short human string, e.g. "K, 5".
pub fn describe(faces: &[CardFace]) -> String {
    if faces.is_empty() {
        return "nothing".to_string();
    }
    faces
        .iter()
        .map(|f| f.rank)
        .map(Rank::symbol)
        .collect::<Vec<_>>()
        .join(", ")
}
