//! Round/turn control: fixed traversal, per-lap acted set, closure.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::participants::{ParticipantId, Seating};
use crate::domain::pile::Pile;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Serialize)]
pub struct Round {
    pub starter: ParticipantId,
    /// Seating order rotated to the starter, holders only. Fixed at open.
    pub order: Vec<ParticipantId>,
    /// Acted since the last accepted play.
    pub acted: BTreeSet<ParticipantId>,
    pub pile: Option<Pile>,
    pub turn: ParticipantId,
    #[serde(skip)]
    last_actor: Option<ParticipantId>,
}

/// What happens after an action has been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Next(ParticipantId),
    Closed { winner: ParticipantId },
}

/// Traversal for a round opened by `starter`: seating order starting at the
/// starter, skipping anyone without cards.
pub fn traversal_order(seating: &Seating, starter: ParticipantId) -> Vec<ParticipantId> {
    let ids = seating.ids();
    let start = ids.iter().position(|id| *id == starter).unwrap_or(0);
    ids.iter()
        .cycle()
        .skip(start)
        .take(ids.len())
        .filter(|id| seating.get(**id).is_some_and(|p| p.has_cards()))
        .copied()
        .collect()
}

impl Round {
    pub fn open(seating: &Seating, starter: ParticipantId) -> Result<Round, DomainError> {
        let holds = seating.get(starter).is_some_and(|p| p.has_cards());
        if !holds {
            return Err(DomainError::inconsistent(format!(
                "round starter {starter} holds no cards"
            )));
        }
        Ok(Round {
            starter,
            order: traversal_order(seating, starter),
            acted: BTreeSet::new(),
            pile: None,
            turn: starter,
            last_actor: None,
        })
    }

    pub fn is_opening(&self) -> bool {
        self.pile.is_none()
    }

    /// Guard: `actor` holds the turn and has not acted this lap.
    pub fn ensure_turn(&self, actor: ParticipantId) -> Result<(), DomainError> {
        if self.acted.contains(&actor) {
            return Err(DomainError::AlreadyActed);
        }
        if self.turn != actor {
            return Err(DomainError::NotYourTurn);
        }
        Ok(())
    }

    /// An accepted play restarts the lap with only the player marked.
    pub fn record_play(&mut self, actor: ParticipantId, pile: Pile) {
        self.acted.clear();
        self.acted.insert(actor);
        self.pile = Some(pile);
        self.last_actor = Some(actor);
    }

    pub fn record_pass(&mut self, actor: ParticipantId) {
        self.acted.insert(actor);
        self.last_actor = Some(actor);
    }

    /// Who made the last accepted play, or the starter if nobody did.
    pub fn winner(&self) -> ParticipantId {
        self.pile
            .as_ref()
            .map(|p| p.last_played_by)
            .unwrap_or(self.starter)
    }

    /// Walk the traversal after the last actor; the first participant who
    /// has not acted and still holds cards gets the turn.
    pub fn advance(&mut self, seating: &Seating) -> TurnOutcome {
        let from = self
            .last_actor
            .and_then(|a| self.order.iter().position(|id| *id == a))
            .map(|i| i + 1)
            .unwrap_or(0);
        let len = self.order.len();

        let next = (0..len)
            .map(|step| self.order[(from + step) % len.max(1)])
            .find(|id| {
                !self.acted.contains(id) && seating.get(*id).is_some_and(|p| p.has_cards())
            });

        match next {
            Some(id) => {
                self.turn = id;
                TurnOutcome::Next(id)
            }
            None => TurnOutcome::Closed {
                winner: self.winner(),
            },
        }
    }
}
