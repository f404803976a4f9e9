//! The contested pile of the active round.

use serde::Serialize;

use crate::domain::cards_logic::red_count;
use crate::domain::participants::ParticipantId;
use crate::domain::validation::{PlayKind, ValidatedPlay};
use crate::domain::{CardFace, Rank};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pile {
    pub rank: Rank,
    pub count: usize,
    pub shown: Vec<CardFace>,
    pub last_played_by: ParticipantId,
    /// Set by a raise; blocks appending until the round ends.
    pub raised: bool,
}

impl Pile {
    pub fn red_count(&self) -> usize {
        red_count(&self.shown)
    }

    /// Pile state after `play` by `by`. Merges for an append, replaces
    /// otherwise.
    pub fn after(current: Option<&Pile>, play: &ValidatedPlay, by: ParticipantId) -> Pile {
        let faces: Vec<CardFace> = play.cards.iter().map(CardFace::from).collect();
        match (play.kind, current) {
            (PlayKind::Append, Some(pile)) => {
                let mut shown = pile.shown.clone();
                shown.extend(faces);
                Pile {
                    rank: pile.rank,
                    count: pile.count + play.cards.len(),
                    shown,
                    last_played_by: by,
                    raised: pile.raised,
                }
            }
            (kind, _) => Pile {
                rank: play.rank,
                count: play.cards.len(),
                shown: faces,
                last_played_by: by,
                raised: kind == PlayKind::Raise,
            },
        }
    }
}
