//! Play legality for the three rule variants.
//!
//! Validation never mutates anything. `validate` runs the shared
//! preconditions, short-circuits on the special rank, and otherwise defers to
//! the active variant's [`PlayRules`] implementation. The resulting
//! [`ValidatedPlay`] is what the lifecycle later applies to hand and pile.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::cards_logic::{common_rank, red_count};
use crate::domain::pile::Pile;
use crate::domain::{Card, CardFace, CardId, Rank};
use crate::errors::domain::{DomainError, IllegalSetKind};
use crate::errors::ErrorCode;

/// Rule variant chosen for a game.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Traditional,
    Appending,
    #[serde(rename = "kleurbekennen")]
    ColorMatching,
}

impl GameMode {
    pub const ALL: [GameMode; 3] = [
        GameMode::Traditional,
        GameMode::Appending,
        GameMode::ColorMatching,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            GameMode::Traditional => "traditional",
            GameMode::Appending => "appending",
            GameMode::ColorMatching => "kleurbekennen",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            GameMode::Traditional => "Traditioneel",
            GameMode::Appending => "Aanleggen",
            GameMode::ColorMatching => "Kleur bekennen",
        }
    }

    pub fn rules(self) -> &'static dyn PlayRules {
        match self {
            GameMode::Traditional => &Traditional,
            GameMode::Appending => &Appending,
            GameMode::ColorMatching => &ColorMatching,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for GameMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameMode::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                DomainError::validation(ErrorCode::UnknownMode, format!("Unknown game mode: {s}"))
            })
    }
}

/// How an accepted set relates to the pile it lands on.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayKind {
    /// First set of the round.
    Open,
    /// Same count, higher rank (traditional).
    Beat,
    /// Same count, higher rank; replaces the pile and blocks appending.
    Raise,
    /// Same rank, any count; merges into the pile.
    Append,
    /// Special rank; wins the round outright.
    Special,
}

/// A set that passed validation, ready to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPlay {
    pub cards: Vec<Card>,
    pub rank: Rank,
    pub kind: PlayKind,
}

impl ValidatedPlay {
    pub fn ends_round(&self) -> bool {
        self.kind == PlayKind::Special
    }
}

/// A single-rank candidate set taken from the acting hand.
#[derive(Debug, Clone)]
pub struct CandidateSet<'a> {
    pub cards: &'a [Card],
    pub rank: Rank,
}

impl CandidateSet<'_> {
    pub fn count(&self) -> usize {
        self.cards.len()
    }

    pub fn red_count(&self) -> usize {
        let faces: Vec<CardFace> = self.cards.iter().map(CardFace::from).collect();
        red_count(&faces)
    }
}

/// Rule variant contract: judge a non-special set against an existing pile.
pub trait PlayRules: Send + Sync {
    fn mode(&self) -> GameMode;

    fn judge(&self, pile: &Pile, set: &CandidateSet<'_>) -> Result<PlayKind, DomainError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Traditional;

#[derive(Debug, Default, Clone, Copy)]
pub struct Appending;

#[derive(Debug, Default, Clone, Copy)]
pub struct ColorMatching;

impl PlayRules for Traditional {
    fn mode(&self) -> GameMode {
        GameMode::Traditional
    }

    fn judge(&self, pile: &Pile, set: &CandidateSet<'_>) -> Result<PlayKind, DomainError> {
        if set.count() != pile.count {
            return Err(count_mismatch(pile));
        }
        if set.rank <= pile.rank {
            return Err(too_low(pile));
        }
        Ok(PlayKind::Beat)
    }
}

impl PlayRules for Appending {
    fn mode(&self) -> GameMode {
        GameMode::Appending
    }

    fn judge(&self, pile: &Pile, set: &CandidateSet<'_>) -> Result<PlayKind, DomainError> {
        judge_appending(pile, set, |_, _| Ok(()))
    }
}

impl PlayRules for ColorMatching {
    fn mode(&self) -> GameMode {
        GameMode::ColorMatching
    }

    fn judge(&self, pile: &Pile, set: &CandidateSet<'_>) -> Result<PlayKind, DomainError> {
        judge_appending(pile, set, |pile, set| {
            let needed = pile.red_count();
            if set.red_count() == needed {
                Ok(())
            } else {
                Err(DomainError::illegal(
                    IllegalSetKind::ColorMismatch,
                    format!("Follow colour: a raise needs exactly {needed} red card(s)."),
                ))
            }
        })
    }
}

/// Shared body of the two appending variants; `raise_check` adds the
/// variant-specific constraint on raises.
fn judge_appending<F>(pile: &Pile, set: &CandidateSet<'_>, raise_check: F) -> Result<PlayKind, DomainError>
where
    F: Fn(&Pile, &CandidateSet<'_>) -> Result<(), DomainError>,
{
    if set.rank == pile.rank {
        if pile.raised {
            return Err(DomainError::illegal(
                IllegalSetKind::MustRaise,
                "The pile was raised: you can only play higher now.",
            ));
        }
        return Ok(PlayKind::Append);
    }
    if set.count() != pile.count {
        return Err(count_mismatch(pile));
    }
    if set.rank < pile.rank {
        return Err(too_low(pile));
    }
    raise_check(pile, set)?;
    Ok(PlayKind::Raise)
}

fn count_mismatch(pile: &Pile) -> DomainError {
    DomainError::illegal(
        IllegalSetKind::CountMismatch,
        format!("You must play exactly {} card(s).", pile.count),
    )
}

fn too_low(pile: &Pile) -> DomainError {
    DomainError::illegal(
        IllegalSetKind::TooLow,
        format!("Too low: play higher than {}.", pile.rank),
    )
}

/// Shared preconditions: something selected, every id in hand (each card at
/// most once), one rank. Returns the selected cards in selection order.
pub fn select_from_hand(hand: &[Card], card_ids: &[CardId]) -> Result<Vec<Card>, DomainError> {
    if card_ids.is_empty() {
        return Err(DomainError::illegal(
            IllegalSetKind::NoCards,
            "Select at least one card.",
        ));
    }

    let mut remaining: Vec<&Card> = hand.iter().collect();
    let mut selected = Vec::with_capacity(card_ids.len());
    for id in card_ids {
        let pos = remaining.iter().position(|c| c.id == *id).ok_or_else(|| {
            DomainError::illegal(
                IllegalSetKind::CardNotInHand,
                "You are trying to play cards you do not have.",
            )
        })?;
        selected.push(*remaining.swap_remove(pos));
    }

    if common_rank(&selected).is_none() {
        return Err(DomainError::illegal(
            IllegalSetKind::MixedRanks,
            "All selected cards must have the same rank.",
        ));
    }
    Ok(selected)
}

/// Decide whether `card_ids` from `hand` may be played on `pile` under
/// `rules`.
pub fn validate(
    rules: &dyn PlayRules,
    pile: Option<&Pile>,
    hand: &[Card],
    card_ids: &[CardId],
) -> Result<ValidatedPlay, DomainError> {
    let cards = select_from_hand(hand, card_ids)?;
    let rank = common_rank(&cards)
        .ok_or_else(|| DomainError::inconsistent("selected set lost its rank"))?;

    if rank.is_special() {
        return Ok(ValidatedPlay {
            cards,
            rank,
            kind: PlayKind::Special,
        });
    }

    let kind = match pile {
        None => PlayKind::Open,
        Some(pile) => rules.judge(pile, &CandidateSet { cards: &cards, rank })?,
    };
    Ok(ValidatedPlay { cards, rank, kind })
}

/// Remove the played cards from `hand`.
pub fn remove_from_hand(hand: &mut Vec<Card>, play: &ValidatedPlay) {
    hand.retain(|c| !play.cards.iter().any(|p| p.id == c.id));
}
