//! Seating: who is in the room, in turn order, and who hosts it.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Card;
use crate::errors::domain::DomainError;
use crate::errors::ErrorCode;

pub const MAX_REAL_PARTICIPANTS: usize = 8;
pub const MAX_NAME_CHARS: usize = 18;

const DEFAULT_NAME: &str = "Speler";
const DEFAULT_EMOJI: &str = "🦊";
const DEFAULT_COLOR: &str = "#6ae4a6";

const FILLER_NAME: &str = "Dummy";
const FILLER_EMOJI: &str = "🤖";
const FILLER_COLOR: &str = "#9fb0c3";

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display profile supplied on create/join. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ParticipantKind {
    Real,
    /// Synthetic seat that always passes.
    Filler,
}

#[derive(Debug, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub emoji: String,
    pub color: String,
    pub kind: ParticipantKind,
    pub hand: Vec<Card>,
}

impl Participant {
    pub fn real(id: ParticipantId, profile: &Profile) -> Self {
        Self {
            id,
            name: bounded_name(profile.name.as_deref()),
            emoji: non_empty(profile.emoji.as_deref()).unwrap_or(DEFAULT_EMOJI).to_string(),
            color: non_empty(profile.color.as_deref()).unwrap_or(DEFAULT_COLOR).to_string(),
            kind: ParticipantKind::Real,
            hand: Vec::new(),
        }
    }

    pub fn filler() -> Self {
        Self {
            id: ParticipantId::new(),
            name: FILLER_NAME.to_string(),
            emoji: FILLER_EMOJI.to_string(),
            color: FILLER_COLOR.to_string(),
            kind: ParticipantKind::Filler,
            hand: Vec::new(),
        }
    }

    pub fn is_filler(&self) -> bool {
        self.kind == ParticipantKind::Filler
    }

    pub fn has_cards(&self) -> bool {
        !self.hand.is_empty()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn bounded_name(name: Option<&str>) -> String {
    non_empty(name)
        .unwrap_or(DEFAULT_NAME)
        .chars()
        .take(MAX_NAME_CHARS)
        .collect()
}

/// What others may see about a seat. Hand contents are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicParticipant {
    pub id: ParticipantId,
    pub name: String,
    pub emoji: String,
    pub color: String,
    pub card_count: usize,
    pub is_filler: bool,
    pub is_host: bool,
}

/// Effect of a departure on the seating.
#[derive(Debug, Clone)]
pub struct Departure {
    pub removed: Participant,
    pub new_host: Option<ParticipantId>,
}

/// Filler reconciliation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillerChange {
    Inserted(ParticipantId),
    Removed(ParticipantId),
    Unchanged,
}

/// Ordered seats (seating order is turn order) plus the host.
#[derive(Debug, Clone, Default)]
pub struct Seating {
    seats: Vec<Participant>,
    host: Option<ParticipantId>,
}

impl Seating {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(&self) -> Option<ParticipantId> {
        self.host
    }

    pub fn is_host(&self, id: ParticipantId) -> bool {
        self.host == Some(id)
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.seats.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Participant> {
        self.seats.iter_mut()
    }

    pub fn ids(&self) -> Vec<ParticipantId> {
        self.seats.iter().map(|p| p.id).collect()
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.seats.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.seats.iter_mut().find(|p| p.id == id)
    }

    pub fn require(&self, id: ParticipantId) -> Result<&Participant, DomainError> {
        self.get(id).ok_or_else(|| not_seated(id))
    }

    pub fn require_mut(&mut self, id: ParticipantId) -> Result<&mut Participant, DomainError> {
        self.get_mut(id).ok_or_else(|| not_seated(id))
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.get(id).is_some()
    }

    pub fn real_count(&self) -> usize {
        self.seats.iter().filter(|p| !p.is_filler()).count()
    }

    pub fn filler_id(&self) -> Option<ParticipantId> {
        self.seats.iter().find(|p| p.is_filler()).map(|p| p.id)
    }

    pub fn is_filler(&self, id: ParticipantId) -> bool {
        self.get(id).is_some_and(Participant::is_filler)
    }

    /// Real participants still holding cards, in seating order.
    pub fn real_holders(&self) -> Vec<ParticipantId> {
        self.seats
            .iter()
            .filter(|p| !p.is_filler() && p.has_cards())
            .map(|p| p.id)
            .collect()
    }

    /// Seat a new real participant. The first one becomes host.
    pub fn add_real(
        &mut self,
        id: ParticipantId,
        profile: &Profile,
    ) -> Result<&Participant, DomainError> {
        if self.real_count() >= MAX_REAL_PARTICIPANTS {
            return Err(DomainError::validation(
                ErrorCode::RoomFull,
                format!("This room already has {MAX_REAL_PARTICIPANTS} players."),
            ));
        }
        if self.contains(id) {
            return Err(DomainError::inconsistent(format!(
                "participant {id} is already seated"
            )));
        }

        // Real seats stay ahead of the filler so it always sits last.
        let insert_at = self
            .seats
            .iter()
            .position(Participant::is_filler)
            .unwrap_or(self.seats.len());
        self.seats.insert(insert_at, Participant::real(id, profile));
        if self.host.is_none() {
            self.host = Some(id);
        }
        Ok(&self.seats[insert_at])
    }

    /// Remove a participant. If they hosted, the next real participant in
    /// seating order takes over.
    pub fn remove(&mut self, id: ParticipantId) -> Option<Departure> {
        let idx = self.seats.iter().position(|p| p.id == id)?;
        let removed = self.seats.remove(idx);

        let mut new_host = None;
        if self.host == Some(id) {
            self.host = self.seats.iter().find(|p| !p.is_filler()).map(|p| p.id);
            new_host = self.host;
        }

        Some(Departure { removed, new_host })
    }

    /// Insert a filler when exactly two real participants are seated and
    /// none exists; remove it otherwise.
    pub fn sync_filler(&mut self) -> FillerChange {
        let wanted = self.real_count() == 2;
        match (wanted, self.filler_id()) {
            (true, None) => {
                let filler = Participant::filler();
                let id = filler.id;
                self.seats.push(filler);
                FillerChange::Inserted(id)
            }
            (false, Some(id)) => {
                self.seats.retain(|p| !p.is_filler());
                FillerChange::Removed(id)
            }
            _ => FillerChange::Unchanged,
        }
    }

    pub fn clear_hands(&mut self) {
        for p in &mut self.seats {
            p.hand.clear();
        }
    }

    pub fn total_cards(&self) -> usize {
        self.seats.iter().map(|p| p.hand.len()).sum()
    }

    pub fn public_view(&self) -> Vec<PublicParticipant> {
        self.seats
            .iter()
            .map(|p| PublicParticipant {
                id: p.id,
                name: p.name.clone(),
                emoji: p.emoji.clone(),
                color: p.color.clone(),
                card_count: p.hand.len(),
                is_filler: p.is_filler(),
                is_host: self.host == Some(p.id),
            })
            .collect()
    }

    pub fn public(&self, id: ParticipantId) -> Option<PublicParticipant> {
        self.public_view().into_iter().find(|p| p.id == id)
    }

    pub fn name_of(&self, id: ParticipantId) -> String {
        self.get(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "?".to_string())
    }
}

fn not_seated(id: ParticipantId) -> DomainError {
    DomainError::NotFound(
        crate::errors::domain::NotFoundKind::Participant,
        format!("Participant {id} is not in this room"),
    )
}
