//! Per-recipient views of a room. Only the recipient's own hand is included.

use serde::Serialize;

use crate::domain::activity_log::ActivityEntry;
use crate::domain::participants::{ParticipantId, PublicParticipant};
use crate::domain::pile::Pile;
use crate::domain::reward::ExchangeSummary;
use crate::domain::state::{GameResult, Phase, PhaseKind, Room};
use crate::domain::validation::GameMode;
use crate::domain::Card;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModeOption {
    pub key: GameMode,
    pub label: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModeChoice {
    pub chooser: ParticipantId,
    pub options: Vec<ModeOption>,
}

/// Round details visible to everyone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoundView {
    pub starter: ParticipantId,
    pub pile: Option<Pile>,
    /// Acted since the last play.
    pub acted: Vec<ParticipantId>,
    /// Winner of a round that is about to be cleared.
    pub closing: Option<ParticipantId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoomSnapshot {
    pub room_code: String,
    pub phase: PhaseKind,
    pub host: Option<ParticipantId>,
    pub mode: GameMode,
    pub turn: Option<ParticipantId>,
    pub participants: Vec<PublicParticipant>,
    pub you: ParticipantId,
    pub hand: Vec<Card>,
    pub round: Option<RoundView>,
    pub finish_order: Vec<ParticipantId>,
    pub activity: Vec<ActivityEntry>,
    pub result: Option<GameResult>,
    pub exchange: Option<ExchangeSummary>,
    pub mode_choice: Option<ModeChoice>,
}

/// Lobby-facing summary for unauthenticated lookups.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoomSummary {
    pub room_code: String,
    pub phase: PhaseKind,
    pub participants: Vec<PublicParticipant>,
    pub joinable: bool,
}

pub fn snapshot_for(room: &Room, viewer: ParticipantId) -> RoomSnapshot {
    let round = match &room.phase {
        Phase::Playing { round, closing, .. } => Some(RoundView {
            starter: round.starter,
            pile: round.pile.clone(),
            acted: round.acted.iter().copied().collect(),
            closing: *closing,
        }),
        _ => None,
    };
    let mode_choice = match &room.phase {
        Phase::ModeSelect { chooser, .. } => Some(ModeChoice {
            chooser: *chooser,
            options: GameMode::ALL
                .into_iter()
                .map(|key| ModeOption {
                    key,
                    label: key.label(),
                })
                .collect(),
        }),
        _ => None,
    };

    RoomSnapshot {
        room_code: room.code.clone(),
        phase: room.phase_kind(),
        host: room.seating.host(),
        mode: room.mode,
        turn: room.current_turn(),
        participants: room.seating.public_view(),
        you: viewer,
        hand: room
            .seating
            .get(viewer)
            .map(|p| p.hand.clone())
            .unwrap_or_default(),
        round,
        finish_order: room.finish_order().to_vec(),
        activity: room.log.recent(),
        result: room.phase.result().cloned(),
        exchange: room.phase.exchange().cloned(),
        mode_choice,
    }
}

pub fn summary_of(room: &Room) -> RoomSummary {
    RoomSummary {
        room_code: room.code.clone(),
        phase: room.phase_kind(),
        participants: room.seating.public_view(),
        joinable: room.joinable(),
    }
}
