// apps/backend/src/domain/game_transition.rs

use crate::domain::participants::ParticipantId;
use crate::domain::state::{PhaseKind, Room};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLifecycleView {
    pub epoch: u64,
    pub turn: Option<ParticipantId>,
    pub phase: PhaseKind,
}

impl RoomLifecycleView {
    pub fn of(room: &Room) -> Self {
        Self {
            epoch: room.epoch,
            turn: room.current_turn(),
            phase: room.phase_kind(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomTransition {
    /// Edge-triggered: the turn became a specific participant.
    TurnBecame { participant: ParticipantId },

    /// Edge-triggered: play started (lobby, ended or mode select -> playing)
    GameStarted,

    /// Edge-triggered: playing -> ended
    GameEnded,

    /// Edge-triggered: any other phase -> lobby
    ReturnedToLobby,
}

/// Derive transitions from before/after lifecycle state.
pub fn derive_room_transitions(
    before: &RoomLifecycleView,
    after: &RoomLifecycleView,
) -> Vec<RoomTransition> {
    let mut transitions = Vec::new();

    // A rematch keeps the phase but moves the epoch; that is a new game too.
    let restarted = before.epoch != after.epoch;

    if let Some(participant) = after.turn {
        if before.turn != Some(participant) || restarted {
            transitions.push(RoomTransition::TurnBecame { participant });
        }
    }

    if after.phase == PhaseKind::Playing && (before.phase != PhaseKind::Playing || restarted) {
        transitions.push(RoomTransition::GameStarted);
    }

    if before.phase == PhaseKind::Playing && after.phase == PhaseKind::Ended {
        transitions.push(RoomTransition::GameEnded);
    }

    if before.phase != PhaseKind::Lobby && after.phase == PhaseKind::Lobby {
        transitions.push(RoomTransition::ReturnedToLobby);
    }

    transitions
}
