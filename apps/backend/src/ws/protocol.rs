use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::snapshot::RoomSnapshot;
use crate::domain::{CardId, ParticipantId, Profile, PublicParticipant};
use crate::errors::{DomainError, ErrorCode};

pub const PROTOCOL_VERSION: i32 = 1;

/// Inbound frame: a message plus an optional id echoed in its ack.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientFrame {
    #[serde(default)]
    pub request_id: Option<Value>,
    #[serde(flatten)]
    pub msg: ClientMsg,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    CreateRoom {
        #[serde(default)]
        profile: Profile,
    },
    JoinRoom {
        room_code: String,
        #[serde(default)]
        profile: Profile,
    },
    LeaveRoom,
    StartGame,
    Rematch,
    PlayCards {
        card_ids: Vec<CardId>,
    },
    Pass,
    SelectMode {
        mode: String,
    },
    BackToLobby,
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    Welcome {
        protocol: i32,
        participant_id: ParticipantId,
    },

    Ack(Ack),

    RoomState {
        snapshot: Box<RoomSnapshot>,
    },

    YourTurn {
        room_code: String,
    },

    Error {
        code: ErrorCode,
        message: String,
    },
}

/// Outcome of one client request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ack {
    pub request_id: Option<Value>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub you: Option<PublicParticipant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Ack {
    pub fn accepted(request_id: Option<Value>) -> Self {
        Self {
            request_id,
            ok: true,
            ..Self::default()
        }
    }

    pub fn entered(
        request_id: Option<Value>,
        room_code: String,
        you: PublicParticipant,
    ) -> Self {
        Self {
            room_code: Some(room_code),
            you: Some(you),
            ..Self::accepted(request_id)
        }
    }

    pub fn rejected(request_id: Option<Value>, err: &DomainError) -> Self {
        Self {
            request_id,
            ok: false,
            code: Some(err.code()),
            reason: Some(err.reason()),
            ..Self::default()
        }
    }
}
