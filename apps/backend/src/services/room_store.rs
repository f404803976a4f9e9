//! Live rooms by code.

use std::sync::Arc;

use actix::{Actor, Addr, Recipient};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::warn;

use crate::config::GameConfig;
use crate::domain::dealing::fresh_room_seed;
use crate::domain::{ParticipantId, Profile, PublicParticipant, Room};
use crate::errors::{DomainError, ErrorCode};
use crate::services::room_actor::{RoomActor, RoomEvent};
use crate::utils::join_code::{generate_room_code, normalize_room_code};

const MAX_CODE_ATTEMPTS: usize = 64;

/// A freshly opened room.
pub struct CreatedRoom {
    pub code: String,
    pub addr: Addr<RoomActor>,
    pub you: PublicParticipant,
}

#[derive(Default)]
pub struct RoomStore {
    rooms: DashMap<String, Addr<RoomActor>>,
}

impl RoomStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Look up a room by user-typed code.
    pub fn get(&self, code: &str) -> Option<Addr<RoomActor>> {
        self.rooms
            .get(&normalize_room_code(code))
            .map(|entry| entry.value().clone())
    }

    /// Open a room under a fresh code with `creator` seated as host and
    /// start its actor.
    pub fn create(
        self: &Arc<Self>,
        config: &GameConfig,
        creator: ParticipantId,
        profile: &Profile,
        session: Option<Recipient<RoomEvent>>,
    ) -> Result<CreatedRoom, DomainError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_room_code();
            let Entry::Vacant(slot) = self.rooms.entry(code.clone()) else {
                continue;
            };
            let (room, you) = Room::open(
                code.clone(),
                fresh_room_seed(),
                config.room_settings(),
                creator,
                profile,
            )?;
            let creator_session = session.map(|s| (creator, s));
            let addr = RoomActor::new(room, creator_session, config, Arc::downgrade(self)).start();
            slot.insert(addr.clone());
            return Ok(CreatedRoom { code, addr, you });
        }
        warn!(rooms = self.len(), "no free room code");
        Err(DomainError::validation(
            ErrorCode::Internal,
            "Could not allocate a room code. Try again.",
        ))
    }

    pub fn remove(&self, code: &str) -> bool {
        self.rooms.remove(code).is_some()
    }
}
