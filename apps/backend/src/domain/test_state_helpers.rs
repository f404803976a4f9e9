//! Test-only room builders for domain unit tests.

use crate::domain::cards_parsing::try_mint_cards;
use crate::domain::participants::{ParticipantId, Profile};
use crate::domain::round::Round;
use crate::domain::state::{Phase, Room, RoomSettings};
use crate::domain::validation::GameMode;

pub fn profile(name: &str) -> Profile {
    Profile {
        name: Some(name.to_string()),
        ..Profile::default()
    }
}

/// Lobby room with `n` real participants; the first is host.
pub fn lobby_room(n: usize, seed: u64) -> (Room, Vec<ParticipantId>) {
    let host = ParticipantId::new();
    let (mut room, _) = Room::open("TEST", seed, RoomSettings::default(), host, &profile("P0"))
        .expect("open room");
    let mut ids = vec![host];
    for i in 1..n {
        let id = ParticipantId::new();
        room.join(id, &profile(&format!("P{i}"))).expect("join");
        ids.push(id);
    }
    (room, ids)
}

/// Room in play with fixed hands for the real participants (in seating
/// order). A filler, if seated, gets `filler_hand`. `starter` opens.
pub fn playing_room(
    hands: &[&[&str]],
    filler_hand: &[&str],
    mode: GameMode,
    starter: usize,
) -> (Room, Vec<ParticipantId>) {
    let (mut room, ids) = lobby_room(hands.len(), 7);
    for (id, hand) in ids.iter().zip(hands) {
        room.seating.get_mut(*id).expect("seated").hand =
            try_mint_cards(hand.iter()).expect("valid tokens");
    }
    if let Some(filler) = room.seating.filler_id() {
        room.seating.get_mut(filler).expect("filler").hand =
            try_mint_cards(filler_hand.iter()).expect("valid tokens");
    }
    room.mode = mode;
    let round = Round::open(&room.seating, ids[starter]).expect("open round");
    room.phase = Phase::Playing {
        round,
        finish_order: Vec::new(),
        closing: None,
        table: 0,
        dealt: room.seating.total_cards(),
    };
    room.game_no = 1;
    (room, ids)
}

/// Ids of the cards in `who`'s hand matching the given tokens, in order.
pub fn pick(room: &Room, who: ParticipantId, tokens: &[&str]) -> Vec<crate::domain::CardId> {
    let mut hand = room.seating.get(who).expect("seated").hand.clone();
    tokens
        .iter()
        .map(|t| {
            let face: crate::domain::CardFace = t.parse().expect("valid token");
            let pos = hand
                .iter()
                .position(|c| c.rank == face.rank && c.suit == face.suit)
                .expect("card in hand");
            hand.remove(pos).id
        })
        .collect()
}
