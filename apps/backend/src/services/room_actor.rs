//! One actor per room.
//!
//! The actor owns the [`Room`] aggregate; every intent arrives as a message,
//! so the mailbox serialises them. Round and exchange pauses are scheduled
//! with `ctx.wait`, which holds back the mailbox until they fire.

use std::collections::HashMap;
use std::sync::Weak;
use std::time::Duration;

use actix::prelude::*;
use tracing::{debug, error, info, warn};

use crate::config::GameConfig;
use crate::domain::game_transition::{derive_room_transitions, RoomLifecycleView, RoomTransition};
use crate::domain::snapshot::{snapshot_for, summary_of, RoomSnapshot, RoomSummary};
use crate::domain::{CardId, Continuation, Joined, LeaveOutcome, ParticipantId, Pause, Profile, Room};
use crate::errors::DomainError;
use crate::services::room_store::RoomStore;

/// Pushed to a participant's session.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub enum RoomEvent {
    /// Fresh view of the room for this recipient.
    State(Box<RoomSnapshot>),
    /// The recipient just became the turn holder.
    YourTurn { room_code: String },
}

#[derive(Message)]
#[rtype(result = "Result<Joined, DomainError>")]
pub struct Join {
    pub participant: ParticipantId,
    pub profile: Profile,
    pub session: Recipient<RoomEvent>,
}

#[derive(Message)]
#[rtype(result = "Result<LeaveOutcome, DomainError>")]
pub struct Leave {
    pub participant: ParticipantId,
}

/// In-game intents of a seated participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    StartGame,
    Rematch,
    PlayCards { card_ids: Vec<CardId> },
    Pass,
    SelectMode { mode: String },
    BackToLobby,
}

impl Intent {
    fn name(&self) -> &'static str {
        match self {
            Intent::StartGame => "start_game",
            Intent::Rematch => "rematch",
            Intent::PlayCards { .. } => "play_cards",
            Intent::Pass => "pass",
            Intent::SelectMode { .. } => "select_mode",
            Intent::BackToLobby => "back_to_lobby",
        }
    }
}

#[derive(Message)]
#[rtype(result = "Result<(), DomainError>")]
pub struct Act {
    pub participant: ParticipantId,
    pub intent: Intent,
}

#[derive(Message)]
#[rtype(result = "RoomSummary")]
pub struct Summarize;

#[derive(Message)]
#[rtype(result = "Option<RoomSnapshot>")]
pub struct SnapshotFor {
    pub participant: ParticipantId,
}

pub struct RoomActor {
    room: Room,
    sessions: HashMap<ParticipantId, Recipient<RoomEvent>>,
    round_pause: Duration,
    exchange_pause: Duration,
    store: Weak<RoomStore>,
}

impl RoomActor {
    pub fn new(
        room: Room,
        creator: Option<(ParticipantId, Recipient<RoomEvent>)>,
        config: &GameConfig,
        store: Weak<RoomStore>,
    ) -> Self {
        Self {
            room,
            sessions: creator.into_iter().collect(),
            round_pause: config.round_pause,
            exchange_pause: config.exchange_pause,
            store,
        }
    }

    /// Run a room mutation, then publish what changed and schedule any
    /// follow-up step.
    fn apply<T>(
        &mut self,
        ctx: &mut Context<Self>,
        action: &'static str,
        mutation: impl FnOnce(&mut Room) -> Result<(T, Option<Continuation>), DomainError>,
    ) -> Result<T, DomainError> {
        let before = RoomLifecycleView::of(&self.room);
        let result = mutation(&mut self.room);
        let after = RoomLifecycleView::of(&self.room);

        let value = match result {
            Ok((value, continuation)) => {
                if let Some(continuation) = continuation {
                    self.schedule(ctx, continuation);
                }
                Ok(value)
            }
            Err(err @ DomainError::Inconsistent(_)) => {
                error!(
                    room = %self.room.code,
                    action,
                    error = %err,
                    "room state inconsistent; back to lobby"
                );
                Err(err)
            }
            Err(err) => {
                debug!(room = %self.room.code, action, code = %err.code(), "intent rejected");
                return Err(err);
            }
        };

        let transitions = derive_room_transitions(&before, &after);
        self.publish(&transitions);
        value
    }

    fn publish(&self, transitions: &[RoomTransition]) {
        for transition in transitions {
            match transition {
                RoomTransition::TurnBecame { participant } => {
                    if let Some(session) = self.sessions.get(participant) {
                        session.do_send(RoomEvent::YourTurn {
                            room_code: self.room.code.clone(),
                        });
                    }
                }
                RoomTransition::GameStarted => info!(
                    room = %self.room.code,
                    epoch = self.room.epoch,
                    mode = %self.room.mode,
                    "game started"
                ),
                RoomTransition::GameEnded => info!(room = %self.room.code, "game ended"),
                RoomTransition::ReturnedToLobby => {
                    info!(room = %self.room.code, epoch = self.room.epoch, "back to lobby")
                }
            }
        }
        for (participant, session) in &self.sessions {
            let snapshot = snapshot_for(&self.room, *participant);
            session.do_send(RoomEvent::State(Box::new(snapshot)));
        }
    }

    fn schedule(&mut self, ctx: &mut Context<Self>, continuation: Continuation) {
        let delay = match continuation.step.pause() {
            Pause::Round => self.round_pause,
            Pause::Exchange => self.exchange_pause,
        };
        debug!(
            room = %self.room.code,
            step = ?continuation.step,
            epoch = continuation.epoch,
            delay_ms = delay.as_millis() as u64,
            "continuation scheduled"
        );
        ctx.wait(
            actix::clock::sleep(delay)
                .into_actor(self)
                .map(move |_, actor, ctx| actor.resume(ctx, continuation)),
        );
    }

    fn resume(&mut self, ctx: &mut Context<Self>, continuation: Continuation) {
        if !self.room.is_current(&continuation) {
            debug!(
                room = %self.room.code,
                step = ?continuation.step,
                "stale continuation dropped"
            );
            return;
        }
        let _ = self.apply(ctx, "resume", |room| {
            room.resume(continuation).map(|next| ((), next))
        });
    }
}

impl Actor for RoomActor {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!(room = %self.room.code, "room opened");
        self.publish(&[]);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some(store) = self.store.upgrade() {
            store.remove(&self.room.code);
        }
        info!(room = %self.room.code, "room closed");
    }
}

impl Handler<Join> for RoomActor {
    type Result = Result<Joined, DomainError>;

    fn handle(&mut self, msg: Join, ctx: &mut Self::Context) -> Self::Result {
        let Join {
            participant,
            profile,
            session,
        } = msg;
        // Register first so the joiner receives the resulting snapshot.
        let previous = self.sessions.insert(participant, session);
        let joined = self.apply(ctx, "join", |room| {
            room.join(participant, &profile).map(|joined| (joined, None))
        });
        match &joined {
            Ok(joined) => info!(
                room = %self.room.code,
                participant = %participant,
                rejoined = joined.rejoined,
                "participant joined"
            ),
            Err(_) => match previous {
                Some(previous) => {
                    self.sessions.insert(participant, previous);
                }
                None => {
                    self.sessions.remove(&participant);
                }
            },
        }
        joined
    }
}

impl Handler<Leave> for RoomActor {
    type Result = Result<LeaveOutcome, DomainError>;

    fn handle(&mut self, msg: Leave, ctx: &mut Self::Context) -> Self::Result {
        let participant = msg.participant;
        let session = self.sessions.remove(&participant);
        let outcome = self.apply(ctx, "leave", |room| {
            room.leave(participant).map(|outcome| (outcome, None))
        });
        match &outcome {
            Ok(LeaveOutcome::RoomEmpty) => {
                info!(room = %self.room.code, participant = %participant, "last participant left");
                ctx.stop();
            }
            Ok(LeaveOutcome::Left { new_host }) => info!(
                room = %self.room.code,
                participant = %participant,
                new_host = ?new_host,
                "participant left"
            ),
            Err(err) => {
                warn!(room = %self.room.code, participant = %participant, error = %err, "leave refused");
                if let Some(session) = session {
                    self.sessions.insert(participant, session);
                }
            }
        }
        outcome
    }
}

impl Handler<Act> for RoomActor {
    type Result = Result<(), DomainError>;

    fn handle(&mut self, msg: Act, ctx: &mut Self::Context) -> Self::Result {
        let Act { participant, intent } = msg;
        self.apply(ctx, intent.name(), |room| {
            let continuation = match intent {
                Intent::StartGame => room.start_game(participant).map(|_| None),
                Intent::Rematch => room.rematch(participant).map(|_| None),
                Intent::PlayCards { card_ids } => room.play_cards(participant, &card_ids),
                Intent::Pass => room.pass(participant),
                Intent::SelectMode { mode } => room.select_mode(participant, &mode),
                Intent::BackToLobby => room.back_to_lobby(participant).map(|_| None),
            }?;
            Ok(((), continuation))
        })
    }
}

impl Handler<Summarize> for RoomActor {
    type Result = MessageResult<Summarize>;

    fn handle(&mut self, _msg: Summarize, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(summary_of(&self.room))
    }
}

impl Handler<SnapshotFor> for RoomActor {
    type Result = Option<RoomSnapshot>;

    fn handle(&mut self, msg: SnapshotFor, _ctx: &mut Self::Context) -> Self::Result {
        self.room
            .seating
            .contains(msg.participant)
            .then(|| snapshot_for(&self.room, msg.participant))
    }
}
