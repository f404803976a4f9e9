use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::{ParticipantId, Profile};
use crate::errors::domain::NotFoundKind;
use crate::errors::{DomainError, ErrorCode};
use crate::services::room_actor::{Act, Intent, Join, Leave, RoomActor, RoomEvent};
use crate::state::app_state::AppState;
use crate::utils::join_code::normalize_room_code;
use crate::ws::protocol::{Ack, ClientFrame, ClientMsg, ServerMsg, PROTOCOL_VERSION};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    ws::start(WsSession::new(app_state), &req, stream)
}

/// Room the session is seated in.
struct Seat {
    code: String,
    addr: Addr<RoomActor>,
}

/// One websocket connection, acting as one participant.
pub struct WsSession {
    participant: ParticipantId,
    app_state: web::Data<AppState>,
    seat: Option<Seat>,
    last_heartbeat: Instant,
}

impl WsSession {
    fn new(app_state: web::Data<AppState>) -> Self {
        Self {
            participant: ParticipantId::new(),
            app_state,
            seat: None,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_ack(ctx: &mut ws::WebsocketContext<Self>, ack: Ack) {
        Self::send_json(ctx, &ServerMsg::Ack(ack));
    }

    fn send_error_and_close(
        &self,
        ctx: &mut ws::WebsocketContext<Self>,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        let msg = ServerMsg::Error {
            code,
            message: message.into(),
        };
        Self::send_json(ctx, &msg);
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    participant = %actor.participant,
                    "[WS SESSION] heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    /// Drop the current seat, telling the room.
    fn vacate(&mut self) {
        if let Some(seat) = self.seat.take() {
            seat.addr.do_send(Leave {
                participant: self.participant,
            });
        }
    }

    fn handle_frame(&mut self, frame: ClientFrame, ctx: &mut ws::WebsocketContext<Self>) {
        let ClientFrame { request_id, msg } = frame;
        let intent = match msg {
            ClientMsg::CreateRoom { profile } => return self.create_room(request_id, profile, ctx),
            ClientMsg::JoinRoom { room_code, profile } => {
                return self.join_room(request_id, room_code, profile, ctx)
            }
            ClientMsg::LeaveRoom => {
                self.vacate();
                return Self::send_ack(ctx, Ack::accepted(request_id));
            }
            ClientMsg::StartGame => Intent::StartGame,
            ClientMsg::Rematch => Intent::Rematch,
            ClientMsg::PlayCards { card_ids } => Intent::PlayCards { card_ids },
            ClientMsg::Pass => Intent::Pass,
            ClientMsg::SelectMode { mode } => Intent::SelectMode { mode },
            ClientMsg::BackToLobby => Intent::BackToLobby,
        };
        self.act(request_id, intent, ctx);
    }

    fn create_room(
        &mut self,
        request_id: Option<Value>,
        profile: Profile,
        ctx: &mut ws::WebsocketContext<Self>,
    ) {
        self.vacate();
        let session = ctx.address().recipient::<RoomEvent>();
        let created = self.app_state.rooms.create(
            &self.app_state.config,
            self.participant,
            &profile,
            Some(session),
        );
        match created {
            Ok(created) => {
                info!(
                    participant = %self.participant,
                    room = %created.code,
                    "[WS SESSION] room created"
                );
                self.seat = Some(Seat {
                    code: created.code.clone(),
                    addr: created.addr,
                });
                Self::send_ack(ctx, Ack::entered(request_id, created.code, created.you));
            }
            Err(err) => Self::send_ack(ctx, Ack::rejected(request_id, &err)),
        }
    }

    fn join_room(
        &mut self,
        request_id: Option<Value>,
        room_code: String,
        profile: Profile,
        ctx: &mut ws::WebsocketContext<Self>,
    ) {
        let code = normalize_room_code(&room_code);
        let Some(addr) = self.app_state.rooms.get(&code) else {
            let err = DomainError::room_not_found(&code);
            return Self::send_ack(ctx, Ack::rejected(request_id, &err));
        };
        if self.seat.as_ref().is_some_and(|seat| seat.code != code) {
            self.vacate();
        }

        let join = Join {
            participant: self.participant,
            profile,
            session: ctx.address().recipient(),
        };
        ctx.spawn(
            addr.send(join)
                .into_actor(self)
                .map(move |res, actor, ctx| match res {
                    Ok(Ok(joined)) => {
                        actor.seat = Some(Seat {
                            code: code.clone(),
                            addr,
                        });
                        Self::send_ack(ctx, Ack::entered(request_id, code, joined.you));
                    }
                    Ok(Err(err)) => Self::send_ack(ctx, Ack::rejected(request_id, &err)),
                    Err(_) => {
                        // The room stopped between lookup and join.
                        let err = DomainError::room_not_found(&code);
                        Self::send_ack(ctx, Ack::rejected(request_id, &err));
                    }
                }),
        );
    }

    fn act(
        &mut self,
        request_id: Option<Value>,
        intent: Intent,
        ctx: &mut ws::WebsocketContext<Self>,
    ) {
        let Some(seat) = &self.seat else {
            let err = DomainError::NotFound(NotFoundKind::Room, "You are not in a room.".into());
            return Self::send_ack(ctx, Ack::rejected(request_id, &err));
        };
        let code = seat.code.clone();
        let act = Act {
            participant: self.participant,
            intent,
        };
        ctx.spawn(
            seat.addr
                .send(act)
                .into_actor(self)
                .map(move |res, actor, ctx| match res {
                    Ok(Ok(())) => Self::send_ack(ctx, Ack::accepted(request_id)),
                    Ok(Err(err)) => {
                        debug!(
                            participant = %actor.participant,
                            room = %code,
                            code = %err.code(),
                            "[WS SESSION] intent rejected"
                        );
                        Self::send_ack(ctx, Ack::rejected(request_id, &err));
                    }
                    Err(_) => {
                        actor.seat = None;
                        let err = DomainError::room_not_found(&code);
                        Self::send_ack(ctx, Ack::rejected(request_id, &err));
                    }
                }),
        );
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(participant = %self.participant, "[WS SESSION] started");
        self.start_heartbeat(ctx);
        Self::send_json(
            ctx,
            &ServerMsg::Welcome {
                protocol: PROTOCOL_VERSION,
                participant_id: self.participant,
            },
        );
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        // A closed socket is a departure.
        self.vacate();
        info!(participant = %self.participant, "[WS SESSION] stopped");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                match serde_json::from_str::<ClientFrame>(&text) {
                    Ok(frame) => self.handle_frame(frame, ctx),
                    Err(err) => Self::send_json(
                        ctx,
                        &ServerMsg::Error {
                            code: ErrorCode::BadRequest,
                            message: format!("Malformed message: {err}"),
                        },
                    ),
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                self.send_error_and_close(ctx, ErrorCode::BadProtocol, "Binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    participant = %self.participant,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<RoomEvent> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: RoomEvent, ctx: &mut Self::Context) -> Self::Result {
        match msg {
            RoomEvent::State(snapshot) => {
                Self::send_json(ctx, &ServerMsg::RoomState { snapshot });
            }
            RoomEvent::YourTurn { room_code } => {
                Self::send_json(ctx, &ServerMsg::YourTurn { room_code });
            }
        }
    }
}
