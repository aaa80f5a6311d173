//! WebSocket live channel.
//!
//! Each connection subscribes to one room. A writer task drains the
//! connection's queue onto the socket; the read loop turns inbound commands
//! into façade calls. Broadcasts reach every subscriber, replies to a failed
//! command reach only the sender.

use super::{ApiError, AppState};
use crate::{Deliver, DeliveryError, GameService, LiveCommand, LiveMessage};
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, Query, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use strictly_tictactoe::{Participant, RoomId};
use tokio::sync::{Notify, mpsc};
use tracing::{debug, error, info, instrument, warn};

/// Query string of the upgrade request.
#[derive(Debug, Default, Deserialize)]
pub struct LiveParams {
    /// Bearer token; connections without one may only observe.
    token: Option<String>,
}

/// Queue feeding one connection's writer. Signals `lagged` when the queue
/// overflows so the connection can be closed.
struct ConnectionSink {
    tx: mpsc::Sender<LiveMessage>,
    lagged: Arc<Notify>,
}

impl Deliver<LiveMessage> for ConnectionSink {
    fn deliver(&self, message: &LiveMessage) -> Result<(), DeliveryError> {
        let result = self.tx.deliver(message);
        if result == Err(DeliveryError::Full) {
            self.lagged.notify_one();
        }
        result
    }
}

/// Checks the room and token, then upgrades.
///
/// The upgrade is taken as a `Result` so an unknown room or bad token is
/// answered with its own status even when the handshake headers are missing.
pub(super) async fn upgrade(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Query(params): Query<LiveParams>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let room_id = RoomId::new(room_id);
    let identity = match admit(state.service(), &room_id, params.token.as_deref()) {
        Ok(identity) => identity,
        Err(e) => return e.into_response(),
    };
    match ws {
        Ok(ws) => ws.on_upgrade(move |socket| run_connection(state, room_id, identity, socket)),
        Err(rejection) => {
            debug!(error = %rejection, "Not a WebSocket handshake");
            rejection.into_response()
        }
    }
}

fn admit(
    service: &GameService,
    room_id: &RoomId,
    token: Option<&str>,
) -> Result<Option<Participant>, ApiError> {
    service.get_room(room_id)?;
    token
        .map(|token| service.authenticate(token).ok_or(ApiError::Unauthorized))
        .transpose()
}

#[instrument(
    skip_all,
    fields(room_id = %room_id, participant = identity.as_ref().map(|p| p.name().as_str()))
)]
async fn run_connection(
    state: AppState,
    room_id: RoomId,
    identity: Option<Participant>,
    socket: WebSocket,
) {
    let (mut outbound, mut inbound) = socket.split();
    let (tx, mut rx) = mpsc::channel::<LiveMessage>(state.subscriber_buffer);
    let lagged = Arc::new(Notify::new());
    let sink = ConnectionSink {
        tx,
        lagged: Arc::clone(&lagged),
    };
    let handle = match state.service().subscribe(&room_id, sink) {
        Ok(handle) => handle,
        Err(e) => {
            warn!(error = %e, "Room vanished before subscription");
            return;
        }
    };
    info!(subscriber = %handle.id(), "Live connection opened");

    let writer = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let text = match serde_json::to_string(&message) {
                Ok(text) => text,
                Err(e) => {
                    error!(error = %e, "Failed to encode live message");
                    continue;
                }
            };
            if outbound.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    loop {
        let frame = tokio::select! {
            frame = inbound.next() => frame,
            () = lagged.notified() => {
                warn!("Subscriber fell behind, closing");
                break;
            }
        };
        let text = match frame {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Close(_))) | None => break,
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                debug!(error = %e, "Socket read failed");
                break;
            }
        };
        let reply = handle_command(state.service(), &room_id, identity.as_ref(), text.as_str());
        if let Some(reply) = reply {
            if let Err(e) = handle.send(&reply) {
                warn!(error = %e, "Reply dropped");
                break;
            }
        }
    }

    state.service().unsubscribe(&handle);
    drop(handle);
    writer.abort();
    info!("Live connection closed");
}

/// Executes one inbound frame for a connection on `room_id`.
///
/// Returns the reply meant for the sender alone. A successful move returns
/// `None`: its new state reaches the sender through the room broadcast.
pub fn handle_command(
    service: &GameService,
    room_id: &RoomId,
    identity: Option<&Participant>,
    text: &str,
) -> Option<LiveMessage> {
    let command = match serde_json::from_str::<LiveCommand>(text) {
        Ok(command) => command,
        Err(e) => {
            debug!(error = %e, "Unparseable live command");
            return Some(LiveMessage::error("Invalid command"));
        }
    };

    match command {
        LiveCommand::Move {
            row,
            col,
            participant,
        } => {
            let Some(identity) = identity else {
                return Some(LiveMessage::error("Authentication required to move"));
            };
            if identity.name() != &participant {
                warn!(claimed = %participant, "Move for another participant refused");
                return Some(LiveMessage::error("You can only move as yourself"));
            }
            service
                .make_move(room_id, identity, row, col)
                .err()
                .map(|e| LiveMessage::error(e.to_string()))
        }
    }
}
