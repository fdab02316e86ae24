//! WebSocket connection loop.
//!
//! Runs the read/write loop for a single connection: dispatches incoming
//! client frames to the presence service and forwards room-filtered bus
//! events back out. Handled to completion one event at a time — nothing in
//! here runs concurrently with itself.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast;

use super::messages::{ClientMessage, ServerMessage};
use super::room_filter::RoomFilter;
use crate::domain::{ConnectionId, PresenceEvent};
use crate::error::RelayError;
use crate::service::PresenceService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Assigns a fresh [`ConnectionId`] and announces it to the client.
/// - Reads `join-room` / `send-location` frames and dispatches them.
/// - Forwards matching events from the [`broadcast::Receiver`], including
///   the sender's own updates (self-echo).
/// - On any close path, reports the disconnect so membership is cleaned up
///   and peers get a `user-disconnected` frame.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<PresenceEvent>,
    presence: Arc<PresenceService>,
) {
    let conn_id = ConnectionId::new();
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut filter = RoomFilter::new();

    // First frame out: the client needs its id to recognize its own echo.
    let hello = ServerMessage::Connected { id: conn_id };
    if let Some(json) = hello.to_json()
        && ws_tx.send(Message::text(json)).await.is_err()
    {
        presence.handle_disconnect(conn_id).await;
        return;
    }
    tracing::debug!(%conn_id, "ws connection open");

    loop {
        tokio::select! {
            // Incoming frame from the client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = dispatch(&text, conn_id, &mut filter, &presence).await;
                        if let Some(json) = reply
                            && ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
            // Event from the bus
            event = event_rx.recv() => {
                match event {
                    Ok(event) => {
                        // The sender is always part of the audience: its own
                        // echo is delivered regardless of room scoping, so
                        // self-centering works even when the payload targets
                        // a room the sender never joined.
                        let own_echo = matches!(
                            &event,
                            PresenceEvent::Location { update, .. } if update.id == conn_id
                        );
                        if !own_echo && !filter.matches(event.room()) {
                            continue;
                        }
                        let frame = match event {
                            PresenceEvent::Location { update, .. } => {
                                ServerMessage::ReceiveLocation(update)
                            }
                            PresenceEvent::Departed { id } => {
                                ServerMessage::UserDisconnected(id)
                            }
                        };
                        if let Some(json) = frame.to_json()
                            && ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(%conn_id, lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    presence.handle_disconnect(conn_id).await;
    tracing::debug!(%conn_id, "ws connection closed");
}

/// Handles one text frame from the client, returning an optional reply.
///
/// Joins update both the registry (source of truth for room fallback) and
/// the connection-local filter (fan-out path). Rejected frames produce an
/// `error` reply; accepted ones produce none.
async fn dispatch(
    text: &str,
    conn_id: ConnectionId,
    filter: &mut RoomFilter,
    presence: &PresenceService,
) -> Option<String> {
    let msg = match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => msg,
        Err(err) => {
            let err = RelayError::MalformedMessage(err.to_string());
            tracing::debug!(%conn_id, %err, "rejected client frame");
            return ServerMessage::from(&err).to_json();
        }
    };

    match msg {
        ClientMessage::JoinRoom(room) => {
            presence.handle_join(conn_id, room.clone()).await;
            filter.set_room(room);
            None
        }
        ClientMessage::SendLocation(update) => {
            match presence.handle_location(conn_id, update).await {
                Ok(_) => None,
                Err(err) => {
                    tracing::debug!(%conn_id, %err, "rejected location update");
                    ServerMessage::from(&err).to_json()
                }
            }
        }
    }
}
