//! WebSocket connection state machine.
//!
//! Runs the read/write loop for a single connection: inbound commands are
//! dispatched to the subscription service, outbound frames (broadcast
//! events and acknowledgements) are written to the socket. When the loop
//! exits for any reason, the lifecycle hook sweeps every membership.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::handler::ClientIdentity;
use super::messages::{ClientMessage, ServerMessage};
use crate::app_state::AppState;
use crate::domain::{ConnectionId, Session};
use crate::error::GatewayError;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Registers a session keyed by a fresh [`ConnectionId`].
/// - Reads commands from the client and dispatches them.
/// - Drains the outbound queue filled by the broadcaster.
/// - On exit, removes the connection from every channel it joined.
pub async fn run_connection(socket: WebSocket, identity: ClientIdentity, state: AppState) {
    let connection_id = ConnectionId::new();
    let (out_tx, mut out_rx) = mpsc::channel::<String>(state.outbound_queue_capacity);

    let session = Session::new(
        connection_id,
        identity.user_id.clone(),
        identity.role,
        out_tx,
    );
    if let Err(error) = state.sessions.create(session).await {
        tracing::error!(%connection_id, %error, "failed to register session");
        return;
    }
    tracing::info!(
        %connection_id,
        user_id = %identity.user_id,
        role = %identity.role,
        "connection established"
    );

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Incoming command from the client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(&text, connection_id, &state).await;
                        if let Some(reply) = reply {
                            let Ok(json) = serde_json::to_string(&reply) else {
                                continue;
                            };
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
            // Outbound frame queued by the broadcaster or an ack
            frame = out_rx.recv() => {
                match frame {
                    Some(frame) => {
                        if ws_tx.send(Message::text(frame)).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    state.subscriptions.disconnect(connection_id).await;
}

/// Dispatches one inbound text frame, returning the frame to send back to
/// the requester, if any.
///
/// Rejections go to the requesting connection only, never broadcast. A
/// missing session is an upstream lifecycle bug: logged here, fatal to the
/// one operation, invisible to other connections.
async fn handle_text_message(
    text: &str,
    connection_id: ConnectionId,
    state: &AppState,
) -> Option<ServerMessage> {
    let command = match serde_json::from_str::<ClientMessage>(text) {
        Ok(command) => command,
        Err(error) => {
            tracing::debug!(%connection_id, %error, "malformed client frame");
            return Some(ServerMessage::Error {
                code: "malformed_message",
                message: "could not parse message".to_string(),
            });
        }
    };

    match command {
        ClientMessage::JoinOrder { order_id } => {
            match state.subscriptions.subscribe_order(connection_id, &order_id).await {
                Ok(ack) => Some(ack),
                Err(error) => Some(rejection(connection_id, &error)),
            }
        }
        ClientMessage::LeaveOrder { order_id } => {
            state
                .subscriptions
                .unsubscribe_order(connection_id, &order_id)
                .await;
            None
        }
        ClientMessage::JoinAdminAll => {
            match state.subscriptions.subscribe_admin_all(connection_id).await {
                Ok(()) => None,
                Err(error) => Some(rejection(connection_id, &error)),
            }
        }
        ClientMessage::LeaveAdminAll => {
            state.subscriptions.unsubscribe_admin_all(connection_id).await;
            None
        }
    }
}

/// Maps an operation failure to the outbound error frame for the requester.
fn rejection(connection_id: ConnectionId, error: &GatewayError) -> ServerMessage {
    if let GatewayError::SessionMissing(_) = error {
        tracing::error!(%connection_id, %error, "session invariant violated");
    }
    ServerMessage::Error {
        code: error.ws_code(),
        message: error.to_string(),
    }
}
