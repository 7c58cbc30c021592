//! Axum WebSocket upgrade handler.

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use super::connection::run_connection;
use crate::app_state::AppState;
use crate::domain::Role;

/// Identity of the connecting client, supplied as query parameters by the
/// upstream auth collaborator. Trusted as-is; credential validation has
/// already happened upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientIdentity {
    /// Authenticated user identifier.
    pub user_id: String,
    /// Role assigned to this user (`customer`, `driver`, or `admin`).
    pub role: Role,
}

/// `GET /ws` — Upgrade HTTP connection to WebSocket.
///
/// Rejects with 400 before the upgrade when `user_id` or `role` is missing
/// or malformed.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(identity): Query<ClientIdentity>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| run_connection(socket, identity, state))
}
