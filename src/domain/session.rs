//! Per-connection session state and the session store.
//!
//! A [`Session`] is created when the WebSocket handshake completes, with an
//! identity the upstream auth collaborator already validated. The
//! [`SessionStore`] keys sessions by [`ConnectionId`] and knows nothing
//! about channels — memberships live in the channel registry.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, mpsc};

use super::ConnectionId;
use crate::error::GatewayError;

/// Role the auth collaborator assigned to a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End customer tracking their own orders.
    Customer,
    /// Delivery driver.
    Driver,
    /// Operations dashboard; may join the admin firehose.
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Driver => write!(f, "driver"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// State for one live connection.
///
/// Cloning a session is cheap (the sender is a channel handle); all clones
/// refer to the same outbound queue.
#[derive(Debug, Clone)]
pub struct Session {
    /// Connection this session belongs to.
    pub connection_id: ConnectionId,
    /// User identity supplied at handshake, trusted as-is.
    pub user_id: String,
    /// Role supplied at handshake.
    pub role: Role,
    /// Outbound queue of serialized frames, drained by the socket writer.
    sender: mpsc::Sender<String>,
}

impl Session {
    /// Creates a session around an outbound frame queue.
    #[must_use]
    pub fn new(
        connection_id: ConnectionId,
        user_id: String,
        role: Role,
        sender: mpsc::Sender<String>,
    ) -> Self {
        Self {
            connection_id,
            user_id,
            role,
            sender,
        }
    }

    /// Queues a frame for delivery, returning `false` if the queue is full
    /// or the receiving half is gone. Best-effort: callers log and move on.
    pub fn try_deliver(&self, frame: String) -> bool {
        self.sender.try_send(frame).is_ok()
    }
}

/// In-memory store of all live sessions, keyed by connection id.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<ConnectionId, Session>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session for a newly connected socket.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DuplicateConnection`] if a session already
    /// exists for this id (unreachable with v4 ids, kept as a guard).
    pub async fn create(&self, session: Session) -> Result<(), GatewayError> {
        let mut map = self.sessions.write().await;
        let id = session.connection_id;
        if map.contains_key(&id) {
            return Err(GatewayError::DuplicateConnection(id));
        }
        map.insert(id, session);
        Ok(())
    }

    /// Returns a clone of the session for the given connection, if any.
    pub async fn get(&self, connection_id: ConnectionId) -> Option<Session> {
        self.sessions.read().await.get(&connection_id).cloned()
    }

    /// Removes the session. Returns `false` when it was already gone,
    /// which is a silent no-op for duplicate termination signals.
    pub async fn destroy(&self, connection_id: ConnectionId) -> bool {
        self.sessions.write().await.remove(&connection_id).is_some()
    }

    /// Returns the number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` if no sessions are registered.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_session(role: Role) -> (Session, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(8);
        let session = Session::new(ConnectionId::new(), "user-1".to_string(), role, tx);
        (session, rx)
    }

    #[tokio::test]
    async fn create_then_get() {
        let store = SessionStore::new();
        let (session, _rx) = make_session(Role::Customer);
        let id = session.connection_id;

        assert!(store.create(session).await.is_ok());
        let fetched = store.get(id).await;
        let Some(fetched) = fetched else {
            panic!("session should exist");
        };
        assert_eq!(fetched.user_id, "user-1");
        assert_eq!(fetched.role, Role::Customer);
    }

    #[tokio::test]
    async fn duplicate_create_is_rejected() {
        let store = SessionStore::new();
        let (session, _rx) = make_session(Role::Driver);
        let id = session.connection_id;

        assert!(store.create(session.clone()).await.is_ok());
        let result = store.create(session).await;
        assert!(matches!(result, Err(GatewayError::DuplicateConnection(dup)) if dup == id));
    }

    #[tokio::test]
    async fn destroy_is_idempotent() {
        let store = SessionStore::new();
        let (session, _rx) = make_session(Role::Admin);
        let id = session.connection_id;

        let _ = store.create(session).await;
        assert!(store.destroy(id).await);
        assert!(!store.destroy(id).await);
        assert!(store.get(id).await.is_none());
    }

    #[tokio::test]
    async fn try_deliver_reports_full_queue() {
        let (tx, mut rx) = mpsc::channel(1);
        let session = Session::new(ConnectionId::new(), "u".to_string(), Role::Customer, tx);

        assert!(session.try_deliver("first".to_string()));
        assert!(!session.try_deliver("second".to_string()));

        assert_eq!(rx.recv().await.as_deref(), Some("first"));
    }
}
