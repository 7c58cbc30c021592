//! Subscription service: join/leave operations and disconnect cleanup.
//!
//! Orchestrates the session store, the authorization policy, and the
//! channel registry. Every operation validates input, applies policy, and
//! mutates the registry atomically; rejections are returned to the caller
//! (the connection loop) which surfaces them to the requester only.

use std::sync::Arc;

use crate::domain::{ChannelId, ChannelRegistry, ConnectionId, SessionStore, policy};
use crate::error::GatewayError;
use crate::ws::messages::ServerMessage;

/// Join/leave orchestration for one gateway process.
///
/// Stateless coordinator: owns references to the [`SessionStore`] for
/// identity and the [`ChannelRegistry`] for membership.
#[derive(Debug, Clone)]
pub struct SubscriptionService {
    sessions: Arc<SessionStore>,
    registry: Arc<ChannelRegistry>,
}

impl SubscriptionService {
    /// Creates a new `SubscriptionService`.
    #[must_use]
    pub fn new(sessions: Arc<SessionStore>, registry: Arc<ChannelRegistry>) -> Self {
        Self { sessions, registry }
    }

    /// Returns a reference to the inner [`ChannelRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<ChannelRegistry> {
        &self.registry
    }

    /// Subscribes a connection to one order's channel.
    ///
    /// Idempotent: re-subscribing does not grow membership and still
    /// acknowledges. The acknowledgement frame is returned to the caller
    /// for delivery to the requester.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::InvalidOrderId`] for an empty or whitespace id;
    ///   nothing is mutated.
    /// - [`GatewayError::SessionMissing`] when no session exists for an
    ///   active connection — an upstream lifecycle bug, logged by the
    ///   caller, fatal to this operation only.
    pub async fn subscribe_order(
        &self,
        connection_id: ConnectionId,
        order_id: &str,
    ) -> Result<ServerMessage, GatewayError> {
        let order_id = order_id.trim();
        if order_id.is_empty() {
            return Err(GatewayError::InvalidOrderId);
        }

        let session = self
            .sessions
            .get(connection_id)
            .await
            .ok_or(GatewayError::SessionMissing(connection_id))?;

        let channel = ChannelId::order(order_id);
        if !policy::can_join(session.role, &channel) {
            return Err(GatewayError::Forbidden);
        }

        let newly_joined = self.registry.add_member(channel, connection_id).await;
        tracing::debug!(%connection_id, order_id, newly_joined, "order subscription");

        Ok(ServerMessage::subscribed_ack(order_id))
    }

    /// Unsubscribes a connection from one order's channel.
    ///
    /// Fire-and-forget: leaving a channel that was never joined is a
    /// silent no-op, and no acknowledgement is produced.
    pub async fn unsubscribe_order(&self, connection_id: ConnectionId, order_id: &str) {
        let order_id = order_id.trim();
        if order_id.is_empty() {
            return;
        }
        let channel = ChannelId::order(order_id);
        self.registry.remove_member(&channel, connection_id).await;
        tracing::debug!(%connection_id, order_id, "order unsubscription");
    }

    /// Subscribes a connection to the admin firehose.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Forbidden`] when the session's role is not admin;
    ///   nothing is mutated.
    /// - [`GatewayError::SessionMissing`] as in
    ///   [`Self::subscribe_order`].
    pub async fn subscribe_admin_all(
        &self,
        connection_id: ConnectionId,
    ) -> Result<(), GatewayError> {
        let session = self
            .sessions
            .get(connection_id)
            .await
            .ok_or(GatewayError::SessionMissing(connection_id))?;

        if !policy::can_join(session.role, &ChannelId::AdminAll) {
            return Err(GatewayError::Forbidden);
        }

        self.registry
            .add_member(ChannelId::AdminAll, connection_id)
            .await;
        tracing::debug!(%connection_id, user_id = %session.user_id, "joined admin firehose");
        Ok(())
    }

    /// Unsubscribes a connection from the admin firehose.
    ///
    /// Leaving is always permitted; no policy check, no acknowledgement.
    pub async fn unsubscribe_admin_all(&self, connection_id: ConnectionId) {
        self.registry
            .remove_member(&ChannelId::AdminAll, connection_id)
            .await;
    }

    /// Connection lifecycle hook: removes every membership, then the
    /// session itself.
    ///
    /// Idempotent: duplicate termination signals for a connection that is
    /// already gone are silent no-ops.
    pub async fn disconnect(&self, connection_id: ConnectionId) {
        let swept = self
            .registry
            .remove_connection_everywhere(connection_id)
            .await;
        let existed = self.sessions.destroy(connection_id).await;
        if existed {
            tracing::info!(%connection_id, channels_left = swept, "connection closed");
        }
    }
}
