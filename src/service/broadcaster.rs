//! Event fan-out to subscribed sessions.
//!
//! [`EventBroadcaster`] accepts domain events from the order collaborator
//! and pushes each one to every member of the order's channel and of the
//! admin firehose. Delivery is best-effort and at-most-once per session per
//! call: a recipient that vanished or fell behind is skipped, never
//! aborting the rest.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::{ChannelId, ChannelRegistry, ConnectionId, OrderEvent, SessionStore};
use crate::ws::messages::ServerMessage;

/// Fans domain events out to subscribed connections.
#[derive(Debug, Clone)]
pub struct EventBroadcaster {
    sessions: Arc<SessionStore>,
    registry: Arc<ChannelRegistry>,
}

impl EventBroadcaster {
    /// Creates a new `EventBroadcaster`.
    #[must_use]
    pub fn new(sessions: Arc<SessionStore>, registry: Arc<ChannelRegistry>) -> Self {
        Self { sessions, registry }
    }

    /// Delivers an event to every session subscribed to the order's
    /// channel or to the admin firehose.
    ///
    /// A session subscribed to both receives exactly one frame. Returns
    /// the number of sessions the frame was queued for; the count is
    /// informational and carries no partial-failure signal.
    pub async fn publish(&self, event: OrderEvent) -> usize {
        let notification = event.notification_name();
        let order_channel = ChannelId::order(event.order_id());

        let mut targets: HashSet<ConnectionId> = self.registry.members_of(&order_channel).await;
        targets.extend(self.registry.members_of(&ChannelId::AdminAll).await);

        if targets.is_empty() {
            tracing::debug!(notification, %order_channel, "no subscribers for event");
            return 0;
        }

        let frame = match serde_json::to_string(&ServerMessage::from(event)) {
            Ok(frame) => frame,
            Err(error) => {
                tracing::error!(notification, %error, "failed to serialize event frame");
                return 0;
            }
        };

        let mut delivered = 0;
        for connection_id in targets {
            // A session may disconnect between lookup and send.
            let Some(session) = self.sessions.get(connection_id).await else {
                tracing::debug!(%connection_id, "skipping vanished session");
                continue;
            };
            if session.try_deliver(frame.clone()) {
                delivered += 1;
            } else {
                tracing::warn!(%connection_id, notification, "dropped frame for slow session");
            }
        }

        tracing::debug!(notification, delivered, "event fanned out");
        delivered
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{OrderStatus, Role, Session};
    use chrono::Utc;
    use tokio::sync::mpsc;

    struct Harness {
        broadcaster: EventBroadcaster,
        sessions: Arc<SessionStore>,
        registry: Arc<ChannelRegistry>,
    }

    impl Harness {
        fn new() -> Self {
            let sessions = Arc::new(SessionStore::new());
            let registry = Arc::new(ChannelRegistry::new());
            let broadcaster =
                EventBroadcaster::new(Arc::clone(&sessions), Arc::clone(&registry));
            Self {
                broadcaster,
                sessions,
                registry,
            }
        }

        async fn connect(&self, role: Role) -> (ConnectionId, mpsc::Receiver<String>) {
            let (tx, rx) = mpsc::channel(16);
            let id = ConnectionId::new();
            let Ok(()) = self
                .sessions
                .create(Session::new(id, "user".to_string(), role, tx))
                .await
            else {
                panic!("session create failed");
            };
            (id, rx)
        }
    }

    fn status_event(order_id: &str) -> OrderEvent {
        OrderEvent::StatusUpdated {
            order_id: order_id.to_string(),
            status: OrderStatus::InTransit,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn publish_without_subscribers_delivers_nothing() {
        let h = Harness::new();
        assert_eq!(h.broadcaster.publish(status_event("42")).await, 0);
    }

    #[tokio::test]
    async fn subscriber_and_admin_each_receive_one_frame() {
        let h = Harness::new();
        let (customer, mut customer_rx) = h.connect(Role::Customer).await;
        let (admin, mut admin_rx) = h.connect(Role::Admin).await;
        let (bystander, mut bystander_rx) = h.connect(Role::Customer).await;

        h.registry.add_member(ChannelId::order("42"), customer).await;
        h.registry.add_member(ChannelId::AdminAll, admin).await;
        let _ = bystander;

        let delivered = h
            .broadcaster
            .publish(OrderEvent::Created {
                order_id: "42".to_string(),
                status: OrderStatus::Pending,
                timestamp: Utc::now(),
            })
            .await;
        assert_eq!(delivered, 2);

        let Some(frame) = customer_rx.recv().await else {
            panic!("customer should receive the event");
        };
        assert!(frame.contains(r#""type":"order:created""#));

        let Some(frame) = admin_rx.recv().await else {
            panic!("admin should receive the event");
        };
        assert!(frame.contains(r#""order_id":"42""#));

        assert!(bystander_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn session_in_both_channels_receives_exactly_one_frame() {
        let h = Harness::new();
        let (admin, mut rx) = h.connect(Role::Admin).await;

        h.registry.add_member(ChannelId::order("42"), admin).await;
        h.registry.add_member(ChannelId::AdminAll, admin).await;

        let delivered = h.broadcaster.publish(status_event("42")).await;
        assert_eq!(delivered, 1);

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn vanished_session_does_not_abort_remaining_recipients() {
        let h = Harness::new();
        let (alive, mut alive_rx) = h.connect(Role::Customer).await;
        let (gone, gone_rx) = h.connect(Role::Customer).await;

        h.registry.add_member(ChannelId::order("42"), alive).await;
        h.registry.add_member(ChannelId::order("42"), gone).await;

        // Session destroyed but membership not yet swept.
        drop(gone_rx);
        h.sessions.destroy(gone).await;

        let delivered = h.broadcaster.publish(status_event("42")).await;
        assert_eq!(delivered, 1);
        assert!(alive_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn events_only_reach_the_matching_order_channel() {
        let h = Harness::new();
        let (watcher, mut rx) = h.connect(Role::Customer).await;
        h.registry.add_member(ChannelId::order("42"), watcher).await;

        assert_eq!(h.broadcaster.publish(status_event("43")).await, 0);
        assert!(rx.try_recv().is_err());
    }
}
