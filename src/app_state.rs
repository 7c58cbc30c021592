//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::SessionStore;
use crate::service::{EventBroadcaster, SubscriptionService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Session store; the WebSocket layer registers connections here.
    pub sessions: Arc<SessionStore>,
    /// Join/leave orchestration and disconnect cleanup.
    pub subscriptions: SubscriptionService,
    /// Fan-out of domain events to subscribed sessions.
    pub broadcaster: EventBroadcaster,
    /// Capacity of each connection's outbound frame queue.
    pub outbound_queue_capacity: usize,
}
