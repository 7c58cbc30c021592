//! WebSocket wire protocol: inbound commands and outbound frames.
//!
//! Both directions are closed tagged enums, exhaustively matched, so adding
//! an event kind is a compile-time-checked change rather than a string
//! comparison scattered across handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{GeoPoint, OrderEvent, OrderStatus};

/// Commands a client can send over the WebSocket, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Subscribe to status updates for one order.
    JoinOrder {
        /// Order to subscribe to. Must be non-empty.
        order_id: String,
    },
    /// Unsubscribe from one order. Fire-and-forget.
    LeaveOrder {
        /// Order to unsubscribe from.
        order_id: String,
    },
    /// Subscribe to the admin firehose (admins only).
    JoinAdminAll,
    /// Leave the admin firehose. Always permitted.
    LeaveAdminAll,
}

/// Frames the gateway sends to a client, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Acknowledgement of a successful `join-order`.
    #[serde(rename = "notification")]
    Notification {
        /// Short human-readable title.
        title: String,
        /// Longer human-readable message.
        message: String,
        /// Order the notification is scoped to.
        order_id: String,
    },

    /// Rejection of a request, sent to the requester only.
    #[serde(rename = "error")]
    Error {
        /// Symbolic error code (`invalid_order_id`, `forbidden`, ...).
        code: &'static str,
        /// Human-readable description.
        message: String,
    },

    /// A new order entered the system.
    #[serde(rename = "order:created")]
    OrderCreated {
        /// Order identifier.
        order_id: String,
        /// Initial status.
        status: OrderStatus,
        /// Event time.
        timestamp: DateTime<Utc>,
    },

    /// The order moved to a new status.
    #[serde(rename = "order:status:updated")]
    OrderStatusUpdated {
        /// Order identifier.
        order_id: String,
        /// New status.
        status: OrderStatus,
        /// Event time.
        timestamp: DateTime<Utc>,
    },

    /// The assigned driver reported a new position.
    #[serde(rename = "order:location:updated")]
    OrderLocationUpdated {
        /// Order identifier.
        order_id: String,
        /// Driver position.
        location: GeoPoint,
        /// Event time.
        timestamp: DateTime<Utc>,
    },

    /// A driver was assigned to the order.
    #[serde(rename = "order:assigned")]
    OrderAssigned {
        /// Order identifier.
        order_id: String,
        /// Assigned driver.
        driver_id: String,
        /// Event time.
        timestamp: DateTime<Utc>,
    },
}

impl ServerMessage {
    /// Builds the acknowledgement frame for a successful order join.
    #[must_use]
    pub fn subscribed_ack(order_id: &str) -> Self {
        Self::Notification {
            title: "Subscribed".to_string(),
            message: format!("You will receive live updates for order {order_id}"),
            order_id: order_id.to_string(),
        }
    }
}

impl From<OrderEvent> for ServerMessage {
    fn from(event: OrderEvent) -> Self {
        match event {
            OrderEvent::Created {
                order_id,
                status,
                timestamp,
            } => Self::OrderCreated {
                order_id,
                status,
                timestamp,
            },
            OrderEvent::StatusUpdated {
                order_id,
                status,
                timestamp,
            } => Self::OrderStatusUpdated {
                order_id,
                status,
                timestamp,
            },
            OrderEvent::LocationUpdated {
                order_id,
                location,
                timestamp,
            } => Self::OrderLocationUpdated {
                order_id,
                location,
                timestamp,
            },
            OrderEvent::Assigned {
                order_id,
                driver_id,
                timestamp,
            } => Self::OrderAssigned {
                order_id,
                driver_id,
                timestamp,
            },
        }
    }
}
