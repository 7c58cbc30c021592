//! Domain events describing order lifecycle changes.
//!
//! The order-processing collaborator posts an [`OrderEvent`] for every
//! state change; the gateway fans it out to the subscribed sessions and to
//! the admin channel. Events are transient — consumed once, never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Current status of an order, as reported by the order collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order accepted, not yet in preparation.
    Pending,
    /// Order is being prepared.
    Preparing,
    /// Order is on its way to the customer.
    InTransit,
    /// Order has been delivered.
    Delivered,
    /// Order was cancelled.
    Cancelled,
}

/// Geographic position of the assigned driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

/// Domain event emitted by the order-processing collaborator.
///
/// Tagged by `kind` on the wire. The gateway trusts the collaborator: it
/// does not check that the order exists, only that the event is well formed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderEvent {
    /// A new order entered the system.
    Created {
        /// Order identifier.
        order_id: String,
        /// Initial order status.
        status: OrderStatus,
        /// When the order was created.
        timestamp: DateTime<Utc>,
    },

    /// The order moved to a new status.
    StatusUpdated {
        /// Order identifier.
        order_id: String,
        /// New order status.
        status: OrderStatus,
        /// When the status changed.
        timestamp: DateTime<Utc>,
    },

    /// The assigned driver reported a new position.
    LocationUpdated {
        /// Order identifier.
        order_id: String,
        /// Current driver position.
        location: GeoPoint,
        /// When the position was reported.
        timestamp: DateTime<Utc>,
    },

    /// A driver was assigned to the order.
    Assigned {
        /// Order identifier.
        order_id: String,
        /// Identifier of the assigned driver.
        driver_id: String,
        /// When the assignment happened.
        timestamp: DateTime<Utc>,
    },
}

impl OrderEvent {
    /// Returns the order this event belongs to.
    #[must_use]
    pub fn order_id(&self) -> &str {
        match self {
            Self::Created { order_id, .. }
            | Self::StatusUpdated { order_id, .. }
            | Self::LocationUpdated { order_id, .. }
            | Self::Assigned { order_id, .. } => order_id,
        }
    }

    /// Returns the outward notification name for this event kind.
    #[must_use]
    pub const fn notification_name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "order:created",
            Self::StatusUpdated { .. } => "order:status:updated",
            Self::LocationUpdated { .. } => "order:location:updated",
            Self::Assigned { .. } => "order:assigned",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn order_id_accessor_covers_all_kinds() {
        let event = OrderEvent::Assigned {
            order_id: "ord-7".to_string(),
            driver_id: "drv-1".to_string(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.order_id(), "ord-7");
        assert_eq!(event.notification_name(), "order:assigned");
    }

    #[test]
    fn deserializes_from_collaborator_shape() {
        let json = r#"{
            "kind": "status_updated",
            "order_id": "ord-42",
            "status": "in_transit",
            "timestamp": "2026-08-24T12:00:00Z"
        }"#;
        let event: Result<OrderEvent, _> = serde_json::from_str(json);
        let Ok(OrderEvent::StatusUpdated {
            order_id, status, ..
        }) = event
        else {
            panic!("expected status_updated event");
        };
        assert_eq!(order_id, "ord-42");
        assert_eq!(status, OrderStatus::InTransit);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let json = r#"{"kind": "refunded", "order_id": "ord-1"}"#;
        assert!(serde_json::from_str::<OrderEvent>(json).is_err());
    }
}
