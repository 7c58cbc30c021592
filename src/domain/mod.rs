//! Domain layer: identifiers, sessions, channels, events, and policy.
//!
//! This module contains the server-side core: connection identity, the
//! session store, the reverse-indexed channel registry, the order event
//! model, and the join authorization policy.

pub mod channel;
pub mod channel_registry;
pub mod connection_id;
pub mod order_event;
pub mod policy;
pub mod session;

pub use channel::ChannelId;
pub use channel_registry::ChannelRegistry;
pub use connection_id::ConnectionId;
pub use order_event::{GeoPoint, OrderEvent, OrderStatus};
pub use session::{Role, Session, SessionStore};
