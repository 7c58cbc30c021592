//! # order-gateway
//!
//! Real-time WebSocket fan-out gateway for live order status
//! subscriptions.
//!
//! Clients (customers, drivers, admin dashboards) hold WebSocket
//! connections and join per-order channels; the order-processing service
//! posts domain events which the gateway delivers to every eligible
//! subscriber. Authentication happens upstream — the gateway trusts the
//! identity and role handed to it at handshake time.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket)          Order service (HTTP)
//!     │                             │
//!     ├── WS connection loop (ws/)  ├── Event intake (api/)
//!     │                             │
//!     ├── SubscriptionService ──────┤── EventBroadcaster (service/)
//!     │                             │
//!     ├── SessionStore (domain/)    │
//!     └── ChannelRegistry (domain/) ┘
//! ```
//!
//! Single-process only: membership and delivery never cross process
//! boundaries, and there is no replay for reconnecting clients.

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;
