//! WebSocket layer: connection handling and the wire protocol.
//!
//! The WebSocket endpoint at `/ws` carries the subscription commands and
//! the fanned-out order events for one client connection.

pub mod connection;
pub mod handler;
pub mod messages;
