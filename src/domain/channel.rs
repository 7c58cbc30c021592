//! Broadcast channel identifiers.
//!
//! A [`ChannelId`] names one broadcast group in the registry: either the
//! per-order channel for a single order, or the global admin firehose that
//! mirrors every order event.

use std::fmt;

/// Identifier for one broadcast channel.
///
/// Used as the registry key; immutable and hashable. The set of channel
/// kinds is closed — adding one is a compile-time-checked change everywhere
/// the policy and the broadcaster match on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChannelId {
    /// Per-order channel carrying events for exactly one order.
    Order(String),
    /// Global admin channel mirroring events for every order.
    AdminAll,
}

impl ChannelId {
    /// Builds the per-order channel id for the given order.
    #[must_use]
    pub fn order(order_id: impl Into<String>) -> Self {
        Self::Order(order_id.into())
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Order(order_id) => write!(f, "order:{order_id}"),
            Self::AdminAll => write!(f, "admin:all"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn order_channels_compare_by_order_id() {
        assert_eq!(ChannelId::order("42"), ChannelId::order("42"));
        assert_ne!(ChannelId::order("42"), ChannelId::order("43"));
        assert_ne!(ChannelId::order("42"), ChannelId::AdminAll);
    }

    #[test]
    fn display_names_are_stable() {
        assert_eq!(ChannelId::order("42").to_string(), "order:42");
        assert_eq!(ChannelId::AdminAll.to_string(), "admin:all");
    }
}
