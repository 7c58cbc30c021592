//! Reverse-indexed channel membership registry.
//!
//! [`ChannelRegistry`] keeps two indexes under one lock: channel → member
//! connections (for fan-out) and connection → joined channels (so that
//! disconnect cleanup is proportional to what the connection joined, not to
//! the total number of channels). Both indexes are mutated together inside
//! a single write guard, so they can never diverge.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use super::{ChannelId, ConnectionId};

#[derive(Debug, Default)]
struct Indexes {
    members: HashMap<ChannelId, HashSet<ConnectionId>>,
    joined: HashMap<ConnectionId, HashSet<ChannelId>>,
}

/// Bidirectional mapping between channels and the connections joined to
/// them.
///
/// # Concurrency
///
/// All mutations take the write lock for their full duration, so each
/// public operation is atomic with respect to every other.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    inner: RwLock<Indexes>,
}

impl ChannelRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins a connection to a channel.
    ///
    /// Returns `false` when the connection was already a member (joining is
    /// idempotent, membership never grows on repeat).
    pub async fn add_member(&self, channel: ChannelId, connection_id: ConnectionId) -> bool {
        let mut inner = self.inner.write().await;
        let newly_joined = inner
            .members
            .entry(channel.clone())
            .or_default()
            .insert(connection_id);
        inner
            .joined
            .entry(connection_id)
            .or_default()
            .insert(channel);
        newly_joined
    }

    /// Removes a connection from a channel.
    ///
    /// Leaving a channel that was never joined is a silent no-op; returns
    /// `false` in that case.
    pub async fn remove_member(&self, channel: &ChannelId, connection_id: ConnectionId) -> bool {
        let mut inner = self.inner.write().await;
        let removed = match inner.members.get_mut(channel) {
            Some(set) => {
                let removed = set.remove(&connection_id);
                if set.is_empty() {
                    inner.members.remove(channel);
                }
                removed
            }
            None => false,
        };
        if let Some(set) = inner.joined.get_mut(&connection_id) {
            set.remove(channel);
            if set.is_empty() {
                inner.joined.remove(&connection_id);
            }
        }
        removed
    }

    /// Returns the current members of a channel.
    ///
    /// An unknown or empty channel yields an empty set, never an error.
    pub async fn members_of(&self, channel: &ChannelId) -> HashSet<ConnectionId> {
        self.inner
            .read()
            .await
            .members
            .get(channel)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the channels a connection has joined.
    pub async fn channels_of(&self, connection_id: ConnectionId) -> HashSet<ChannelId> {
        self.inner
            .read()
            .await
            .joined
            .get(&connection_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns `true` if the connection is a member of the channel.
    pub async fn is_member(&self, channel: &ChannelId, connection_id: ConnectionId) -> bool {
        self.inner
            .read()
            .await
            .members
            .get(channel)
            .is_some_and(|set| set.contains(&connection_id))
    }

    /// Removes a connection from every channel it joined.
    ///
    /// Runs in O(channels joined by this connection) via the reverse index.
    /// Returns how many channels the connection was removed from; zero for
    /// a connection with no memberships (or one already cleaned up).
    pub async fn remove_connection_everywhere(&self, connection_id: ConnectionId) -> usize {
        let mut inner = self.inner.write().await;
        let Some(channels) = inner.joined.remove(&connection_id) else {
            return 0;
        };
        let count = channels.len();
        for channel in channels {
            if let Some(set) = inner.members.get_mut(&channel) {
                set.remove(&connection_id);
                if set.is_empty() {
                    inner.members.remove(&channel);
                }
            }
        }
        count
    }

    /// Returns the number of channels with at least one member.
    pub async fn channel_count(&self) -> usize {
        self.inner.read().await.members.len()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_member_is_idempotent() {
        let registry = ChannelRegistry::new();
        let conn = ConnectionId::new();
        let channel = ChannelId::order("42");

        assert!(registry.add_member(channel.clone(), conn).await);
        assert!(!registry.add_member(channel.clone(), conn).await);

        let members = registry.members_of(&channel).await;
        assert_eq!(members.len(), 1);
        assert!(members.contains(&conn));
    }

    #[tokio::test]
    async fn remove_member_never_joined_is_noop() {
        let registry = ChannelRegistry::new();
        let conn = ConnectionId::new();
        let channel = ChannelId::order("42");

        assert!(!registry.remove_member(&channel, conn).await);
        assert!(registry.members_of(&channel).await.is_empty());
    }

    #[tokio::test]
    async fn members_of_unknown_channel_is_empty() {
        let registry = ChannelRegistry::new();
        assert!(registry.members_of(&ChannelId::AdminAll).await.is_empty());
        assert!(
            registry
                .members_of(&ChannelId::order("missing"))
                .await
                .is_empty()
        );
    }

    #[tokio::test]
    async fn reverse_index_tracks_joins_and_leaves() {
        let registry = ChannelRegistry::new();
        let conn = ConnectionId::new();

        registry.add_member(ChannelId::order("1"), conn).await;
        registry.add_member(ChannelId::order("2"), conn).await;
        assert_eq!(registry.channels_of(conn).await.len(), 2);

        registry.remove_member(&ChannelId::order("1"), conn).await;
        let channels = registry.channels_of(conn).await;
        assert_eq!(channels.len(), 1);
        assert!(channels.contains(&ChannelId::order("2")));
    }

    #[tokio::test]
    async fn remove_connection_everywhere_sweeps_all_memberships() {
        let registry = ChannelRegistry::new();
        let conn = ConnectionId::new();
        let other = ConnectionId::new();

        let channels = [
            ChannelId::order("a"),
            ChannelId::order("b"),
            ChannelId::order("c"),
            ChannelId::AdminAll,
        ];
        for channel in &channels {
            registry.add_member(channel.clone(), conn).await;
        }
        registry.add_member(ChannelId::order("a"), other).await;

        let removed = registry.remove_connection_everywhere(conn).await;
        assert_eq!(removed, 4);

        for channel in &channels {
            assert!(!registry.members_of(channel).await.contains(&conn));
        }
        // Unrelated membership survives the sweep.
        assert!(registry.members_of(&ChannelId::order("a")).await.contains(&other));
        // Repeat sweep is a no-op.
        assert_eq!(registry.remove_connection_everywhere(conn).await, 0);
    }

    #[tokio::test]
    async fn empty_channels_are_pruned() {
        let registry = ChannelRegistry::new();
        let conn = ConnectionId::new();
        let channel = ChannelId::order("42");

        registry.add_member(channel.clone(), conn).await;
        assert_eq!(registry.channel_count().await, 1);

        registry.remove_member(&channel, conn).await;
        assert_eq!(registry.channel_count().await, 0);
    }
}
