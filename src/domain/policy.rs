//! Channel join authorization policy.
//!
//! A pure decision function: denial is a normal `false` consumed by the
//! subscription service, not an error. Ownership checks for order channels
//! are the order collaborator's concern; if they ever move here, this
//! function is the seam where an ownership lookup would be injected.

use super::{ChannelId, Role};

/// Decides whether a session with the given role may join a channel.
///
/// - `Order(_)`: every authenticated session may join.
/// - `AdminAll`: admins only.
#[must_use]
pub const fn can_join(role: Role, channel: &ChannelId) -> bool {
    match channel {
        ChannelId::Order(_) => true,
        ChannelId::AdminAll => matches!(role, Role::Admin),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn any_role_may_join_order_channels() {
        let channel = ChannelId::order("42");
        assert!(can_join(Role::Customer, &channel));
        assert!(can_join(Role::Driver, &channel));
        assert!(can_join(Role::Admin, &channel));
    }

    #[test]
    fn only_admin_may_join_admin_all() {
        assert!(!can_join(Role::Customer, &ChannelId::AdminAll));
        assert!(!can_join(Role::Driver, &ChannelId::AdminAll));
        assert!(can_join(Role::Admin, &ChannelId::AdminAll));
    }
}
