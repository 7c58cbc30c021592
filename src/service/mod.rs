//! Service layer: subscription orchestration and event fan-out.

pub mod broadcaster;
pub mod subscription;

pub use broadcaster::EventBroadcaster;
pub use subscription::SubscriptionService;
