mod eviction;
mod registry;

pub use eviction::EvictionPolicy;
pub use registry::{SubscribeOutcome, SubscriptionRegistry, Unsubscribed};
