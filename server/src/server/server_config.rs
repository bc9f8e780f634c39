use std::default::Default;

use crate::EvictionPolicy;

/// Contains Config properties which will be used by the Server
#[derive(Clone)]
pub struct ServerConfig {
    /// What happens to an ephemeral object once nobody is subscribed
    pub eviction: EvictionPolicy,
    /// Upper bound on queued events handled by one `process` call. Whatever
    /// remains is handled on the next call.
    pub max_events_per_process: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            eviction: EvictionPolicy::Immediate,
            max_events_per_process: 4096,
        }
    }
}
