use std::{default::Default, time::Duration};

/// Contains Config properties which will be used by the Client
#[derive(Clone)]
pub struct ClientConfig {
    /// Deadline applied to calls that do not name their own. `None` lets a
    /// call wait until its response or connection loss.
    pub default_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_timeout: None,
        }
    }
}
