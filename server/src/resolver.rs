use std::sync::Arc;

use cohort_shared::{Oid, Schema, Value};

/// Object state supplied by a backing source
pub struct ResolvedObject {
    pub schema: Arc<Schema>,
    pub attributes: Vec<(String, Value)>,
}

/// How a backing source answers a request for an object not yet in memory
pub enum Resolution {
    /// Available now
    Ready(ResolvedObject),
    /// Will be supplied later through `Server::complete_resolution`
    Pending,
    /// The source has no such object
    Missing,
}

/// Slower backing source consulted when a subscriber asks for an object the
/// directory does not hold. Objects it supplies are ephemeral: they live for
/// as long as somebody is interested.
pub trait ObjectResolver: Send {
    fn begin_resolve(&mut self, oid: Oid) -> Resolution;
}

/// Resolves nothing; subscribing to an unknown oid fails immediately
#[derive(Default, Clone, Copy)]
pub struct NoResolver;

impl ObjectResolver for NoResolver {
    fn begin_resolve(&mut self, _oid: Oid) -> Resolution {
        Resolution::Missing
    }
}
