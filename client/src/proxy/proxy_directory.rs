use std::collections::{HashMap, HashSet};

use cohort_shared::{Event, EventKind, ObjectError, Oid, SharedObject, Snapshot};

use crate::CohortClientError;

/// Local copies of the objects this client is subscribed to. A proxy starts
/// from the snapshot in the subscription acknowledgement and advances only
/// by applying forwarded events, in the order the server sent them.
pub struct ProxyDirectory {
    proxies: HashMap<Oid, SharedObject>,
    requested: HashSet<Oid>,
}

impl ProxyDirectory {
    pub fn new() -> Self {
        Self {
            proxies: HashMap::new(),
            requested: HashSet::new(),
        }
    }

    /// Records an outgoing subscribe. Returns false if the object is already
    /// proxied or requested, in which case nothing needs to be sent.
    pub fn request(&mut self, oid: Oid) -> bool {
        if self.proxies.contains_key(&oid) {
            return false;
        }
        self.requested.insert(oid)
    }

    pub fn is_requested(&self, oid: Oid) -> bool {
        self.requested.contains(&oid)
    }

    pub fn subscribe_acknowledged(&mut self, snapshot: Snapshot) -> Result<Oid, ObjectError> {
        let oid = snapshot.oid;
        self.requested.remove(&oid);
        let proxy = SharedObject::from_snapshot(snapshot)?;
        self.proxies.insert(oid, proxy);
        Ok(oid)
    }

    pub fn subscribe_failed(&mut self, oid: Oid) {
        self.requested.remove(&oid);
    }

    /// Applies a forwarded event to its proxy. Object removal drops the proxy.
    pub fn apply(&mut self, event: Event) -> Result<Event, CohortClientError> {
        let oid = event.target();
        if let EventKind::ObjectRemoved = event.kind() {
            self.proxies.remove(&oid);
            self.requested.remove(&oid);
            return Ok(event);
        }
        let Some(proxy) = self.proxies.get_mut(&oid) else {
            return Err(CohortClientError::NotSubscribed { oid });
        };
        proxy
            .apply(event)
            .map_err(|error| CohortClientError::Object { oid, error })
    }

    /// Forgets a proxy, returning whether one was held or requested
    pub fn release(&mut self, oid: Oid) -> bool {
        let requested = self.requested.remove(&oid);
        self.proxies.remove(&oid).is_some() || requested
    }

    pub fn get(&self, oid: Oid) -> Option<&SharedObject> {
        self.proxies.get(&oid)
    }

    pub fn contains(&self, oid: Oid) -> bool {
        self.proxies.contains_key(&oid)
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    pub fn clear(&mut self) {
        self.proxies.clear();
        self.requested.clear();
    }
}

impl Default for ProxyDirectory {
    fn default() -> Self {
        Self::new()
    }
}
