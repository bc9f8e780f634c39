use std::{collections::HashMap, sync::Arc};

use log::warn;

use cohort_shared::{Event, EventKind, Oid, Schema, SharedObject, Snapshot, Value};

use crate::{directory::OidAllocator, DirectoryError, ListenerKey};

struct ObjectRecord {
    object: SharedObject,
    ephemeral: bool,
}

/// Authoritative map from identifier to object. Every mutation passes
/// through [`ObjectDirectory::apply`]; the server calls it from a single
/// processing loop, which is what gives each object its total event order.
///
/// An identifier the allocator has already passed and that names no live
/// object is retired; no per-object record outlives its object.
pub struct ObjectDirectory {
    objects: HashMap<Oid, ObjectRecord>,
    allocator: OidAllocator,
    global_listeners: Vec<ListenerKey>,
}

impl ObjectDirectory {
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            allocator: OidAllocator::new(),
            global_listeners: Vec::new(),
        }
    }

    // Lifecycle

    /// Creates an object under a fresh identifier and returns the
    /// object-added event for wildcard listeners
    pub fn create_object(
        &mut self,
        schema: Arc<Schema>,
        attributes: Vec<(String, Value)>,
        ephemeral: bool,
    ) -> Result<(Oid, Event), DirectoryError> {
        let oid = self.allocator.allocate()?;
        let object = SharedObject::new(oid, schema, attributes)?;
        self.objects.insert(oid, ObjectRecord { object, ephemeral });
        Ok((oid, Event::object_added(oid)))
    }

    /// Installs an object whose identifier was issued by a backing source.
    /// Only identifiers above every one issued so far are accepted.
    pub fn insert_object(
        &mut self,
        oid: Oid,
        schema: Arc<Schema>,
        attributes: Vec<(String, Value)>,
        ephemeral: bool,
    ) -> Result<Event, DirectoryError> {
        if oid.is_none() {
            return Err(DirectoryError::UnknownTarget { oid });
        }
        if self.objects.contains_key(&oid) {
            return Err(DirectoryError::AlreadyExists { oid });
        }
        if self.allocator.is_issued(oid) {
            return Err(DirectoryError::Retired { oid });
        }
        let object = SharedObject::new(oid, schema, attributes)?;
        self.allocator.reserve(oid);
        self.objects.insert(oid, ObjectRecord { object, ephemeral });
        Ok(Event::object_added(oid))
    }

    /// Unlinks an object, returning its object-removed event. Unknown oids
    /// are logged and ignored.
    pub fn destroy_object(&mut self, oid: Oid) -> Option<Event> {
        if self.objects.remove(&oid).is_none() {
            warn!("Server Error: cannot destroy unknown object {}", oid);
            return None;
        }
        Some(Event::object_removed(oid))
    }

    // Mutation

    /// Applies one event to its target, returning the committed event with
    /// previous values filled in
    pub fn apply(&mut self, event: Event) -> Result<Event, DirectoryError> {
        let oid = event.target();
        if matches!(
            event.kind(),
            EventKind::ObjectAdded | EventKind::ObjectRemoved
        ) {
            return Err(DirectoryError::LifecycleEvent { oid });
        }
        let Some(record) = self.objects.get_mut(&oid) else {
            if self.is_retired(oid) {
                return Err(DirectoryError::Retired { oid });
            }
            return Err(DirectoryError::UnknownTarget { oid });
        };
        Ok(record.object.apply(event)?)
    }

    // Queries

    pub fn get(&self, oid: Oid) -> Option<&SharedObject> {
        self.objects.get(&oid).map(|record| &record.object)
    }

    pub fn contains(&self, oid: Oid) -> bool {
        self.objects.contains_key(&oid)
    }

    /// Whether `oid` can never name an object again
    pub fn is_retired(&self, oid: Oid) -> bool {
        !self.objects.contains_key(&oid) && self.allocator.is_issued(oid)
    }

    pub fn is_ephemeral(&self, oid: Oid) -> bool {
        self.objects
            .get(&oid)
            .map(|record| record.ephemeral)
            .unwrap_or(false)
    }

    pub fn snapshot(&self, oid: Oid) -> Option<Snapshot> {
        self.get(oid).map(SharedObject::snapshot)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn oids(&self) -> impl Iterator<Item = Oid> + '_ {
        self.objects.keys().copied()
    }

    // Wildcard listeners

    /// Registers a listener that observes object-added and object-removed
    /// for every object
    pub fn add_global_listener(&mut self, listener: ListenerKey) {
        if !self.global_listeners.contains(&listener) {
            self.global_listeners.push(listener);
        }
    }

    pub fn remove_global_listener(&mut self, listener: ListenerKey) {
        self.global_listeners.retain(|key| *key != listener);
    }

    pub fn global_listeners(&self) -> &[ListenerKey] {
        &self.global_listeners
    }
}

impl Default for ObjectDirectory {
    fn default() -> Self {
        Self::new()
    }
}
