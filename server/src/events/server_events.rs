use std::{mem, vec::IntoIter};

use cohort_shared::Oid;

use crate::CohortServerError;

/// What happened during one call to `Server::process`
pub struct ServerEvents {
    errors: Vec<CohortServerError>,
    evictions: Vec<Oid>,
    processed: usize,

    empty: bool,
}

impl ServerEvents {
    pub(crate) fn new() -> Self {
        Self {
            errors: Vec::new(),
            evictions: Vec::new(),
            processed: 0,

            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Number of queued events and destroy requests handled
    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn read<V: ServerEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: ServerEvent>(&self) -> bool {
        V::has(self)
    }

    // Crate-public

    pub(crate) fn push_error(&mut self, error: CohortServerError) {
        self.errors.push(error);
        self.empty = false;
    }

    pub(crate) fn push_eviction(&mut self, oid: Oid) {
        self.evictions.push(oid);
        self.empty = false;
    }

    pub(crate) fn set_processed(&mut self, processed: usize) {
        self.processed = processed;
    }
}

// Event Trait
pub trait ServerEvent {
    type Iter;

    fn iter(events: &mut ServerEvents) -> Self::Iter;

    fn has(events: &ServerEvents) -> bool;
}

// ErrorEvent
pub struct ErrorEvent;
impl ServerEvent for ErrorEvent {
    type Iter = IntoIter<CohortServerError>;

    fn iter(events: &mut ServerEvents) -> Self::Iter {
        let list = mem::take(&mut events.errors);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ServerEvents) -> bool {
        !events.errors.is_empty()
    }
}

// EvictionEvent, ephemeral objects destroyed for lack of interest
pub struct EvictionEvent;
impl ServerEvent for EvictionEvent {
    type Iter = IntoIter<Oid>;

    fn iter(events: &mut ServerEvents) -> Self::Iter {
        let list = mem::take(&mut events.evictions);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ServerEvents) -> bool {
        !events.evictions.is_empty()
    }
}
