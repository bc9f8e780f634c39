use std::{mem, vec::IntoIter};

use cohort_shared::{Event, FailureReason, Oid};

use crate::CohortClientError;

/// What the client observed since the last call to `Client::process`
pub struct ClientEvents {
    connections: Vec<Oid>,
    disconnections: usize,
    subscriptions: Vec<Oid>,
    subscribe_failures: Vec<(Oid, FailureReason)>,
    object_events: Vec<Event>,
    post_failures: Vec<(Oid, FailureReason)>,
    errors: Vec<CohortClientError>,

    empty: bool,
}

impl ClientEvents {
    pub(crate) fn new() -> Self {
        Self {
            connections: Vec::new(),
            disconnections: 0,
            subscriptions: Vec::new(),
            subscribe_failures: Vec::new(),
            object_events: Vec::new(),
            post_failures: Vec::new(),
            errors: Vec::new(),

            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: ClientEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: ClientEvent>(&self) -> bool {
        V::has(self)
    }

    // Crate-public

    pub(crate) fn push_connection(&mut self, client_oid: Oid) {
        self.connections.push(client_oid);
        self.empty = false;
    }

    pub(crate) fn push_disconnection(&mut self) {
        self.disconnections += 1;
        self.empty = false;
    }

    pub(crate) fn push_subscription(&mut self, oid: Oid) {
        self.subscriptions.push(oid);
        self.empty = false;
    }

    pub(crate) fn push_subscribe_failure(&mut self, oid: Oid, reason: FailureReason) {
        self.subscribe_failures.push((oid, reason));
        self.empty = false;
    }

    pub(crate) fn push_object_event(&mut self, event: Event) {
        self.object_events.push(event);
        self.empty = false;
    }

    pub(crate) fn push_post_failure(&mut self, oid: Oid, reason: FailureReason) {
        self.post_failures.push((oid, reason));
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: CohortClientError) {
        self.errors.push(error);
        self.empty = false;
    }
}

// Event Trait
pub trait ClientEvent {
    type Iter;

    fn iter(events: &mut ClientEvents) -> Self::Iter;

    fn has(events: &ClientEvents) -> bool;
}

// ConnectEvent, yields the client object named in the bootstrap packet
pub struct ConnectEvent;
impl ClientEvent for ConnectEvent {
    type Iter = IntoIter<Oid>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        let list = mem::take(&mut events.connections);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ClientEvents) -> bool {
        !events.connections.is_empty()
    }
}

// DisconnectEvent
pub struct DisconnectEvent;
impl ClientEvent for DisconnectEvent {
    type Iter = IntoIter<()>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        let count = mem::take(&mut events.disconnections);
        IntoIterator::into_iter(vec![(); count])
    }

    fn has(events: &ClientEvents) -> bool {
        events.disconnections > 0
    }
}

// SubscribeEvent, a proxy is now available
pub struct SubscribeEvent;
impl ClientEvent for SubscribeEvent {
    type Iter = IntoIter<Oid>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        let list = mem::take(&mut events.subscriptions);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ClientEvents) -> bool {
        !events.subscriptions.is_empty()
    }
}

// SubscribeFailEvent
pub struct SubscribeFailEvent;
impl ClientEvent for SubscribeFailEvent {
    type Iter = IntoIter<(Oid, FailureReason)>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        let list = mem::take(&mut events.subscribe_failures);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ClientEvents) -> bool {
        !events.subscribe_failures.is_empty()
    }
}

// ObjectEvent, events applied to proxies, in the order they were applied
pub struct ObjectEvent;
impl ClientEvent for ObjectEvent {
    type Iter = IntoIter<Event>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        let list = mem::take(&mut events.object_events);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ClientEvents) -> bool {
        !events.object_events.is_empty()
    }
}

// PostFailEvent, the server refused or could not apply a posted event
pub struct PostFailEvent;
impl ClientEvent for PostFailEvent {
    type Iter = IntoIter<(Oid, FailureReason)>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        let list = mem::take(&mut events.post_failures);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ClientEvents) -> bool {
        !events.post_failures.is_empty()
    }
}

// ErrorEvent
pub struct ErrorEvent;
impl ClientEvent for ErrorEvent {
    type Iter = IntoIter<CohortClientError>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        let list = mem::take(&mut events.errors);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ClientEvents) -> bool {
        !events.errors.is_empty()
    }
}
