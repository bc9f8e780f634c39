use tokio::sync::mpsc::UnboundedSender;

use cohort_shared::{Event, Oid};

use crate::{CohortServerError, ConnectionKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Origin {
    Server,
    Remote(ConnectionKey),
}

pub(crate) enum Queued {
    Post { event: Event, origin: Origin },
    Destroy(Oid),
}

/// Cloneable handle for posting events into a server's processing loop from
/// listeners, providers or other threads. Posted events are applied in the
/// order they were queued, after the event currently being processed.
#[derive(Clone)]
pub struct EventSender {
    sender: UnboundedSender<Queued>,
}

impl EventSender {
    pub(crate) fn new(sender: UnboundedSender<Queued>) -> Self {
        Self { sender }
    }

    pub fn post(&self, event: Event) -> Result<(), CohortServerError> {
        self.post_from(event, Origin::Server)
    }

    /// Queues destruction of an object behind every event already posted
    pub fn destroy(&self, oid: Oid) -> Result<(), CohortServerError> {
        self.sender
            .send(Queued::Destroy(oid))
            .map_err(|_| CohortServerError::QueueClosed)
    }

    pub(crate) fn post_from(&self, event: Event, origin: Origin) -> Result<(), CohortServerError> {
        self.sender
            .send(Queued::Post { event, origin })
            .map_err(|_| CohortServerError::QueueClosed)
    }
}
