use cohort_shared::{Event, FailureReason, Oid, Snapshot};

use crate::EventSender;

/// Local party that observes objects in the server process: chat handlers,
/// game managers, anything that reacts to events without a connection.
///
/// Closures of the form `FnMut(&Event, &EventSender)` are listeners that
/// only care about events.
pub trait ObjectListener: Send {
    fn handle_event(&mut self, event: &Event, sender: &EventSender);

    /// A pending subscription completed
    fn object_available(&mut self, _snapshot: &Snapshot, _sender: &EventSender) {}

    /// A pending subscription failed
    fn request_failed(&mut self, _oid: Oid, _reason: &FailureReason) {}
}

impl<F> ObjectListener for F
where
    F: FnMut(&Event, &EventSender) + Send,
{
    fn handle_event(&mut self, event: &Event, sender: &EventSender) {
        self(event, sender)
    }
}
