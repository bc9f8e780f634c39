//! # Cohort Server
//! The authority for a set of shared objects. Applies events to objects in
//! a single per-object order, fans them out to local listeners and remote
//! connections, and dispatches invocation requests to registered providers.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

#[macro_use]
extern crate cfg_if;

pub mod shared {
    pub use cohort_shared::{
        ArgReader, Event, EventKind, EventType, FailureReason, FieldKind, FromValue,
        IntoValue, InvocationError, InvocationId, Marshaller, ObjectError, Oid, Packet,
        PacketSender, ProcedureCode, RegistrationError, Schema, SendError, SharedObject,
        Snapshot, Value,
    };
}

mod access;
mod directory;
mod error;
mod event_sender;
mod events;
mod invocation;
mod keys;
mod listener;
mod resolver;
mod server;
mod subscription;

pub use access::{AccessController, AllowAll};
pub use directory::ObjectDirectory;
pub use error::{CohortServerError, DirectoryError, SubscribeError};
pub use event_sender::EventSender;
pub use events::{ErrorEvent, EvictionEvent, ServerEvent, ServerEvents};
pub use invocation::{Dispatcher, InvocationContext, Responder};
pub use keys::{ConnectionKey, ListenerKey, Subscriber};
pub use listener::ObjectListener;
pub use resolver::{NoResolver, ObjectResolver, Resolution, ResolvedObject};
pub use server::{Server, ServerConfig};
pub use subscription::{EvictionPolicy, SubscribeOutcome, SubscriptionRegistry, Unsubscribed};

cfg_if! {
    if #[cfg(feature = "transport_tokio")] {
        pub use cohort_shared::PacketChannel;
    }
}
