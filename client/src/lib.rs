//! # Cohort Client
//! Keeps proxy copies of subscribed objects in step with a cohort server and
//! issues invocation requests, delivering each response to the caller that
//! is waiting on it.

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

mod client;
mod error;
mod events;
mod invocation;
mod proxy;

pub use client::{Client, ClientConfig};
pub use error::CohortClientError;
pub use events::{
    ClientEvent, ClientEvents, ConnectEvent, DisconnectEvent, ErrorEvent, ObjectEvent,
    PostFailEvent, SubscribeEvent, SubscribeFailEvent,
};
pub use invocation::{
    named_response, response_channel, InvocationDirector, InvocationReceiver, NamedResponseTarget,
    ResponseReceiver, ResponseSender, ResponseTarget,
};
pub use proxy::ProxyDirectory;

cfg_if! {
    if #[cfg(feature = "transport_tokio")] {
        pub use cohort_shared::PacketChannel;
    }
}
