//! # Cohort Shared
//! The replicated object model and the invocation envelope shared between
//! cohort-server & cohort-client.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

pub use cohort_serde::{
    BitReader, BitWrite, BitWriter, Serde, SerdeErr, SignedInteger, SignedVariableInteger,
    UnsignedInteger, UnsignedVariableInteger, MAX_NESTING_DEPTH,
};

mod event;
mod invocation;
mod object;
mod packet;
mod transport;
mod types;
mod value;

pub use event::{Event, EventKind, EventType};
pub use invocation::{
    args::ArgReader,
    codes::ProcedureCode,
    envelope::{
        InvocationNotification, InvocationRequest, InvocationResponse, NOTIFICATION_NAME,
        REQUEST_FAILED, REQUEST_NAME, REQUEST_PROCESSED, RESPONSE_NAME,
    },
    error::{InvocationError, RegistrationError},
    id_generator::{InvocationId, InvocationIdGenerator},
    marshaller::Marshaller,
};
pub use object::{
    error::ObjectError,
    schema::{Schema, SchemaBuilder},
    shared_object::SharedObject,
    snapshot::Snapshot,
};
pub use packet::{FailureReason, Packet};
pub use transport::{PacketSender, SendError};
pub use types::Oid;
pub use value::{FieldKind, FromValue, IntoValue, Value};

cfg_if! {
    if #[cfg(feature = "transport_tokio")] {
        pub use transport::PacketChannel;
    }
}
