use thiserror::Error;

use cohort_shared::{
    InvocationError, InvocationId, ObjectError, Oid, RegistrationError, SendError, SerdeErr,
};

/// Top-level error type for the client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CohortClientError {
    /// Packet from the server could not be decoded
    #[error("Malformed packet from server: {0}")]
    MalformedPacket(#[from] SerdeErr),

    /// Packet could not be handed to the transport
    #[error("Failed to send to server: {0}")]
    Send(#[from] SendError),

    /// Operation requires the server's bootstrap packet, which has not
    /// arrived, or the connection was lost
    #[error("Not connected to a server")]
    NotConnected,

    /// An event did not fit the local proxy copy
    #[error("Event for {oid} could not be applied to its proxy: {error}")]
    Object { oid: Oid, error: ObjectError },

    /// An event arrived for an object this client holds no proxy of
    #[error("Event for {oid} arrived without a subscription")]
    NotSubscribed { oid: Oid },

    /// A response named an invocation that is not pending: never issued,
    /// already answered, timed out or failed
    #[error("Response for invocation {id} has no pending caller")]
    UnknownInvocation { id: InvocationId },

    /// A notification arrived for a module with no registered receiver
    #[error("No receiver registered for notifications of module `{module}`")]
    UnroutedNotification { module: String },

    /// Building or routing a call failed
    #[error("Invocation error: {0}")]
    Invocation(#[from] InvocationError),

    /// Receiver registration failed
    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    /// Packet kind is only ever sent by a client
    #[error("Unexpected {packet} packet from server")]
    UnexpectedPacket { packet: &'static str },
}
