use thiserror::Error;

use cohort_shared::{
    FailureReason, InvocationError, ObjectError, Oid, RegistrationError, SendError, SerdeErr,
};

use crate::{ConnectionKey, Subscriber};

/// Errors raised by the object directory
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// No live object has this identifier
    #[error("No object exists with {oid}")]
    UnknownTarget { oid: Oid },

    /// The identifier belonged to an object that was destroyed and cannot be revived
    #[error("Object {oid} was destroyed and its identifier cannot be reused")]
    Retired { oid: Oid },

    /// The identifier is already held by a live object
    #[error("Object {oid} already exists")]
    AlreadyExists { oid: Oid },

    /// Every assignable identifier has been issued
    #[error("Object identifiers exhausted, no further objects can be created")]
    OidsExhausted,

    /// Object lifecycle events are produced by the directory, never posted
    #[error("Lifecycle event for {oid} cannot be posted, use create/destroy instead")]
    LifecycleEvent { oid: Oid },

    /// Event or attributes did not fit the object's schema
    #[error("Object error: {0}")]
    Object(#[from] ObjectError),
}

impl DirectoryError {
    pub fn failure_reason(&self) -> FailureReason {
        match self {
            DirectoryError::UnknownTarget { .. } | DirectoryError::Retired { .. } => {
                FailureReason::UnknownTarget
            }
            other => FailureReason::Rejected(other.to_string()),
        }
    }
}

/// Why a subscription could not be granted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscribeError {
    /// The access controller refused the subscriber
    #[error("{subscriber} may not subscribe to {oid}")]
    AccessDenied { subscriber: Subscriber, oid: Oid },

    /// The object does not exist and could not be resolved
    #[error("No object {oid} exists or could be resolved")]
    UnknownTarget { oid: Oid },

    /// The subscriber is not a registered listener or live connection
    #[error("{subscriber} is not registered")]
    UnknownSubscriber { subscriber: Subscriber },
}

impl SubscribeError {
    pub fn failure_reason(&self) -> FailureReason {
        match self {
            SubscribeError::AccessDenied { .. } => FailureReason::AccessDenied,
            SubscribeError::UnknownTarget { .. } | SubscribeError::UnknownSubscriber { .. } => {
                FailureReason::UnknownTarget
            }
        }
    }
}

/// Top-level error type for the server
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CohortServerError {
    /// Directory operation failed
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// Subscription was refused
    #[error("Subscribe error: {0}")]
    Subscribe(#[from] SubscribeError),

    /// Packet from a connection could not be decoded
    #[error("Malformed packet from {connection}: {error}")]
    MalformedPacket {
        connection: ConnectionKey,
        error: SerdeErr,
    },

    /// Packet could not be handed to a connection's transport
    #[error("Failed to send to {connection}: {error}")]
    Send {
        connection: ConnectionKey,
        error: SendError,
    },

    /// The access controller refused a mutation
    #[error("{subscriber} may not post {event_type} to {oid}")]
    AccessDenied {
        subscriber: Subscriber,
        oid: Oid,
        event_type: String,
    },

    /// Operation named a connection that is not attached
    #[error("{connection} is not connected")]
    UnknownConnection { connection: ConnectionKey },

    /// Packet kind is only ever sent by the server
    #[error("Unexpected {packet} packet from {connection}")]
    UnexpectedPacket {
        connection: ConnectionKey,
        packet: &'static str,
    },

    /// A request could not be dispatched or answered
    #[error("Invocation from {origin} failed: {error}")]
    Invocation { origin: Oid, error: InvocationError },

    /// Dispatcher registration failed
    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    /// The server that owned this event queue has been dropped
    #[error("Server event queue is closed")]
    QueueClosed,
}
