use thiserror::Error;

use crate::ProcedureCode;

/// Outcome of a failed remote call, as seen by the caller.
///
/// Every variant is produced at a component boundary and delivered as a
/// value; none of them unwinds out of a processing loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    /// The access controller refused the request
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// The request was addressed to an object that does not exist
    #[error("Unknown target: {0}")]
    UnknownTarget(String),

    /// Arguments did not match what the procedure expects
    #[error("Malformed invocation arguments: {0}")]
    Decode(String),

    /// No dispatcher is registered for the module or procedure code
    #[error("No handler registered for {0}")]
    UnresolvedTarget(String),

    /// The provider reported an error or panicked
    #[error("Provider failed: {0}")]
    ApplicationFailure(String),

    /// The connection was torn down before a response arrived
    #[error("Connection lost before a response arrived")]
    ConnectionLost,

    /// The caller's timeout elapsed before a response arrived
    #[error("Timed out waiting for a response")]
    Timeout,
}

impl InvocationError {
    /// Short reason code carried as the first argument of a failure response
    pub fn code(&self) -> &'static str {
        match self {
            InvocationError::AccessDenied(_) => "access_denied",
            InvocationError::UnknownTarget(_) => "unknown_target",
            InvocationError::Decode(_) => "decode",
            InvocationError::UnresolvedTarget(_) => "unresolved_target",
            InvocationError::ApplicationFailure(_) => "failure",
            InvocationError::ConnectionLost => "connection_lost",
            InvocationError::Timeout => "timeout",
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            InvocationError::AccessDenied(detail)
            | InvocationError::UnknownTarget(detail)
            | InvocationError::Decode(detail)
            | InvocationError::UnresolvedTarget(detail)
            | InvocationError::ApplicationFailure(detail) => detail,
            InvocationError::ConnectionLost | InvocationError::Timeout => "",
        }
    }

    /// Rebuilds an error from a failure response. Unrecognized codes are
    /// treated as application failures so newer servers stay readable.
    pub fn from_code(code: &str, detail: String) -> Self {
        match code {
            "access_denied" => InvocationError::AccessDenied(detail),
            "unknown_target" => InvocationError::UnknownTarget(detail),
            "decode" => InvocationError::Decode(detail),
            "unresolved_target" => InvocationError::UnresolvedTarget(detail),
            "connection_lost" => InvocationError::ConnectionLost,
            "timeout" => InvocationError::Timeout,
            "failure" => InvocationError::ApplicationFailure(detail),
            other => InvocationError::ApplicationFailure(format!("{}: {}", other, detail)),
        }
    }
}

/// Errors raised while building marshallers and registering dispatchers or
/// receivers. These are startup errors, never network ones.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Two procedure names of one module hash to the same code
    #[error("Procedures `{first}` and `{second}` of module `{module}` share code {code}. Rename one of them")]
    CodeCollision {
        module: String,
        first: String,
        second: String,
        code: ProcedureCode,
    },

    /// A procedure name was declared twice
    #[error("Procedure `{name}` is declared twice in module `{module}`")]
    DuplicateProcedure { module: String, name: String },

    /// A dispatcher or receiver is already registered under this module
    #[error("Module `{module}` is already registered")]
    DuplicateModule { module: String },
}
