use cohort_shared::{
    InvocationError, InvocationId, InvocationResponse, Oid, ProcedureCode, Value,
};

use crate::{CohortServerError, ConnectionKey, EventSender, ObjectDirectory};

/// Server half of one module: decodes a procedure's arguments, calls the
/// typed provider and encodes its result.
///
/// Return `Ok(Some(args))` to answer immediately, `Ok(None)` when the
/// procedure expects no response or will answer later through the
/// context's [`Responder`], and `Err` to fail the call. A named outcome is
/// sent with [`Responder::respond_named`] followed by `Ok(None)`.
pub trait Dispatcher: Send {
    fn dispatch(
        &mut self,
        context: &InvocationContext,
        code: ProcedureCode,
        args: Vec<Value>,
    ) -> Result<Option<Vec<Value>>, InvocationError>;
}

/// What a provider knows about the call it is serving
pub struct InvocationContext<'a> {
    connection: ConnectionKey,
    caller: Oid,
    directory: &'a ObjectDirectory,
    sender: &'a EventSender,
    responder: Responder,
}

impl<'a> InvocationContext<'a> {
    pub(crate) fn new(
        connection: ConnectionKey,
        caller: Oid,
        id: InvocationId,
        directory: &'a ObjectDirectory,
        sender: &'a EventSender,
    ) -> Self {
        Self {
            connection,
            caller,
            directory,
            sender,
            responder: Responder {
                sender: sender.clone(),
                client_oid: caller,
                id,
            },
        }
    }

    pub fn connection(&self) -> ConnectionKey {
        self.connection
    }

    /// The caller's client object
    pub fn caller(&self) -> Oid {
        self.caller
    }

    pub fn directory(&self) -> &ObjectDirectory {
        self.directory
    }

    /// For events the provider posts as a side effect of the call
    pub fn sender(&self) -> &EventSender {
        self.sender
    }

    /// Handle for answering after `dispatch` has returned
    pub fn responder(&self) -> Responder {
        self.responder.clone()
    }
}

/// Deferred answer to one request. May be moved to another thread; the
/// response is queued like any other event.
#[derive(Clone)]
pub struct Responder {
    sender: EventSender,
    client_oid: Oid,
    id: InvocationId,
}

impl Responder {
    pub fn id(&self) -> InvocationId {
        self.id
    }

    pub fn respond(&self, result: Result<Vec<Value>, InvocationError>) -> Result<(), CohortServerError> {
        let response = match result {
            Ok(args) => InvocationResponse::processed(self.id, args),
            Err(error) => InvocationResponse::failed(self.id, &error),
        };
        self.sender.post(response.to_event(self.client_oid))
    }

    /// Answers successfully under `name`, which the caller receives in place
    /// of `requestProcessed`
    pub fn respond_named(&self, name: &str, args: Vec<Value>) -> Result<(), CohortServerError> {
        let response = InvocationResponse::named(self.id, name, args);
        self.sender.post(response.to_event(self.client_oid))
    }
}
