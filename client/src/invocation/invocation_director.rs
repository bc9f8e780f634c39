use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use log::warn;

use cohort_shared::{
    InvocationError, InvocationId, InvocationIdGenerator, InvocationNotification,
    InvocationRequest, InvocationResponse, Marshaller, RegistrationError, Value, REQUEST_PROCESSED,
};

use crate::{
    invocation::{InvocationReceiver, ResponseTarget},
    CohortClientError,
};

struct PendingInvocation {
    target: Box<dyn ResponseTarget>,
    deadline: Option<Instant>,
    description: String,
}

/// Caller side of the invocation layer: issues request ids, remembers who
/// is waiting on each, and routes responses and notifications arriving on
/// the client object.
pub struct InvocationDirector {
    ids: InvocationIdGenerator,
    pending: HashMap<InvocationId, PendingInvocation>,
    receivers: HashMap<String, Box<dyn InvocationReceiver>>,
}

impl InvocationDirector {
    pub fn new() -> Self {
        Self::with_generator(InvocationIdGenerator::new())
    }

    pub fn with_generator(ids: InvocationIdGenerator) -> Self {
        Self {
            ids,
            pending: HashMap::new(),
            receivers: HashMap::new(),
        }
    }

    /// Encodes a call and, if a target is given, records it as pending until
    /// its response, the deadline, or connection loss
    pub fn invoke(
        &mut self,
        marshaller: &Marshaller,
        procedure: &str,
        args: Vec<Value>,
        target: Option<Box<dyn ResponseTarget>>,
        deadline: Option<Instant>,
    ) -> Result<InvocationRequest, InvocationError> {
        let pending = &self.pending;
        let Some(id) = self.ids.generate(|id| pending.contains_key(&id)) else {
            return Err(InvocationError::ApplicationFailure(
                "every invocation id is in use".to_string(),
            ));
        };
        let request = marshaller.request(procedure, id, args)?;
        if let Some(target) = target {
            self.pending.insert(
                id,
                PendingInvocation {
                    target,
                    deadline,
                    description: format!("{}#{}", marshaller.module(), procedure),
                },
            );
        }
        Ok(request)
    }

    pub fn register_receiver(
        &mut self,
        module: &str,
        receiver: Box<dyn InvocationReceiver>,
    ) -> Result<(), RegistrationError> {
        if self.receivers.contains_key(module) {
            return Err(RegistrationError::DuplicateModule {
                module: module.to_string(),
            });
        }
        self.receivers.insert(module.to_string(), receiver);
        Ok(())
    }

    /// Delivers a response to its pending caller and forgets the id. A
    /// response for an id that is not pending is logged and discarded.
    pub fn handle_response(&mut self, args: Vec<Value>) -> Result<InvocationId, CohortClientError> {
        let response = InvocationResponse::from_args(args)?;
        let id = response.id;
        let Some(pending) = self.pending.remove(&id) else {
            warn!("Client Error: no pending invocation for response {}, discarding", id);
            return Err(CohortClientError::UnknownInvocation { id });
        };
        match response.into_outcome() {
            Ok((name, args)) if name == REQUEST_PROCESSED => {
                pending.target.handle_response(Ok(args))
            }
            Ok((name, args)) => pending.target.handle_named_response(name, args),
            Err(error) => pending.target.handle_response(Err(error)),
        }
        Ok(id)
    }

    pub fn handle_notification(&mut self, args: Vec<Value>) -> Result<(), CohortClientError> {
        let InvocationNotification { module, code, args } = InvocationNotification::from_args(args)?;
        let Some(receiver) = self.receivers.get_mut(&module) else {
            warn!("Client Error: no receiver registered for notification {}{}", module, code);
            return Err(CohortClientError::UnroutedNotification { module });
        };
        receiver.receive(code, args).map_err(|error| {
            warn!("Client Error: receiver for {}{} failed: {}", module, code, error);
            CohortClientError::Invocation(error)
        })
    }

    /// Forgets a pending call without answering it, for a request that never
    /// left the client. Dropping the target reads as `ConnectionLost` to a
    /// waiting `ResponseReceiver`.
    pub fn abandon(&mut self, id: InvocationId) -> bool {
        self.pending.remove(&id).is_some()
    }

    /// Fails every call whose deadline has passed with `Timeout`
    pub fn check_timeouts(&mut self, now: Instant) -> Vec<InvocationId> {
        let mut expired: Vec<InvocationId> = self
            .pending
            .iter()
            .filter(|(_, pending)| pending.deadline.is_some_and(|deadline| now >= deadline))
            .map(|(id, _)| *id)
            .collect();
        expired.sort();
        for id in &expired {
            if let Some(pending) = self.pending.remove(id) {
                warn!("Client Error: {} ({}) timed out", pending.description, id);
                pending.target.handle_response(Err(InvocationError::Timeout));
            }
        }
        expired
    }

    /// Fails every pending call with `ConnectionLost`, returning how many
    /// there were
    pub fn connection_lost(&mut self) -> usize {
        let mut pending: Vec<(InvocationId, PendingInvocation)> = self.pending.drain().collect();
        pending.sort_by_key(|(id, _)| *id);
        let count = pending.len();
        for (_, pending) in pending {
            pending
                .target
                .handle_response(Err(InvocationError::ConnectionLost));
        }
        count
    }

    pub fn is_pending(&self, id: InvocationId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Default for InvocationDirector {
    fn default() -> Self {
        Self::new()
    }
}

/// Deadline for a call issued at `now`
pub(crate) fn deadline(now: Instant, timeout: Option<Duration>) -> Option<Instant> {
    timeout.and_then(|timeout| now.checked_add(timeout))
}
