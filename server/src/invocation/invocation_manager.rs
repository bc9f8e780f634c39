use std::{
    any::Any,
    collections::HashMap,
    panic::{self, AssertUnwindSafe},
};

use log::warn;

use cohort_shared::{InvocationError, InvocationRequest, Marshaller, RegistrationError, Value};

use crate::invocation::{Dispatcher, InvocationContext};

struct Registration {
    marshaller: Marshaller,
    dispatcher: Box<dyn Dispatcher>,
}

/// Static `(module, code)` table of dispatchers, filled at startup
pub struct InvocationManager {
    modules: HashMap<String, Registration>,
}

impl InvocationManager {
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    pub fn register(
        &mut self,
        marshaller: Marshaller,
        dispatcher: Box<dyn Dispatcher>,
    ) -> Result<(), RegistrationError> {
        let module = marshaller.module().to_string();
        if self.modules.contains_key(&module) {
            return Err(RegistrationError::DuplicateModule { module });
        }
        self.modules.insert(
            module,
            Registration {
                marshaller,
                dispatcher,
            },
        );
        Ok(())
    }

    pub fn is_registered(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }

    /// Routes one request to its dispatcher. Provider errors and panics are
    /// caught here and returned as the call's failure.
    pub fn dispatch(
        &mut self,
        request: InvocationRequest,
        context: &InvocationContext,
    ) -> Result<Option<Vec<Value>>, InvocationError> {
        let InvocationRequest {
            module, code, args, ..
        } = request;

        let Some(registration) = self.modules.get_mut(&module) else {
            warn!(
                "Server Error: no dispatcher registered for module `{}` (code {})",
                module, code
            );
            return Err(InvocationError::UnresolvedTarget(format!("{}{}", module, code)));
        };
        let target = registration.marshaller.describe(code);
        if registration.marshaller.procedure(code).is_none() {
            warn!("Server Error: no procedure registered for {}", target);
            return Err(InvocationError::UnresolvedTarget(target));
        }

        let dispatcher = &mut registration.dispatcher;
        match panic::catch_unwind(AssertUnwindSafe(|| dispatcher.dispatch(context, code, args))) {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(error)) => {
                warn!("Server Error: {} failed: {}", target, error);
                Err(error)
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!("Server Error: {} panicked: {}", target, message);
                Err(InvocationError::ApplicationFailure(format!(
                    "{} panicked: {}",
                    target, message
                )))
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
