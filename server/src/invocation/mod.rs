mod dispatcher;
mod invocation_manager;

pub use dispatcher::{Dispatcher, InvocationContext, Responder};
pub(crate) use invocation_manager::InvocationManager;
