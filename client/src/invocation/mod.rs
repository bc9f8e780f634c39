mod invocation_director;
mod receiver;
mod response_target;

pub use invocation_director::InvocationDirector;
pub(crate) use invocation_director::deadline;
pub use receiver::InvocationReceiver;
pub use response_target::{
    named_response, response_channel, NamedResponseTarget, ResponseReceiver, ResponseSender,
    ResponseTarget,
};
