use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tokio::sync::oneshot;

use cohort_shared::{InvocationError, Value, REQUEST_PROCESSED};

/// Where the outcome of one invocation is delivered. Exactly one of the
/// two hooks is called once: with the response, or with
/// `ConnectionLost`/`Timeout`.
pub trait ResponseTarget: Send {
    fn handle_response(self: Box<Self>, result: Result<Vec<Value>, InvocationError>);

    /// A successful response the provider sent under its own name instead of
    /// `requestProcessed`. The name is dropped unless overridden.
    fn handle_named_response(self: Box<Self>, _name: String, args: Vec<Value>) {
        self.handle_response(Ok(args))
    }
}

/// Target that sees every outcome together with its response name
pub struct NamedResponseTarget<F> {
    handler: F,
}

/// Wraps `handler` so that named responses reach it with their name;
/// plain successes arrive as `requestProcessed`
pub fn named_response<F>(handler: F) -> NamedResponseTarget<F>
where
    F: FnOnce(Result<(String, Vec<Value>), InvocationError>) + Send,
{
    NamedResponseTarget { handler }
}

impl<F> ResponseTarget for NamedResponseTarget<F>
where
    F: FnOnce(Result<(String, Vec<Value>), InvocationError>) + Send,
{
    fn handle_response(self: Box<Self>, result: Result<Vec<Value>, InvocationError>) {
        (self.handler)(result.map(|args| (REQUEST_PROCESSED.to_string(), args)))
    }

    fn handle_named_response(self: Box<Self>, name: String, args: Vec<Value>) {
        (self.handler)(Ok((name, args)))
    }
}

impl<F> ResponseTarget for F
where
    F: FnOnce(Result<Vec<Value>, InvocationError>) + Send,
{
    fn handle_response(self: Box<Self>, result: Result<Vec<Value>, InvocationError>) {
        (*self)(result)
    }
}

/// Creates a response target whose outcome can be awaited
pub fn response_channel() -> (ResponseSender, ResponseReceiver) {
    let (sender, receiver) = oneshot::channel();
    (ResponseSender { sender }, ResponseReceiver { receiver })
}

pub struct ResponseSender {
    sender: oneshot::Sender<Result<Vec<Value>, InvocationError>>,
}

impl ResponseTarget for ResponseSender {
    fn handle_response(self: Box<Self>, result: Result<Vec<Value>, InvocationError>) {
        // The caller may have stopped waiting
        let _ = self.sender.send(result);
    }
}

/// Resolves to the invocation's outcome. If the client is dropped with the
/// call still pending, resolves to `ConnectionLost`.
pub struct ResponseReceiver {
    receiver: oneshot::Receiver<Result<Vec<Value>, InvocationError>>,
}

impl ResponseReceiver {
    /// Non-blocking check, `None` while the call is still pending
    pub fn try_result(&mut self) -> Option<Result<Vec<Value>, InvocationError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(InvocationError::ConnectionLost)),
        }
    }
}

impl Future for ResponseReceiver {
    type Output = Result<Vec<Value>, InvocationError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(InvocationError::ConnectionLost)))
    }
}
