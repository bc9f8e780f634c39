use thiserror::Error;

/// Outgoing half of one connection. The core only needs ordered, reliable
/// delivery; framing and sockets live behind this trait.
pub trait PacketSender: Send {
    fn send(&self, payload: &[u8]) -> Result<(), SendError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// The receiving end has gone away
    #[error("Transport closed, packet of {length} bytes was not sent")]
    Closed { length: usize },
}

cfg_if! {
    if #[cfg(feature = "transport_tokio")] {
        use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

        impl PacketSender for UnboundedSender<Box<[u8]>> {
            fn send(&self, payload: &[u8]) -> Result<(), SendError> {
                UnboundedSender::send(self, payload.into()).map_err(|_| SendError::Closed {
                    length: payload.len(),
                })
            }
        }

        pub struct PacketChannel;

        impl PacketChannel {
            /// A sender for one direction of a connection and the receiver
            /// its bytes arrive on
            pub fn unbounded() -> (Box<dyn PacketSender>, UnboundedReceiver<Box<[u8]>>) {
                let (sender, receiver) = mpsc::unbounded_channel::<Box<[u8]>>();
                (Box::new(sender), receiver)
            }
        }

    }
}
