/// In-memory transport for E2E testing
/// Routes packets between server and client without network I/O
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, PoisonError,
    },
};

use cohort_shared::{PacketSender, SendError};

type Queue = Arc<Mutex<VecDeque<Box<[u8]>>>>;

/// Pair of connected server and client endpoints
pub struct LocalSocketPair {
    pub server_sender: Box<dyn PacketSender>,
    pub client_sender: Box<dyn PacketSender>,
    /// Packets the client sent, for the server to read
    pub server_receiver: LocalReceiver,
    /// Packets the server sent, for the client to read
    pub client_receiver: LocalReceiver,
    pub link: LocalLink,
}

impl LocalSocketPair {
    pub fn new() -> Self {
        let link = LocalLink {
            open: Arc::new(AtomicBool::new(true)),
        };
        let server_to_client: Queue = Arc::new(Mutex::new(VecDeque::new()));
        let client_to_server: Queue = Arc::new(Mutex::new(VecDeque::new()));

        Self {
            server_sender: Box::new(LocalSender {
                queue: server_to_client.clone(),
                link: link.clone(),
            }),
            client_sender: Box::new(LocalSender {
                queue: client_to_server.clone(),
                link: link.clone(),
            }),
            server_receiver: LocalReceiver {
                queue: client_to_server,
            },
            client_receiver: LocalReceiver {
                queue: server_to_client,
            },
            link,
        }
    }
}

impl Default for LocalSocketPair {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared switch for both directions of a pair. Once closed, every send
/// fails with `SendError::Closed`.
#[derive(Clone)]
pub struct LocalLink {
    open: Arc<AtomicBool>,
}

impl LocalLink {
    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

struct LocalSender {
    queue: Queue,
    link: LocalLink,
}

impl PacketSender for LocalSender {
    fn send(&self, payload: &[u8]) -> Result<(), SendError> {
        if !self.link.is_open() {
            return Err(SendError::Closed {
                length: payload.len(),
            });
        }
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(payload.into());
        Ok(())
    }
}

pub struct LocalReceiver {
    queue: Queue,
}

impl LocalReceiver {
    pub fn receive(&self) -> Option<Box<[u8]>> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
