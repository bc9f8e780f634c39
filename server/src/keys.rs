use std::fmt;

/// Identifies one remote connection for as long as it is attached
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionKey(u64);

/// Identifies one local listener registered with the server
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerKey(u64);

impl ConnectionKey {
    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

impl ListenerKey {
    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connection:{}", self.0)
    }
}

impl fmt::Display for ListenerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener:{}", self.0)
    }
}

/// A party interested in an object's events
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Subscriber {
    Local(ListenerKey),
    Remote(ConnectionKey),
}

impl fmt::Display for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subscriber::Local(key) => key.fmt(f),
            Subscriber::Remote(key) => key.fmt(f),
        }
    }
}

// Keys are never reused within one server's lifetime
#[derive(Default)]
pub(crate) struct KeyGenerator {
    next: u64,
}

impl KeyGenerator {
    pub fn connection(&mut self) -> ConnectionKey {
        ConnectionKey(self.bump())
    }

    pub fn listener(&mut self) -> ListenerKey {
        ListenerKey(self.bump())
    }

    fn bump(&mut self) -> u64 {
        self.next += 1;
        self.next
    }
}
