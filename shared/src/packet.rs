// The messages exchanged between a server and one client connection

use cohort_serde::{BitReader, BitWrite, BitWriter, Serde, SerdeErr};

use crate::{Event, Oid, Snapshot};

/// Why a subscribe or a posted event was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    AccessDenied,
    UnknownTarget,
    // The event was well-addressed but invalid against the object's schema
    Rejected(String),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::AccessDenied => write!(f, "access denied"),
            FailureReason::UnknownTarget => write!(f, "unknown target"),
            FailureReason::Rejected(detail) => write!(f, "rejected: {}", detail),
        }
    }
}

impl Serde for FailureReason {
    fn ser(&self, writer: &mut dyn BitWrite) {
        match self {
            FailureReason::AccessDenied => writer.write_byte(0),
            FailureReason::UnknownTarget => writer.write_byte(1),
            FailureReason::Rejected(detail) => {
                writer.write_byte(2);
                detail.ser(writer);
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(FailureReason::AccessDenied),
            1 => Ok(FailureReason::UnknownTarget),
            2 => Ok(FailureReason::Rejected(String::de(reader)?)),
            tag => Err(SerdeErr::UnknownTag {
                type_name: "FailureReason",
                tag,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// First packet on every connection: the connection's own client object
    /// and the well-known object invocation requests are posted to
    Bootstrap { client_oid: Oid, invocation_oid: Oid },
    /// An event travelling in either direction. Client to server it is a
    /// request to post; server to client it is a committed event.
    ForwardEvent(Event),
    Subscribe { oid: Oid },
    Unsubscribe { oid: Oid },
    SubscribeAck(Snapshot),
    SubscribeFail { oid: Oid, reason: FailureReason },
    PostFailed { oid: Oid, reason: FailureReason },
}

impl Packet {
    pub fn to_bytes(&self) -> Box<[u8]> {
        let mut writer = BitWriter::new();
        self.ser(&mut writer);
        writer.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerdeErr> {
        let mut reader = BitReader::new(bytes);
        Self::de(&mut reader)
    }

    /// The object this packet concerns, if any
    pub fn oid(&self) -> Option<Oid> {
        match self {
            Packet::Bootstrap { .. } => None,
            Packet::ForwardEvent(event) => Some(event.target()),
            Packet::Subscribe { oid }
            | Packet::Unsubscribe { oid }
            | Packet::SubscribeFail { oid, .. }
            | Packet::PostFailed { oid, .. } => Some(*oid),
            Packet::SubscribeAck(snapshot) => Some(snapshot.oid),
        }
    }
}

impl Serde for Packet {
    fn ser(&self, writer: &mut dyn BitWrite) {
        match self {
            Packet::Bootstrap {
                client_oid,
                invocation_oid,
            } => {
                writer.write_byte(0);
                client_oid.ser(writer);
                invocation_oid.ser(writer);
            }
            Packet::ForwardEvent(event) => {
                writer.write_byte(1);
                event.ser(writer);
            }
            Packet::Subscribe { oid } => {
                writer.write_byte(2);
                oid.ser(writer);
            }
            Packet::Unsubscribe { oid } => {
                writer.write_byte(3);
                oid.ser(writer);
            }
            Packet::SubscribeAck(snapshot) => {
                writer.write_byte(4);
                snapshot.ser(writer);
            }
            Packet::SubscribeFail { oid, reason } => {
                writer.write_byte(5);
                oid.ser(writer);
                reason.ser(writer);
            }
            Packet::PostFailed { oid, reason } => {
                writer.write_byte(6);
                oid.ser(writer);
                reason.ser(writer);
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(Packet::Bootstrap {
                client_oid: Oid::de(reader)?,
                invocation_oid: Oid::de(reader)?,
            }),
            1 => Ok(Packet::ForwardEvent(Event::de(reader)?)),
            2 => Ok(Packet::Subscribe {
                oid: Oid::de(reader)?,
            }),
            3 => Ok(Packet::Unsubscribe {
                oid: Oid::de(reader)?,
            }),
            4 => Ok(Packet::SubscribeAck(Snapshot::de(reader)?)),
            5 => Ok(Packet::SubscribeFail {
                oid: Oid::de(reader)?,
                reason: FailureReason::de(reader)?,
            }),
            6 => Ok(Packet::PostFailed {
                oid: Oid::de(reader)?,
                reason: FailureReason::de(reader)?,
            }),
            // Malformed or hostile input must not take the loop down
            tag => Err(SerdeErr::UnknownTag {
                type_name: "Packet",
                tag,
            }),
        }
    }
}
