use cohort_shared::{Oid, PacketSender};

/// One attached client: its transport and the object that carries its
/// responses and notifications
pub struct Connection {
    pub sender: Box<dyn PacketSender>,
    pub client_oid: Oid,
}
