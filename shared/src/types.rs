use cohort_serde::{BitReader, BitWrite, Serde, SerdeErr};

/// Identifier of a Shared Object, unique within the authority that issued it
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct Oid(u32);

impl Oid {
    /// Reserved, never assigned to an object
    pub const NONE: Oid = Oid(0);

    pub const fn from_u32(value: u32) -> Self {
        Oid(value)
    }

    pub fn to_u32(&self) -> u32 {
        self.0
    }

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "oid:{}", self.0)
    }
}

impl Serde for Oid {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Oid(u32::de(reader)?))
    }
}
