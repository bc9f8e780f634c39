use std::fmt;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Wire-compact identifier of a procedure within a module.
///
/// Derived from the procedure's name alone (FNV-1a, folded to 16 bits), so
/// adding, removing or reordering declarations never changes the code of an
/// existing procedure. Collisions within a module are rejected when the
/// module's `Marshaller` is built.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcedureCode(u16);

impl ProcedureCode {
    pub const fn of(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = FNV_OFFSET_BASIS;
        let mut index = 0;
        while index < bytes.len() {
            hash ^= bytes[index] as u32;
            hash = hash.wrapping_mul(FNV_PRIME);
            index += 1;
        }
        ProcedureCode(((hash >> 16) ^ (hash & 0xffff)) as u16)
    }

    pub const fn from_u16(code: u16) -> Self {
        ProcedureCode(code)
    }

    pub const fn to_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for ProcedureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
