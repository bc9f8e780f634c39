use cohort_shared::Oid;

use crate::DirectoryError;

/// Monotonic issuer of object identifiers. An identifier is handed out at
/// most once, so a destroyed object's oid can never name a new object.
pub struct OidAllocator {
    next: u32,
}

impl OidAllocator {
    pub fn new() -> Self {
        // Oid(0) is reserved as "no object"
        Self { next: 1 }
    }

    pub fn allocate(&mut self) -> Result<Oid, DirectoryError> {
        if self.next == 0 {
            return Err(DirectoryError::OidsExhausted);
        }
        let oid = Oid::from_u32(self.next);
        // Wrapping to 0 marks the space as spent
        self.next = self.next.wrapping_add(1);
        Ok(oid)
    }

    /// Whether `oid` has been handed out, by `allocate` or `reserve`, or
    /// lies below one that has
    pub fn is_issued(&self, oid: Oid) -> bool {
        let value = oid.to_u32();
        value != 0 && (self.next == 0 || value < self.next)
    }

    /// Ensures an identifier issued elsewhere (a resolved object) is never
    /// allocated again
    pub fn reserve(&mut self, oid: Oid) {
        let value = oid.to_u32();
        if self.next != 0 && value >= self.next {
            self.next = value.wrapping_add(1);
        }
    }
}
