use std::fmt;

/// Correlates a response with the request that caused it, unique among the
/// requests pending on one connection
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InvocationId(u32);

impl InvocationId {
    pub const fn from_u32(value: u32) -> Self {
        InvocationId(value)
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-connection counter of invocation ids.
///
/// Ids wrap at `u32::MAX`. After a wrap the counter may land on an id that is
/// still pending (a request that never got its response), so `generate` asks
/// the caller which ids are in use and steps past them.
pub struct InvocationIdGenerator {
    next: u32,
}

impl InvocationIdGenerator {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }

    /// Returns the next id for which `in_use` is false, or `None` if every id
    /// is taken
    pub fn generate(
        &mut self,
        mut in_use: impl FnMut(InvocationId) -> bool,
    ) -> Option<InvocationId> {
        let start = self.next;
        loop {
            let candidate = InvocationId(self.next);
            self.next = self.next.wrapping_add(1);
            if !in_use(candidate) {
                return Some(candidate);
            }
            if self.next == start {
                return None;
            }
        }
    }
}

impl Default for InvocationIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
