use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use cohort_shared::Oid;

/// What happens to an ephemeral object once its last subscriber leaves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Destroy as soon as interest drops to zero
    Immediate,
    /// Destroy only if interest stays at zero for the given duration,
    /// measured from the moment it dropped. A resubscribe in between cancels
    /// it.
    Debounced(Duration),
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        EvictionPolicy::Immediate
    }
}

/// Ephemeral objects with zero interest, awaiting a sweep
#[derive(Default)]
pub(crate) struct EvictionQueue {
    idle_since: HashMap<Oid, Instant>,
}

impl EvictionQueue {
    /// Records that interest in `oid` dropped to zero at `now`. An object
    /// already waiting keeps its earlier time.
    pub fn schedule(&mut self, oid: Oid, now: Instant) {
        self.idle_since.entry(oid).or_insert(now);
    }

    pub fn cancel(&mut self, oid: Oid) -> bool {
        self.idle_since.remove(&oid).is_some()
    }

    pub fn is_scheduled(&self, oid: Oid) -> bool {
        self.idle_since.contains_key(&oid)
    }

    /// Returns objects idle for at least `delay` as of `now`
    pub fn sweep(&mut self, now: Instant, delay: Duration) -> Vec<Oid> {
        let mut due = Vec::new();
        for (oid, since) in &self.idle_since {
            if now.saturating_duration_since(*since) >= delay {
                due.push(*oid);
            }
        }
        for oid in &due {
            self.idle_since.remove(oid);
        }
        due.sort();
        due
    }
}
