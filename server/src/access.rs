use cohort_shared::{Event, Oid};

use crate::{ObjectDirectory, Subscriber};

/// Policy consulted before a subscription or a mutation is granted.
///
/// Hooks see the directory read-only; they decide, they never change state.
pub trait AccessController: Send {
    fn can_subscribe(
        &self,
        _subscriber: &Subscriber,
        _oid: Oid,
        _directory: &ObjectDirectory,
    ) -> bool {
        true
    }

    fn can_mutate(
        &self,
        _subscriber: &Subscriber,
        _event: &Event,
        _directory: &ObjectDirectory,
    ) -> bool {
        true
    }
}

/// Grants everything
#[derive(Default, Clone, Copy)]
pub struct AllowAll;

impl AccessController for AllowAll {}
