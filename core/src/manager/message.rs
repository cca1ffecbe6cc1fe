//! Coalesced change messages.

use std::sync::Arc;

use super::ChangeFlags;

/// Changes to a set of managed objects, delivered to manager listeners.
///
/// Each changed object appears once with the union of its change flags.
pub struct ManagerMessage<T: ?Sized> {
    changes: Vec<(Arc<T>, ChangeFlags)>,
    summary: ChangeFlags,
}

impl<T: ?Sized> ManagerMessage<T> {
    pub(crate) fn new(changes: Vec<(Arc<T>, ChangeFlags)>) -> Self {
        let summary = changes
            .iter()
            .fold(ChangeFlags::empty(), |summary, (_, flags)| summary | *flags);
        Self { changes, summary }
    }

    /// Union of the change flags of all objects in the message.
    pub fn summary(&self) -> ChangeFlags {
        self.summary
    }

    /// Change flags for `object`, empty if it is not in the message.
    pub fn object_change(&self, object: &T) -> ChangeFlags {
        self.changes
            .iter()
            .find(|(changed, _)| std::ptr::addr_eq(Arc::as_ptr(changed), object as *const T))
            .map_or(ChangeFlags::empty(), |(_, flags)| *flags)
    }

    pub fn changes(&self) -> impl Iterator<Item = (&Arc<T>, ChangeFlags)> {
        self.changes.iter().map(|(object, flags)| (object, *flags))
    }

    /// Objects whose change intersects `flags`.
    pub fn changed_objects(&self, flags: ChangeFlags) -> impl Iterator<Item = &Arc<T>> {
        self.changes
            .iter()
            .filter(move |(_, changed)| changed.intersects(flags))
            .map(|(object, _)| object)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Merge `flags` for `object` into a pending change list.
pub(crate) fn merge_change<T: ?Sized>(
    pending: &mut Vec<(Arc<T>, ChangeFlags)>,
    object: Arc<T>,
    flags: ChangeFlags,
) {
    match pending.iter_mut().find(|(existing, _)| Arc::ptr_eq(existing, &object)) {
        Some((_, existing_flags)) => *existing_flags |= flags,
        None => pending.push((object, flags)),
    }
}
