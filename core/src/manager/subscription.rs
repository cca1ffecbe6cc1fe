//! Scoped listener registrations.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Registration token returned when subscribing to change notifications.
///
/// The listener stays registered until the token is dropped or
/// [`unsubscribe`](Self::unsubscribe) is called.
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub(crate) fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Registered callbacks keyed by id.
///
/// Dispatch works on a snapshot, so callbacks may subscribe or unsubscribe
/// while a message is being delivered.
pub struct ListenerList<E: ?Sized> {
    inner: Arc<Mutex<ListenerEntries<E>>>,
}

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct ListenerEntries<E: ?Sized> {
    next_id: u64,
    entries: Vec<(u64, Callback<E>)>,
}

impl<E: ?Sized + 'static> ListenerList<E> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ListenerEntries {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    pub fn subscribe(&self, callback: impl Fn(&E) + Send + Sync + 'static) -> Subscription {
        let callback: Callback<E> = Arc::new(callback);
        let id = {
            let mut inner = self.inner.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.entries.push((id, callback));
            id
        };
        let weak: Weak<Mutex<ListenerEntries<E>>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.lock().entries.retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Deliver `event` to every callback registered at the time of the call.
    pub fn dispatch(&self, event: &E) {
        let snapshot: Vec<Callback<E>> = self
            .inner
            .lock()
            .entries
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in snapshot {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: ?Sized + 'static> Default for ListenerList<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_drop_unsubscribes() {
        let list = ListenerList::<u32>::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let subscription = list.subscribe(move |value| {
            counter.fetch_add(*value as usize, Ordering::SeqCst);
        });

        list.dispatch(&2);
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        drop(subscription);
        list.dispatch(&5);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert!(list.is_empty());
    }

    #[test]
    fn test_subscription_outlives_list() {
        let list = ListenerList::<u32>::new();
        let subscription = list.subscribe(|_| {});
        drop(list);
        subscription.unsubscribe();
    }
}
