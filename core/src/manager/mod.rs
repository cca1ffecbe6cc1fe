//! Named shared objects with synchronous change notification.
//!
//! A [`Manager`] owns a set of uniquely named, reference-counted objects.
//! Objects report their own changes through a [`ManagerLink`]; the manager
//! coalesces them into one [`ManagerMessage`] per object and delivers it to
//! subscribed listeners before the triggering call returns.
//!
//! Nested [`Manager::begin_change`] / [`Manager::end_change`] calls defer
//! delivery until the outermost `end_change`. Changes raised by listeners
//! while a message is being delivered are queued and delivered afterwards.

mod change;
mod message;
mod subscription;

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use thiserror::Error;

pub use change::ChangeFlags;
pub use message::ManagerMessage;
pub use subscription::{ListenerList, Subscription};

use message::merge_change;

/// An object that can be held by a [`Manager`].
pub trait Managed: Send + Sync {
    /// Identifier, unique within the owning manager.
    fn name(&self) -> String;

    /// Back-reference used to report changes to the owning manager.
    fn manager_link(&self) -> &ManagerLink<Self>;
}

/// Errors from [`Manager`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManagerError {
    #[error("name '{0}' is already in use")]
    NameInUse(String),

    #[error("object '{0}' is already managed")]
    AlreadyManaged(String),
}

pub type ManagerResult<T> = Result<T, ManagerError>;

/// Check that `object` may be renamed to `new_name`.
///
/// Returns `Ok(false)` when the name is unchanged and an error when another
/// object of the same manager already uses it.
pub fn check_rename<T: ?Sized + Managed + 'static>(
    object: &T,
    new_name: &str,
) -> ManagerResult<bool> {
    if object.name() == new_name {
        return Ok(false);
    }
    if object.manager_link().is_name_in_use(new_name) {
        return Err(ManagerError::NameInUse(new_name.to_string()));
    }
    Ok(true)
}

struct ManagerState<T: ?Sized> {
    objects: Vec<Arc<T>>,
    cache_depth: u32,
    pending: Vec<(Arc<T>, ChangeFlags)>,
    dispatching: bool,
}

struct ManagerShared<T: ?Sized> {
    state: Mutex<ManagerState<T>>,
    listeners: ListenerList<ManagerMessage<T>>,
}

impl<T: ?Sized + Managed + 'static> ManagerShared<T> {
    fn object_changed<U: ?Sized>(&self, object: &U, flags: ChangeFlags) {
        {
            let mut state = self.state.lock();
            let Some(found) = state
                .objects
                .iter()
                .find(|candidate| std::ptr::addr_eq(Arc::as_ptr(*candidate), object as *const U))
                .cloned()
            else {
                return;
            };
            merge_change(&mut state.pending, found, flags);
        }
        self.flush();
    }

    fn is_name_in_use(&self, name: &str) -> bool {
        let objects: Vec<Arc<T>> = self.state.lock().objects.clone();
        objects.iter().any(|object| object.name() == name)
    }

    fn flush(&self) {
        loop {
            let message = {
                let mut state = self.state.lock();
                if state.dispatching || state.cache_depth > 0 || state.pending.is_empty() {
                    return;
                }
                state.dispatching = true;
                ManagerMessage::new(std::mem::take(&mut state.pending))
            };
            log::trace!(
                "dispatching manager message: {:?} to {} listeners",
                message.summary(),
                self.listeners.len()
            );
            self.listeners.dispatch(&message);
            self.state.lock().dispatching = false;
        }
    }
}

/// Link from a managed object back to its manager.
///
/// Unmanaged objects hold an empty link; reporting a change through it does
/// nothing.
pub struct ManagerLink<T: ?Sized> {
    shared: Mutex<Weak<ManagerShared<T>>>,
}

impl<T: ?Sized + Managed + 'static> ManagerLink<T> {
    pub fn new() -> Self {
        Self {
            shared: Mutex::new(Weak::new()),
        }
    }

    pub fn is_managed(&self) -> bool {
        self.shared.lock().strong_count() > 0
    }

    /// Report a change of `object`, the value owning this link.
    pub fn object_changed<U: ?Sized>(&self, object: &U, flags: ChangeFlags) {
        let shared = self.shared.lock().upgrade();
        if let Some(shared) = shared {
            shared.object_changed(object, flags);
        }
    }

    /// True if the owning manager already holds an object called `name`.
    pub fn is_name_in_use(&self, name: &str) -> bool {
        let shared = self.shared.lock().upgrade();
        shared.is_some_and(|shared| shared.is_name_in_use(name))
    }

    /// The owning manager, if any.
    pub fn manager(&self) -> Option<Manager<T>> {
        let shared = self.shared.lock().upgrade();
        shared.map(|shared| Manager { shared })
    }

    fn attach(&self, shared: &Arc<ManagerShared<T>>) {
        *self.shared.lock() = Arc::downgrade(shared);
    }

    fn detach(&self) {
        *self.shared.lock() = Weak::new();
    }
}

impl<T: ?Sized + Managed + 'static> Default for ManagerLink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> std::fmt::Debug for ManagerLink<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagerLink")
            .field("managed", &(self.shared.lock().strong_count() > 0))
            .finish()
    }
}

/// A set of uniquely named shared objects.
pub struct Manager<T: ?Sized> {
    shared: Arc<ManagerShared<T>>,
}

impl<T: ?Sized> Clone for Manager<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: ?Sized + Managed + 'static> Manager<T> {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(ManagerShared {
                state: Mutex::new(ManagerState {
                    objects: Vec::new(),
                    cache_depth: 0,
                    pending: Vec::new(),
                    dispatching: false,
                }),
                listeners: ListenerList::new(),
            }),
        }
    }

    /// Add `object`. Fails if its name is taken or it already has a manager.
    pub fn add(&self, object: Arc<T>) -> ManagerResult<()> {
        let name = object.name();
        if object.manager_link().is_managed() {
            return Err(ManagerError::AlreadyManaged(name));
        }
        if self.is_name_in_use(&name) {
            return Err(ManagerError::NameInUse(name));
        }
        {
            let mut state = self.shared.state.lock();
            state.objects.push(Arc::clone(&object));
            merge_change(&mut state.pending, Arc::clone(&object), ChangeFlags::ADD);
        }
        object.manager_link().attach(&self.shared);
        log::debug!("manager added '{name}'");
        self.shared.flush();
        Ok(())
    }

    /// Remove `object`; returns false if it is not held by this manager.
    pub fn remove(&self, object: &T) -> bool {
        let removed = {
            let mut state = self.shared.state.lock();
            let position = state
                .objects
                .iter()
                .position(|candidate| {
                    std::ptr::addr_eq(Arc::as_ptr(candidate), object as *const T)
                });
            position.map(|index| {
                let removed = state.objects.remove(index);
                merge_change(&mut state.pending, Arc::clone(&removed), ChangeFlags::REMOVE);
                removed
            })
        };
        match removed {
            Some(removed) => {
                removed.manager_link().detach();
                self.shared.flush();
                true
            }
            None => false,
        }
    }

    pub fn find_by_name(&self, name: &str) -> Option<Arc<T>> {
        self.find(|object| object.name() == name)
    }

    /// First object, in name order, satisfying `predicate`.
    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<Arc<T>> {
        self.objects().into_iter().find(|object| predicate(object))
    }

    pub fn contains(&self, object: &T) -> bool {
        self.shared
            .state
            .lock()
            .objects
            .iter()
            .any(|candidate| std::ptr::addr_eq(Arc::as_ptr(candidate), object as *const T))
    }

    /// Snapshot of all objects sorted by name.
    pub fn objects(&self) -> Vec<Arc<T>> {
        let objects = self.shared.state.lock().objects.clone();
        let mut named: Vec<(String, Arc<T>)> = objects
            .into_iter()
            .map(|object| (object.name(), object))
            .collect();
        named.sort_by(|a, b| a.0.cmp(&b.0));
        named.into_iter().map(|(_, object)| object).collect()
    }

    pub fn len(&self) -> usize {
        self.shared.state.lock().objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_name_in_use(&self, name: &str) -> bool {
        self.shared.is_name_in_use(name)
    }

    /// Report a change of a held object. Objects not held are ignored.
    pub fn object_changed<U: ?Sized>(&self, object: &U, flags: ChangeFlags) {
        self.shared.object_changed(object, flags);
    }

    /// Defer change messages until the matching [`end_change`](Self::end_change).
    pub fn begin_change(&self) {
        self.shared.state.lock().cache_depth += 1;
    }

    /// Close a [`begin_change`](Self::begin_change); the outermost call delivers
    /// all deferred changes as one message.
    pub fn end_change(&self) {
        {
            let mut state = self.shared.state.lock();
            if state.cache_depth == 0 {
                log::warn!("end_change called without matching begin_change");
                return;
            }
            state.cache_depth -= 1;
        }
        self.shared.flush();
    }

    pub fn cache_depth(&self) -> u32 {
        self.shared.state.lock().cache_depth
    }

    /// Register a listener for change messages.
    pub fn subscribe(
        &self,
        callback: impl Fn(&ManagerMessage<T>) + Send + Sync + 'static,
    ) -> Subscription {
        self.shared.listeners.subscribe(callback)
    }

    /// True if both handles refer to the same manager.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// A handle that does not keep the manager alive.
    ///
    /// Listeners registered on a manager must hold this rather than a
    /// [`Manager`] clone, or the manager is never dropped.
    pub fn downgrade(&self) -> WeakManager<T> {
        WeakManager {
            shared: Arc::downgrade(&self.shared),
        }
    }
}

/// Non-owning manager handle, see [`Manager::downgrade`].
pub struct WeakManager<T: ?Sized> {
    shared: Weak<ManagerShared<T>>,
}

impl<T: ?Sized> Clone for WeakManager<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<T: ?Sized + Managed + 'static> WeakManager<T> {
    pub fn upgrade(&self) -> Option<Manager<T>> {
        self.shared.upgrade().map(|shared| Manager { shared })
    }
}

impl<T: ?Sized + Managed + 'static> Default for Manager<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Item {
        name: Mutex<String>,
        link: ManagerLink<Item>,
    }

    impl Item {
        fn new(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: Mutex::new(name.to_string()),
                link: ManagerLink::new(),
            })
        }

        fn touch(&self) {
            self.link.object_changed(self, ChangeFlags::DEFINITION);
        }
    }

    impl Managed for Item {
        fn name(&self) -> String {
            self.name.lock().clone()
        }

        fn manager_link(&self) -> &ManagerLink<Self> {
            &self.link
        }
    }

    fn recorder(manager: &Manager<Item>) -> (Arc<Mutex<Vec<ChangeFlags>>>, Subscription) {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let subscription = manager.subscribe(move |message| sink.lock().push(message.summary()));
        (received, subscription)
    }

    #[test]
    fn test_add_find_remove() {
        let manager = Manager::new();
        let a = Item::new("a");
        manager.add(a.clone()).unwrap();
        assert!(a.link.is_managed());
        assert!(Arc::ptr_eq(&manager.find_by_name("a").unwrap(), &a));
        assert!(manager.find_by_name("b").is_none());

        assert!(manager.remove(&a));
        assert!(!a.link.is_managed());
        assert!(!manager.remove(&a));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let manager = Manager::new();
        manager.add(Item::new("a")).unwrap();
        assert_eq!(
            manager.add(Item::new("a")),
            Err(ManagerError::NameInUse("a".to_string()))
        );

        let other = Manager::new();
        let b = Item::new("b");
        other.add(b.clone()).unwrap();
        assert_eq!(manager.add(b), Err(ManagerError::AlreadyManaged("b".to_string())));
    }

    #[test]
    fn test_objects_sorted_by_name() {
        let manager = Manager::new();
        for name in ["c", "a", "b"] {
            manager.add(Item::new(name)).unwrap();
        }
        let names: Vec<String> = manager.objects().iter().map(|item| item.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_change_delivered_immediately() {
        let manager = Manager::new();
        let (received, _subscription) = recorder(&manager);
        let a = Item::new("a");
        manager.add(a.clone()).unwrap();
        a.touch();
        assert_eq!(
            *received.lock(),
            vec![ChangeFlags::ADD, ChangeFlags::DEFINITION]
        );
    }

    #[test]
    fn test_begin_end_change_coalesces() {
        let manager = Manager::new();
        let (received, _subscription) = recorder(&manager);
        let a = Item::new("a");

        manager.begin_change();
        manager.begin_change();
        manager.add(a.clone()).unwrap();
        a.touch();
        manager.end_change();
        assert!(received.lock().is_empty());
        a.touch();
        manager.end_change();

        assert_eq!(
            *received.lock(),
            vec![ChangeFlags::ADD | ChangeFlags::DEFINITION]
        );
        assert_eq!(manager.cache_depth(), 0);
    }

    #[test]
    fn test_unmanaged_change_ignored() {
        let manager = Manager::new();
        let (received, _subscription) = recorder(&manager);
        Item::new("loose").touch();
        manager.object_changed(&*Item::new("other"), ChangeFlags::DEFINITION);
        assert!(received.lock().is_empty());
    }

    #[test]
    fn test_change_during_dispatch_is_queued() {
        let manager: Manager<Item> = Manager::new();
        let a = Item::new("a");
        let b = Item::new("b");
        manager.add(a.clone()).unwrap();
        manager.add(b.clone()).unwrap();

        let deliveries = Arc::new(AtomicUsize::new(0));
        let counter = deliveries.clone();
        let b_inner = b.clone();
        let _subscription = manager.subscribe(move |message| {
            counter.fetch_add(1, Ordering::SeqCst);
            // cascade exactly once: a change of "a" touches "b"
            if message.summary().contains(ChangeFlags::DEFINITION)
                && message.changes().any(|(object, _)| object.name() == "a")
            {
                b_inner.touch();
            }
        });

        a.touch();
        assert_eq!(deliveries.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_subscription_drop_stops_delivery() {
        let manager = Manager::new();
        let (received, subscription) = recorder(&manager);
        drop(subscription);
        manager.add(Item::new("a")).unwrap();
        assert!(received.lock().is_empty());
    }

    #[test]
    fn test_weak_manager_does_not_keep_alive() {
        let manager: Manager<Item> = Manager::new();
        let weak = manager.downgrade();
        assert!(weak.upgrade().is_some_and(|upgraded| upgraded.ptr_eq(&manager)));
        drop(manager);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_unbalanced_end_change_is_ignored() {
        let manager: Manager<Item> = Manager::new();
        manager.end_change();
        assert_eq!(manager.cache_depth(), 0);
    }
}
