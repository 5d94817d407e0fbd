//! Shared key/value store with per-key change subscription.
//!
//! `SharedStore` is the data-sharing utility behind the window manager's
//! shared-data API: any component may `set`/`get` values by key, and
//! interested parties can `watch` a specific key to be notified
//! synchronously on every write to it.

use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};

use crate::signal::{ConnectionId, Signal};

/// A generic key/value store with per-key change notification.
///
/// Watch callbacks fire synchronously on every `set` of the watched key,
/// exactly once per call, and never for writes to other keys. Setting a
/// key to the value it already holds still notifies: the store tracks
/// writes, not value changes.
///
/// # Example
///
/// ```
/// use casement_core::SharedStore;
///
/// let store: SharedStore<String> = SharedStore::new();
/// let id = store.watch("user", |name| println!("user set to {name}"));
/// store.set("user", "amr".to_string());
/// store.unwatch("user", id);
/// ```
pub struct SharedStore<T> {
    data: RwLock<HashMap<String, T>>,
    watchers: Mutex<HashMap<String, Signal<T>>>,
}

impl<T: Clone> Default for SharedStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> SharedStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            watchers: Mutex::new(HashMap::new()),
        }
    }

    /// Set a value, notifying all watchers of this key.
    pub fn set(&self, key: impl Into<String>, value: T) {
        let key = key.into();
        self.data.write().insert(key.clone(), value.clone());

        // Emit outside the data lock; slots may read the store back.
        let watchers = self.watchers.lock();
        if let Some(signal) = watchers.get(&key) {
            signal.emit(value);
        }
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<T> {
        self.data.read().get(key).cloned()
    }

    /// Get a value by key, falling back to a default when absent.
    pub fn get_or(&self, key: &str, default: T) -> T {
        self.data.read().get(key).cloned().unwrap_or(default)
    }

    /// Check whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.data.read().contains_key(key)
    }

    /// Remove a key. Watchers of the key are kept and will fire again if
    /// the key is re-set.
    pub fn remove(&self, key: &str) -> Option<T> {
        self.data.write().remove(key)
    }

    /// Subscribe to writes of a specific key.
    ///
    /// The callback fires synchronously on every subsequent `set` of
    /// `key`. Returns a connection ID for [`unwatch`](Self::unwatch).
    pub fn watch<F>(&self, key: impl Into<String>, callback: F) -> ConnectionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.watchers
            .lock()
            .entry(key.into())
            .or_default()
            .connect(callback)
    }

    /// Remove a subscription previously created with [`watch`](Self::watch).
    ///
    /// Returns `true` if the subscription existed.
    pub fn unwatch(&self, key: &str, id: ConnectionId) -> bool {
        self.watchers
            .lock()
            .get(key)
            .is_some_and(|signal| signal.disconnect(id))
    }
}

impl<T: Clone> std::fmt::Debug for SharedStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStore")
            .field("len", &self.data.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_set_get() {
        let store: SharedStore<i32> = SharedStore::new();
        assert_eq!(store.get("missing"), None);

        store.set("answer", 42);
        assert_eq!(store.get("answer"), Some(42));
        assert!(store.contains("answer"));
    }

    #[test]
    fn test_get_or_default() {
        let store: SharedStore<i32> = SharedStore::new();
        assert_eq!(store.get_or("missing", 7), 7);

        store.set("present", 1);
        assert_eq!(store.get_or("present", 7), 1);
    }

    #[test]
    fn test_watch_fires_once_per_set() {
        let store: SharedStore<i32> = SharedStore::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let calls_clone = calls.clone();
        store.watch("counter", move |&value| {
            calls_clone.lock().push(value);
        });

        store.set("counter", 1);
        store.set("counter", 2);
        store.set("other", 99); // Must not fire the "counter" watcher

        assert_eq!(*calls.lock(), vec![1, 2]);
    }

    #[test]
    fn test_watch_fires_on_unchanged_value() {
        let store: SharedStore<i32> = SharedStore::new();
        let count = Arc::new(Mutex::new(0));

        let count_clone = count.clone();
        store.watch("key", move |_| {
            *count_clone.lock() += 1;
        });

        store.set("key", 5);
        store.set("key", 5);
        assert_eq!(*count.lock(), 2);
    }

    #[test]
    fn test_unwatch() {
        let store: SharedStore<i32> = SharedStore::new();
        let count = Arc::new(Mutex::new(0));

        let count_clone = count.clone();
        let id = store.watch("key", move |_| {
            *count_clone.lock() += 1;
        });

        store.set("key", 1);
        assert!(store.unwatch("key", id));
        store.set("key", 2);

        assert_eq!(*count.lock(), 1);
        // A second unwatch with the same ID reports no subscription.
        assert!(!store.unwatch("key", id));
    }

    #[test]
    fn test_remove_keeps_watchers() {
        let store: SharedStore<i32> = SharedStore::new();
        let count = Arc::new(Mutex::new(0));

        let count_clone = count.clone();
        store.watch("key", move |_| {
            *count_clone.lock() += 1;
        });

        store.set("key", 1);
        assert_eq!(store.remove("key"), Some(1));
        assert_eq!(store.get("key"), None);

        store.set("key", 2);
        assert_eq!(*count.lock(), 2);
    }
}
