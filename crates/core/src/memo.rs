//! Keyed memoization for derived-state functions.
//!
//! Derived aggregates are never stored in the entity store; they are
//! recomputed on read and cached here. A cache entry is valid for exactly one
//! store version: the first lookup against a newer version drops every entry
//! computed from the older one, so invalidation is implicit and there is no
//! manual eviction API.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

struct CacheInner<K, V> {
    version: u64,
    entries: HashMap<K, Arc<V>>,
}

/// A keyed cache whose entries are tied to a store version.
///
/// `get_or_compute` runs the supplied closure under the cache lock, which
/// gives single-flight recomputation per cache: two readers asking for the
/// same key never compute twice. Derivations are cheap synchronous reads
/// over resident data, so the critical section stays short.
pub struct MemoCache<K, V> {
    inner: Mutex<CacheInner<K, V>>,
}

impl<K, V> Default for MemoCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MemoCache<K, V> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                version: 0,
                entries: HashMap::new(),
            }),
        }
    }
}

impl<K: Eq + Hash, V> MemoCache<K, V> {
    /// Return the cached value for `key` at `version`, computing it if absent.
    ///
    /// Seeing a version newer than the cached one clears the whole cache
    /// first; entries from an older store state are never served.
    pub fn get_or_compute(&self, version: u64, key: K, compute: impl FnOnce() -> V) -> Arc<V> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.version != version {
            inner.entries.clear();
            inner.version = version;
        }
        if let Some(cached) = inner.entries.get(&key) {
            return Arc::clone(cached);
        }
        let value = Arc::new(compute());
        inner.entries.insert(key, Arc::clone(&value));
        value
    }

    /// Number of live entries (for tests and diagnostics).
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
