//! Generic TTL map with lazy eviction.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    created_at: Instant,
}

/// Map whose entries expire `ttl` after insertion.
///
/// Uses `tokio::time::Instant`, so a paused test runtime controls expiry.
/// The lock is only held for map operations, never across an await.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh value for `key`, if any. A stale entry is deleted here.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().unwrap();
        let fresh = match entries.get(key) {
            Some(entry) => entry.created_at.elapsed() < self.ttl,
            None => return None,
        };
        if fresh {
            entries.get(key).map(|e| e.value.clone())
        } else {
            entries.remove(key);
            None
        }
    }

    /// Insert or overwrite; the entry's age restarts at zero.
    pub fn put(&self, key: K, value: V) {
        let entry = CacheEntry {
            value,
            created_at: Instant::now(),
        };
        self.entries.lock().unwrap().insert(key, entry);
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.entries.lock().unwrap().remove(key).map(|e| e.value)
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Number of stored entries, stale ones included until they are read.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
