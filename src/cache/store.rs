//! TTL-keyed cache store
//!
//! One `CacheStore` is constructed per catalog session and shared across
//! every query kind for that catalog. Reads return a value only while it
//! is fresh (`now - stored_at < TTL`); stale values remain stored but are
//! treated as absent (lazy expiry, no sweep). Writes overwrite
//! unconditionally and restamp the entry. Capacity is unbounded, which is
//! acceptable for a session-scoped catalog cache of modest data volume.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use super::entry::CacheEntry;
use crate::constants::DEFAULT_CACHE_TTL_MS;

/// Keyed TTL cache shared across all query kinds of one catalog
pub struct CacheStore {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl CacheStore {
    /// Create a store with an explicit TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store with the default 5-minute TTL
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::from_millis(DEFAULT_CACHE_TTL_MS))
    }

    /// Entry TTL
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a fresh value for `key`, cloned out of the store.
    /// Returns None when the key is absent, stale, or was stored
    /// under a different type.
    pub fn get<T: Clone + Send + Sync + 'static>(&self, key: &str) -> Option<T> {
        self.get_at(key, Instant::now())
    }

    /// Store a value under `key`, overwriting any previous entry and
    /// stamping the current time.
    pub fn set<T: Send + Sync + 'static>(&self, key: &str, value: T) {
        self.set_shared(key, Arc::new(value));
    }

    /// Store an already-shared value (used by the coordinator so the
    /// cached value and the value handed to coalesced waiters are the
    /// same allocation).
    pub(crate) fn set_shared(&self, key: &str, value: Arc<dyn Any + Send + Sync>) {
        self.set_shared_at(key, value, Instant::now());
    }

    /// Number of stored entries, including stale ones awaiting overwrite
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub(crate) fn get_at<T: Clone + Send + Sync + 'static>(
        &self,
        key: &str,
        now: Instant,
    ) -> Option<T> {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        if !entry.is_fresh(self.ttl, now) {
            // Lazy expiry: the value stays stored but is not returned
            return None;
        }
        entry
            .value
            .clone()
            .downcast::<T>()
            .ok()
            .map(|arc| (*arc).clone())
    }

    pub(crate) fn set_shared_at(
        &self,
        key: &str,
        value: Arc<dyn Any + Send + Sync>,
        stored_at: Instant,
    ) {
        self.entries
            .write()
            .insert(key.to_string(), CacheEntry::new_at(value, stored_at));
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("ttl", &self.ttl)
            .field("entries", &self.entries.read().len())
            .finish()
    }
}
