//! Cache entry type
//!
//! A `CacheEntry` pairs a type-erased value with the instant it was
//! stored. Freshness is evaluated lazily on read; entries are never
//! actively evicted, they simply stop being returned once stale.

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A cached value with its storage timestamp
///
/// Values are stored type-erased so one store serves every query kind
/// (paged lists, details, genre lists, raw configuration objects).
#[derive(Clone)]
pub struct CacheEntry {
    pub(crate) value: Arc<dyn Any + Send + Sync>,
    pub(crate) stored_at: Instant,
}

impl CacheEntry {
    /// Create an entry with an explicit timestamp (used by tests to
    /// exercise the TTL boundary without sleeping)
    pub(crate) fn new_at(value: Arc<dyn Any + Send + Sync>, stored_at: Instant) -> Self {
        Self { value, stored_at }
    }

    /// Check freshness at `now`: fresh iff the entry age is strictly
    /// less than `ttl`. An entry aged exactly `ttl` is stale.
    pub(crate) fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.duration_since(self.stored_at) < ttl
    }
}

impl std::fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheEntry")
            .field("stored_at", &self.stored_at)
            .finish_non_exhaustive()
    }
}
