//! Session-scoped TTL cache
//!
//! This module provides the keyed cache shared by every query path:
//! - `CacheStore`: TTL store with lazy expiry
//! - `CacheEntry`: value + storage timestamp
//! - `key`: cache key composition rules

pub mod entry;
pub mod key;
pub mod store;

pub use entry::CacheEntry;
pub use store::CacheStore;
