// Cinecache - client-side data layer for TMDB-style catalog APIs
//
// The interesting parts live in `cache` (TTL store), `coordinator`
// (request deduplication + stale-while-revalidate) and `catalog`
// (pagination engine shared by the per-entity stores).

pub mod cache;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod coordinator;
pub mod discover;
pub mod error;
pub mod logging;
pub mod remote;
