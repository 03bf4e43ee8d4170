// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// Using constants instead of magic numbers improves maintainability
// and makes it easier to understand and modify defaults.

// =============================================================================
// Remote client defaults
// =============================================================================

/// Default catalog API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default request timeout in milliseconds (10 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

// =============================================================================
// Cache defaults
// =============================================================================

/// Cache entry time-to-live in milliseconds (5 minutes)
pub const DEFAULT_CACHE_TTL_MS: u64 = 300_000;

// =============================================================================
// Pagination defaults
// =============================================================================

/// First page number used by the catalog API
pub const FIRST_PAGE: u32 = 1;
