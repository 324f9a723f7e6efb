//! Centralized default constants for the briefwise system.
//!
//! **This module is the single source of truth** for all shared default
//! values. All crates reference these constants instead of defining their
//! own magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// RESEARCH PROVIDER
// =============================================================================

/// Default deep-research provider base URL (local dev stub).
pub const RESEARCH_PROVIDER_URL: &str = "http://127.0.0.1:8701";

/// Request timeout for deep-research provider calls in seconds.
///
/// Deliberately a very long ceiling: the initial acknowledgment from a
/// deep-research-style provider can itself take tens of seconds to minutes.
pub const RESEARCH_TIMEOUT_SECS: u64 = 3600;

// =============================================================================
// KEYWORD ANALYTICS
// =============================================================================

/// Default keyword metrics provider base URL (local dev stub).
pub const KEYWORD_PROVIDER_URL: &str = "http://127.0.0.1:8702";

/// Request timeout for keyword metrics provider calls in seconds.
pub const KEYWORD_TIMEOUT_SECS: u64 = 30;

/// Cache TTL for keyword analytics entries in hours.
///
/// Bounds retry storms against a failing provider to once per TTL window
/// per distinct input.
pub const KEYWORD_CACHE_TTL_HOURS: i64 = 24;

/// Cost attributed to one successful keyword provider call (USD).
pub const KEYWORD_PROVIDER_COST: f64 = 0.05;

/// Maximum number of seed terms derived from a summary.
pub const SEED_TERMS_MAX: usize = 12;

/// Maximum number of adjacent-word bigrams among the seed terms.
pub const SEED_BIGRAMS_MAX: usize = 4;

/// Minimum token length considered for seed derivation.
pub const SEED_TOKEN_MIN_LEN: usize = 3;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Default database connection pool size.
pub const DB_MAX_CONNECTIONS: u32 = 10;
