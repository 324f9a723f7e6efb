//! Structured logging schema and field name constants for briefwise.
//!
//! All crates use these constants for consistent structured logging fields
//! so log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated across request → poll → provider calls.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "db", "research", "keywords"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "poller", "deep_research_client", "fallback", "pool"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "poll", "analyze", "create_job", "get_status"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Research job UUID being polled.
pub const JOB_ID: &str = "job_id";

/// Provider-side job identifier.
pub const EXTERNAL_JOB_ID: &str = "external_job_id";

/// Idea UUID owning the job/brief.
pub const IDEA_ID: &str = "idea_id";

/// User UUID making the request.
pub const USER_ID: &str = "user_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Whether a keyword analytics read was served from cache.
pub const CACHE_HIT: &str = "cache_hit";

/// Source of an analytics result ("provider", "fallback", "cache").
pub const SOURCE: &str = "source";

/// Number of seed terms derived from a summary.
pub const SEED_COUNT: &str = "seed_count";
