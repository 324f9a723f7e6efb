//! Core data models for the briefwise research pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

// =============================================================================
// RESEARCH JOB
// =============================================================================

/// Lifecycle status of a research job.
///
/// Transitions are monotonic: `pending → in_progress → {completed|failed}`.
/// `completed` and `failed` are terminal — once observed, a job's status
/// never changes again. Terminal transitions are made only by the status
/// poller via the conditional repository operations, never by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether this status permits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Parse a status from its database/wire representation.
    /// Unknown strings fall back to `Pending`.
    pub fn parse(s: &str) -> Self {
        match s {
            "pending" => JobStatus::Pending,
            "in_progress" => JobStatus::InProgress,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Pending,
        }
    }
}

/// Token usage metrics reported by the research provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub input_tokens: i64,
    #[serde(default)]
    pub output_tokens: i64,
}

impl TokenUsage {
    pub fn total(&self) -> i64 {
        self.input_tokens + self.output_tokens
    }
}

/// A unit of long-running external research work, tracked until it reaches
/// a terminal state.
///
/// Invariants:
/// - `result` is set if and only if `status` is `Completed`.
/// - `external_job_id` is required before the provider can be polled; it is
///   `None` while the job is queued but not yet accepted by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchJob {
    pub id: Uuid,
    pub user_id: Uuid,
    /// The idea whose brief this job ultimately populates, when known.
    pub idea_id: Option<Uuid>,
    /// Provider-owned identifier, assigned once the provider accepts the request.
    pub external_job_id: Option<String>,
    pub status: JobStatus,
    /// Opaque structured research result. Set only on completion.
    pub result: Option<JsonValue>,
    /// Opaque proof-signal payload, merged into the owning brief on completion.
    pub proof_signals: Option<JsonValue>,
    pub error_message: Option<String>,
    pub token_usage: Option<TokenUsage>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Request for creating a new research job (status starts as `pending`).
#[derive(Debug, Clone)]
pub struct CreateResearchJobRequest {
    pub user_id: Uuid,
    pub idea_id: Option<Uuid>,
}

// =============================================================================
// BRIEF
// =============================================================================

/// Lifecycle status of a brief document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BriefStatus {
    Draft,
    Completed,
    CompletedWithWarnings,
}

impl BriefStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BriefStatus::Draft => "draft",
            BriefStatus::Completed => "completed",
            BriefStatus::CompletedWithWarnings => "completed_with_warnings",
        }
    }

    /// Parse a status from its database representation.
    /// Unknown strings fall back to `Draft`.
    pub fn parse(s: &str) -> Self {
        match s {
            "draft" => BriefStatus::Draft,
            "completed" => BriefStatus::Completed,
            "completed_with_warnings" => BriefStatus::CompletedWithWarnings,
            _ => BriefStatus::Draft,
        }
    }
}

/// The structured output document a research job ultimately populates.
///
/// At most one `draft` brief per (idea, user) pair is treated as "the"
/// brief being completed by a given job. Content is only ever updated by
/// deep merge — existing fields are preserved and proof-signal fields
/// added — so partial progress survives a failed later step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brief {
    pub id: Uuid,
    pub idea_id: Uuid,
    pub user_id: Uuid,
    pub status: BriefStatus,
    /// Opaque structured document, mutated only by deep merge.
    pub content: JsonValue,
    /// Wall-clock generation time in milliseconds, when recorded.
    pub generation_time_ms: Option<i64>,
    pub share_token: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

// =============================================================================
// IDEA
// =============================================================================

/// Analysis status of an idea.
///
/// A failed research job marks the owning idea `completed_with_warnings`
/// rather than hard-failing it, so the user still sees whatever partial
/// brief exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeaStatus {
    Researching,
    Completed,
    CompletedWithWarnings,
}

impl IdeaStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            IdeaStatus::Researching => "researching",
            IdeaStatus::Completed => "completed",
            IdeaStatus::CompletedWithWarnings => "completed_with_warnings",
        }
    }

    /// Parse a status from its database representation.
    /// Unknown strings fall back to `Researching`.
    pub fn parse(s: &str) -> Self {
        match s {
            "researching" => IdeaStatus::Researching,
            "completed" => IdeaStatus::Completed,
            "completed_with_warnings" => IdeaStatus::CompletedWithWarnings,
            _ => IdeaStatus::Researching,
        }
    }
}

/// A user-submitted idea under analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idea {
    pub id: Uuid,
    pub user_id: Uuid,
    pub summary: String,
    pub status: IdeaStatus,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// KEYWORD ANALYTICS CACHE
// =============================================================================

/// A content-addressed keyword analytics cache entry.
///
/// Keyed by the SHA-256 hash of the normalized (trimmed, case-folded)
/// summary. Valid for reads only while `now < expires_at`; superseded
/// entries are overwritten by key, never explicitly deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordCacheEntry {
    /// Hex SHA-256 of the normalized summary — the cache key.
    pub summary_hash: String,
    /// The original (un-normalized) summary.
    pub summary: String,
    /// Opaque analytics result payload.
    pub analytics: JsonValue,
    /// Seed terms used to produce the result.
    pub seed_terms: Vec<String>,
    /// Cost attributed to producing the entry (0.0 for fallback results).
    pub cost_estimate: f64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
