//! Core traits for briefwise abstractions.
//!
//! These traits define the interfaces that concrete implementations must
//! satisfy, enabling pluggable backends (Postgres or in-memory stores,
//! real or mock providers) and testability.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// RESEARCH JOB REPOSITORY
// =============================================================================

/// Repository for research job lifecycle records.
///
/// Terminal transitions are conditional (compare-and-swap style): they only
/// apply while the stored status is still non-terminal and report whether
/// this call performed the transition. Concurrent pollers may both observe
/// "provider says done", but exactly one of them wins the transition and
/// runs the completion side effects.
#[async_trait]
pub trait ResearchJobRepository: Send + Sync {
    /// Insert a new job in `pending` state.
    async fn create(&self, req: CreateResearchJobRequest) -> Result<Uuid>;

    /// Fetch a job by id regardless of owner (internal use).
    async fn get(&self, id: Uuid) -> Result<Option<ResearchJob>>;

    /// Fetch a job by id, only if it is owned by `user_id`.
    ///
    /// Ownership filtering happens in the store so a missing and a
    /// non-owned job are indistinguishable to the caller.
    async fn get_owned(&self, id: Uuid, user_id: Uuid) -> Result<Option<ResearchJob>>;

    /// Record the provider-assigned job id and move the job to `in_progress`.
    async fn set_external_id(&self, id: Uuid, external_job_id: &str) -> Result<()>;

    /// Mark the job `completed` with its result payload, if and only if the
    /// stored status is still non-terminal. Returns `true` when this call
    /// performed the transition.
    async fn complete_if_running(
        &self,
        id: Uuid,
        result: &JsonValue,
        proof_signals: Option<&JsonValue>,
        usage: Option<&TokenUsage>,
    ) -> Result<bool>;

    /// Mark the job `failed` with the provider's message, if and only if the
    /// stored status is still non-terminal. Returns `true` when this call
    /// performed the transition.
    async fn fail_if_running(&self, id: Uuid, error: &str) -> Result<bool>;
}

// =============================================================================
// BRIEF REPOSITORY
// =============================================================================

/// Repository for brief documents.
#[async_trait]
pub trait BriefRepository: Send + Sync {
    /// Create a draft brief for an idea with initial content.
    async fn create_draft(&self, idea_id: Uuid, user_id: Uuid, content: JsonValue)
        -> Result<Uuid>;

    /// Fetch the draft brief for an (idea, user) pair, if one exists.
    async fn get_draft(&self, idea_id: Uuid, user_id: Uuid) -> Result<Option<Brief>>;

    /// Fetch a brief by id.
    async fn get(&self, id: Uuid) -> Result<Option<Brief>>;

    /// Replace the brief's content with the already-merged document and
    /// advance its status. Callers merge via [`crate::merge::deep_merge`]
    /// before writing, so partial progress is never clobbered.
    async fn finalize(&self, id: Uuid, content: &JsonValue, status: BriefStatus) -> Result<()>;
}

// =============================================================================
// IDEA REPOSITORY
// =============================================================================

/// Repository for idea records.
#[async_trait]
pub trait IdeaRepository: Send + Sync {
    /// Insert a new idea in `researching` state.
    async fn create(&self, user_id: Uuid, summary: &str) -> Result<Uuid>;

    /// Fetch an idea by id.
    async fn get(&self, id: Uuid) -> Result<Option<Idea>>;

    /// Advance the idea's analysis status.
    async fn set_status(&self, id: Uuid, status: IdeaStatus) -> Result<()>;
}

// =============================================================================
// KEYWORD CACHE REPOSITORY
// =============================================================================

/// Content-addressed store for keyword analytics results.
#[async_trait]
pub trait KeywordCacheRepository: Send + Sync {
    /// Look up an entry by its summary hash. Returns expired entries too —
    /// TTL validity is the caller's decision (forced refreshes bypass it).
    async fn get(&self, summary_hash: &str) -> Result<Option<KeywordCacheEntry>>;

    /// Insert or replace the entry keyed by its summary hash.
    async fn upsert(&self, entry: &KeywordCacheEntry) -> Result<()>;
}

// =============================================================================
// EXTERNAL PROVIDER CAPABILITIES
// =============================================================================

/// Output of a completed provider-side research job.
#[derive(Debug, Clone)]
pub struct ProviderJobOutput {
    /// The research result payload.
    pub payload: JsonValue,
    /// Proof-signal data to merge into the owning brief.
    pub proof_signals: Option<JsonValue>,
    /// Token usage metrics, when reported.
    pub usage: Option<TokenUsage>,
}

/// Provider-reported status of an external research job.
#[derive(Debug, Clone)]
pub enum ProviderJobStatus {
    /// The provider is still working.
    Running,
    /// The provider finished successfully.
    Completed(ProviderJobOutput),
    /// The provider explicitly reported failure.
    Failed(String),
}

/// Capability interface for the external deep-research provider.
///
/// Treated as a capability so the provider can be swapped or mocked.
/// Errors from either method are transient: they must never be persisted
/// as job failure.
#[async_trait]
pub trait ResearchProvider: Send + Sync {
    /// Submit a research prompt; returns the provider-assigned job id.
    async fn create_job(&self, prompt: &str) -> Result<String>;

    /// Check the status of a previously created job.
    async fn get_status(&self, external_job_id: &str) -> Result<ProviderJobStatus>;
}

/// Capability interface for the external keyword metrics provider.
#[async_trait]
pub trait KeywordMetricsProvider: Send + Sync {
    /// Fetch analytics-style metrics for the given seed terms.
    async fn fetch_metrics(&self, summary: &str, seeds: &[String]) -> Result<JsonValue>;
}
