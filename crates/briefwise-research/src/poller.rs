//! Status poller: the research pipeline's core state machine.
//!
//! Given a job id and the requesting user, the poller returns the job's
//! externally-visible status and, when the underlying work has just
//! finished, performs the one-time completion side effects.
//!
//! Correctness depends on each terminal transition happening exactly once
//! from the poller's perspective: the brief/idea side effects are not
//! idempotent in general (re-merging could duplicate or disturb state).
//! The short-circuit on already-terminal jobs is therefore the chief
//! safety mechanism, not an optimization — and the terminal writes
//! themselves are conditional, so two concurrent pollers that both observe
//! "provider says done" resolve to exactly one winner.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value as JsonValue;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use briefwise_core::{
    deep_merge, BriefRepository, BriefStatus, Error, IdeaRepository, IdeaStatus, JobStatus,
    ProviderJobOutput, ProviderJobStatus, ResearchJob, ResearchJobRepository, ResearchProvider,
    Result,
};

/// Outcome of the best-effort completion side effects (brief merge + idea
/// status). Carried on the report only by the poll that performed the
/// terminal transition, so tests can assert "primary succeeded, secondary
/// logged-but-ignored" as a first-class case.
#[derive(Debug, Clone, Default)]
pub struct CompletionSideEffects {
    /// Whether the owning brief was finalized with merged content.
    pub brief_finalized: bool,
    /// Whether the owning idea's status was advanced.
    pub idea_updated: bool,
    /// Error from the secondary operation, if any. The primary result is
    /// unaffected: the research itself succeeded.
    pub error: Option<String>,
}

/// Externally-visible status of a research job.
#[derive(Debug, Clone)]
pub struct JobStatusReport {
    pub status: JobStatus,
    pub is_complete: bool,
    pub result: Option<JsonValue>,
    pub proof_signals: Option<JsonValue>,
    pub error: Option<String>,
    /// Present only on the poll that performed the terminal transition.
    pub side_effects: Option<CompletionSideEffects>,
}

impl JobStatusReport {
    fn from_stored(job: &ResearchJob) -> Self {
        Self {
            status: job.status,
            is_complete: job.status.is_terminal(),
            result: job.result.clone(),
            proof_signals: job.proof_signals.clone(),
            error: job.error_message.clone(),
            side_effects: None,
        }
    }

    fn in_flight(status: JobStatus) -> Self {
        Self {
            status,
            is_complete: false,
            result: None,
            proof_signals: None,
            error: None,
            side_effects: None,
        }
    }
}

/// Pull-based orchestrator for research job lifecycles.
///
/// Progress is driven entirely by repeated client polling; the poller
/// holds no background tasks and no per-job state.
pub struct StatusPoller {
    jobs: Arc<dyn ResearchJobRepository>,
    briefs: Arc<dyn BriefRepository>,
    ideas: Arc<dyn IdeaRepository>,
    provider: Arc<dyn ResearchProvider>,
}

impl StatusPoller {
    pub fn new(
        jobs: Arc<dyn ResearchJobRepository>,
        briefs: Arc<dyn BriefRepository>,
        ideas: Arc<dyn IdeaRepository>,
        provider: Arc<dyn ResearchProvider>,
    ) -> Self {
        Self {
            jobs,
            briefs,
            ideas,
            provider,
        }
    }

    /// Check a job's status on behalf of its owner.
    ///
    /// - Already-terminal jobs return the stored result directly, with no
    ///   provider call.
    /// - Non-terminal jobs without an external id report `pending`
    ///   (queued, not yet accepted by the provider) — not an error.
    /// - Otherwise the provider is queried; a just-finished job triggers
    ///   the one-time completion transition.
    ///
    /// Errors contacting the provider surface as `Error::Provider` and are
    /// never written to the job: it stays poll-able on the next attempt.
    #[instrument(
        skip(self),
        fields(subsystem = "research", component = "poller", op = "poll")
    )]
    pub async fn poll(&self, job_id: Uuid, user_id: Uuid) -> Result<JobStatusReport> {
        let start = Instant::now();

        let job = self
            .jobs
            .get_owned(job_id, user_id)
            .await?
            .ok_or(Error::JobNotFound(job_id))?;

        if job.status.is_terminal() {
            debug!(job_id = %job_id, status = job.status.as_str(), "Terminal job, serving stored state");
            return Ok(JobStatusReport::from_stored(&job));
        }

        let external_job_id = match &job.external_job_id {
            Some(id) => id.clone(),
            None => {
                debug!(job_id = %job_id, "Job not yet accepted by provider");
                return Ok(JobStatusReport::in_flight(JobStatus::Pending));
            }
        };

        match self.provider.get_status(&external_job_id).await? {
            ProviderJobStatus::Running => {
                debug!(job_id = %job_id, external_job_id = %external_job_id, "Provider still running");
                Ok(JobStatusReport::in_flight(JobStatus::InProgress))
            }
            ProviderJobStatus::Completed(output) => {
                let report = self.finish_success(&job, output).await?;
                info!(
                    job_id = %job_id,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Research job completed"
                );
                Ok(report)
            }
            ProviderJobStatus::Failed(message) => {
                let report = self.finish_failure(&job, &message).await?;
                info!(job_id = %job_id, error = %message, "Research job failed");
                Ok(report)
            }
        }
    }

    /// Apply the success transition. Only the poll whose conditional update
    /// wins runs the side effects; a losing poll re-reads and serves the
    /// stored terminal state.
    async fn finish_success(
        &self,
        job: &ResearchJob,
        output: ProviderJobOutput,
    ) -> Result<JobStatusReport> {
        let won = self
            .jobs
            .complete_if_running(
                job.id,
                &output.payload,
                output.proof_signals.as_ref(),
                output.usage.as_ref(),
            )
            .await?;

        if !won {
            debug!(job_id = %job.id, "Lost completion race, serving stored state");
            let stored = self
                .jobs
                .get(job.id)
                .await?
                .ok_or(Error::JobNotFound(job.id))?;
            return Ok(JobStatusReport::from_stored(&stored));
        }

        let side_effects = self.apply_completion_side_effects(job, &output).await;

        Ok(JobStatusReport {
            status: JobStatus::Completed,
            is_complete: true,
            result: Some(output.payload),
            proof_signals: output.proof_signals,
            error: None,
            side_effects: Some(side_effects),
        })
    }

    /// Merge proof-signal data into the owning brief and advance the idea.
    ///
    /// Best-effort: any error here is logged and swallowed — the job is
    /// already marked completed and the result is still returned to the
    /// caller, because the authoritative research succeeded even if the
    /// brief aggregation degraded.
    async fn apply_completion_side_effects(
        &self,
        job: &ResearchJob,
        output: &ProviderJobOutput,
    ) -> CompletionSideEffects {
        let mut effects = CompletionSideEffects::default();

        let idea_id = match job.idea_id {
            Some(id) => id,
            None => return effects,
        };

        match self.merge_into_brief(idea_id, job.user_id, output).await {
            Ok(merged) => effects.brief_finalized = merged,
            Err(e) => {
                warn!(job_id = %job.id, idea_id = %idea_id, error = %e, "Brief merge failed after job completion");
                effects.error = Some(e.to_string());
            }
        }

        match self.ideas.set_status(idea_id, IdeaStatus::Completed).await {
            Ok(()) => effects.idea_updated = true,
            Err(e) => {
                warn!(job_id = %job.id, idea_id = %idea_id, error = %e, "Idea status update failed after job completion");
                effects.error.get_or_insert_with(|| e.to_string());
            }
        }

        effects
    }

    async fn merge_into_brief(
        &self,
        idea_id: Uuid,
        user_id: Uuid,
        output: &ProviderJobOutput,
    ) -> Result<bool> {
        let brief = match self.briefs.get_draft(idea_id, user_id).await? {
            Some(brief) => brief,
            None => {
                debug!(idea_id = %idea_id, "No draft brief to merge into");
                return Ok(false);
            }
        };

        let mut content = brief.content;
        if let Some(proof) = &output.proof_signals {
            deep_merge(&mut content, proof);
        }

        self.briefs
            .finalize(brief.id, &content, BriefStatus::Completed)
            .await?;
        Ok(true)
    }

    /// Apply the failure transition. The owning idea is marked
    /// `completed_with_warnings` rather than failed, so the user still sees
    /// whatever partial brief exists.
    async fn finish_failure(&self, job: &ResearchJob, message: &str) -> Result<JobStatusReport> {
        let won = self.jobs.fail_if_running(job.id, message).await?;

        if !won {
            let stored = self
                .jobs
                .get(job.id)
                .await?
                .ok_or(Error::JobNotFound(job.id))?;
            return Ok(JobStatusReport::from_stored(&stored));
        }

        let mut effects = CompletionSideEffects::default();
        if let Some(idea_id) = job.idea_id {
            match self
                .ideas
                .set_status(idea_id, IdeaStatus::CompletedWithWarnings)
                .await
            {
                Ok(()) => effects.idea_updated = true,
                Err(e) => {
                    warn!(job_id = %job.id, idea_id = %idea_id, error = %e, "Idea status update failed after job failure");
                    effects.error = Some(e.to_string());
                }
            }
        }

        Ok(JobStatusReport {
            status: JobStatus::Failed,
            is_complete: true,
            result: None,
            proof_signals: None,
            error: Some(message.to_string()),
            side_effects: Some(effects),
        })
    }
}
