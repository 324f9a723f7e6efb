//! End-to-end poller scenarios over in-memory repositories.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use briefwise_core::{
    BriefRepository, BriefStatus, Error, IdeaRepository, IdeaStatus, JobStatus,
    ProviderJobOutput, ProviderJobStatus, ResearchJob, ResearchJobRepository, TokenUsage,
};
use briefwise_db::memory::{
    MemoryBriefRepository, MemoryIdeaRepository, MemoryResearchJobRepository,
};
use briefwise_research::mock::{MockResearchProvider, ScriptedPoll};
use briefwise_research::poller::StatusPoller;

struct Harness {
    jobs: Arc<MemoryResearchJobRepository>,
    briefs: Arc<MemoryBriefRepository>,
    ideas: Arc<MemoryIdeaRepository>,
    provider: MockResearchProvider,
    poller: StatusPoller,
}

fn harness(provider: MockResearchProvider) -> Harness {
    let jobs = Arc::new(MemoryResearchJobRepository::new());
    let briefs = Arc::new(MemoryBriefRepository::new());
    let ideas = Arc::new(MemoryIdeaRepository::new());
    let poller = StatusPoller::new(
        jobs.clone(),
        briefs.clone(),
        ideas.clone(),
        Arc::new(provider.clone()),
    );
    Harness {
        jobs,
        briefs,
        ideas,
        provider,
        poller,
    }
}

fn in_progress_job(user_id: Uuid, idea_id: Option<Uuid>) -> ResearchJob {
    ResearchJob {
        id: Uuid::now_v7(),
        user_id,
        idea_id,
        external_job_id: Some("ext-1".to_string()),
        status: JobStatus::InProgress,
        result: None,
        proof_signals: None,
        error_message: None,
        token_usage: None,
        created_at: Utc::now(),
        completed_at: None,
    }
}

fn completed_output() -> ProviderJobOutput {
    ProviderJobOutput {
        payload: json!({"summary": "viable market"}),
        proof_signals: Some(json!({"proof": {"mentions": 12}})),
        usage: Some(TokenUsage {
            input_tokens: 900,
            output_tokens: 150,
        }),
    }
}

#[tokio::test]
async fn test_unknown_job_is_not_found() {
    let h = harness(MockResearchProvider::always(ProviderJobStatus::Running));
    let err = h
        .poller
        .poll(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::JobNotFound(_)));
    assert_eq!(h.provider.status_calls(), 0);
}

#[tokio::test]
async fn test_other_users_job_is_not_found() {
    let h = harness(MockResearchProvider::always(ProviderJobStatus::Running));
    let owner = Uuid::new_v4();
    let job = in_progress_job(owner, None);
    let job_id = job.id;
    h.jobs.insert_raw(job).await;

    let err = h.poller.poll(job_id, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, Error::JobNotFound(_)));
    // Ownership is checked before the provider is ever contacted
    assert_eq!(h.provider.status_calls(), 0);
}

#[tokio::test]
async fn test_pending_without_external_id_reports_pending() {
    let h = harness(MockResearchProvider::always(ProviderJobStatus::Running));
    let user_id = Uuid::new_v4();
    let mut job = in_progress_job(user_id, None);
    job.status = JobStatus::Pending;
    job.external_job_id = None;
    let job_id = job.id;
    h.jobs.insert_raw(job).await;

    let report = h.poller.poll(job_id, user_id).await.unwrap();
    assert_eq!(report.status, JobStatus::Pending);
    assert!(!report.is_complete);
    assert_eq!(h.provider.status_calls(), 0);
}

#[tokio::test]
async fn test_running_job_reports_in_progress_without_state_change() {
    // Scenario A: provider still running on first poll.
    let h = harness(MockResearchProvider::always(ProviderJobStatus::Running));
    let user_id = Uuid::new_v4();
    let job = in_progress_job(user_id, None);
    let job_id = job.id;
    h.jobs.insert_raw(job).await;

    let report = h.poller.poll(job_id, user_id).await.unwrap();
    assert_eq!(report.status, JobStatus::InProgress);
    assert!(!report.is_complete);
    assert!(report.result.is_none());

    let stored = h.jobs.get(job_id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::InProgress);
    assert!(stored.result.is_none());
}

#[tokio::test]
async fn test_completion_persists_and_second_poll_skips_provider() {
    // Scenario B: provider completes; repeated polls are idempotent.
    let h = harness(MockResearchProvider::always(ProviderJobStatus::Completed(
        completed_output(),
    )));
    let user_id = Uuid::new_v4();
    let idea_id = h.ideas.create(user_id, "ai note-taking app").await.unwrap();
    h.briefs
        .create_draft(idea_id, user_id, json!({"a": 1}))
        .await
        .unwrap();
    let job = in_progress_job(user_id, Some(idea_id));
    let job_id = job.id;
    h.jobs.insert_raw(job).await;

    let first = h.poller.poll(job_id, user_id).await.unwrap();
    assert_eq!(first.status, JobStatus::Completed);
    assert!(first.is_complete);
    assert_eq!(first.result, Some(json!({"summary": "viable market"})));
    let effects = first.side_effects.expect("winning poll carries side effects");
    assert!(effects.brief_finalized);
    assert!(effects.idea_updated);
    assert!(effects.error.is_none());
    assert_eq!(h.provider.status_calls(), 1);

    // Second poll serves stored state with zero further provider calls
    let second = h.poller.poll(job_id, user_id).await.unwrap();
    assert_eq!(second.status, JobStatus::Completed);
    assert_eq!(second.result, first.result);
    assert!(second.side_effects.is_none());
    assert_eq!(h.provider.status_calls(), 1);

    let stored = h.jobs.get(job_id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Completed);
    assert_eq!(stored.token_usage.unwrap().total(), 1050);
    assert!(stored.completed_at.is_some());
}

#[tokio::test]
async fn test_completion_merges_brief_and_advances_idea() {
    let h = harness(MockResearchProvider::always(ProviderJobStatus::Completed(
        completed_output(),
    )));
    let user_id = Uuid::new_v4();
    let idea_id = h.ideas.create(user_id, "ai note-taking app").await.unwrap();
    let brief_id = h
        .briefs
        .create_draft(idea_id, user_id, json!({"positioning": {"angle": "study aid"}}))
        .await
        .unwrap();
    let job = in_progress_job(user_id, Some(idea_id));
    let job_id = job.id;
    h.jobs.insert_raw(job).await;

    h.poller.poll(job_id, user_id).await.unwrap();

    // Merge preserved existing fields and added proof signals
    let brief = h.briefs.get(brief_id).await.unwrap().unwrap();
    assert_eq!(brief.status, BriefStatus::Completed);
    assert_eq!(brief.content["positioning"]["angle"], "study aid");
    assert_eq!(brief.content["proof"]["mentions"], 12);

    let idea = h.ideas.get(idea_id).await.unwrap().unwrap();
    assert_eq!(idea.status, IdeaStatus::Completed);
}

#[tokio::test]
async fn test_completion_without_draft_brief_still_succeeds() {
    let h = harness(MockResearchProvider::always(ProviderJobStatus::Completed(
        completed_output(),
    )));
    let user_id = Uuid::new_v4();
    let idea_id = h.ideas.create(user_id, "meal planning").await.unwrap();
    let job = in_progress_job(user_id, Some(idea_id));
    let job_id = job.id;
    h.jobs.insert_raw(job).await;

    let report = h.poller.poll(job_id, user_id).await.unwrap();
    assert_eq!(report.status, JobStatus::Completed);
    let effects = report.side_effects.unwrap();
    assert!(!effects.brief_finalized);
    assert!(effects.idea_updated);
    assert!(effects.error.is_none());
}

#[tokio::test]
async fn test_side_effect_failure_does_not_fail_the_poll() {
    // The idea row is missing, so the status update errors. The job is
    // still completed and the result still returned.
    let h = harness(MockResearchProvider::always(ProviderJobStatus::Completed(
        completed_output(),
    )));
    let user_id = Uuid::new_v4();
    let job = in_progress_job(user_id, Some(Uuid::new_v4()));
    let job_id = job.id;
    h.jobs.insert_raw(job).await;

    let report = h.poller.poll(job_id, user_id).await.unwrap();
    assert_eq!(report.status, JobStatus::Completed);
    assert!(report.result.is_some());
    let effects = report.side_effects.unwrap();
    assert!(!effects.brief_finalized);
    assert!(!effects.idea_updated);
    assert!(effects.error.is_some());

    let stored = h.jobs.get(job_id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Completed);
}

#[tokio::test]
async fn test_provider_failure_marks_job_failed_and_idea_warned() {
    let h = harness(MockResearchProvider::always(ProviderJobStatus::Failed(
        "source corpus unavailable".to_string(),
    )));
    let user_id = Uuid::new_v4();
    let idea_id = h.ideas.create(user_id, "fitness tracker").await.unwrap();
    let job = in_progress_job(user_id, Some(idea_id));
    let job_id = job.id;
    h.jobs.insert_raw(job).await;

    let report = h.poller.poll(job_id, user_id).await.unwrap();
    assert_eq!(report.status, JobStatus::Failed);
    assert!(report.is_complete);
    assert_eq!(report.error.as_deref(), Some("source corpus unavailable"));
    assert!(report.result.is_none());

    let stored = h.jobs.get(job_id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Failed);
    assert!(stored.result.is_none());

    // Idea gets completed_with_warnings, not a hard failure
    let idea = h.ideas.get(idea_id).await.unwrap().unwrap();
    assert_eq!(idea.status, IdeaStatus::CompletedWithWarnings);

    // Terminal: further polls make no provider calls
    let again = h.poller.poll(job_id, user_id).await.unwrap();
    assert_eq!(again.status, JobStatus::Failed);
    assert_eq!(h.provider.status_calls(), 1);
}

#[tokio::test]
async fn test_transient_provider_error_leaves_job_pollable() {
    let h = harness(MockResearchProvider::new().with_script(vec![
        ScriptedPoll::TransientError("connection reset".to_string()),
        ScriptedPoll::Status(ProviderJobStatus::Completed(completed_output())),
    ]));
    let user_id = Uuid::new_v4();
    let job = in_progress_job(user_id, None);
    let job_id = job.id;
    h.jobs.insert_raw(job).await;

    let err = h.poller.poll(job_id, user_id).await.unwrap_err();
    assert!(matches!(err, Error::Provider(_)));

    // Nothing was persisted; the next poll can still complete the job
    let stored = h.jobs.get(job_id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::InProgress);
    assert!(stored.error_message.is_none());

    let report = h.poller.poll(job_id, user_id).await.unwrap();
    assert_eq!(report.status, JobStatus::Completed);
}

#[tokio::test]
async fn test_concurrent_completion_polls_resolve_to_one_winner() {
    let h = harness(MockResearchProvider::always(ProviderJobStatus::Completed(
        completed_output(),
    )));
    let user_id = Uuid::new_v4();
    let idea_id = h.ideas.create(user_id, "budget travel").await.unwrap();
    h.briefs
        .create_draft(idea_id, user_id, json!({"a": 1}))
        .await
        .unwrap();
    let job = in_progress_job(user_id, Some(idea_id));
    let job_id = job.id;
    h.jobs.insert_raw(job).await;

    let (a, b) = tokio::join!(
        h.poller.poll(job_id, user_id),
        h.poller.poll(job_id, user_id)
    );
    let a = a.unwrap();
    let b = b.unwrap();

    assert_eq!(a.status, JobStatus::Completed);
    assert_eq!(b.status, JobStatus::Completed);
    assert_eq!(a.result, b.result);

    // At most one poll performed the terminal transition
    let winners = [&a, &b]
        .iter()
        .filter(|r| r.side_effects.is_some())
        .count();
    assert!(winners <= 1, "terminal transition must happen at most once");
}
