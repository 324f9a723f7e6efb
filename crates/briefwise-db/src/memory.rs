//! In-memory repository implementations.
//!
//! Used by unit/integration tests and single-process deployments. These
//! honor the same conditional-transition semantics as the Postgres
//! repositories, so the poller's idempotence guarantees can be exercised
//! without a live database.
//!
//! Note: always compiled (not `#[cfg(test)]`) so downstream crates'
//! integration tests can use them.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;
use uuid::Uuid;

use briefwise_core::{
    Brief, BriefRepository, BriefStatus, CreateResearchJobRequest, Error, Idea, IdeaRepository,
    IdeaStatus, JobStatus, KeywordCacheEntry, KeywordCacheRepository, ResearchJob,
    ResearchJobRepository, Result, TokenUsage,
};

/// In-memory ResearchJobRepository.
#[derive(Default)]
pub struct MemoryResearchJobRepository {
    jobs: RwLock<HashMap<Uuid, ResearchJob>>,
}

impl MemoryResearchJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a fully-formed job row, bypassing the lifecycle. Test helper.
    pub async fn insert_raw(&self, job: ResearchJob) {
        self.jobs.write().await.insert(job.id, job);
    }
}

#[async_trait]
impl ResearchJobRepository for MemoryResearchJobRepository {
    async fn create(&self, req: CreateResearchJobRequest) -> Result<Uuid> {
        let job = ResearchJob {
            id: Uuid::now_v7(),
            user_id: req.user_id,
            idea_id: req.idea_id,
            external_job_id: None,
            status: JobStatus::Pending,
            result: None,
            proof_signals: None,
            error_message: None,
            token_usage: None,
            created_at: Utc::now(),
            completed_at: None,
        };
        let id = job.id;
        self.jobs.write().await.insert(id, job);
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ResearchJob>> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    async fn get_owned(&self, id: Uuid, user_id: Uuid) -> Result<Option<ResearchJob>> {
        Ok(self
            .jobs
            .read()
            .await
            .get(&id)
            .filter(|j| j.user_id == user_id)
            .cloned())
    }

    async fn set_external_id(&self, id: Uuid, external_job_id: &str) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(Error::JobNotFound(id))?;
        if job.status != JobStatus::Pending {
            return Err(Error::JobNotFound(id));
        }
        job.external_job_id = Some(external_job_id.to_string());
        job.status = JobStatus::InProgress;
        Ok(())
    }

    async fn complete_if_running(
        &self,
        id: Uuid,
        result: &JsonValue,
        proof_signals: Option<&JsonValue>,
        usage: Option<&TokenUsage>,
    ) -> Result<bool> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(Error::JobNotFound(id))?;
        if job.status.is_terminal() {
            return Ok(false);
        }
        job.status = JobStatus::Completed;
        job.result = Some(result.clone());
        job.proof_signals = proof_signals.cloned();
        job.token_usage = usage.copied();
        job.completed_at = Some(Utc::now());
        Ok(true)
    }

    async fn fail_if_running(&self, id: Uuid, error: &str) -> Result<bool> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(Error::JobNotFound(id))?;
        if job.status.is_terminal() {
            return Ok(false);
        }
        job.status = JobStatus::Failed;
        job.error_message = Some(error.to_string());
        job.completed_at = Some(Utc::now());
        Ok(true)
    }
}

/// In-memory BriefRepository.
#[derive(Default)]
pub struct MemoryBriefRepository {
    briefs: RwLock<HashMap<Uuid, Brief>>,
}

impl MemoryBriefRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BriefRepository for MemoryBriefRepository {
    async fn create_draft(
        &self,
        idea_id: Uuid,
        user_id: Uuid,
        content: JsonValue,
    ) -> Result<Uuid> {
        let brief = Brief {
            id: Uuid::now_v7(),
            idea_id,
            user_id,
            status: BriefStatus::Draft,
            content,
            generation_time_ms: None,
            share_token: None,
            is_public: false,
            created_at: Utc::now(),
            completed_at: None,
        };
        let id = brief.id;
        self.briefs.write().await.insert(id, brief);
        Ok(id)
    }

    async fn get_draft(&self, idea_id: Uuid, user_id: Uuid) -> Result<Option<Brief>> {
        Ok(self
            .briefs
            .read()
            .await
            .values()
            .filter(|b| {
                b.idea_id == idea_id && b.user_id == user_id && b.status == BriefStatus::Draft
            })
            .max_by_key(|b| b.created_at)
            .cloned())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Brief>> {
        Ok(self.briefs.read().await.get(&id).cloned())
    }

    async fn finalize(&self, id: Uuid, content: &JsonValue, status: BriefStatus) -> Result<()> {
        let mut briefs = self.briefs.write().await;
        let brief = briefs
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("Brief {} not found", id)))?;
        brief.content = content.clone();
        brief.status = status;
        brief.completed_at = Some(Utc::now());
        Ok(())
    }
}

/// In-memory IdeaRepository.
#[derive(Default)]
pub struct MemoryIdeaRepository {
    ideas: RwLock<HashMap<Uuid, Idea>>,
}

impl MemoryIdeaRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdeaRepository for MemoryIdeaRepository {
    async fn create(&self, user_id: Uuid, summary: &str) -> Result<Uuid> {
        let idea = Idea {
            id: Uuid::now_v7(),
            user_id,
            summary: summary.to_string(),
            status: IdeaStatus::Researching,
            created_at: Utc::now(),
        };
        let id = idea.id;
        self.ideas.write().await.insert(id, idea);
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Idea>> {
        Ok(self.ideas.read().await.get(&id).cloned())
    }

    async fn set_status(&self, id: Uuid, status: IdeaStatus) -> Result<()> {
        let mut ideas = self.ideas.write().await;
        let idea = ideas
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("Idea {} not found", id)))?;
        idea.status = status;
        Ok(())
    }
}

/// In-memory KeywordCacheRepository.
#[derive(Default)]
pub struct MemoryKeywordCacheRepository {
    entries: RwLock<HashMap<String, KeywordCacheEntry>>,
}

impl MemoryKeywordCacheRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeywordCacheRepository for MemoryKeywordCacheRepository {
    async fn get(&self, summary_hash: &str) -> Result<Option<KeywordCacheEntry>> {
        Ok(self.entries.read().await.get(summary_hash).cloned())
    }

    async fn upsert(&self, entry: &KeywordCacheEntry) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(entry.summary_hash.clone(), entry.clone());
        Ok(())
    }
}
