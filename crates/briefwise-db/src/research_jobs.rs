//! Research job repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use briefwise_core::{
    CreateResearchJobRequest, Error, JobStatus, ResearchJob, ResearchJobRepository, Result,
    TokenUsage,
};

/// PostgreSQL implementation of ResearchJobRepository.
///
/// The terminal transitions (`complete_if_running`, `fail_if_running`) are
/// single conditional UPDATE statements guarded on the stored status still
/// being non-terminal. Two concurrent pollers can both observe "provider
/// says done", but only one UPDATE matches a row — the other sees zero rows
/// and knows it lost the race. No distributed lock is needed.
pub struct PgResearchJobRepository {
    pool: Pool<Postgres>,
}

impl PgResearchJobRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn parse_row(row: sqlx::postgres::PgRow) -> Result<ResearchJob> {
        let status: String = row.get("status");
        let token_usage: Option<JsonValue> = row.get("token_usage");
        let token_usage = token_usage
            .map(|v| serde_json::from_value::<TokenUsage>(v))
            .transpose()
            .map_err(|e| Error::Serialization(e.to_string()))?;

        Ok(ResearchJob {
            id: row.get("id"),
            user_id: row.get("user_id"),
            idea_id: row.get("idea_id"),
            external_job_id: row.get("external_job_id"),
            status: JobStatus::parse(&status),
            result: row.get("result"),
            proof_signals: row.get("proof_signals"),
            error_message: row.get("error_message"),
            token_usage,
            created_at: row.get("created_at"),
            completed_at: row.get("completed_at"),
        })
    }
}

const JOB_COLUMNS: &str = "id, user_id, idea_id, external_job_id, status::text, result, \
                           proof_signals, error_message, token_usage, created_at, completed_at";

#[async_trait]
impl ResearchJobRepository for PgResearchJobRepository {
    async fn create(&self, req: CreateResearchJobRequest) -> Result<Uuid> {
        let job_id = Uuid::now_v7();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO research_job (id, user_id, idea_id, status, created_at)
             VALUES ($1, $2, $3, 'pending'::research_job_status, $4)",
        )
        .bind(job_id)
        .bind(req.user_id)
        .bind(req.idea_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(job_id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ResearchJob>> {
        let row = sqlx::query(&format!(
            "SELECT {JOB_COLUMNS} FROM research_job WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(Self::parse_row).transpose()
    }

    async fn get_owned(&self, id: Uuid, user_id: Uuid) -> Result<Option<ResearchJob>> {
        let row = sqlx::query(&format!(
            "SELECT {JOB_COLUMNS} FROM research_job WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(Self::parse_row).transpose()
    }

    async fn set_external_id(&self, id: Uuid, external_job_id: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE research_job
             SET external_job_id = $2, status = 'in_progress'::research_job_status
             WHERE id = $1 AND status = 'pending'::research_job_status",
        )
        .bind(id)
        .bind(external_job_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::JobNotFound(id));
        }
        Ok(())
    }

    async fn complete_if_running(
        &self,
        id: Uuid,
        result: &JsonValue,
        proof_signals: Option<&JsonValue>,
        usage: Option<&TokenUsage>,
    ) -> Result<bool> {
        let now = Utc::now();
        let usage_json = usage
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| Error::Serialization(e.to_string()))?;

        let row = sqlx::query_scalar::<_, Uuid>(
            "UPDATE research_job
             SET status = 'completed'::research_job_status, result = $2,
                 proof_signals = $3, token_usage = $4, completed_at = $5
             WHERE id = $1
               AND status IN ('pending'::research_job_status, 'in_progress'::research_job_status)
             RETURNING id",
        )
        .bind(id)
        .bind(result)
        .bind(proof_signals)
        .bind(usage_json)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.is_some())
    }

    async fn fail_if_running(&self, id: Uuid, error: &str) -> Result<bool> {
        let now = Utc::now();

        let row = sqlx::query_scalar::<_, Uuid>(
            "UPDATE research_job
             SET status = 'failed'::research_job_status, error_message = $2, completed_at = $3
             WHERE id = $1
               AND status IN ('pending'::research_job_status, 'in_progress'::research_job_status)
             RETURNING id",
        )
        .bind(id)
        .bind(error)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.is_some())
    }
}
