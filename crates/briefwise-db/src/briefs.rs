//! Brief repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use briefwise_core::{Brief, BriefRepository, BriefStatus, Error, Result};

/// PostgreSQL implementation of BriefRepository.
pub struct PgBriefRepository {
    pool: Pool<Postgres>,
}

impl PgBriefRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn parse_row(row: sqlx::postgres::PgRow) -> Brief {
        let status: String = row.get("status");
        Brief {
            id: row.get("id"),
            idea_id: row.get("idea_id"),
            user_id: row.get("user_id"),
            status: BriefStatus::parse(&status),
            content: row.get("content"),
            generation_time_ms: row.get("generation_time_ms"),
            share_token: row.get("share_token"),
            is_public: row.get("is_public"),
            created_at: row.get("created_at"),
            completed_at: row.get("completed_at"),
        }
    }
}

const BRIEF_COLUMNS: &str = "id, idea_id, user_id, status::text, content, generation_time_ms, \
                             share_token, is_public, created_at, completed_at";

#[async_trait]
impl BriefRepository for PgBriefRepository {
    async fn create_draft(
        &self,
        idea_id: Uuid,
        user_id: Uuid,
        content: JsonValue,
    ) -> Result<Uuid> {
        let brief_id = Uuid::now_v7();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO brief (id, idea_id, user_id, status, content, created_at)
             VALUES ($1, $2, $3, 'draft'::brief_status, $4, $5)",
        )
        .bind(brief_id)
        .bind(idea_id)
        .bind(user_id)
        .bind(&content)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(brief_id)
    }

    async fn get_draft(&self, idea_id: Uuid, user_id: Uuid) -> Result<Option<Brief>> {
        // The partial unique index guarantees at most one draft per pair;
        // ORDER BY is belt-and-braces for stores without that index.
        let row = sqlx::query(&format!(
            "SELECT {BRIEF_COLUMNS} FROM brief
             WHERE idea_id = $1 AND user_id = $2 AND status = 'draft'::brief_status
             ORDER BY created_at DESC
             LIMIT 1"
        ))
        .bind(idea_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(Self::parse_row))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Brief>> {
        let row = sqlx::query(&format!("SELECT {BRIEF_COLUMNS} FROM brief WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.map(Self::parse_row))
    }

    async fn finalize(&self, id: Uuid, content: &JsonValue, status: BriefStatus) -> Result<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE brief
             SET content = $2, status = $3::brief_status, completed_at = $4
             WHERE id = $1",
        )
        .bind(id)
        .bind(content)
        .bind(status.as_str())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Brief {} not found", id)));
        }
        Ok(())
    }
}
