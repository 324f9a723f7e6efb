//! Idea repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use briefwise_core::{Error, Idea, IdeaRepository, IdeaStatus, Result};

/// PostgreSQL implementation of IdeaRepository.
pub struct PgIdeaRepository {
    pool: Pool<Postgres>,
}

impl PgIdeaRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn parse_row(row: sqlx::postgres::PgRow) -> Idea {
        let status: String = row.get("status");
        Idea {
            id: row.get("id"),
            user_id: row.get("user_id"),
            summary: row.get("summary"),
            status: IdeaStatus::parse(&status),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl IdeaRepository for PgIdeaRepository {
    async fn create(&self, user_id: Uuid, summary: &str) -> Result<Uuid> {
        let idea_id = Uuid::now_v7();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO idea (id, user_id, summary, status, created_at)
             VALUES ($1, $2, $3, 'researching'::idea_status, $4)",
        )
        .bind(idea_id)
        .bind(user_id)
        .bind(summary)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(idea_id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Idea>> {
        let row = sqlx::query(
            "SELECT id, user_id, summary, status::text, created_at FROM idea WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(Self::parse_row))
    }

    async fn set_status(&self, id: Uuid, status: IdeaStatus) -> Result<()> {
        let result = sqlx::query("UPDATE idea SET status = $2::idea_status WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Idea {} not found", id)));
        }
        Ok(())
    }
}
