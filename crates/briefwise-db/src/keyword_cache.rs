//! Keyword analytics cache repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use briefwise_core::{Error, KeywordCacheEntry, KeywordCacheRepository, Result};

/// PostgreSQL implementation of KeywordCacheRepository.
///
/// Entries are keyed by the hash of their normalized input and replaced by
/// upsert — never explicitly deleted. TTL validity is evaluated by the
/// caller so forced refreshes can bypass it.
pub struct PgKeywordCacheRepository {
    pool: Pool<Postgres>,
}

impl PgKeywordCacheRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn parse_row(row: sqlx::postgres::PgRow) -> KeywordCacheEntry {
        KeywordCacheEntry {
            summary_hash: row.get("summary_hash"),
            summary: row.get("summary"),
            analytics: row.get("analytics"),
            seed_terms: row.get("seed_terms"),
            cost_estimate: row.get("cost_estimate"),
            created_at: row.get("created_at"),
            expires_at: row.get("expires_at"),
        }
    }
}

#[async_trait]
impl KeywordCacheRepository for PgKeywordCacheRepository {
    async fn get(&self, summary_hash: &str) -> Result<Option<KeywordCacheEntry>> {
        let row = sqlx::query(
            "SELECT summary_hash, summary, analytics, seed_terms, cost_estimate,
                    created_at, expires_at
             FROM keyword_cache WHERE summary_hash = $1",
        )
        .bind(summary_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(Self::parse_row))
    }

    async fn upsert(&self, entry: &KeywordCacheEntry) -> Result<()> {
        sqlx::query(
            "INSERT INTO keyword_cache
                 (summary_hash, summary, analytics, seed_terms, cost_estimate,
                  created_at, expires_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (summary_hash) DO UPDATE SET
                 summary = EXCLUDED.summary,
                 analytics = EXCLUDED.analytics,
                 seed_terms = EXCLUDED.seed_terms,
                 cost_estimate = EXCLUDED.cost_estimate,
                 created_at = EXCLUDED.created_at,
                 expires_at = EXCLUDED.expires_at",
        )
        .bind(&entry.summary_hash)
        .bind(&entry.summary)
        .bind(&entry.analytics)
        .bind(&entry.seed_terms)
        .bind(entry.cost_estimate)
        .bind(entry.created_at)
        .bind(entry.expires_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(())
    }
}
