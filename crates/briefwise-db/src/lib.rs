//! # briefwise-db
//!
//! PostgreSQL database layer for briefwise.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for research jobs, briefs, ideas, and the
//!   content-addressed keyword analytics cache
//! - In-memory repository implementations for tests and single-process use
//!
//! ## Example
//!
//! ```rust,ignore
//! use briefwise_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/briefwise").await?;
//!     let job = db.research_jobs.get(job_id).await?;
//!     Ok(())
//! }
//! ```

pub mod briefs;
pub mod ideas;
pub mod keyword_cache;
pub mod memory;
pub mod pool;
pub mod research_jobs;

use std::sync::Arc;

use sqlx::postgres::PgPool;

use briefwise_core::{
    BriefRepository, IdeaRepository, KeywordCacheRepository, ResearchJobRepository, Result,
};

// Re-export core types
pub use briefwise_core::*;

// Re-export repository implementations
pub use briefs::PgBriefRepository;
pub use ideas::PgIdeaRepository;
pub use keyword_cache::PgKeywordCacheRepository;
pub use memory::{
    MemoryBriefRepository, MemoryIdeaRepository, MemoryKeywordCacheRepository,
    MemoryResearchJobRepository,
};
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
pub use research_jobs::PgResearchJobRepository;

/// Database facade bundling the connection pool and all repositories.
#[derive(Clone)]
pub struct Database {
    pub pool: PgPool,
    pub research_jobs: Arc<dyn ResearchJobRepository>,
    pub briefs: Arc<dyn BriefRepository>,
    pub ideas: Arc<dyn IdeaRepository>,
    pub keyword_cache: Arc<dyn KeywordCacheRepository>,
}

impl Database {
    /// Connect with the default pool configuration.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        Ok(Self::from_pool(pool))
    }

    /// Build the repository set over an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            research_jobs: Arc::new(PgResearchJobRepository::new(pool.clone())),
            briefs: Arc::new(PgBriefRepository::new(pool.clone())),
            ideas: Arc::new(PgIdeaRepository::new(pool.clone())),
            keyword_cache: Arc::new(PgKeywordCacheRepository::new(pool.clone())),
            pool,
        }
    }

    /// Run embedded migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| briefwise_core::Error::Internal(format!("Migration failed: {}", e)))?;
        Ok(())
    }
}
