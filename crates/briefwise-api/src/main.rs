//! briefwise-api - HTTP API server for briefwise

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use briefwise_api::{router, AppState};
use briefwise_core::defaults;
use briefwise_db::Database;
use briefwise_research::{
    DeepResearchClient, KeywordAnalyticsService, KeywordConfig, KeywordMetricsClient,
    ResearchConfig, StatusPoller,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "briefwise_api=info,briefwise_research=info,briefwise_db=info,tower_http=info".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let db = Database::connect(&database_url).await?;
    db.migrate().await?;
    info!("Database connected and migrated");

    let research_config = ResearchConfig::from_env();
    let keyword_config = KeywordConfig::from_env();

    let research_provider = Arc::new(DeepResearchClient::new(research_config)?);
    let keyword_provider = Arc::new(KeywordMetricsClient::new(&keyword_config)?);

    let poller = Arc::new(StatusPoller::new(
        db.research_jobs.clone(),
        db.briefs.clone(),
        db.ideas.clone(),
        research_provider,
    ));
    let keywords = Arc::new(KeywordAnalyticsService::new(
        db.keyword_cache.clone(),
        keyword_provider,
        keyword_config,
    ));

    let app = router(AppState { poller, keywords });

    let port = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(defaults::SERVER_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "Starting briefwise-api");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
