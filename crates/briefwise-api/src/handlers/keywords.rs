//! Keyword analytics endpoint.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::auth::AuthPrincipal;
use crate::error::ApiError;
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub summary: String,
    #[serde(default)]
    pub force_refresh: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub keywords: JsonValue,
    pub seeds: Vec<String>,
    pub metadata: AnalyzeMetadata,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeMetadata {
    pub cache_hit: bool,
    pub cost_estimate: f64,
    /// "cache", "provider", or "fallback".
    pub source: String,
    pub expires_at: DateTime<Utc>,
}

/// POST /keywords/analyze
///
/// Has no failure mode besides malformed input: provider outages are masked
/// by the deterministic fallback, so the response always carries usable
/// analytics data.
pub async fn analyze_keywords(
    State(state): State<AppState>,
    _principal: AuthPrincipal,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let analysis = state.keywords.analyze(&req.summary, req.force_refresh).await?;

    Ok(Json(AnalyzeResponse {
        keywords: analysis.keywords,
        seeds: analysis.seeds,
        metadata: AnalyzeMetadata {
            cache_hit: analysis.metadata.cache_hit,
            cost_estimate: analysis.metadata.cost_estimate,
            source: analysis.metadata.source.as_str().to_string(),
            expires_at: analysis.metadata.expires_at,
        },
    }))
}
