//! Research job status endpoint.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use briefwise_core::JobStatus;

use crate::auth::AuthPrincipal;
use crate::error::ApiError;
use crate::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    pub status: JobStatus,
    pub is_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_signals: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /research/:job_id/status
///
/// Polling is the only way a job progresses: each call may advance the job
/// if the provider has finished since the last one. Callers repeat until
/// `isComplete` is true.
pub async fn get_job_status(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobStatusResponse>, ApiError> {
    let report = state.poller.poll(job_id, principal.user_id).await?;

    Ok(Json(JobStatusResponse {
        status: report.status,
        is_complete: report.is_complete,
        result: report.result,
        proof_signals: report.proof_signals,
        error: report.error,
    }))
}
