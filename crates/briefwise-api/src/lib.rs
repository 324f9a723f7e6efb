//! # briefwise-api
//!
//! HTTP API server for the briefwise research pipeline.
//!
//! The router is built over trait-object services, so handler tests run
//! against in-memory repositories and mock providers with no database.

pub mod auth;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use briefwise_research::keywords::KeywordAnalyticsService;
use briefwise_research::poller::StatusPoller;

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub poller: Arc<StatusPoller>,
    pub keywords: Arc<KeywordAnalyticsService>,
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let request_id_header = axum::http::HeaderName::from_static("x-request-id");

    Router::new()
        .route("/health", get(health))
        .route("/research/:job_id/status", get(handlers::get_job_status))
        .route("/keywords/analyze", post(handlers::analyze_keywords))
        .fallback(not_found)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            request_id_header,
            MakeRequestUuidV7,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
