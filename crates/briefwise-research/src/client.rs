//! Deep-research provider client implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, instrument};

use briefwise_core::{
    Error, ProviderJobOutput, ProviderJobStatus, ResearchProvider, Result, TokenUsage,
};

use crate::config::ResearchConfig;

/// HTTP client for a deep-research-style job provider.
///
/// Every error raised here is `Error::Provider` — transient from the
/// pipeline's point of view. The poller never persists these as job
/// failure; only an explicit `"failed"` status from the provider is
/// terminal.
pub struct DeepResearchClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct CreateJobRequest<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct CreateJobResponse {
    id: String,
}

#[derive(Deserialize)]
struct JobStatusResponse {
    status: String,
    payload: Option<JsonValue>,
    proof_signals: Option<JsonValue>,
    usage: Option<TokenUsage>,
    message: Option<String>,
}

impl DeepResearchClient {
    pub fn new(config: ResearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ResearchConfig::from_env())
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

#[async_trait]
impl ResearchProvider for DeepResearchClient {
    #[instrument(
        skip(self, prompt),
        fields(subsystem = "research", component = "deep_research_client", op = "create_job")
    )]
    async fn create_job(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/research/jobs", self.base_url);
        let response = self
            .request(self.client.post(&url))
            .json(&CreateJobRequest { prompt })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Provider(format!(
                "Job creation returned HTTP {}",
                response.status()
            )));
        }

        let body: CreateJobResponse = response.json().await?;
        debug!(external_job_id = %body.id, "Provider accepted research job");
        Ok(body.id)
    }

    #[instrument(
        skip(self),
        fields(subsystem = "research", component = "deep_research_client", op = "get_status")
    )]
    async fn get_status(&self, external_job_id: &str) -> Result<ProviderJobStatus> {
        let url = format!("{}/v1/research/jobs/{}", self.base_url, external_job_id);
        let response = self.request(self.client.get(&url)).send().await?;

        if !response.status().is_success() {
            return Err(Error::Provider(format!(
                "Status check returned HTTP {}",
                response.status()
            )));
        }

        let body: JobStatusResponse = response.json().await?;
        match body.status.as_str() {
            "queued" | "running" | "in_progress" => Ok(ProviderJobStatus::Running),
            "completed" => {
                // A completed job without a payload is malformed — treat as
                // transient so the job stays poll-able rather than failing it.
                let payload = body.payload.ok_or_else(|| {
                    Error::Provider("Provider reported completion without a payload".to_string())
                })?;
                Ok(ProviderJobStatus::Completed(ProviderJobOutput {
                    payload,
                    proof_signals: body.proof_signals,
                    usage: body.usage,
                }))
            }
            "failed" => Ok(ProviderJobStatus::Failed(
                body.message
                    .unwrap_or_else(|| "Provider reported failure without a message".to_string()),
            )),
            other => Err(Error::Provider(format!(
                "Unknown provider status: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> DeepResearchClient {
        DeepResearchClient::new(ResearchConfig::default().with_base_url(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_create_job_returns_external_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/research/jobs"))
            .and(body_json(json!({"prompt": "validate this idea"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "ext-42"})))
            .mount(&server)
            .await;

        let id = client_for(&server)
            .create_job("validate this idea")
            .await
            .unwrap();
        assert_eq!(id, "ext-42");
    }

    #[tokio::test]
    async fn test_get_status_running() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/research/jobs/ext-42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "running"})))
            .mount(&server)
            .await;

        let status = client_for(&server).get_status("ext-42").await.unwrap();
        assert!(matches!(status, ProviderJobStatus::Running));
    }

    #[tokio::test]
    async fn test_get_status_completed_with_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/research/jobs/ext-42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "completed",
                "payload": {"summary": "viable"},
                "proof_signals": {"mentions": 12},
                "usage": {"input_tokens": 900, "output_tokens": 150}
            })))
            .mount(&server)
            .await;

        let status = client_for(&server).get_status("ext-42").await.unwrap();
        match status {
            ProviderJobStatus::Completed(out) => {
                assert_eq!(out.payload, json!({"summary": "viable"}));
                assert_eq!(out.proof_signals, Some(json!({"mentions": 12})));
                assert_eq!(out.usage.unwrap().total(), 1050);
            }
            other => panic!("Expected Completed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_status_completed_without_payload_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/research/jobs/ext-42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "completed"})))
            .mount(&server)
            .await;

        let err = client_for(&server).get_status("ext-42").await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
    }

    #[tokio::test]
    async fn test_get_status_failed_carries_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/research/jobs/ext-42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "failed",
                "message": "source corpus unavailable"
            })))
            .mount(&server)
            .await;

        let status = client_for(&server).get_status("ext-42").await.unwrap();
        match status {
            ProviderJobStatus::Failed(msg) => assert_eq!(msg, "source corpus unavailable"),
            other => panic!("Expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_status_http_error_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/research/jobs/ext-42"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).get_status("ext-42").await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
    }

    #[tokio::test]
    async fn test_get_status_unknown_status_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/research/jobs/ext-42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "paused"})))
            .mount(&server)
            .await;

        let err = client_for(&server).get_status("ext-42").await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
    }
}
