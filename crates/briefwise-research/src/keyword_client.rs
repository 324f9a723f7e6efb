//! Keyword metrics provider client implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::instrument;

use briefwise_core::{Error, KeywordMetricsProvider, Result};

use crate::config::KeywordConfig;

/// HTTP client for the external keyword analytics provider.
///
/// Errors never reach the analyze endpoint's callers — the keyword
/// analytics service masks every provider failure with the deterministic
/// fallback generator.
pub struct KeywordMetricsClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct MetricsRequest<'a> {
    summary: &'a str,
    seeds: &'a [String],
}

impl KeywordMetricsClient {
    pub fn new(config: &KeywordConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl KeywordMetricsProvider for KeywordMetricsClient {
    #[instrument(
        skip(self, summary, seeds),
        fields(subsystem = "keywords", component = "metrics_client", op = "fetch_metrics",
               seed_count = seeds.len())
    )]
    async fn fetch_metrics(&self, summary: &str, seeds: &[String]) -> Result<JsonValue> {
        let url = format!("{}/v1/keywords/metrics", self.base_url);
        let mut builder = self.client.post(&url).json(&MetricsRequest { summary, seeds });
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(Error::Provider(format!(
                "Metrics fetch returned HTTP {}",
                response.status()
            )));
        }

        Ok(response.json::<JsonValue>().await?)
    }
}
