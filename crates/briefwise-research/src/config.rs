//! Environment-driven configuration for the provider clients and services.

use briefwise_core::defaults;

/// Configuration for the deep-research provider client.
#[derive(Debug, Clone)]
pub struct ResearchConfig {
    /// Base URL of the provider API.
    pub base_url: String,
    /// Bearer token, when the provider requires one.
    pub api_key: Option<String>,
    /// Request timeout in seconds. Deliberately very long: the initial
    /// acknowledgment of a deep-research job can take minutes.
    pub timeout_secs: u64,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::RESEARCH_PROVIDER_URL.to_string(),
            api_key: None,
            timeout_secs: defaults::RESEARCH_TIMEOUT_SECS,
        }
    }
}

impl ResearchConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `RESEARCH_PROVIDER_URL` | local stub | Provider base URL |
    /// | `RESEARCH_PROVIDER_API_KEY` | none | Bearer token |
    /// | `RESEARCH_TIMEOUT_SECS` | `3600` | Request timeout ceiling |
    pub fn from_env() -> Self {
        let base_url = std::env::var("RESEARCH_PROVIDER_URL")
            .unwrap_or_else(|_| defaults::RESEARCH_PROVIDER_URL.to_string());
        let api_key = std::env::var("RESEARCH_PROVIDER_API_KEY").ok();
        let timeout_secs = std::env::var("RESEARCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::RESEARCH_TIMEOUT_SECS);

        Self {
            base_url,
            api_key,
            timeout_secs,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Configuration for the keyword analytics service and its provider client.
#[derive(Debug, Clone)]
pub struct KeywordConfig {
    /// Base URL of the keyword metrics provider.
    pub base_url: String,
    /// Bearer token, when the provider requires one.
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Cache TTL in hours.
    pub cache_ttl_hours: i64,
    /// Cost attributed to one successful provider call.
    pub provider_cost: f64,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::KEYWORD_PROVIDER_URL.to_string(),
            api_key: None,
            timeout_secs: defaults::KEYWORD_TIMEOUT_SECS,
            cache_ttl_hours: defaults::KEYWORD_CACHE_TTL_HOURS,
            provider_cost: defaults::KEYWORD_PROVIDER_COST,
        }
    }
}

impl KeywordConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `KEYWORD_PROVIDER_URL` | local stub | Provider base URL |
    /// | `KEYWORD_PROVIDER_API_KEY` | none | Bearer token |
    /// | `KEYWORD_TIMEOUT_SECS` | `30` | Request timeout |
    /// | `KEYWORD_CACHE_TTL_HOURS` | `24` | Cache entry TTL |
    /// | `KEYWORD_PROVIDER_COST` | `0.05` | Per-call cost estimate |
    pub fn from_env() -> Self {
        let base_url = std::env::var("KEYWORD_PROVIDER_URL")
            .unwrap_or_else(|_| defaults::KEYWORD_PROVIDER_URL.to_string());
        let api_key = std::env::var("KEYWORD_PROVIDER_API_KEY").ok();
        let timeout_secs = std::env::var("KEYWORD_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::KEYWORD_TIMEOUT_SECS);
        let cache_ttl_hours = std::env::var("KEYWORD_CACHE_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(defaults::KEYWORD_CACHE_TTL_HOURS);
        let provider_cost = std::env::var("KEYWORD_PROVIDER_COST")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(defaults::KEYWORD_PROVIDER_COST);

        Self {
            base_url,
            api_key,
            timeout_secs,
            cache_ttl_hours,
            provider_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_research_config_defaults() {
        let config = ResearchConfig::default();
        assert_eq!(config.timeout_secs, defaults::RESEARCH_TIMEOUT_SECS);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_keyword_config_defaults() {
        let config = KeywordConfig::default();
        assert_eq!(config.cache_ttl_hours, 24);
        assert_eq!(config.provider_cost, defaults::KEYWORD_PROVIDER_COST);
    }
}
