//! Keyword analytics service: content-addressed cache over an external
//! metrics provider, with a deterministic fallback.
//!
//! The user-facing contract has no failure mode besides malformed input:
//! seed derivation is pure, provider failures are masked by the fallback,
//! and cache errors are logged and swallowed. "Always return usable
//! analytics data."

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument, warn};

use briefwise_core::{
    Error, KeywordCacheEntry, KeywordCacheRepository, KeywordMetricsProvider, Result,
};

use crate::config::KeywordConfig;
use crate::fallback::generate_fallback;
use crate::seeds::derive_seed_terms;

/// Where an analysis result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsSource {
    Cache,
    Provider,
    Fallback,
}

impl AnalyticsSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsSource::Cache => "cache",
            AnalyticsSource::Provider => "provider",
            AnalyticsSource::Fallback => "fallback",
        }
    }
}

/// Freshness and provenance metadata attached to every analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    pub cache_hit: bool,
    pub cost_estimate: f64,
    pub source: AnalyticsSource,
    /// Expiry of the entry backing this result. For cache hits this is the
    /// original expiry, so callers can reason about freshness.
    pub expires_at: chrono::DateTime<Utc>,
}

/// A completed keyword analysis.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordAnalysis {
    pub keywords: JsonValue,
    pub seeds: Vec<String>,
    pub metadata: AnalysisMetadata,
}

/// Content-addressed keyword analytics with write-through caching.
pub struct KeywordAnalyticsService {
    cache: Arc<dyn KeywordCacheRepository>,
    provider: Arc<dyn KeywordMetricsProvider>,
    config: KeywordConfig,
}

/// Cache key: hex SHA-256 of the trimmed, case-folded summary, so identical
/// inputs reuse identical entries regardless of whitespace or casing.
pub fn summary_hash(summary: &str) -> String {
    let normalized = summary.trim().to_lowercase();
    hex::encode(Sha256::digest(normalized.as_bytes()))
}

impl KeywordAnalyticsService {
    pub fn new(
        cache: Arc<dyn KeywordCacheRepository>,
        provider: Arc<dyn KeywordMetricsProvider>,
        config: KeywordConfig,
    ) -> Self {
        Self {
            cache,
            provider,
            config,
        }
    }

    /// Analyze a summary, serving from cache when a fresh entry exists.
    ///
    /// `force_refresh` bypasses cache validity but still writes through on
    /// completion. The only error this returns is `InvalidInput` for an
    /// empty summary.
    #[instrument(
        skip(self, summary),
        fields(subsystem = "keywords", component = "analytics", op = "analyze")
    )]
    pub async fn analyze(&self, summary: &str, force_refresh: bool) -> Result<KeywordAnalysis> {
        if summary.trim().is_empty() {
            return Err(Error::InvalidInput("Summary must not be empty".to_string()));
        }

        let hash = summary_hash(summary);

        if !force_refresh {
            if let Some(entry) = self.cached_entry(&hash).await {
                if Utc::now() < entry.expires_at {
                    debug!(cache_hit = true, "Serving keyword analytics from cache");
                    return Ok(KeywordAnalysis {
                        keywords: entry.analytics,
                        seeds: entry.seed_terms,
                        metadata: AnalysisMetadata {
                            cache_hit: true,
                            cost_estimate: 0.0,
                            source: AnalyticsSource::Cache,
                            expires_at: entry.expires_at,
                        },
                    });
                }
                debug!("Cached keyword analytics expired, recomputing");
            }
        }

        let seeds = derive_seed_terms(summary);
        debug!(seed_count = seeds.len(), "Derived seed terms");

        let (analytics, source, cost) = match self.provider.fetch_metrics(summary, &seeds).await {
            Ok(metrics) => (metrics, AnalyticsSource::Provider, self.config.provider_cost),
            Err(e) => {
                warn!(error = %e, "Keyword provider failed, using fallback");
                (generate_fallback(summary, &seeds), AnalyticsSource::Fallback, 0.0)
            }
        };

        let now = Utc::now();
        let expires_at = now + Duration::hours(self.config.cache_ttl_hours);
        let entry = KeywordCacheEntry {
            summary_hash: hash,
            summary: summary.to_string(),
            analytics: analytics.clone(),
            seed_terms: seeds.clone(),
            cost_estimate: cost,
            created_at: now,
            expires_at,
        };

        // Write-through regardless of source. This bounds retry storms
        // against a failing provider to once per TTL window per input.
        if let Err(e) = self.cache.upsert(&entry).await {
            warn!(error = %e, "Failed to write keyword cache entry");
        }

        Ok(KeywordAnalysis {
            keywords: analytics,
            seeds,
            metadata: AnalysisMetadata {
                cache_hit: false,
                cost_estimate: cost,
                source,
                expires_at,
            },
        })
    }

    async fn cached_entry(&self, hash: &str) -> Option<KeywordCacheEntry> {
        match self.cache.get(hash).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Keyword cache read failed, treating as miss");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_hash_normalizes() {
        assert_eq!(summary_hash("  AI Note-Taking App  "), summary_hash("ai note-taking app"));
        assert_ne!(summary_hash("meal planner"), summary_hash("meal planners"));
    }

    #[test]
    fn test_source_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AnalyticsSource::Fallback).unwrap(),
            "\"fallback\""
        );
        assert_eq!(AnalyticsSource::Cache.as_str(), "cache");
    }
}
