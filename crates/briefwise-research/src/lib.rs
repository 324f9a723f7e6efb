//! # briefwise-research
//!
//! External-work orchestration for briefwise.
//!
//! This crate provides:
//! - HTTP clients for the deep-research and keyword-metrics providers
//! - The status poller: the state machine that tracks a research job's
//!   external lifecycle and performs its one-time completion side effects
//! - The keyword analytics service: content-addressed cache with a
//!   deterministic fallback when the provider is unavailable
//! - Deterministic mock providers for tests
//!
//! Progress is driven entirely by repeated client polling (pull-based).
//! There is no background scheduler: no job advances without a poll, and
//! the polling interval is the caller's responsibility.

pub mod client;
pub mod config;
pub mod fallback;
pub mod keyword_client;
pub mod keywords;
pub mod mock;
pub mod poller;
pub mod seeds;

// Re-export core types
pub use briefwise_core::*;

pub use client::DeepResearchClient;
pub use config::{KeywordConfig, ResearchConfig};
pub use fallback::generate_fallback;
pub use keyword_client::KeywordMetricsClient;
pub use keywords::{AnalysisMetadata, AnalyticsSource, KeywordAnalysis, KeywordAnalyticsService};
pub use mock::{MockKeywordProvider, MockResearchProvider, ScriptedPoll};
pub use poller::{CompletionSideEffects, JobStatusReport, StatusPoller};
pub use seeds::derive_seed_terms;
