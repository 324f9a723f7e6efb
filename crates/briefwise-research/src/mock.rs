//! Mock providers for deterministic testing.
//!
//! `MockResearchProvider` plays back a scripted sequence of poll responses
//! and counts calls, so tests can assert properties like "zero provider
//! calls after a terminal observation". `MockKeywordProvider` returns a
//! fixed payload or fails on demand.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use briefwise_core::{
    Error, KeywordMetricsProvider, ProviderJobStatus, ResearchProvider, Result,
};

/// One scripted response to a `get_status` call.
#[derive(Debug, Clone)]
pub enum ScriptedPoll {
    /// Report this status.
    Status(ProviderJobStatus),
    /// Fail the call with a transient provider error.
    TransientError(String),
}

#[derive(Default)]
struct MockResearchState {
    script: VecDeque<ScriptedPoll>,
    /// Replayed once the script is exhausted.
    last: Option<ScriptedPoll>,
    create_calls: Vec<String>,
    status_calls: usize,
}

/// Scriptable mock of the deep-research provider.
#[derive(Clone, Default)]
pub struct MockResearchProvider {
    state: Arc<Mutex<MockResearchState>>,
}

impl MockResearchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the sequence of `get_status` responses. After the sequence is
    /// exhausted, the final entry repeats.
    pub fn with_script(self, script: Vec<ScriptedPoll>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.script = script.into();
        }
        self
    }

    /// Convenience: a single status repeated forever.
    pub fn always(status: ProviderJobStatus) -> Self {
        Self::new().with_script(vec![ScriptedPoll::Status(status)])
    }

    /// Number of `get_status` calls made so far.
    pub fn status_calls(&self) -> usize {
        self.state.lock().unwrap().status_calls
    }

    /// Prompts passed to `create_job` so far.
    pub fn created_prompts(&self) -> Vec<String> {
        self.state.lock().unwrap().create_calls.clone()
    }
}

#[async_trait]
impl ResearchProvider for MockResearchProvider {
    async fn create_job(&self, prompt: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.create_calls.push(prompt.to_string());
        Ok(format!("mock-job-{}", state.create_calls.len()))
    }

    async fn get_status(&self, _external_job_id: &str) -> Result<ProviderJobStatus> {
        let scripted = {
            let mut state = self.state.lock().unwrap();
            state.status_calls += 1;
            let next = state.script.pop_front().or_else(|| state.last.clone());
            if let Some(ref entry) = next {
                state.last = Some(entry.clone());
            }
            next
        };

        match scripted {
            Some(ScriptedPoll::Status(status)) => Ok(status),
            Some(ScriptedPoll::TransientError(msg)) => Err(Error::Provider(msg)),
            None => Err(Error::Provider("Mock script is empty".to_string())),
        }
    }
}

#[derive(Default)]
struct MockKeywordState {
    calls: usize,
}

/// Mock keyword metrics provider with a fixed response or scripted failure.
#[derive(Clone)]
pub struct MockKeywordProvider {
    response: Option<JsonValue>,
    state: Arc<Mutex<MockKeywordState>>,
}

impl MockKeywordProvider {
    /// Always return the given payload.
    pub fn returning(payload: JsonValue) -> Self {
        Self {
            response: Some(payload),
            state: Arc::default(),
        }
    }

    /// Always fail with a transient provider error.
    pub fn failing() -> Self {
        Self {
            response: None,
            state: Arc::default(),
        }
    }

    /// Number of `fetch_metrics` calls made so far.
    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().calls
    }
}

#[async_trait]
impl KeywordMetricsProvider for MockKeywordProvider {
    async fn fetch_metrics(&self, _summary: &str, _seeds: &[String]) -> Result<JsonValue> {
        self.state.lock().unwrap().calls += 1;
        match &self.response {
            Some(payload) => Ok(payload.clone()),
            None => Err(Error::Provider("Mock provider failure".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use briefwise_core::ProviderJobOutput;
    use serde_json::json;

    #[tokio::test]
    async fn test_script_replays_last_entry() {
        let provider = MockResearchProvider::new().with_script(vec![
            ScriptedPoll::Status(ProviderJobStatus::Running),
            ScriptedPoll::Status(ProviderJobStatus::Completed(ProviderJobOutput {
                payload: json!({"done": true}),
                proof_signals: None,
                usage: None,
            })),
        ]);

        assert!(matches!(
            provider.get_status("x").await.unwrap(),
            ProviderJobStatus::Running
        ));
        assert!(matches!(
            provider.get_status("x").await.unwrap(),
            ProviderJobStatus::Completed(_)
        ));
        // Script exhausted: the completion repeats
        assert!(matches!(
            provider.get_status("x").await.unwrap(),
            ProviderJobStatus::Completed(_)
        ));
        assert_eq!(provider.status_calls(), 3);
    }

    #[tokio::test]
    async fn test_keyword_provider_failing() {
        let provider = MockKeywordProvider::failing();
        assert!(provider.fetch_metrics("s", &[]).await.is_err());
        assert_eq!(provider.calls(), 1);
    }
}
