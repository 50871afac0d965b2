// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion gateway for deterministic testing.
//!
//! `MockGateway` implements `LlmGateway` with scripted responses so stage
//! tests run without network access.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use emocast_core::types::{AdapterType, Completion, CompletionRequest, HealthStatus, TokenUsage};
use emocast_core::{EmocastError, LlmGateway, PluginAdapter};

/// A gateway that answers from a FIFO queue.
///
/// When the queue is empty the default response is returned. Requests
/// whose user content contains a configured needle fail with
/// `UpstreamCallFailed`, which makes per-message failures deterministic
/// under concurrent fan-out.
pub struct MockGateway {
    responses: Arc<Mutex<VecDeque<String>>>,
    default_response: String,
    fail_needle: Option<String>,
    prompt_tokens: u32,
    calls: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            default_response: "mock response".to_string(),
            fail_needle: None,
            prompt_tokens: 400,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock gateway pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            ..Self::new()
        }
    }

    /// Response used once the queue is drained.
    pub fn with_default_response(mut self, text: impl Into<String>) -> Self {
        self.default_response = text.into();
        self
    }

    /// Fail every request whose user content contains `needle`.
    pub fn failing_on(mut self, needle: impl Into<String>) -> Self {
        self.fail_needle = Some(needle.into());
        self
    }

    /// Prompt tokens reported in every completion's usage.
    pub fn with_prompt_tokens(mut self, prompt_tokens: u32) -> Self {
        self.prompt_tokens = prompt_tokens;
        self
    }

    /// Add a response to the end of the queue.
    pub async fn push_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(text.into());
    }

    /// Number of `complete` calls so far, failed ones included.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, in arrival order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    async fn next_response(&self) -> String {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| self.default_response.clone())
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockGateway {
    fn name(&self) -> &str {
        "mock-gateway"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Gateway
    }

    async fn health_check(&self) -> Result<HealthStatus, EmocastError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EmocastError> {
        Ok(())
    }
}

#[async_trait]
impl LlmGateway for MockGateway {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, EmocastError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let fails = self
            .fail_needle
            .as_deref()
            .is_some_and(|needle| request.user_content.contains(needle));
        self.requests.lock().await.push(request);

        if fails {
            return Err(EmocastError::UpstreamCallFailed {
                message: "mock gateway scripted failure".to_string(),
            });
        }

        let text = self.next_response().await;
        let completion_tokens = 20;
        Ok(Completion {
            text,
            usage: TokenUsage {
                prompt_tokens: self.prompt_tokens,
                completion_tokens,
                total_tokens: self.prompt_tokens + completion_tokens,
            },
            provider_request_id: format!("mock-req-{}", uuid::Uuid::new_v4()),
            provider_fingerprint: Some("fp_mock".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emocast_core::types::ResponseFormat;

    fn request(content: &str) -> CompletionRequest {
        CompletionRequest {
            system_prompt: "sys".into(),
            user_content: content.into(),
            model: "mock".into(),
            temperature: 0.0,
            response_format: ResponseFormat::JsonObject,
        }
    }

    #[tokio::test]
    async fn queue_then_default() {
        let gateway = MockGateway::with_responses(vec!["first".into()]).with_default_response("fallback");
        assert_eq!(gateway.complete(request("a")).await.unwrap().text, "first");
        assert_eq!(gateway.complete(request("b")).await.unwrap().text, "fallback");
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn needle_fails_without_consuming_queue() {
        let gateway = MockGateway::with_responses(vec!["kept".into()]).failing_on("poison");
        assert!(gateway.complete(request("poison pill")).await.is_err());
        assert_eq!(gateway.complete(request("fine")).await.unwrap().text, "kept");
        assert_eq!(gateway.requests().await.len(), 2);
    }
}
