// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for an OpenAI-compatible Chat Completions API.
//!
//! A single [`reqwest::Client`] is built once and shared by every stage so
//! pooled connections are reused. Calls are never retried.

use std::time::Duration;

use emocast_config::model::ProviderConfig;
use emocast_core::EmocastError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::debug;

use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse};

/// Pooled HTTP client bound to one API base URL and key.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OpenAiClient {
    /// Builds the shared client from provider settings and a resolved API key.
    pub fn new(config: &ProviderConfig, api_key: &str) -> Result<Self, EmocastError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| EmocastError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .pool_max_idle_per_host(config.pool_max_idle)
            .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
            .build()
            .map_err(|e| EmocastError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: chat_endpoint(&config.base_url),
        })
    }

    /// The fully resolved `chat/completions` URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one chat completion request.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, EmocastError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| upstream(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        debug!(status = %status, model = %request.model, "completion response received");

        let body = response
            .text()
            .await
            .map_err(|e| upstream(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "provider error ({}): {}",
                    api_err
                        .error
                        .code
                        .or(api_err.error.type_)
                        .unwrap_or_else(|| status.to_string()),
                    api_err.error.message
                ),
                Err(_) => format!("provider returned {status}: {body}"),
            };
            return Err(upstream(message));
        }

        serde_json::from_str(&body).map_err(|e| upstream(format!("failed to parse response: {e}")))
    }
}

fn upstream(message: String) -> EmocastError {
    EmocastError::UpstreamCallFailed { message }
}

fn chat_endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}
