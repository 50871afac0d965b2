// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for a sibling service's emotion endpoint.
//!
//! Lets the keyphrase stage run in one process while emotion estimation
//! runs in another, over the same `/compute/emotion/unique` contract.

use std::time::Duration;

use async_trait::async_trait;
use emocast_core::EmocastError;
use emocast_pipeline::{EmotionSetView, EmotionSource, endpoints};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::handlers::USER_ID_HEADER;

#[derive(Serialize)]
struct UniqueRequest<'a> {
    messages: &'a [String],
}

/// The `{message, endpoint}` error body a sibling service returns.
#[derive(Deserialize)]
struct RemoteError {
    message: String,
}

#[derive(Debug, Clone)]
pub struct RemoteEmotionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteEmotionClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, EmocastError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(|e| EmocastError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: format!(
                "{}{}",
                base_url.trim_end_matches('/'),
                endpoints::COMPUTE_EMOTION_UNIQUE
            ),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EmotionSource for RemoteEmotionClient {
    async fn estimate_unique(
        &self,
        messages: &[String],
        user_id: &str,
    ) -> Result<EmotionSetView, EmocastError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(USER_ID_HEADER, user_id)
            .json(&UniqueRequest { messages })
            .send()
            .await
            .map_err(|e| upstream(format!("emotion service unreachable: {e}")))?;

        let status = response.status();
        debug!(status = %status, endpoint = %self.endpoint, "emotion service responded");

        let body = response
            .text()
            .await
            .map_err(|e| upstream(format!("failed to read emotion service body: {e}")))?;

        if status.is_success() {
            return serde_json::from_str(&body)
                .map_err(|e| upstream(format!("unexpected emotion service body: {e}")));
        }

        let message = serde_json::from_str::<RemoteError>(&body)
            .map(|err| err.message)
            .unwrap_or_else(|_| format!("emotion service returned {status}"));
        Err(match status {
            StatusCode::BAD_REQUEST => EmocastError::validation("messages", message),
            _ => upstream(message),
        })
    }
}

fn upstream(message: String) -> EmocastError {
    EmocastError::UpstreamCallFailed { message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> RemoteEmotionClient {
        RemoteEmotionClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn posts_messages_with_user_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/compute/emotion/unique"))
            .and(header("x-user-id", "user-7"))
            .and(body_json(serde_json::json!({"messages": ["a", "b"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "e-42",
                "messages": ["a", "b"],
                "emotions": {"hope": 0.6}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let view = client(&server)
            .estimate_unique(&["a".to_string(), "b".to_string()], "user-7")
            .await
            .unwrap();
        assert_eq!(view.id, "e-42");
        assert_eq!(view.emotions.get("hope"), Some(&0.6));
    }

    #[tokio::test]
    async fn bad_request_stays_a_validation_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "message": "invalid messages: first message must not be blank",
                "endpoint": "/compute/emotion/unique"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .estimate_unique(&[String::new()], "u")
            .await
            .unwrap_err();
        assert!(matches!(err, EmocastError::ValidationFailed { .. }));
    }

    #[tokio::test]
    async fn server_error_is_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let err = client(&server)
            .estimate_unique(&["x".to_string()], "u")
            .await
            .unwrap_err();
        assert!(matches!(err, EmocastError::UpstreamCallFailed { .. }));
    }

    #[tokio::test]
    async fn trailing_slash_in_base_url_is_ignored() {
        let client = RemoteEmotionClient::new("http://emotion:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint(), "http://emotion:8080/compute/emotion/unique");
    }
}
