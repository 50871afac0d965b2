// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible completion gateway for the Emocast pipeline.
//!
//! Implements [`LlmGateway`] over the Chat Completions API: one system
//! message, one user message, JSON-object output, no retries.

pub mod client;
pub mod types;

use async_trait::async_trait;
use emocast_config::model::ProviderConfig;
use emocast_core::error::EmocastError;
use emocast_core::traits::{LlmGateway, PluginAdapter};
use emocast_core::types::{
    AdapterType, Completion, CompletionRequest, HealthStatus, ResponseFormat, TokenUsage,
};
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{ChatMessage, ChatRequest, ChatResponse, ResponseFormatSpec};

/// OpenAI gateway implementing [`LlmGateway`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiGateway {
    client: OpenAiClient,
}

impl OpenAiGateway {
    /// Creates a gateway from provider settings.
    pub fn new(config: &ProviderConfig) -> Result<Self, EmocastError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = OpenAiClient::new(config, &api_key)?;

        info!(
            model = %config.model,
            endpoint = client.endpoint(),
            "completion gateway initialized"
        );

        Ok(Self { client })
    }

    fn to_chat_request(request: CompletionRequest) -> ChatRequest {
        ChatRequest {
            model: request.model,
            temperature: request.temperature,
            messages: vec![
                ChatMessage::system(request.system_prompt),
                ChatMessage::user(request.user_content),
            ],
            response_format: match request.response_format {
                ResponseFormat::JsonObject => Some(ResponseFormatSpec::json_object()),
                ResponseFormat::Text => None,
            },
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiGateway {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Gateway
    }

    async fn health_check(&self) -> Result<HealthStatus, EmocastError> {
        // No probe call: health checks must not spend tokens.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EmocastError> {
        debug!("completion gateway shutting down");
        Ok(())
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, EmocastError> {
        let chat = Self::to_chat_request(request);
        let response = self.client.chat(&chat).await?;
        into_completion(response)
    }
}

/// Maps a wire response onto a [`Completion`]; an absent or empty first
/// choice counts as an upstream failure.
fn into_completion(response: ChatResponse) -> Result<Completion, EmocastError> {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| EmocastError::UpstreamCallFailed {
            message: format!("completion `{}` returned no content", response.id),
        })?;

    let usage = response.usage.unwrap_or_default();

    Ok(Completion {
        text,
        usage: TokenUsage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        },
        provider_request_id: response.id,
        provider_fingerprint: response.system_fingerprint,
    })
}

/// Resolves the API key from config or the `OPENAI_API_KEY` environment variable.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, EmocastError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            EmocastError::Config(
                "OpenAI API key not found. Set provider.api_key in config or the OPENAI_API_KEY environment variable.".into(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway_for(server: &MockServer) -> OpenAiGateway {
        let config = ProviderConfig {
            api_key: Some("sk-test".into()),
            base_url: format!("{}/v1", server.uri()),
            ..ProviderConfig::default()
        };
        OpenAiGateway::new(&config).unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            system_prompt: "rate the emotions".into(),
            user_content: r#"{"messages":["I'm so happy today"]}"#.into(),
            model: "gpt-4o-mini".into(),
            temperature: 0.2,
            response_format: ResponseFormat::JsonObject,
        }
    }

    #[test]
    fn config_key_wins() {
        let key = resolve_api_key(&Some("sk-config".into())).unwrap();
        assert_eq!(key, "sk-config");
    }

    #[test]
    fn chat_request_has_system_then_user() {
        let chat = OpenAiGateway::to_chat_request(request());
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[0].role, "system");
        assert_eq!(chat.messages[1].role, "user");
        assert!(chat.response_format.is_some());
    }

    #[tokio::test]
    async fn complete_maps_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "messages": [{"role": "system", "content": "rate the emotions"}, {"role": "user"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-42",
                "system_fingerprint": "fp_abc",
                "choices": [{"message": {"role": "assistant", "content": "{\"joy\":0.91}"}}],
                "usage": {"prompt_tokens": 402, "completion_tokens": 12, "total_tokens": 414}
            })))
            .mount(&server)
            .await;

        let completion = gateway_for(&server).complete(request()).await.unwrap();
        assert_eq!(completion.text, "{\"joy\":0.91}");
        assert_eq!(completion.provider_request_id, "chatcmpl-42");
        assert_eq!(completion.provider_fingerprint.as_deref(), Some("fp_abc"));
        assert_eq!(completion.usage.prompt_tokens, 402);
        assert_eq!(completion.usage.total_tokens, 414);
    }

    #[tokio::test]
    async fn empty_content_is_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-empty",
                "choices": [{"message": {"role": "assistant", "content": "  "}}]
            })))
            .mount(&server)
            .await;

        let err = gateway_for(&server).complete(request()).await.unwrap_err();
        assert!(matches!(err, EmocastError::UpstreamCallFailed { .. }));
    }

    #[tokio::test]
    async fn no_choices_is_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-none",
                "choices": []
            })))
            .mount(&server)
            .await;

        let err = gateway_for(&server).complete(request()).await.unwrap_err();
        assert!(matches!(err, EmocastError::UpstreamCallFailed { .. }));
    }

    #[tokio::test]
    async fn adapter_identity() {
        let server = MockServer::start().await;
        let gateway = gateway_for(&server);
        assert_eq!(gateway.name(), "openai");
        assert_eq!(gateway.adapter_type(), AdapterType::Gateway);
        assert_eq!(gateway.health_check().await.unwrap(), HealthStatus::Healthy);
    }
}
