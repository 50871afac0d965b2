// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared dependencies handed to every stage service.

use std::sync::Arc;

use emocast_config::EmocastConfig;
use emocast_config::model::PromptConfig;
use emocast_core::types::{Completion, CompletionRequest, ResponseFormat};
use emocast_core::{EmocastError, Ledger, LlmGateway};

use crate::run::StageRun;

/// Gateway, ledger, prompts, and tuning shared by all stages.
///
/// Built once at startup and shared behind an `Arc`.
pub struct StageContext {
    pub gateway: Arc<dyn LlmGateway>,
    pub ledger: Arc<dyn Ledger>,
    pub prompts: PromptConfig,
    pub model: String,
    pub temperature: f32,
    pub prompt_token_baseline: u32,
    pub batch_concurrency: usize,
}

impl StageContext {
    pub fn from_config(
        config: &EmocastConfig,
        gateway: Arc<dyn LlmGateway>,
        ledger: Arc<dyn Ledger>,
    ) -> Self {
        Self {
            gateway,
            ledger,
            prompts: config.prompts.clone(),
            model: config.provider.model.clone(),
            temperature: config.provider.temperature,
            prompt_token_baseline: config.pipeline.prompt_token_baseline,
            batch_concurrency: config.pipeline.batch_concurrency,
        }
    }

    /// Builds the request and sends it, moving `run` through
    /// `Prompted -> Completed` or `Failed`.
    pub(crate) async fn complete(
        &self,
        run: &mut StageRun,
        system_prompt: &str,
        user_content: String,
    ) -> Result<Completion, EmocastError> {
        let request = CompletionRequest {
            system_prompt: system_prompt.to_string(),
            user_content,
            model: self.model.clone(),
            temperature: self.temperature,
            response_format: ResponseFormat::JsonObject,
        };
        run.prompted();

        match self.gateway.complete(request).await {
            Ok(completion) => {
                run.completed(&completion.usage);
                Ok(completion)
            }
            Err(e) => Err(run.fail(e)),
        }
    }
}
