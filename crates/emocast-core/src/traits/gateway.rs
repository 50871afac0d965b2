// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The LLM gateway: submit a prompt, receive text plus usage metadata.

use async_trait::async_trait;

use crate::error::EmocastError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Completion, CompletionRequest};

/// Adapter for the external text-completion provider.
///
/// One call per invocation, no internal retry. Every failure mode (transport,
/// non-2xx, empty body) surfaces as [`EmocastError::UpstreamCallFailed`].
#[async_trait]
pub trait LlmGateway: PluginAdapter {
    /// Sends a completion request and returns the generated text.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, EmocastError>;
}
