// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, and every field has a default.

use serde::{Deserialize, Serialize};

/// Top-level Emocast configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmocastConfig {
    /// Process identity, logging, and HTTP binding.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Completion provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// System instructions, one per stage.
    #[serde(default)]
    pub prompts: PromptConfig,

    /// Ledger database settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Stage orchestration settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Service identity and HTTP binding.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name used in logs and the health endpoint.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Address to bind the HTTP server to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port to bind the HTTP server to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// User id recorded when a request carries no `X-User-Id` header.
    #[serde(default = "default_user")]
    pub default_user: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
            bind_address: default_bind_address(),
            port: default_port(),
            default_user: default_user(),
        }
    }
}

fn default_service_name() -> String {
    "emocast".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_user() -> String {
    "anonymous".to_string()
}

/// Completion provider configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// API key. `None` falls back to the `OPENAI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used by every stage.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Connect and read timeout, applied independently.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Idle connections kept in the shared pool.
    #[serde(default = "default_pool_max_idle")]
    pub pool_max_idle: usize,

    /// How long an idle pooled connection is kept alive.
    #[serde(default = "default_pool_idle_timeout_secs")]
    pub pool_idle_timeout_secs: u64,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("pool_max_idle", &self.pool_max_idle)
            .field("pool_idle_timeout_secs", &self.pool_idle_timeout_secs)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            pool_max_idle: default_pool_max_idle(),
            pool_idle_timeout_secs: default_pool_idle_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1/".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_pool_max_idle() -> usize {
    5
}

fn default_pool_idle_timeout_secs() -> u64 {
    60
}

/// Stage system instructions. The pipeline treats them as opaque strings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PromptConfig {
    #[serde(default = "default_clean_prompt")]
    pub clean: String,

    #[serde(default = "default_emotion_prompt")]
    pub emotion: String,

    #[serde(default = "default_emotion_unique_prompt")]
    pub emotion_unique: String,

    #[serde(default = "default_keyphrase_prompt")]
    pub keyphrase: String,

    #[serde(default = "default_campaign_prompt")]
    pub campaign: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            clean: default_clean_prompt(),
            emotion: default_emotion_prompt(),
            emotion_unique: default_emotion_unique_prompt(),
            keyphrase: default_keyphrase_prompt(),
            campaign: default_campaign_prompt(),
        }
    }
}

fn default_clean_prompt() -> String {
    "You receive a JSON object with a `messages` array holding one customer message. \
     Remove greetings, signatures, personal data and noise, and split what remains into \
     short self-contained sentences. Answer with a JSON object of the form \
     {\"result\": [\"sentence\", ...]} and nothing else."
        .to_string()
}

fn default_emotion_prompt() -> String {
    "You receive a JSON object with a `messages` array holding one message. Estimate how \
     strongly the message expresses each of these emotions: happiness, sadness, anger, \
     fear, surprise, disgust, trust, joy, love, worry, guilt, shame, aversion, hope, pride, \
     motivation, satisfaction, frustration. Answer with a flat JSON object mapping every \
     emotion name to a score between 0 and 1 with three decimals, and nothing else."
        .to_string()
}

fn default_emotion_unique_prompt() -> String {
    "You receive a JSON object with a `messages` array. Treat all messages as one voice and \
     estimate how strongly they express each of these emotions: happiness, sadness, anger, \
     fear, surprise, disgust, trust, joy, love, worry, guilt, shame, aversion, hope, pride, \
     motivation, satisfaction, frustration. Answer with a flat JSON object mapping every \
     emotion name to a score between 0 and 1 with three decimals, and nothing else."
        .to_string()
}

fn default_keyphrase_prompt() -> String {
    "You receive a JSON object with an `emotion`, a `messages` array, and the `emotions` \
     profile estimated for those messages. Extract the short keyphrases that best explain \
     why the messages convey that emotion. Answer with a JSON object of the form \
     {\"result\": [\"keyphrase\", ...]} and nothing else."
        .to_string()
}

fn default_campaign_prompt() -> String {
    "You receive a JSON object describing a `brand`, a `keyphrase`, and an `emotions` \
     profile. Draft a marketing campaign for the brand built around the keyphrase and \
     tuned to the profile. Answer with a JSON object of the form {\"name\": string, \
     \"description\": string, \"pillars\": [{\"name\": string, \"applications\": [string]}]} \
     and nothing else."
        .to_string()
}

/// Ledger database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("emocast").join("emocast.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("emocast.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Stage orchestration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Upper bound on concurrent per-message tasks in a batch.
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,

    /// Prompt tokens consumed by the fixed instruction, subtracted from
    /// the prompt token count to produce an estimate's token delta.
    #[serde(default = "default_prompt_token_baseline")]
    pub prompt_token_baseline: u32,

    /// When set, the keyphrase stage reaches the emotion stage of a sibling
    /// service at this base URL instead of calling it in-process.
    #[serde(default)]
    pub emotion_service_url: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_concurrency: default_batch_concurrency(),
            prompt_token_baseline: default_prompt_token_baseline(),
            emotion_service_url: None,
        }
    }
}

fn default_batch_concurrency() -> usize {
    16
}

fn default_prompt_token_baseline() -> u32 {
    384
}
