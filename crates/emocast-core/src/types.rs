// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the adapter traits, the ledger, and the stage services.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Gateway,
    Ledger,
}

/// The fixed emotion vocabulary a keyphrase request may be conditioned on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happiness,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Disgust,
    Trust,
    Joy,
    Love,
    Worry,
    Guilt,
    Shame,
    Aversion,
    Hope,
    Pride,
    Motivation,
    Satisfaction,
    Frustration,
}

impl Emotion {
    /// All eighteen emotion names in declaration order.
    pub fn vocabulary() -> Vec<String> {
        Self::iter().map(|e| e.to_string()).collect()
    }
}

/// Emotion name to score in `[0.0, 1.0]`.
///
/// Keys are whatever the model emitted; an empty profile is the
/// "failed estimation" sentinel.
pub type EmotionProfile = BTreeMap<String, f64>;

/// Token accounting reported by the completion provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Prompt tokens above the fixed instruction baseline. May be negative.
    pub fn delta(&self, baseline: u32) -> i64 {
        i64::from(self.prompt_tokens) - i64::from(baseline)
    }
}

/// Output format requested from the completion provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    #[default]
    JsonObject,
    Text,
}

/// A single completion request: one system instruction plus one user payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_content: String,
    pub model: String,
    pub temperature: f32,
    pub response_format: ResponseFormat,
}

/// A successful completion with its usage and provider metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: TokenUsage,
    pub provider_request_id: String,
    pub provider_fingerprint: Option<String>,
}

// --- Ledger records ---

/// One emotion estimation. The profile is derived from `raw_output` on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionEstimateRecord {
    pub id: String,
    pub batch_id: Option<String>,
    pub user_id: String,
    /// One element for single and batch estimates, the whole set for unique ones.
    pub messages: Vec<String>,
    pub raw_output: String,
    pub token_delta: i64,
    pub usage: TokenUsage,
    pub duration_ms: u64,
    pub active: bool,
    pub created_at: String,
    pub provider_request_id: String,
    pub provider_fingerprint: Option<String>,
}

/// Groups the estimates created from one multi-message request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub id: String,
    /// Messages attempted, not messages that succeeded.
    pub message_count: u32,
    pub user_id: String,
    pub duration_ms: u64,
    pub created_at: String,
}

/// One cleaned message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanRecord {
    pub id: String,
    pub batch_id: Option<String>,
    pub user_id: String,
    pub message: String,
    pub cleaned: Vec<String>,
    pub usage: TokenUsage,
    pub duration_ms: u64,
    pub active: bool,
    pub created_at: String,
    pub provider_request_id: String,
    pub provider_fingerprint: Option<String>,
}

/// A single extracted keyphrase with its own identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyphraseItem {
    pub id: String,
    pub keyphrase: String,
}

/// Keyphrases extracted for a message set under one dominant emotion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyphraseRecord {
    pub id: String,
    /// Weak reference to the estimate the profile came from.
    pub emotion_estimate_id: String,
    pub user_id: String,
    pub emotion: Emotion,
    pub messages: Vec<String>,
    pub keyphrases: Vec<KeyphraseItem>,
    /// The profile as JSON text, frozen at compute time.
    pub emotion_profile_snapshot: String,
    pub usage: TokenUsage,
    pub duration_ms: u64,
    pub active: bool,
    pub created_at: String,
    pub provider_request_id: String,
    pub provider_fingerprint: Option<String>,
}

/// A campaign pillar and the application ideas under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignPillar {
    pub name: String,
    #[serde(default)]
    pub applications: Vec<String>,
}

/// A composed campaign draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub pillars: Vec<CampaignPillar>,
    pub keyphrase_id: String,
    pub keyphrase: String,
    pub emotions_id: String,
    pub user_id: String,
    pub brand_id: String,
    pub usage: TokenUsage,
    pub duration_ms: u64,
    pub active: bool,
    pub created_at: String,
    pub provider_request_id: String,
    pub provider_fingerprint: Option<String>,
}

/// Brand owned by an external collaborator; read, never mutated, by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub description: String,
    pub competitor_urls: Vec<String>,
    pub owner_user_id: String,
    pub active: bool,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn vocabulary_has_eighteen_emotions() {
        let vocab = Emotion::vocabulary();
        assert_eq!(vocab.len(), 18);
        assert_eq!(vocab[0], "happiness");
        assert_eq!(vocab[17], "frustration");
    }

    #[test]
    fn emotion_parses_case_insensitively() {
        assert_eq!(Emotion::from_str("Joy").unwrap(), Emotion::Joy);
        assert_eq!(Emotion::from_str("FRUSTRATION").unwrap(), Emotion::Frustration);
        assert!(Emotion::from_str("felicidad").is_err());
    }

    #[test]
    fn emotion_serde_matches_display() {
        let json = serde_json::to_string(&Emotion::Motivation).unwrap();
        assert_eq!(json, "\"motivation\"");
        let back: Emotion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Emotion::Motivation);
    }

    #[test]
    fn token_delta_subtracts_baseline() {
        let usage = TokenUsage {
            prompt_tokens: 400,
            completion_tokens: 50,
            total_tokens: 450,
        };
        assert_eq!(usage.delta(384), 16);
        assert_eq!(usage.delta(500), -100);
    }

    #[test]
    fn adapter_type_round_trips_through_display() {
        for variant in [AdapterType::Gateway, AdapterType::Ledger] {
            let parsed = AdapterType::from_str(&variant.to_string()).unwrap();
            assert_eq!(parsed, variant);
        }
    }
}
