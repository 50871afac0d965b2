// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-content payloads sent alongside each stage's system instruction.
//!
//! Payloads are compact JSON so the model sees the same structure it is
//! asked to answer in.

use emocast_core::EmotionProfile;
use emocast_core::types::{Brand, Emotion};
use serde_json::json;

/// `{"messages": [...]}` for the clean and emotion stages.
pub fn messages_payload(messages: &[String]) -> String {
    json!({ "messages": messages }).to_string()
}

/// Emotion name, messages, and the profile estimated for them.
pub fn keyphrase_payload(emotion: Emotion, messages: &[String], profile: &EmotionProfile) -> String {
    json!({
        "emotion": emotion.to_string(),
        "messages": messages,
        "emotions": profile,
    })
    .to_string()
}

/// Brand description, the chosen keyphrase, and the emotion profile.
pub fn campaign_payload(brand: &Brand, keyphrase: &str, profile: &EmotionProfile) -> String {
    json!({
        "brand": {
            "name": brand.name,
            "description": brand.description,
            "competitors": brand.competitor_urls,
        },
        "keyphrase": keyphrase,
        "emotions": profile,
    })
    .to_string()
}
