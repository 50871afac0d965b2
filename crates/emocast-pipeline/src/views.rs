// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Caller-visible result shapes.

use emocast_core::EmotionProfile;
use emocast_core::types::{
    CampaignPillar, CampaignRecord, CleanRecord, EmotionEstimateRecord, KeyphraseItem,
    KeyphraseRecord,
};
use serde::{Deserialize, Serialize};

use crate::codec::{EmotionCodec, StageResultCodec};

/// Profile for a single message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionView {
    pub id: String,
    pub emotions: EmotionProfile,
}

/// One profile for a whole message set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionSetView {
    pub id: String,
    pub messages: Vec<String>,
    pub emotions: EmotionProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionBatchItem {
    pub id: String,
    pub message: String,
    pub emotions: EmotionProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionBatchView {
    pub batch_id: String,
    pub results: Vec<EmotionBatchItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyphraseView {
    pub id: String,
    pub emotion: String,
    pub messages: Vec<String>,
    pub emotions: EmotionProfile,
    pub keyphrases: Vec<KeyphraseItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub keyphrase: String,
    pub pillars: Vec<CampaignPillar>,
    /// Every application idea, in pillar order.
    pub results: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanView {
    pub id: String,
    pub message: String,
    pub cleaned: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanBatchView {
    pub batch_id: String,
    pub results: Vec<CleanView>,
}

// Emotion profiles are decoded from the stored raw text on every read.

impl From<&EmotionEstimateRecord> for EmotionView {
    fn from(record: &EmotionEstimateRecord) -> Self {
        Self {
            id: record.id.clone(),
            emotions: EmotionCodec::decode(&record.raw_output).or_empty(),
        }
    }
}

impl From<&EmotionEstimateRecord> for EmotionSetView {
    fn from(record: &EmotionEstimateRecord) -> Self {
        Self {
            id: record.id.clone(),
            messages: record.messages.clone(),
            emotions: EmotionCodec::decode(&record.raw_output).or_empty(),
        }
    }
}

impl From<&EmotionEstimateRecord> for EmotionBatchItem {
    fn from(record: &EmotionEstimateRecord) -> Self {
        Self {
            id: record.id.clone(),
            message: record.messages.first().cloned().unwrap_or_default(),
            emotions: EmotionCodec::decode(&record.raw_output).or_empty(),
        }
    }
}

impl From<&KeyphraseRecord> for KeyphraseView {
    fn from(record: &KeyphraseRecord) -> Self {
        // The snapshot was serialized by us, so a decode failure means an empty profile.
        let emotions = serde_json::from_str(&record.emotion_profile_snapshot).unwrap_or_default();
        Self {
            id: record.id.clone(),
            emotion: record.emotion.to_string(),
            messages: record.messages.clone(),
            emotions,
            keyphrases: record.keyphrases.clone(),
        }
    }
}

impl From<&CampaignRecord> for CampaignView {
    fn from(record: &CampaignRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            description: record.description.clone(),
            keyphrase: record.keyphrase.clone(),
            pillars: record.pillars.clone(),
            results: record
                .pillars
                .iter()
                .flat_map(|p| p.applications.iter().cloned())
                .collect(),
        }
    }
}

impl From<&CleanRecord> for CleanView {
    fn from(record: &CleanRecord) -> Self {
        Self {
            id: record.id.clone(),
            message: record.message.clone(),
            cleaned: record.cleaned.clone(),
        }
    }
}
