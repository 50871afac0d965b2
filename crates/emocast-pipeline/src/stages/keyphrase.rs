// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyphrase extraction conditioned on one emotion.
//!
//! The phrase list is decoded once, before the record is written. A
//! malformed completion is stored as an empty list.

use std::str::FromStr;
use std::sync::Arc;

use emocast_core::types::{KeyphraseItem, KeyphraseRecord};
use emocast_core::{EmocastError, Emotion};
use tracing::warn;

use crate::codec::{ResultListCodec, StageResultCodec};
use crate::context::StageContext;
use crate::prompts::keyphrase_payload;
use crate::run::{Stage, StageRun, new_id, now_timestamp};
use crate::stages::emotion::EmotionSource;
use crate::validation::{require_id, require_non_blank, require_non_empty_first};
use crate::views::KeyphraseView;

pub struct KeyphraseService {
    ctx: Arc<StageContext>,
    emotions: Arc<dyn EmotionSource>,
}

impl KeyphraseService {
    pub fn new(ctx: Arc<StageContext>, emotions: Arc<dyn EmotionSource>) -> Self {
        Self { ctx, emotions }
    }

    pub async fn compute(
        &self,
        messages: Vec<String>,
        emotion: &str,
        user_id: &str,
    ) -> Result<KeyphraseView, EmocastError> {
        require_non_empty_first("messages", &messages)?;
        require_non_blank("emotion", emotion)?;
        let emotion = Emotion::from_str(emotion.trim()).map_err(|_| {
            EmocastError::validation(
                "emotion",
                format!("`{emotion}` is not one of: {}", Emotion::vocabulary().join(", ")),
            )
        })?;

        let mut run = StageRun::validated(Stage::Keyphrase);
        let estimate = match self.emotions.estimate_unique(&messages, user_id).await {
            Ok(estimate) => estimate,
            Err(e) => return Err(run.fail(e)),
        };

        let payload = keyphrase_payload(emotion, &estimate.messages, &estimate.emotions);
        let completion = self
            .ctx
            .complete(&mut run, &self.ctx.prompts.keyphrase, payload)
            .await?;

        let decoded = ResultListCodec::decode(&completion.text);
        if decoded.is_malformed() {
            warn!(stage = %Stage::Keyphrase, "malformed completion, storing no keyphrases");
        }
        let keyphrases = decoded
            .or_empty()
            .into_iter()
            .map(|keyphrase| KeyphraseItem {
                id: new_id(),
                keyphrase,
            })
            .collect();

        let snapshot = serde_json::to_string(&estimate.emotions)
            .map_err(|e| run.fail(EmocastError::Internal(format!("profile snapshot: {e}"))))?;

        let record = KeyphraseRecord {
            id: new_id(),
            emotion_estimate_id: estimate.id,
            user_id: user_id.to_string(),
            emotion,
            messages: estimate.messages,
            keyphrases,
            emotion_profile_snapshot: snapshot,
            usage: completion.usage,
            duration_ms: run.duration_ms(),
            active: true,
            created_at: now_timestamp(),
            provider_request_id: completion.provider_request_id,
            provider_fingerprint: completion.provider_fingerprint,
        };
        run.persisted(&record.id, self.ctx.ledger.save_keyphrase(&record).await);
        run.mapped(&record.id);
        Ok(KeyphraseView::from(&record))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<KeyphraseView, EmocastError> {
        require_id("id", id)?;
        let record = self
            .ctx
            .ledger
            .get_keyphrase(id)
            .await?
            .ok_or_else(|| EmocastError::not_found("keyphrase", id))?;
        Ok(KeyphraseView::from(&record))
    }
}
