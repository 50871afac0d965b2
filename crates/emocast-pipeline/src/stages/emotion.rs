// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Emotion estimation: single message, batch, and unique (whole-set) variants.
//!
//! The model's raw text is persisted as-is and decoded into a profile on
//! every read.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use emocast_core::EmocastError;
use emocast_core::types::{BatchRecord, EmotionEstimateRecord};
use tracing::{info, warn};

use crate::batch::BatchCoordinator;
use crate::context::StageContext;
use crate::prompts::messages_payload;
use crate::run::{Stage, StageRun, new_id, now_timestamp};
use crate::validation::{require_id, require_non_blank, require_non_empty_first};
use crate::views::{EmotionBatchItem, EmotionBatchView, EmotionSetView, EmotionView};

/// Anything that can estimate one profile for a message set.
///
/// Implemented by [`EmotionService`] for in-process calls and by the
/// gateway's remote client when emotion runs in a sibling service.
#[async_trait]
pub trait EmotionSource: Send + Sync {
    async fn estimate_unique(
        &self,
        messages: &[String],
        user_id: &str,
    ) -> Result<EmotionSetView, EmocastError>;
}

/// Which instruction an estimation runs with.
#[derive(Clone, Copy)]
enum Variant {
    PerMessage,
    Unique,
}

pub struct EmotionService {
    ctx: Arc<StageContext>,
    batches: BatchCoordinator,
}

impl EmotionService {
    pub fn new(ctx: Arc<StageContext>) -> Self {
        let batches = BatchCoordinator::new(ctx.batch_concurrency);
        Self { ctx, batches }
    }

    pub async fn compute(&self, message: &str, user_id: &str) -> Result<EmotionView, EmocastError> {
        require_non_blank("message", message)?;
        let record = estimate(
            Arc::clone(&self.ctx),
            Variant::PerMessage,
            vec![message.to_string()],
            None,
            user_id.to_string(),
        )
        .await?;
        Ok(EmotionView::from(&record))
    }

    /// Estimates every message independently and groups the records under
    /// one batch id. Fails only when no message produced a profile.
    pub async fn compute_batch(
        &self,
        messages: Vec<String>,
        user_id: &str,
    ) -> Result<EmotionBatchView, EmocastError> {
        require_non_empty_first("messages", &messages)?;
        let batch_id = new_id();
        let started = Instant::now();

        let outcome = self
            .batches
            .run(&batch_id, messages, |_, message| {
                estimate(
                    Arc::clone(&self.ctx),
                    Variant::PerMessage,
                    vec![message],
                    Some(batch_id.clone()),
                    user_id.to_string(),
                )
            })
            .await;

        let batch = BatchRecord {
            id: batch_id.clone(),
            message_count: u32::try_from(outcome.attempted).unwrap_or(u32::MAX),
            user_id: user_id.to_string(),
            duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            created_at: now_timestamp(),
        };
        if let Err(e) = self.ctx.ledger.save_batch(&batch).await {
            warn!(batch_id = %batch.id, error = %e, "batch record write failed");
        }

        info!(
            batch_id = %batch.id,
            attempted = outcome.attempted,
            failed = outcome.failed(),
            "emotion batch finished"
        );
        if outcome.succeeded.is_empty() {
            return Err(EmocastError::compute(format!(
                "none of the {} messages produced an emotion profile",
                outcome.attempted
            )));
        }

        Ok(EmotionBatchView {
            batch_id,
            results: outcome.succeeded.iter().map(EmotionBatchItem::from).collect(),
        })
    }

    /// One profile for the whole message set.
    pub async fn compute_unique(
        &self,
        messages: Vec<String>,
        user_id: &str,
    ) -> Result<EmotionSetView, EmocastError> {
        require_non_empty_first("messages", &messages)?;
        let record = estimate(
            Arc::clone(&self.ctx),
            Variant::Unique,
            messages,
            None,
            user_id.to_string(),
        )
        .await?;
        Ok(EmotionSetView::from(&record))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<EmotionView, EmocastError> {
        require_id("id", id)?;
        let record = self
            .ctx
            .ledger
            .get_emotion(id)
            .await?
            .ok_or_else(|| EmocastError::not_found("emotion", id))?;
        Ok(EmotionView::from(&record))
    }

    pub async fn get_batch_by_id(&self, batch_id: &str) -> Result<EmotionBatchView, EmocastError> {
        require_id("batchId", batch_id)?;
        let batch = self
            .ctx
            .ledger
            .get_batch(batch_id)
            .await?
            .ok_or_else(|| EmocastError::not_found("emotion batch", batch_id))?;
        let records = self.ctx.ledger.list_emotions_by_batch(&batch.id).await?;
        // Items whose profile decoded empty failed at compute time; their
        // audit rows stay in the ledger but are not batch results.
        let results = records
            .iter()
            .map(EmotionBatchItem::from)
            .filter(|item| !item.emotions.is_empty())
            .collect();
        Ok(EmotionBatchView {
            batch_id: batch.id,
            results,
        })
    }
}

#[async_trait]
impl EmotionSource for EmotionService {
    async fn estimate_unique(
        &self,
        messages: &[String],
        user_id: &str,
    ) -> Result<EmotionSetView, EmocastError> {
        self.compute_unique(messages.to_vec(), user_id).await
    }
}

/// Runs the full state machine for one estimation and returns the record.
///
/// Owns its inputs so batch items can run on spawned tasks. A record whose
/// raw output decodes to an empty profile is kept in the ledger, but the
/// call still fails.
async fn estimate(
    ctx: Arc<StageContext>,
    variant: Variant,
    messages: Vec<String>,
    batch_id: Option<String>,
    user_id: String,
) -> Result<EmotionEstimateRecord, EmocastError> {
    let mut run = StageRun::validated(Stage::Emotion);
    let instruction = match variant {
        Variant::PerMessage => &ctx.prompts.emotion,
        Variant::Unique => &ctx.prompts.emotion_unique,
    };
    let completion = ctx
        .complete(&mut run, instruction, messages_payload(&messages))
        .await?;

    let record = EmotionEstimateRecord {
        id: new_id(),
        batch_id,
        user_id,
        messages,
        token_delta: completion.usage.delta(ctx.prompt_token_baseline),
        raw_output: completion.text,
        usage: completion.usage,
        duration_ms: run.duration_ms(),
        active: true,
        created_at: now_timestamp(),
        provider_request_id: completion.provider_request_id,
        provider_fingerprint: completion.provider_fingerprint,
    };
    run.persisted(&record.id, ctx.ledger.save_emotion(&record).await);

    if EmotionView::from(&record).emotions.is_empty() {
        warn!(record_id = %record.id, "completion decoded to an empty emotion profile");
        return Err(run.fail(EmocastError::Malformed {
            stage: Stage::Emotion.to_string(),
        }));
    }
    run.mapped(&record.id);
    Ok(record)
}
