// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message cleaning: one gateway call per message, result list decoded on write.

use std::sync::Arc;

use emocast_core::EmocastError;
use emocast_core::types::CleanRecord;
use tracing::{info, warn};

use crate::batch::BatchCoordinator;
use crate::codec::{ResultListCodec, StageResultCodec};
use crate::context::StageContext;
use crate::prompts::messages_payload;
use crate::run::{Stage, StageRun, new_id, now_timestamp};
use crate::validation::{require_id, require_non_empty_first};
use crate::views::{CleanBatchView, CleanView};

pub struct CleanService {
    ctx: Arc<StageContext>,
    batches: BatchCoordinator,
}

impl CleanService {
    pub fn new(ctx: Arc<StageContext>) -> Self {
        let batches = BatchCoordinator::new(ctx.batch_concurrency);
        Self { ctx, batches }
    }

    pub async fn compute_batch(
        &self,
        messages: Vec<String>,
        user_id: &str,
    ) -> Result<CleanBatchView, EmocastError> {
        require_non_empty_first("messages", &messages)?;
        let batch_id = new_id();

        let outcome = self
            .batches
            .run(&batch_id, messages, |_, message| {
                clean_one(
                    Arc::clone(&self.ctx),
                    message,
                    batch_id.clone(),
                    user_id.to_string(),
                )
            })
            .await;

        info!(
            %batch_id,
            attempted = outcome.attempted,
            failed = outcome.failed(),
            "clean batch finished"
        );
        if outcome.succeeded.is_empty() {
            return Err(EmocastError::compute(format!(
                "none of the {} messages could be cleaned",
                outcome.attempted
            )));
        }

        Ok(CleanBatchView {
            batch_id,
            results: outcome.succeeded,
        })
    }

    pub async fn get_batch_by_id(&self, batch_id: &str) -> Result<CleanBatchView, EmocastError> {
        require_id("batchId", batch_id)?;
        let records = self.ctx.ledger.list_cleans_by_batch(batch_id).await?;
        if records.is_empty() {
            return Err(EmocastError::not_found("clean batch", batch_id));
        }
        Ok(CleanBatchView {
            batch_id: batch_id.to_string(),
            results: records.iter().map(CleanView::from).collect(),
        })
    }
}

async fn clean_one(
    ctx: Arc<StageContext>,
    message: String,
    batch_id: String,
    user_id: String,
) -> Result<CleanView, EmocastError> {
    let mut run = StageRun::validated(Stage::Clean);
    let completion = ctx
        .complete(
            &mut run,
            &ctx.prompts.clean,
            messages_payload(std::slice::from_ref(&message)),
        )
        .await?;

    let decoded = ResultListCodec::decode(&completion.text);
    if decoded.is_malformed() {
        warn!(stage = %Stage::Clean, "malformed completion, storing an empty result");
    }

    let record = CleanRecord {
        id: new_id(),
        batch_id: Some(batch_id),
        user_id,
        message,
        cleaned: decoded.or_empty(),
        usage: completion.usage,
        duration_ms: run.duration_ms(),
        active: true,
        created_at: now_timestamp(),
        provider_request_id: completion.provider_request_id,
        provider_fingerprint: completion.provider_fingerprint,
    };
    run.persisted(&record.id, ctx.ledger.save_clean(&record).await);
    run.mapped(&record.id);
    Ok(CleanView::from(&record))
}
