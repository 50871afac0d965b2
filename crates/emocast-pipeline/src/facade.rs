// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The caller-facing API.
//!
//! Every operation is tagged with its logical endpoint path and returns
//! [`CallerError`] on failure, never the internal error type.

use std::sync::Arc;

use emocast_core::{CallerError, EmocastError, HealthStatus, PluginAdapter};
use serde::Serialize;

use crate::context::StageContext;
use crate::stages::{CampaignService, CleanService, EmotionService, EmotionSource, KeyphraseService};
use crate::views::{
    CampaignView, CleanBatchView, EmotionBatchView, EmotionSetView, EmotionView, KeyphraseView,
};

/// Logical endpoint paths attached to caller-facing errors.
pub mod endpoints {
    pub const COMPUTE_CLEAN: &str = "/compute/clean";
    pub const COMPUTE_EMOTION: &str = "/compute/emotion";
    pub const COMPUTE_EMOTION_BATCH: &str = "/compute/emotion/batch";
    pub const COMPUTE_EMOTION_UNIQUE: &str = "/compute/emotion/unique";
    pub const COMPUTE_KEYPHRASE: &str = "/compute/keyphrase";
    pub const COMPUTE_CAMPAIGN: &str = "/compute/campaign";

    pub fn clean_batch(id: &str) -> String {
        format!("/clean/batch/{id}")
    }

    pub fn emotion(id: &str) -> String {
        format!("/emotion/{id}")
    }

    pub fn emotion_batch(id: &str) -> String {
        format!("/emotion/batch/{id}")
    }

    pub fn keyphrase(id: &str) -> String {
        format!("/keyphrase/{id}")
    }

    pub fn campaign(id: &str) -> String {
        format!("/campaign/{id}")
    }
}

/// Adapter health as reported by `/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub gateway: String,
    pub ledger: String,
}

/// All four stages wired to one shared context.
pub struct Pipeline {
    ctx: Arc<StageContext>,
    clean: CleanService,
    emotion: Arc<EmotionService>,
    keyphrase: KeyphraseService,
    campaign: CampaignService,
}

impl Pipeline {
    /// Builds the pipeline with keyphrase calling the emotion stage in-process.
    pub fn new(ctx: StageContext) -> Self {
        let ctx = Arc::new(ctx);
        let emotion = Arc::new(EmotionService::new(Arc::clone(&ctx)));
        let source: Arc<dyn EmotionSource> = Arc::clone(&emotion) as Arc<dyn EmotionSource>;
        Self {
            clean: CleanService::new(Arc::clone(&ctx)),
            keyphrase: KeyphraseService::new(Arc::clone(&ctx), source),
            campaign: CampaignService::new(Arc::clone(&ctx)),
            emotion,
            ctx,
        }
    }

    /// Routes the keyphrase stage's emotion lookups through `source`.
    pub fn with_emotion_source(mut self, source: Arc<dyn EmotionSource>) -> Self {
        self.keyphrase = KeyphraseService::new(Arc::clone(&self.ctx), source);
        self
    }

    pub fn context(&self) -> &StageContext {
        &self.ctx
    }

    pub async fn compute_clean(
        &self,
        messages: Vec<String>,
        user_id: &str,
    ) -> Result<CleanBatchView, CallerError> {
        self.clean
            .compute_batch(messages, user_id)
            .await
            .map_err(|e| e.at(endpoints::COMPUTE_CLEAN))
    }

    pub async fn get_clean_batch_by_id(&self, batch_id: &str) -> Result<CleanBatchView, CallerError> {
        self.clean
            .get_batch_by_id(batch_id)
            .await
            .map_err(|e| e.at(&endpoints::clean_batch(batch_id)))
    }

    pub async fn compute_emotion(&self, message: &str, user_id: &str) -> Result<EmotionView, CallerError> {
        self.emotion
            .compute(message, user_id)
            .await
            .map_err(|e| e.at(endpoints::COMPUTE_EMOTION))
    }

    pub async fn compute_emotion_batch(
        &self,
        messages: Vec<String>,
        user_id: &str,
    ) -> Result<EmotionBatchView, CallerError> {
        self.emotion
            .compute_batch(messages, user_id)
            .await
            .map_err(|e| e.at(endpoints::COMPUTE_EMOTION_BATCH))
    }

    pub async fn compute_emotion_unique(
        &self,
        messages: Vec<String>,
        user_id: &str,
    ) -> Result<EmotionSetView, CallerError> {
        self.emotion
            .compute_unique(messages, user_id)
            .await
            .map_err(|e| e.at(endpoints::COMPUTE_EMOTION_UNIQUE))
    }

    pub async fn get_emotion_by_id(&self, id: &str) -> Result<EmotionView, CallerError> {
        self.emotion
            .get_by_id(id)
            .await
            .map_err(|e| e.at(&endpoints::emotion(id)))
    }

    pub async fn get_emotion_batch_by_id(&self, batch_id: &str) -> Result<EmotionBatchView, CallerError> {
        self.emotion
            .get_batch_by_id(batch_id)
            .await
            .map_err(|e| e.at(&endpoints::emotion_batch(batch_id)))
    }

    pub async fn compute_keyphrase(
        &self,
        messages: Vec<String>,
        emotion: &str,
        user_id: &str,
    ) -> Result<KeyphraseView, CallerError> {
        self.keyphrase
            .compute(messages, emotion, user_id)
            .await
            .map_err(|e| e.at(endpoints::COMPUTE_KEYPHRASE))
    }

    pub async fn get_keyphrase_by_id(&self, id: &str) -> Result<KeyphraseView, CallerError> {
        self.keyphrase
            .get_by_id(id)
            .await
            .map_err(|e| e.at(&endpoints::keyphrase(id)))
    }

    pub async fn compute_campaign(
        &self,
        keyphrase_id: &str,
        brand_id: &str,
        emotions_id: &str,
        user_id: &str,
    ) -> Result<CampaignView, CallerError> {
        self.campaign
            .compute(keyphrase_id, brand_id, emotions_id, user_id)
            .await
            .map_err(|e| e.at(endpoints::COMPUTE_CAMPAIGN))
    }

    pub async fn get_campaign_by_id(&self, id: &str) -> Result<CampaignView, CallerError> {
        self.campaign
            .get_by_id(id)
            .await
            .map_err(|e| e.at(&endpoints::campaign(id)))
    }

    /// Checks both adapters. Degraded adapters still count as up.
    pub async fn health(&self) -> HealthReport {
        let gateway = describe(self.ctx.gateway.health_check().await);
        let ledger = describe(self.ctx.ledger.health_check().await);
        let status = if gateway.0 && ledger.0 { "ok" } else { "unavailable" };
        HealthReport {
            status,
            gateway: gateway.1,
            ledger: ledger.1,
        }
    }

    /// Shuts down both adapters, gateway first.
    pub async fn shutdown(&self) -> Result<(), EmocastError> {
        self.ctx.gateway.shutdown().await?;
        self.ctx.ledger.shutdown().await
    }
}

fn describe(result: Result<HealthStatus, EmocastError>) -> (bool, String) {
    match result {
        Ok(HealthStatus::Healthy) => (true, "healthy".to_string()),
        Ok(HealthStatus::Degraded(reason)) => (true, format!("degraded: {reason}")),
        Ok(HealthStatus::Unhealthy(reason)) => (false, format!("unhealthy: {reason}")),
        Err(e) => (false, format!("unhealthy: {e}")),
    }
}
