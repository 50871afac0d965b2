// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ledger trait: keyed persistence for every stage record.

use async_trait::async_trait;

use crate::error::EmocastError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    BatchRecord, Brand, CampaignRecord, CleanRecord, EmotionEstimateRecord, KeyphraseItem,
    KeyphraseRecord,
};

/// Persistence for stage records.
///
/// Records are written exactly once under a freshly generated identifier and
/// never updated in place. Lookups only return active records.
#[async_trait]
pub trait Ledger: PluginAdapter {
    // --- Emotion ---

    async fn save_emotion(&self, record: &EmotionEstimateRecord) -> Result<(), EmocastError>;

    async fn get_emotion(&self, id: &str) -> Result<Option<EmotionEstimateRecord>, EmocastError>;

    async fn list_emotions_by_batch(
        &self,
        batch_id: &str,
    ) -> Result<Vec<EmotionEstimateRecord>, EmocastError>;

    async fn save_batch(&self, record: &BatchRecord) -> Result<(), EmocastError>;

    async fn get_batch(&self, id: &str) -> Result<Option<BatchRecord>, EmocastError>;

    // --- Clean ---

    async fn save_clean(&self, record: &CleanRecord) -> Result<(), EmocastError>;

    async fn list_cleans_by_batch(&self, batch_id: &str) -> Result<Vec<CleanRecord>, EmocastError>;

    // --- Keyphrase ---

    async fn save_keyphrase(&self, record: &KeyphraseRecord) -> Result<(), EmocastError>;

    async fn get_keyphrase(&self, id: &str) -> Result<Option<KeyphraseRecord>, EmocastError>;

    /// Looks up a single extracted phrase by its own identifier.
    async fn get_keyphrase_item(&self, id: &str) -> Result<Option<KeyphraseItem>, EmocastError>;

    // --- Campaign ---

    async fn save_campaign(&self, record: &CampaignRecord) -> Result<(), EmocastError>;

    async fn get_campaign(&self, id: &str) -> Result<Option<CampaignRecord>, EmocastError>;

    // --- Brand (external collaborator) ---

    async fn save_brand(&self, brand: &Brand) -> Result<(), EmocastError>;

    async fn get_brand(&self, id: &str) -> Result<Option<Brand>, EmocastError>;
}
