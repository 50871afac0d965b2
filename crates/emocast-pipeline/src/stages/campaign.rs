// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign composition from a brand, one keyphrase, and an emotion estimate.
//!
//! All three dependencies are resolved before the gateway is called.

use std::sync::Arc;

use emocast_core::EmocastError;
use emocast_core::types::CampaignRecord;

use crate::codec::{CampaignCodec, Decoded, EmotionCodec, StageResultCodec};
use crate::context::StageContext;
use crate::prompts::campaign_payload;
use crate::run::{Stage, StageRun, new_id, now_timestamp};
use crate::validation::require_id;
use crate::views::CampaignView;

pub struct CampaignService {
    ctx: Arc<StageContext>,
}

impl CampaignService {
    pub fn new(ctx: Arc<StageContext>) -> Self {
        Self { ctx }
    }

    /// `keyphrase_id` names a single extracted phrase, not a keyphrase record.
    pub async fn compute(
        &self,
        keyphrase_id: &str,
        brand_id: &str,
        emotions_id: &str,
        user_id: &str,
    ) -> Result<CampaignView, EmocastError> {
        require_id("keyphraseId", keyphrase_id)?;
        require_id("brandId", brand_id)?;
        require_id("emotionsId", emotions_id)?;

        let mut run = StageRun::validated(Stage::Campaign);
        let ledger = &self.ctx.ledger;
        let resolved = futures::try_join!(
            async {
                ledger
                    .get_brand(brand_id)
                    .await?
                    .ok_or_else(|| EmocastError::dependency("brand", brand_id))
            },
            async {
                ledger
                    .get_keyphrase_item(keyphrase_id)
                    .await?
                    .ok_or_else(|| EmocastError::dependency("keyphrase", keyphrase_id))
            },
            async {
                ledger
                    .get_emotion(emotions_id)
                    .await?
                    .ok_or_else(|| EmocastError::dependency("emotion", emotions_id))
            },
        );
        let (brand, item, estimate) = match resolved {
            Ok(deps) => deps,
            Err(e) => return Err(run.fail(e)),
        };

        let profile = EmotionCodec::decode(&estimate.raw_output).or_empty();
        let completion = self
            .ctx
            .complete(
                &mut run,
                &self.ctx.prompts.campaign,
                campaign_payload(&brand, &item.keyphrase, &profile),
            )
            .await?;

        let draft = match CampaignCodec::decode(&completion.text) {
            Decoded::Parsed(draft) => draft,
            Decoded::Malformed(_) => {
                return Err(run.fail(EmocastError::Malformed {
                    stage: Stage::Campaign.to_string(),
                }));
            }
        };

        let record = CampaignRecord {
            id: new_id(),
            name: draft.name,
            description: draft.description,
            pillars: draft.pillars,
            keyphrase_id: item.id,
            keyphrase: item.keyphrase,
            emotions_id: estimate.id,
            user_id: user_id.to_string(),
            brand_id: brand.id,
            usage: completion.usage,
            duration_ms: run.duration_ms(),
            active: true,
            created_at: now_timestamp(),
            provider_request_id: completion.provider_request_id,
            provider_fingerprint: completion.provider_fingerprint,
        };
        run.persisted(&record.id, self.ctx.ledger.save_campaign(&record).await);
        run.mapped(&record.id);
        Ok(CampaignView::from(&record))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<CampaignView, EmocastError> {
        require_id("id", id)?;
        let record = self
            .ctx
            .ledger
            .get_campaign(id)
            .await?
            .ok_or_else(|| EmocastError::not_found("campaign", id))?;
        Ok(CampaignView::from(&record))
    }
}
