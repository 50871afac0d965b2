// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign operations.

use emocast_core::EmocastError;
use emocast_core::types::CampaignRecord;
use rusqlite::params;

use super::{duration_column, duration_param, json_column, to_json, usage_columns};
use crate::database::{Database, map_tr_err};

/// Insert a new campaign.
pub async fn insert_campaign(db: &Database, record: &CampaignRecord) -> Result<(), EmocastError> {
    let record = record.clone();
    let pillars = to_json(&record.pillars)?;
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO campaigns (id, name, description, pillars, keyphrase_id, keyphrase,
                     emotions_id, user_id, brand_id, prompt_tokens, completion_tokens,
                     total_tokens, duration_ms, active, created_at, provider_request_id,
                     provider_fingerprint)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
                params![
                    record.id,
                    record.name,
                    record.description,
                    pillars,
                    record.keyphrase_id,
                    record.keyphrase,
                    record.emotions_id,
                    record.user_id,
                    record.brand_id,
                    record.usage.prompt_tokens,
                    record.usage.completion_tokens,
                    record.usage.total_tokens,
                    duration_param(record.duration_ms),
                    record.active,
                    record.created_at,
                    record.provider_request_id,
                    record.provider_fingerprint,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get an active campaign by id.
pub async fn get_campaign(
    db: &Database,
    id: &str,
) -> Result<Option<CampaignRecord>, EmocastError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<CampaignRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, name, description, pillars, keyphrase_id, keyphrase, emotions_id,
                        user_id, brand_id, prompt_tokens, completion_tokens, total_tokens,
                        duration_ms, active, created_at, provider_request_id, provider_fingerprint
                 FROM campaigns WHERE id = ?1 AND active = 1",
            )?;
            let mut rows = stmt.query_map(params![id], |row| {
                Ok(CampaignRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    pillars: json_column(row, 3)?,
                    keyphrase_id: row.get(4)?,
                    keyphrase: row.get(5)?,
                    emotions_id: row.get(6)?,
                    user_id: row.get(7)?,
                    brand_id: row.get(8)?,
                    usage: usage_columns(row, 9)?,
                    duration_ms: duration_column(row, 12)?,
                    active: row.get(13)?,
                    created_at: row.get(14)?,
                    provider_request_id: row.get(15)?,
                    provider_fingerprint: row.get(16)?,
                })
            })?;
            rows.next().transpose()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::fixtures::{timestamp, usage};
    use emocast_core::types::CampaignPillar;

    #[tokio::test]
    async fn campaign_round_trips_with_pillars() {
        let db = Database::open_in_memory().await.unwrap();
        let record = CampaignRecord {
            id: "cmp-1".into(),
            name: "Morning Light".into(),
            description: "Owning the first hour of the day".into(),
            pillars: vec![
                CampaignPillar {
                    name: "Ritual".into(),
                    applications: vec!["sunrise playlist".into(), "alarm partnership".into()],
                },
                CampaignPillar {
                    name: "Community".into(),
                    applications: vec![],
                },
            ],
            keyphrase_id: "p-1".into(),
            keyphrase: "fresh start".into(),
            emotions_id: "e-1".into(),
            user_id: "u-1".into(),
            brand_id: "b-1".into(),
            usage: usage(),
            duration_ms: 2100,
            active: true,
            created_at: timestamp(3),
            provider_request_id: "chatcmpl-c".into(),
            provider_fingerprint: Some("fp_9".into()),
        };
        insert_campaign(&db, &record).await.unwrap();

        let fetched = get_campaign(&db, "cmp-1").await.unwrap().unwrap();
        assert_eq!(fetched, record);
        assert!(get_campaign(&db, "cmp-2").await.unwrap().is_none());
    }
}
