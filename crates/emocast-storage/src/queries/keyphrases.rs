// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyphrase record operations.
//!
//! A record and its extracted phrases are written in one transaction; each
//! phrase is its own row so campaigns can reference a single phrase by id.

use std::str::FromStr;

use emocast_core::EmocastError;
use emocast_core::types::{Emotion, KeyphraseItem, KeyphraseRecord};
use rusqlite::params;
use rusqlite::types::Type;

use super::{duration_column, duration_param, json_column, to_json, usage_columns};
use crate::database::{Database, map_tr_err};

/// Insert a keyphrase record with all of its phrases.
pub async fn insert_keyphrase(
    db: &Database,
    record: &KeyphraseRecord,
) -> Result<(), EmocastError> {
    let record = record.clone();
    let messages = to_json(&record.messages)?;
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO keyphrase_records (id, emotion_estimate_id, user_id, emotion,
                     messages, emotion_profile_snapshot, prompt_tokens, completion_tokens,
                     total_tokens, duration_ms, active, created_at, provider_request_id,
                     provider_fingerprint)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    record.id,
                    record.emotion_estimate_id,
                    record.user_id,
                    record.emotion.to_string(),
                    messages,
                    record.emotion_profile_snapshot,
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
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO keyphrases (id, record_id, position, keyphrase)
                     VALUES (?1, ?2, ?3, ?4)",
                )?;
                for (position, item) in record.keyphrases.iter().enumerate() {
                    stmt.execute(params![item.id, record.id, position as i64, item.keyphrase])?;
                }
            }
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}

/// Get an active keyphrase record, phrases in extraction order.
pub async fn get_keyphrase(
    db: &Database,
    id: &str,
) -> Result<Option<KeyphraseRecord>, EmocastError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<KeyphraseRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, emotion_estimate_id, user_id, emotion, messages,
                        emotion_profile_snapshot, prompt_tokens, completion_tokens,
                        total_tokens, duration_ms, active, created_at, provider_request_id,
                        provider_fingerprint
                 FROM keyphrase_records WHERE id = ?1 AND active = 1",
            )?;
            let mut rows = stmt.query_map(params![id], |row| {
                let emotion: String = row.get(3)?;
                let emotion = Emotion::from_str(&emotion).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e))
                })?;
                Ok(KeyphraseRecord {
                    id: row.get(0)?,
                    emotion_estimate_id: row.get(1)?,
                    user_id: row.get(2)?,
                    emotion,
                    messages: json_column(row, 4)?,
                    keyphrases: Vec::new(),
                    emotion_profile_snapshot: row.get(5)?,
                    usage: usage_columns(row, 6)?,
                    duration_ms: duration_column(row, 9)?,
                    active: row.get(10)?,
                    created_at: row.get(11)?,
                    provider_request_id: row.get(12)?,
                    provider_fingerprint: row.get(13)?,
                })
            })?;
            let Some(mut record) = rows.next().transpose()? else {
                return Ok(None);
            };

            let mut items = conn.prepare(
                "SELECT id, keyphrase FROM keyphrases WHERE record_id = ?1 ORDER BY position ASC",
            )?;
            record.keyphrases = items
                .query_map(params![record.id], |row| {
                    Ok(KeyphraseItem {
                        id: row.get(0)?,
                        keyphrase: row.get(1)?,
                    })
                })?
                .collect::<Result<Vec<_>, rusqlite::Error>>()?;
            Ok(Some(record))
        })
        .await
        .map_err(map_tr_err)
}

/// Get a single phrase by its own id, if its record is active.
pub async fn get_keyphrase_item(
    db: &Database,
    id: &str,
) -> Result<Option<KeyphraseItem>, EmocastError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<KeyphraseItem>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT k.id, k.keyphrase FROM keyphrases k
                 JOIN keyphrase_records r ON r.id = k.record_id
                 WHERE k.id = ?1 AND r.active = 1",
            )?;
            let mut rows = stmt.query_map(params![id], |row| {
                Ok(KeyphraseItem {
                    id: row.get(0)?,
                    keyphrase: row.get(1)?,
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

    fn record(id: &str, phrases: &[(&str, &str)]) -> KeyphraseRecord {
        KeyphraseRecord {
            id: id.to_string(),
            emotion_estimate_id: "e-1".to_string(),
            user_id: "u-1".to_string(),
            emotion: Emotion::Joy,
            messages: vec!["the new app is delightful".to_string()],
            keyphrases: phrases
                .iter()
                .map(|(id, phrase)| KeyphraseItem {
                    id: id.to_string(),
                    keyphrase: phrase.to_string(),
                })
                .collect(),
            emotion_profile_snapshot: r#"{"joy":0.9}"#.to_string(),
            usage: usage(),
            duration_ms: 950,
            active: true,
            created_at: timestamp(1),
            provider_request_id: "chatcmpl-k".to_string(),
            provider_fingerprint: None,
        }
    }

    #[tokio::test]
    async fn record_round_trips_with_ordered_items() {
        let db = Database::open_in_memory().await.unwrap();
        let original = record(
            "k-1",
            &[("p-2", "delightful app"), ("p-1", "new release"), ("p-3", "smooth")],
        );
        insert_keyphrase(&db, &original).await.unwrap();

        let fetched = get_keyphrase(&db, "k-1").await.unwrap().unwrap();
        assert_eq!(fetched, original);
    }

    #[tokio::test]
    async fn empty_extraction_is_still_stored() {
        let db = Database::open_in_memory().await.unwrap();
        insert_keyphrase(&db, &record("k-empty", &[])).await.unwrap();
        let fetched = get_keyphrase(&db, "k-empty").await.unwrap().unwrap();
        assert!(fetched.keyphrases.is_empty());
    }

    #[tokio::test]
    async fn item_lookup_by_phrase_id() {
        let db = Database::open_in_memory().await.unwrap();
        insert_keyphrase(&db, &record("k-1", &[("p-1", "fresh start")]))
            .await
            .unwrap();

        let item = get_keyphrase_item(&db, "p-1").await.unwrap().unwrap();
        assert_eq!(item.keyphrase, "fresh start");
        // Record ids are not phrase ids.
        assert!(get_keyphrase_item(&db, "k-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn inactive_record_hides_its_items() {
        let db = Database::open_in_memory().await.unwrap();
        let mut off = record("k-off", &[("p-off", "hidden")]);
        off.active = false;
        insert_keyphrase(&db, &off).await.unwrap();

        assert!(get_keyphrase(&db, "k-off").await.unwrap().is_none());
        assert!(get_keyphrase_item(&db, "p-off").await.unwrap().is_none());
    }
}
