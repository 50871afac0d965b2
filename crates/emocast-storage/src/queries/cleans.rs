// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Clean result operations.

use emocast_core::EmocastError;
use emocast_core::types::CleanRecord;
use rusqlite::params;

use super::{duration_column, duration_param, json_column, to_json, usage_columns};
use crate::database::{Database, map_tr_err};

/// Insert a new clean result.
pub async fn insert_clean(db: &Database, record: &CleanRecord) -> Result<(), EmocastError> {
    let record = record.clone();
    let cleaned = to_json(&record.cleaned)?;
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO clean_results (id, batch_id, user_id, message, cleaned,
                     prompt_tokens, completion_tokens, total_tokens, duration_ms, active,
                     created_at, provider_request_id, provider_fingerprint)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    record.id,
                    record.batch_id,
                    record.user_id,
                    record.message,
                    cleaned,
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

/// List active clean results in a batch, oldest first.
pub async fn list_cleans_by_batch(
    db: &Database,
    batch_id: &str,
) -> Result<Vec<CleanRecord>, EmocastError> {
    let batch_id = batch_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<CleanRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, batch_id, user_id, message, cleaned,
                        prompt_tokens, completion_tokens, total_tokens, duration_ms, active,
                        created_at, provider_request_id, provider_fingerprint
                 FROM clean_results
                 WHERE batch_id = ?1 AND active = 1
                 ORDER BY created_at ASC, rowid ASC",
            )?;
            let rows = stmt.query_map(params![batch_id], |row| {
                Ok(CleanRecord {
                    id: row.get(0)?,
                    batch_id: row.get(1)?,
                    user_id: row.get(2)?,
                    message: row.get(3)?,
                    cleaned: json_column(row, 4)?,
                    usage: usage_columns(row, 5)?,
                    duration_ms: duration_column(row, 8)?,
                    active: row.get(9)?,
                    created_at: row.get(10)?,
                    provider_request_id: row.get(11)?,
                    provider_fingerprint: row.get(12)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::fixtures::{timestamp, usage};

    fn clean(id: &str, n: u32, cleaned: &[&str]) -> CleanRecord {
        CleanRecord {
            id: id.to_string(),
            batch_id: Some("cb-1".to_string()),
            user_id: "u-1".to_string(),
            message: format!("raw message {n}"),
            cleaned: cleaned.iter().map(|s| s.to_string()).collect(),
            usage: usage(),
            duration_ms: 800,
            active: true,
            created_at: timestamp(n),
            provider_request_id: format!("chatcmpl-{n}"),
            provider_fingerprint: None,
        }
    }

    #[tokio::test]
    async fn batch_listing_returns_parsed_lists() {
        let db = Database::open_in_memory().await.unwrap();
        insert_clean(&db, &clean("c-1", 1, &["first part", "second part"]))
            .await
            .unwrap();
        insert_clean(&db, &clean("c-2", 2, &[])).await.unwrap();

        let listed = list_cleans_by_batch(&db, "cb-1").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].cleaned, vec!["first part", "second part"]);
        assert!(listed[1].cleaned.is_empty());
        assert!(list_cleans_by_batch(&db, "cb-none").await.unwrap().is_empty());
    }
}
