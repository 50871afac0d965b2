// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Emotion estimate and batch operations.

use emocast_core::EmocastError;
use emocast_core::types::{BatchRecord, EmotionEstimateRecord};
use rusqlite::params;

use super::{duration_column, duration_param, json_column, to_json, usage_columns};
use crate::database::{Database, map_tr_err};

const ESTIMATE_COLUMNS: &str = "id, batch_id, user_id, messages, raw_output, token_delta, \
     prompt_tokens, completion_tokens, total_tokens, duration_ms, active, created_at, \
     provider_request_id, provider_fingerprint";

fn estimate_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EmotionEstimateRecord> {
    Ok(EmotionEstimateRecord {
        id: row.get(0)?,
        batch_id: row.get(1)?,
        user_id: row.get(2)?,
        messages: json_column(row, 3)?,
        raw_output: row.get(4)?,
        token_delta: row.get(5)?,
        usage: usage_columns(row, 6)?,
        duration_ms: duration_column(row, 9)?,
        active: row.get(10)?,
        created_at: row.get(11)?,
        provider_request_id: row.get(12)?,
        provider_fingerprint: row.get(13)?,
    })
}

/// Insert a new emotion estimate.
pub async fn insert_estimate(
    db: &Database,
    record: &EmotionEstimateRecord,
) -> Result<(), EmocastError> {
    let record = record.clone();
    let messages = to_json(&record.messages)?;
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                &format!(
                    "INSERT INTO emotion_estimates ({ESTIMATE_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
                ),
                params![
                    record.id,
                    record.batch_id,
                    record.user_id,
                    messages,
                    record.raw_output,
                    record.token_delta,
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

/// Get an active estimate by id.
pub async fn get_estimate(
    db: &Database,
    id: &str,
) -> Result<Option<EmotionEstimateRecord>, EmocastError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<EmotionEstimateRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ESTIMATE_COLUMNS} FROM emotion_estimates WHERE id = ?1 AND active = 1"
            ))?;
            let mut rows = stmt.query_map(params![id], estimate_from_row)?;
            rows.next().transpose()
        })
        .await
        .map_err(map_tr_err)
}

/// List active estimates in a batch, oldest first.
pub async fn list_estimates_by_batch(
    db: &Database,
    batch_id: &str,
) -> Result<Vec<EmotionEstimateRecord>, EmocastError> {
    let batch_id = batch_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<EmotionEstimateRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ESTIMATE_COLUMNS} FROM emotion_estimates
                 WHERE batch_id = ?1 AND active = 1
                 ORDER BY created_at ASC, rowid ASC"
            ))?;
            let rows = stmt.query_map(params![batch_id], estimate_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a new batch header.
pub async fn insert_batch(db: &Database, record: &BatchRecord) -> Result<(), EmocastError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO emotion_batches (id, message_count, user_id, duration_ms, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.id,
                    record.message_count,
                    record.user_id,
                    duration_param(record.duration_ms),
                    record.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a batch header by id.
pub async fn get_batch(db: &Database, id: &str) -> Result<Option<BatchRecord>, EmocastError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<BatchRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, message_count, user_id, duration_ms, created_at
                 FROM emotion_batches WHERE id = ?1",
            )?;
            let mut rows = stmt.query_map(params![id], |row| {
                Ok(BatchRecord {
                    id: row.get(0)?,
                    message_count: row.get(1)?,
                    user_id: row.get(2)?,
                    duration_ms: duration_column(row, 3)?,
                    created_at: row.get(4)?,
                })
            })?;
            rows.next().transpose()
        })
        .await
        .map_err(map_tr_err)
}
