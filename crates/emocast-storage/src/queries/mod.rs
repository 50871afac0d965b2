// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per record family.

pub mod brands;
pub mod campaigns;
pub mod cleans;
pub mod emotions;
pub mod keyphrases;

use emocast_core::{EmocastError, TokenUsage};
use rusqlite::types::Type;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Serializes a value into a JSON text column before entering the
/// connection thread.
pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, EmocastError> {
    serde_json::to_string(value).map_err(|e| EmocastError::PersistenceFailed {
        source: Box::new(e),
    })
}

/// Reads a JSON text column.
pub(crate) fn json_column<T: DeserializeOwned>(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Reads the three consecutive usage columns starting at `idx`.
pub(crate) fn usage_columns(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<TokenUsage> {
    Ok(TokenUsage {
        prompt_tokens: row.get(idx)?,
        completion_tokens: row.get(idx + 1)?,
        total_tokens: row.get(idx + 2)?,
    })
}

/// Reads a non-negative millisecond count.
pub(crate) fn duration_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let ms: i64 = row.get(idx)?;
    Ok(u64::try_from(ms).unwrap_or_default())
}

pub(crate) fn duration_param(ms: u64) -> i64 {
    i64::try_from(ms).unwrap_or(i64::MAX)
}
