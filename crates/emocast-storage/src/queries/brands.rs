// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Brand operations.

use emocast_core::EmocastError;
use emocast_core::types::Brand;
use rusqlite::params;

use super::{json_column, to_json};
use crate::database::{Database, map_tr_err};

/// Insert or replace a brand.
pub async fn upsert_brand(db: &Database, brand: &Brand) -> Result<(), EmocastError> {
    let brand = brand.clone();
    let competitor_urls = to_json(&brand.competitor_urls)?;
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT OR REPLACE INTO brands
                     (id, name, description, competitor_urls, owner_user_id, active, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    brand.id,
                    brand.name,
                    brand.description,
                    competitor_urls,
                    brand.owner_user_id,
                    brand.active,
                    brand.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get an active brand by id.
pub async fn get_brand(db: &Database, id: &str) -> Result<Option<Brand>, EmocastError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Brand>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, name, description, competitor_urls, owner_user_id, active, created_at
                 FROM brands WHERE id = ?1 AND active = 1",
            )?;
            let mut rows = stmt.query_map(params![id], |row| {
                Ok(Brand {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    competitor_urls: json_column(row, 3)?,
                    owner_user_id: row.get(4)?,
                    active: row.get(5)?,
                    created_at: row.get(6)?,
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
    use crate::queries::fixtures::timestamp;

    fn brand(active: bool) -> Brand {
        Brand {
            id: "b-1".into(),
            name: "Acme Coffee".into(),
            description: "Small-batch roaster".into(),
            competitor_urls: vec!["https://example.com/rival".into()],
            owner_user_id: "u-1".into(),
            active,
            created_at: timestamp(0),
        }
    }

    #[tokio::test]
    async fn upsert_replaces_and_deactivation_hides() {
        let db = Database::open_in_memory().await.unwrap();
        upsert_brand(&db, &brand(true)).await.unwrap();
        assert_eq!(get_brand(&db, "b-1").await.unwrap().unwrap(), brand(true));

        upsert_brand(&db, &brand(false)).await.unwrap();
        assert!(get_brand(&db, "b-1").await.unwrap().is_none());
    }
}
