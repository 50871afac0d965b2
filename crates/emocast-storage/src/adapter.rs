// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`Ledger`] trait.

use async_trait::async_trait;
use emocast_config::model::StorageConfig;
use emocast_core::types::{
    BatchRecord, Brand, CampaignRecord, CleanRecord, EmotionEstimateRecord, KeyphraseItem,
    KeyphraseRecord,
};
use emocast_core::{AdapterType, EmocastError, HealthStatus, Ledger, PluginAdapter};
use tracing::debug;

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed ledger. Delegates every operation to the typed query modules.
pub struct SqliteLedger {
    db: Database,
    wal_mode: bool,
}

impl SqliteLedger {
    /// Opens the database described by `config`, applying migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, EmocastError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite ledger initialized");
        Ok(Self {
            db,
            wal_mode: config.wal_mode,
        })
    }

    /// In-memory ledger for tests and dry runs.
    pub async fn in_memory() -> Result<Self, EmocastError> {
        Ok(Self {
            db: Database::open_in_memory().await?,
            wal_mode: false,
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteLedger {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Ledger
    }

    async fn health_check(&self) -> Result<HealthStatus, EmocastError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EmocastError> {
        if self.wal_mode {
            self.db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl Ledger for SqliteLedger {
    async fn save_emotion(&self, record: &EmotionEstimateRecord) -> Result<(), EmocastError> {
        queries::emotions::insert_estimate(&self.db, record).await
    }

    async fn get_emotion(&self, id: &str) -> Result<Option<EmotionEstimateRecord>, EmocastError> {
        queries::emotions::get_estimate(&self.db, id).await
    }

    async fn list_emotions_by_batch(
        &self,
        batch_id: &str,
    ) -> Result<Vec<EmotionEstimateRecord>, EmocastError> {
        queries::emotions::list_estimates_by_batch(&self.db, batch_id).await
    }

    async fn save_batch(&self, record: &BatchRecord) -> Result<(), EmocastError> {
        queries::emotions::insert_batch(&self.db, record).await
    }

    async fn get_batch(&self, id: &str) -> Result<Option<BatchRecord>, EmocastError> {
        queries::emotions::get_batch(&self.db, id).await
    }

    async fn save_clean(&self, record: &CleanRecord) -> Result<(), EmocastError> {
        queries::cleans::insert_clean(&self.db, record).await
    }

    async fn list_cleans_by_batch(&self, batch_id: &str) -> Result<Vec<CleanRecord>, EmocastError> {
        queries::cleans::list_cleans_by_batch(&self.db, batch_id).await
    }

    async fn save_keyphrase(&self, record: &KeyphraseRecord) -> Result<(), EmocastError> {
        queries::keyphrases::insert_keyphrase(&self.db, record).await
    }

    async fn get_keyphrase(&self, id: &str) -> Result<Option<KeyphraseRecord>, EmocastError> {
        queries::keyphrases::get_keyphrase(&self.db, id).await
    }

    async fn get_keyphrase_item(&self, id: &str) -> Result<Option<KeyphraseItem>, EmocastError> {
        queries::keyphrases::get_keyphrase_item(&self.db, id).await
    }

    async fn save_campaign(&self, record: &CampaignRecord) -> Result<(), EmocastError> {
        queries::campaigns::insert_campaign(&self.db, record).await
    }

    async fn get_campaign(&self, id: &str) -> Result<Option<CampaignRecord>, EmocastError> {
        queries::campaigns::get_campaign(&self.db, id).await
    }

    async fn save_brand(&self, brand: &Brand) -> Result<(), EmocastError> {
        queries::brands::upsert_brand(&self.db, brand).await
    }

    async fn get_brand(&self, id: &str) -> Result<Option<Brand>, EmocastError> {
        queries::brands::get_brand(&self.db, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn ledger_implements_plugin_adapter() {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("ledger.db").to_string_lossy().into_owned(),
            wal_mode: true,
        };
        let ledger = SqliteLedger::open(&config).await.unwrap();

        assert_eq!(ledger.name(), "sqlite");
        assert_eq!(ledger.adapter_type(), AdapterType::Ledger);
        assert_eq!(ledger.health_check().await.unwrap(), HealthStatus::Healthy);
        ledger.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("ledger.db").to_string_lossy().into_owned(),
            wal_mode: true,
        };

        let brand = Brand {
            id: "b-1".into(),
            name: "Acme".into(),
            description: "Anvils".into(),
            competitor_urls: vec![],
            owner_user_id: "u-1".into(),
            active: true,
            created_at: "2026-03-01T00:00:00.000Z".into(),
        };
        {
            let ledger = SqliteLedger::open(&config).await.unwrap();
            ledger.save_brand(&brand).await.unwrap();
            ledger.shutdown().await.unwrap();
        }

        let ledger = SqliteLedger::open(&config).await.unwrap();
        assert_eq!(ledger.get_brand("b-1").await.unwrap(), Some(brand));
    }
}
