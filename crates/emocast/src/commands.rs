// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot CLI commands.

use emocast_config::EmocastConfig;
use emocast_core::types::Brand;
use emocast_core::{EmocastError, Ledger};
use emocast_pipeline::Pipeline;
use emocast_pipeline::run::now_timestamp;
use emocast_storage::SqliteLedger;
use serde::Serialize;

use crate::serve::build_pipeline;

fn user_or_default(config: &EmocastConfig, user: Option<String>) -> String {
    user.unwrap_or_else(|| config.service.default_user.clone())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), EmocastError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| EmocastError::Internal(format!("failed to render JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

async fn with_pipeline<T, F, Fut>(config: &EmocastConfig, run: F) -> Result<(), EmocastError>
where
    T: Serialize,
    F: FnOnce(Pipeline) -> Fut,
    Fut: std::future::Future<Output = Result<T, emocast_core::CallerError>>,
{
    let pipeline = build_pipeline(config).await?;
    let view = run(pipeline)
        .await
        .map_err(|e| EmocastError::Internal(e.to_string()))?;
    print_json(&view)
}

pub async fn compute_emotion(
    config: &EmocastConfig,
    message: &str,
    user: Option<String>,
) -> Result<(), EmocastError> {
    let user = user_or_default(config, user);
    with_pipeline(config, |p| async move { p.compute_emotion(message, &user).await }).await
}

pub async fn compute_unique(
    config: &EmocastConfig,
    messages: Vec<String>,
    user: Option<String>,
) -> Result<(), EmocastError> {
    let user = user_or_default(config, user);
    with_pipeline(config, |p| async move { p.compute_emotion_unique(messages, &user).await }).await
}

pub async fn compute_keyphrase(
    config: &EmocastConfig,
    messages: Vec<String>,
    emotion: &str,
    user: Option<String>,
) -> Result<(), EmocastError> {
    let user = user_or_default(config, user);
    with_pipeline(config, |p| async move {
        p.compute_keyphrase(messages, emotion, &user).await
    })
    .await
}

/// Brand fields supplied on the command line.
#[derive(Debug)]
pub struct NewBrand {
    pub id: String,
    pub name: String,
    pub description: String,
    pub competitor_urls: Vec<String>,
    pub owner_user_id: Option<String>,
}

impl NewBrand {
    fn into_brand(self, config: &EmocastConfig) -> Brand {
        Brand {
            id: self.id,
            name: self.name,
            description: self.description,
            competitor_urls: self.competitor_urls,
            owner_user_id: user_or_default(config, self.owner_user_id),
            active: true,
            created_at: now_timestamp(),
        }
    }
}

/// Writes a brand row so campaigns can reference it.
pub async fn add_brand(config: &EmocastConfig, brand: NewBrand) -> Result<(), EmocastError> {
    if brand.id.trim().is_empty() || brand.name.trim().is_empty() {
        return Err(EmocastError::validation("brand", "id and name are required"));
    }
    let ledger = SqliteLedger::open(&config.storage).await?;
    let brand = brand.into_brand(config);
    ledger.save_brand(&brand).await?;
    print_json(&brand)
}

/// Prints the effective configuration as TOML with secrets redacted.
pub fn config_check(config: &EmocastConfig) -> Result<(), EmocastError> {
    let mut shown = config.clone();
    if shown.provider.api_key.is_some() {
        shown.provider.api_key = Some("[redacted]".to_string());
    }
    let rendered = toml::to_string_pretty(&shown)
        .map_err(|e| EmocastError::Internal(format!("failed to render config: {e}")))?;
    println!("# configuration is valid\n{rendered}");
    Ok(())
}
