// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./emocast.toml` > `~/.config/emocast/emocast.toml` >
//! `/etc/emocast/emocast.toml`, with `EMOCAST_*` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::EmocastConfig;

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/emocast/emocast.toml`
/// 3. `~/.config/emocast/emocast.toml`
/// 4. `./emocast.toml`
/// 5. `EMOCAST_*` environment variables
pub fn load_config() -> Result<EmocastConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string over the compiled defaults.
pub fn load_config_from_str(toml_content: &str) -> Result<EmocastConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EmocastConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<EmocastConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EmocastConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(EmocastConfig::default()))
        .merge(Toml::file("/etc/emocast/emocast.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("emocast/emocast.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("emocast.toml"))
        .merge(env_provider())
}

/// Environment provider mapping the first underscore to a section dot.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that keys containing
/// underscores survive: `EMOCAST_PIPELINE_BATCH_CONCURRENCY` must become
/// `pipeline.batch_concurrency`, not `pipeline.batch.concurrency`.
fn env_provider() -> Env {
    Env::prefixed("EMOCAST_").map(|key| {
        let key_str = key.as_str();
        let mapped = ["service", "provider", "prompts", "storage", "pipeline"]
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or_else(|| key_str.to_string());
        mapped.into()
    })
}
