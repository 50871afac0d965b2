// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle shared by the gateway and ledger adapters.

use async_trait::async_trait;

use crate::error::EmocastError;
use crate::types::{AdapterType, HealthStatus};

/// Identity and lifecycle for anything plugged into the pipeline.
///
/// `GET /health` aggregates `health_check` across adapters, and
/// `emocast serve` calls `shutdown` once the HTTP server has drained.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Instance name shown in health output, e.g. `"openai"` or `"sqlite"`.
    fn name(&self) -> &str;

    fn version(&self) -> semver::Version;

    fn adapter_type(&self) -> AdapterType;

    /// `Unavailable` marks the whole service unhealthy; `Degraded` does not.
    async fn health_check(&self) -> Result<HealthStatus, EmocastError>;

    /// Flushes and releases held resources. Called at most once.
    async fn shutdown(&self) -> Result<(), EmocastError>;
}
