// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Every adapter extends [`PluginAdapter`] and uses `#[async_trait]` so it can
//! be shared as `Arc<dyn ...>` across stage services.

pub mod adapter;
pub mod gateway;
pub mod ledger;

pub use adapter::PluginAdapter;
pub use gateway::LlmGateway;
pub use ledger::Ledger;
