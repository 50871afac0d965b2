// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Emocast pipeline.
//!
//! Holds the error taxonomy, the record types written by each stage, and the
//! adapter traits for the completion gateway and the ledger. Everything else
//! in the workspace depends on this crate and nothing here depends on I/O.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CallerError, EmocastError, FailureKind};
pub use types::{AdapterType, Emotion, EmotionProfile, HealthStatus, TokenUsage};

pub use traits::{Ledger, LlmGateway, PluginAdapter};
