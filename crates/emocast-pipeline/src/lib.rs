// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stage orchestration for Emocast.
//!
//! Each stage validates its input, prompts the completion gateway, decodes
//! the answer, writes a ledger record, and maps it to a caller view. The
//! [`Pipeline`] facade wires the four stages together and converts every
//! failure into a [`CallerError`](emocast_core::CallerError).

pub mod batch;
pub mod codec;
pub mod context;
pub mod facade;
pub mod prompts;
pub mod run;
pub mod stages;
pub mod validation;
pub mod views;

pub use batch::{BatchCoordinator, BatchOutcome};
pub use codec::{Decoded, StageResultCodec};
pub use context::StageContext;
pub use facade::{HealthReport, Pipeline, endpoints};
pub use stages::EmotionSource;
pub use views::{
    CampaignView, CleanBatchView, CleanView, EmotionBatchItem, EmotionBatchView, EmotionSetView,
    EmotionView, KeyphraseView,
};
