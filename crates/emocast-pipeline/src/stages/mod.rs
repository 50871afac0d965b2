// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The four stage services.

pub mod campaign;
pub mod clean;
pub mod emotion;
pub mod keyphrase;

pub use campaign::CampaignService;
pub use clean::CleanService;
pub use emotion::{EmotionService, EmotionSource};
pub use keyphrase::KeyphraseService;
