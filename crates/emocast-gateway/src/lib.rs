// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP surface for the Emocast pipeline.
//!
//! Exposes every pipeline operation as a JSON endpoint and provides
//! [`RemoteEmotionClient`] for reaching a sibling service's emotion stage.

pub mod client;
pub mod handlers;
pub mod server;
pub mod shutdown;

pub use client::RemoteEmotionClient;
pub use server::{GatewayState, ServerConfig, router, start_server};
pub use shutdown::install_signal_handler;
