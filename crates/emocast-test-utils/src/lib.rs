// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Emocast integration tests.
//!
//! - [`MockGateway`] - scripted completion gateway with a call counter
//! - [`TestHarness`] - full pipeline over the mock gateway and an in-memory ledger

pub mod harness;
pub mod mock_gateway;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_gateway::MockGateway;
