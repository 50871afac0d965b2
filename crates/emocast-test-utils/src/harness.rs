// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end pipeline testing.
//!
//! `TestHarness` wires a full `Pipeline` to a `MockGateway` and an
//! in-memory SQLite ledger.

use std::sync::Arc;

use emocast_config::EmocastConfig;
use emocast_core::types::Brand;
use emocast_core::{EmocastError, Ledger, LlmGateway};
use emocast_pipeline::run::now_timestamp;
use emocast_pipeline::{EmotionSource, Pipeline, StageContext};
use emocast_storage::SqliteLedger;

use crate::mock_gateway::MockGateway;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    gateway: Option<MockGateway>,
    batch_concurrency: Option<usize>,
    emotion_source: Option<Arc<dyn EmotionSource>>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            gateway: None,
            batch_concurrency: None,
            emotion_source: None,
        }
    }

    /// Queue gateway responses, answered in order.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Use a preconfigured mock gateway. Takes precedence over queued responses.
    pub fn with_gateway(mut self, gateway: MockGateway) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn with_batch_concurrency(mut self, concurrency: usize) -> Self {
        self.batch_concurrency = Some(concurrency);
        self
    }

    /// Route keyphrase emotion lookups through `source` instead of the
    /// in-process emotion stage.
    pub fn with_emotion_source(mut self, source: Arc<dyn EmotionSource>) -> Self {
        self.emotion_source = Some(source);
        self
    }

    /// Build the harness with an in-memory ledger.
    pub async fn build(self) -> Result<TestHarness, EmocastError> {
        let mut config = EmocastConfig::default();
        if let Some(concurrency) = self.batch_concurrency {
            config.pipeline.batch_concurrency = concurrency;
        }

        let gateway = Arc::new(
            self.gateway
                .unwrap_or_else(|| MockGateway::with_responses(self.responses)),
        );
        let ledger = Arc::new(SqliteLedger::in_memory().await?);

        let ctx = StageContext::from_config(
            &config,
            Arc::clone(&gateway) as Arc<dyn LlmGateway>,
            Arc::clone(&ledger) as Arc<dyn Ledger>,
        );

        let mut pipeline = Pipeline::new(ctx);
        if let Some(source) = self.emotion_source {
            pipeline = pipeline.with_emotion_source(source);
        }

        Ok(TestHarness {
            gateway,
            ledger,
            pipeline,
            config,
        })
    }
}

/// A complete pipeline backed by mocks.
pub struct TestHarness {
    pub gateway: Arc<MockGateway>,
    pub ledger: Arc<SqliteLedger>,
    pub pipeline: Pipeline,
    pub config: EmocastConfig,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Insert an active brand with the given id.
    pub async fn seed_brand(&self, id: &str) -> Result<Brand, EmocastError> {
        let brand = Brand {
            id: id.to_string(),
            name: "Northwind Coffee".to_string(),
            description: "Small-batch roaster for early risers".to_string(),
            competitor_urls: vec!["https://rival-roasters.example".to_string()],
            owner_user_id: "owner-1".to_string(),
            active: true,
            created_at: now_timestamp(),
        };
        self.ledger.save_brand(&brand).await?;
        Ok(brand)
    }

    pub fn gateway_calls(&self) -> usize {
        self.gateway.call_count()
    }
}
