// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `emocast serve`: wires adapters into the pipeline and runs the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use emocast_config::EmocastConfig;
use emocast_core::{EmocastError, Ledger, LlmGateway};
use emocast_gateway::{GatewayState, RemoteEmotionClient, ServerConfig};
use emocast_openai::OpenAiGateway;
use emocast_pipeline::{Pipeline, StageContext};
use emocast_storage::SqliteLedger;
use tracing::info;

/// Builds the pipeline from config: OpenAI gateway, SQLite ledger, and an
/// optional remote emotion source.
pub async fn build_pipeline(config: &EmocastConfig) -> Result<Pipeline, EmocastError> {
    let gateway: Arc<dyn LlmGateway> = Arc::new(OpenAiGateway::new(&config.provider)?);
    let ledger: Arc<dyn Ledger> = Arc::new(SqliteLedger::open(&config.storage).await?);
    assemble(config, gateway, ledger)
}

/// Wires already-built adapters into a pipeline.
pub fn assemble(
    config: &EmocastConfig,
    gateway: Arc<dyn LlmGateway>,
    ledger: Arc<dyn Ledger>,
) -> Result<Pipeline, EmocastError> {
    let pipeline = Pipeline::new(StageContext::from_config(config, gateway, ledger));

    match &config.pipeline.emotion_service_url {
        Some(url) => {
            let remote = RemoteEmotionClient::new(url, Duration::from_secs(config.provider.timeout_secs))?;
            info!(endpoint = remote.endpoint(), "keyphrase stage using remote emotion service");
            Ok(pipeline.with_emotion_source(Arc::new(remote)))
        }
        None => Ok(pipeline),
    }
}

/// Runs the server until SIGINT/SIGTERM, then shuts the adapters down.
pub async fn run_serve(config: EmocastConfig) -> Result<(), EmocastError> {
    init_tracing(&config.service.log_level);
    info!(name = %config.service.name, model = %config.provider.model, "starting emocast");

    let pipeline = Arc::new(build_pipeline(&config).await?);
    let state = GatewayState {
        pipeline: Arc::clone(&pipeline),
        default_user: config.service.default_user.clone(),
    };

    let cancel = emocast_gateway::install_signal_handler();
    emocast_gateway::start_server(&ServerConfig::from(&config.service), state, cancel).await?;

    pipeline.shutdown().await?;
    info!("emocast stopped");
    Ok(())
}

/// Initializes the tracing subscriber. `RUST_LOG` overrides `log_level`.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("emocast={log_level},tower_http={log_level},warn")));

    // A second call (e.g. from tests) leaves the first subscriber in place.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .try_init();
}
