// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use emocast_config::model::ServiceConfig;
use emocast_core::EmocastError;
use emocast_pipeline::Pipeline;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub pipeline: Arc<Pipeline>,
    /// User id applied when a request carries no `X-User-Id` header.
    pub default_user: String,
}

/// Bind address for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl From<&ServiceConfig> for ServerConfig {
    fn from(service: &ServiceConfig) -> Self {
        Self {
            host: service.bind_address.clone(),
            port: service.port,
        }
    }
}

/// Builds the router with every route and layer attached.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/compute/clean", post(handlers::post_clean))
        .route("/clean/batch/{id}", get(handlers::get_clean_batch))
        .route("/compute/emotion", post(handlers::post_emotion))
        .route("/compute/emotion/batch", post(handlers::post_emotion_batch))
        .route("/compute/emotion/unique", post(handlers::post_emotion_unique))
        .route("/emotion/{id}", get(handlers::get_emotion))
        .route("/emotion/batch/{id}", get(handlers::get_emotion_batch))
        .route("/compute/keyphrase", post(handlers::post_keyphrase))
        .route("/keyphrase/{id}", get(handlers::get_keyphrase))
        .route("/compute/campaign", post(handlers::post_campaign))
        .route("/campaign/{id}", get(handlers::get_campaign))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serves until `cancel` fires, then drains in-flight requests.
///
/// Batch items already spawned keep running after their request is dropped.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), EmocastError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| EmocastError::Internal(format!("failed to bind {addr}: {e}")))?;

    tracing::info!("emocast listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| EmocastError::Internal(format!("server error: {e}")))?;

    tracing::info!("server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_from_service_section() {
        let service = ServiceConfig {
            bind_address: "0.0.0.0".into(),
            port: 9090,
            ..ServiceConfig::default()
        };
        let config = ServerConfig::from(&service);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9090);
    }
}
