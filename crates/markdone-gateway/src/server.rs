// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Hosts the Telegram webhook endpoint. Reaction updates are delivered only
//! over a webhook, so with this server disabled nothing can be confirmed.

use axum::routing::{get, post};
use axum::Router;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use markdone_core::error::MarkdoneError;
use markdone_core::types::ChatUpdate;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Channel feeding decoded updates into the dispatcher.
    pub update_tx: mpsc::Sender<ChatUpdate>,
    /// Expected `X-Telegram-Bot-Api-Secret-Token` value. `None` disables
    /// the check.
    pub secret_token: Option<String>,
}

/// Gateway server configuration (mirrors GatewayConfig from markdone-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// URL path the webhook listens on.
    pub webhook_path: String,
}

/// Build the gateway router.
///
/// Split from [`start_server`] so tests can drive the router directly.
pub fn build_router(config: &ServerConfig, state: GatewayState) -> Router {
    Router::new()
        .route(&config.webhook_path, post(handlers::post_webhook))
        .route("/health", get(handlers::get_health))
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Binds the configured host:port and serves the webhook until the
/// cancellation token fires.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), MarkdoneError> {
    let app = build_router(config, state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MarkdoneError::Gateway {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| MarkdoneError::Gateway {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
