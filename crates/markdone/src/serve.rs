// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `markdone serve` command implementation.
//!
//! Wires the update pipeline together: Telegram long polling and the
//! webhook gateway feed one channel, a single dispatcher consumes it, and
//! confirmed tasks land in Notion.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use markdone_config::MarkdoneConfig;
use markdone_core::error::MarkdoneError;
use markdone_gateway::{GatewayState, ServerConfig};
use markdone_intake::{
    AuthGate, IntakeReconciler, PendingStore, ReactionClassifier, RetryPolicy, UpdateDispatcher,
};
use markdone_notion::NotionClient;
use markdone_telegram::{TelegramReflector, UpdatePoller};

use crate::shutdown;

/// Capacity of the shared update channel.
const UPDATE_CHANNEL_CAPACITY: usize = 512;

/// Runs the `markdone serve` command.
pub async fn run_serve(config: MarkdoneConfig) -> Result<(), MarkdoneError> {
    init_tracing(&config.agent.log_level);

    info!("starting markdone serve");

    let gate = AuthGate::new(config.telegram.authorized_user.map(markdone_core::types::UserId));
    if gate.is_permissive() {
        warn!("telegram.authorized_user is unset, accepting confirmations from anyone");
    }

    let bot = markdone_telegram::build_bot(&config.telegram)?;
    match markdone_telegram::check_connectivity(&bot).await {
        Ok(username) => info!(bot = %username, "bot token verified"),
        Err(err) => warn!(error = %err, "could not verify bot token at startup"),
    }

    let notion = build_notion_client(&config)?;

    let store = Arc::new(PendingStore::new());
    let classifier = ReactionClassifier::new(config.telegram.confirm_emoji.clone());
    let reflector = Arc::new(TelegramReflector::new(
        bot.clone(),
        config.telegram.processing_emoji.clone(),
        config.telegram.success_emoji.clone(),
        config.telegram.failure_emoji.clone(),
    ));
    let policy = RetryPolicy {
        max_attempts: config.intake.max_attempts,
        base_delay: Duration::from_secs(config.intake.retry_delay_secs),
        request_timeout: Duration::from_secs(config.notion.request_timeout_secs),
    };
    let reconciler = Arc::new(IntakeReconciler::new(
        store.clone(),
        Arc::new(notion),
        reflector,
        gate,
        policy,
    ));
    let dispatcher = UpdateDispatcher::new(store, classifier, reconciler, gate);

    let (update_tx, update_rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
    let cancel = shutdown::install_signal_handler();

    let poller = UpdatePoller::new(bot, update_tx.clone(), config.telegram.poll_timeout_secs);
    let poller_handle = tokio::spawn(poller.run(cancel.clone()));

    let gateway_handle = if config.gateway.enabled {
        let server_config = ServerConfig {
            host: config.gateway.host.clone(),
            port: config.gateway.port,
            webhook_path: config.gateway.webhook_path.clone(),
        };
        let state = GatewayState {
            update_tx,
            secret_token: config.gateway.secret_token.clone(),
        };
        let gateway_cancel = cancel.clone();
        Some(tokio::spawn(async move {
            if let Err(err) =
                markdone_gateway::start_server(&server_config, state, gateway_cancel).await
            {
                error!(error = %err, "gateway server failed");
            }
        }))
    } else {
        // Telegram only pushes reaction updates to a webhook. Messages are
        // still captured over long polling, but none can be confirmed.
        warn!("gateway is disabled, reaction confirmation is unavailable");
        drop(update_tx);
        None
    };

    dispatcher.run(update_rx, cancel.clone()).await;

    let _ = poller_handle.await;
    if let Some(handle) = gateway_handle {
        let _ = handle.await;
    }

    info!("markdone serve shutdown complete");
    Ok(())
}

fn build_notion_client(config: &MarkdoneConfig) -> Result<NotionClient, MarkdoneError> {
    let api_token = config.notion.api_token.as_deref().ok_or_else(|| {
        MarkdoneError::Config("notion.api_token is required to run serve".to_string())
    })?;
    let database_id = config.notion.database_id.clone().ok_or_else(|| {
        MarkdoneError::Config("notion.database_id is required to run serve".to_string())
    })?;

    NotionClient::new(
        api_token,
        &config.notion.api_version,
        database_id,
        Duration::from_secs(config.notion.request_timeout_secs),
    )
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("markdone={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
