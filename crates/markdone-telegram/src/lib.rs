// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter.
//!
//! Three concerns live here: decoding Bot API updates into the internal
//! [`ChatUpdate`](markdone_core::types::ChatUpdate) type ([`convert`]),
//! pulling updates over long polling ([`poller`]), and reflecting intake
//! status back onto messages as reactions ([`reflector`]).

pub mod convert;
pub mod poller;
pub mod reflector;

use teloxide::prelude::*;
use tracing::info;

use markdone_config::TelegramConfig;
use markdone_core::error::MarkdoneError;

pub use poller::UpdatePoller;
pub use reflector::TelegramReflector;

/// Build a Bot API client from configuration.
pub fn build_bot(config: &TelegramConfig) -> Result<Bot, MarkdoneError> {
    let token = config
        .bot_token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            MarkdoneError::Config("telegram.bot_token is required to run serve".to_string())
        })?;
    Ok(Bot::new(token))
}

/// Verify the bot token against the API with `getMe`.
///
/// Returns the bot's username for startup logging.
pub async fn check_connectivity(bot: &Bot) -> Result<String, MarkdoneError> {
    let me = bot.get_me().await.map_err(|err| MarkdoneError::Channel {
        message: "getMe failed, check the bot token".to_string(),
        source: Some(Box::new(err)),
    })?;

    let username = me.username().to_string();
    info!(bot = %username, "connected to Telegram");
    Ok(username)
}
