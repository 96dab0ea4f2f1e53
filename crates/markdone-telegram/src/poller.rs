// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-poll ingestion loop.
//!
//! Pulls updates from the Bot API with `getUpdates` and forwards the
//! decoded results into the shared update channel. Reaction changes are
//! not delivered over long polling, so `allowed_updates` requests only
//! message and edit updates; confirmations arrive through the gateway.

use teloxide::prelude::*;
use teloxide::requests::Request;
use teloxide::types::AllowedUpdate;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use markdone_core::types::ChatUpdate;

use crate::convert::decode_update;

/// Delay before retrying after a failed `getUpdates` call.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Long-poll loop feeding the update channel.
pub struct UpdatePoller {
    bot: Bot,
    tx: mpsc::Sender<ChatUpdate>,
    poll_timeout: u32,
}

impl UpdatePoller {
    pub fn new(bot: Bot, tx: mpsc::Sender<ChatUpdate>, poll_timeout_secs: u32) -> Self {
        Self {
            bot,
            tx,
            poll_timeout: poll_timeout_secs,
        }
    }

    /// Run until cancelled or the update channel closes.
    pub async fn run(self, cancel: CancellationToken) {
        info!(poll_timeout_secs = self.poll_timeout, "starting update poller");

        let mut offset: Option<i32> = None;

        loop {
            let mut request = self
                .bot
                .get_updates()
                .timeout(self.poll_timeout)
                .allowed_updates([AllowedUpdate::Message, AllowedUpdate::EditedMessage]);
            if let Some(offset) = offset {
                request = request.offset(offset);
            }

            let updates = tokio::select! {
                result = request.send() => result,
                _ = cancel.cancelled() => {
                    info!("update poller shutting down");
                    return;
                }
            };

            let updates = match updates {
                Ok(updates) => updates,
                Err(err) => {
                    warn!(error = %err, "getUpdates failed, backing off");
                    tokio::select! {
                        _ = tokio::time::sleep(POLL_RETRY_DELAY) => continue,
                        _ = cancel.cancelled() => {
                            info!("update poller shutting down");
                            return;
                        }
                    }
                }
            };

            for update in updates {
                offset = Some(update.id.as_offset());
                debug!(update_id = update.id.0, "received update");

                if self.tx.send(decode_update(update)).await.is_err() {
                    // Dispatcher is gone; nothing left to feed.
                    warn!("update channel closed, stopping poller");
                    return;
                }
            }
        }
    }
}
