// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status reflection through message reactions.
//!
//! Outcome markers are set with `setMessageReaction`, replacing whatever
//! reaction the bot had on the message before. Callers treat failures as
//! best-effort; this type only reports them.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ReactionType;
use tracing::debug;

use markdone_core::error::MarkdoneError;
use markdone_core::traits::StatusReflector;
use markdone_core::types::{ConversationId, MessageId};

/// Reflects intake status onto the source message as bot reactions.
pub struct TelegramReflector {
    bot: Bot,
    processing_emoji: String,
    success_emoji: String,
    failure_emoji: String,
}

impl TelegramReflector {
    pub fn new(
        bot: Bot,
        processing_emoji: String,
        success_emoji: String,
        failure_emoji: String,
    ) -> Self {
        Self {
            bot,
            processing_emoji,
            success_emoji,
            failure_emoji,
        }
    }

    async fn set_marker(
        &self,
        conversation: ConversationId,
        message: MessageId,
        emoji: &str,
    ) -> Result<(), MarkdoneError> {
        debug!(
            conversation = conversation.0,
            message = message.0,
            emoji,
            "setting status reaction"
        );

        self.bot
            .set_message_reaction(ChatId(conversation.0), teloxide::types::MessageId(message.0))
            .reaction(vec![ReactionType::Emoji {
                emoji: emoji.to_owned(),
            }])
            .await
            .map_err(|err| MarkdoneError::Channel {
                message: format!("setMessageReaction failed for message {}", message.0),
                source: Some(Box::new(err)),
            })?;

        Ok(())
    }
}

#[async_trait]
impl StatusReflector for TelegramReflector {
    async fn mark_processing(
        &self,
        conversation: ConversationId,
        message: MessageId,
    ) -> Result<(), MarkdoneError> {
        self.set_marker(conversation, message, &self.processing_emoji)
            .await
    }

    async fn mark_success(
        &self,
        conversation: ConversationId,
        message: MessageId,
    ) -> Result<(), MarkdoneError> {
        self.set_marker(conversation, message, &self.success_emoji)
            .await
    }

    async fn mark_failure(
        &self,
        conversation: ConversationId,
        message: MessageId,
    ) -> Result<(), MarkdoneError> {
        self.set_marker(conversation, message, &self.failure_emoji)
            .await
    }
}
