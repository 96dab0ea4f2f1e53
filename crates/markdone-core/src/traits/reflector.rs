// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status reflector trait: visible outcome markers on the original message.

use async_trait::async_trait;

use crate::error::MarkdoneError;
use crate::types::{ConversationId, MessageId};

/// Applies a visible status marker to the original chat message.
///
/// Each method replaces the bot's previous marker on the target message.
/// Callers treat all three as best-effort: a marker failure is logged and
/// never changes the outcome of the underlying task creation.
#[async_trait]
pub trait StatusReflector: Send + Sync + 'static {
    /// Marks the message as being processed (work has started).
    async fn mark_processing(
        &self,
        conversation: ConversationId,
        message: MessageId,
    ) -> Result<(), MarkdoneError>;

    /// Marks the message as successfully captured. Called at most once per
    /// completed reconciliation.
    async fn mark_success(
        &self,
        conversation: ConversationId,
        message: MessageId,
    ) -> Result<(), MarkdoneError>;

    /// Marks the message as failed after the retry budget was exhausted.
    /// Called at most once per completed reconciliation, mutually exclusive
    /// with [`mark_success`](Self::mark_success).
    async fn mark_failure(
        &self,
        conversation: ConversationId,
        message: MessageId,
    ) -> Result<(), MarkdoneError>;
}
