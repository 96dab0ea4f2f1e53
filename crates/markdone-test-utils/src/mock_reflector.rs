// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock status reflector that records marker applications.

use async_trait::async_trait;
use tokio::sync::Mutex;

use markdone_core::error::MarkdoneError;
use markdone_core::traits::StatusReflector;
use markdone_core::types::{ConversationId, IntakeKey, MessageId};

/// The kind of marker a reflector call applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Processing,
    Success,
    Failure,
}

/// A mock reflector that captures every marker application.
///
/// Optionally fails all calls, for verifying that marker failures never
/// leak into reconciliation outcomes.
pub struct MockReflector {
    applied: Mutex<Vec<(MarkerKind, IntakeKey)>>,
    fail_all: bool,
}

impl MockReflector {
    pub fn new() -> Self {
        Self {
            applied: Mutex::new(Vec::new()),
            fail_all: false,
        }
    }

    /// Create a reflector whose every call returns an error.
    pub fn failing() -> Self {
        Self {
            applied: Mutex::new(Vec::new()),
            fail_all: true,
        }
    }

    /// All marker applications so far, in call order.
    pub async fn applied_markers(&self) -> Vec<(MarkerKind, IntakeKey)> {
        self.applied.lock().await.clone()
    }

    /// Count of applications of one marker kind, across all keys.
    pub async fn count_of(&self, kind: MarkerKind) -> usize {
        self.applied
            .lock()
            .await
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    async fn record(
        &self,
        kind: MarkerKind,
        conversation: ConversationId,
        message: MessageId,
    ) -> Result<(), MarkdoneError> {
        self.applied
            .lock()
            .await
            .push((kind, IntakeKey::new(conversation, message)));

        if self.fail_all {
            Err(MarkdoneError::Channel {
                message: "mock reflector configured to fail".into(),
                source: None,
            })
        } else {
            Ok(())
        }
    }
}

impl Default for MockReflector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatusReflector for MockReflector {
    async fn mark_processing(
        &self,
        conversation: ConversationId,
        message: MessageId,
    ) -> Result<(), MarkdoneError> {
        self.record(MarkerKind::Processing, conversation, message).await
    }

    async fn mark_success(
        &self,
        conversation: ConversationId,
        message: MessageId,
    ) -> Result<(), MarkdoneError> {
        self.record(MarkerKind::Success, conversation, message).await
    }

    async fn mark_failure(
        &self,
        conversation: ConversationId,
        message: MessageId,
    ) -> Result<(), MarkdoneError> {
        self.record(MarkerKind::Failure, conversation, message).await
    }
}
