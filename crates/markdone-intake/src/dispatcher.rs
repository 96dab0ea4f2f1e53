// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-consumer dispatcher for the merged update stream.
//!
//! Both ingestion sources -- the long-poll loop and the webhook endpoint --
//! normalize platform updates into [`ChatUpdate`] values and push them into
//! one mpsc channel. The dispatcher is the only consumer, so neither source
//! ever touches the pending store directly. Reaction-triggered
//! reconciliations are spawned onto their own tasks; the dispatcher never
//! waits on an external call.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use markdone_core::types::{ChatUpdate, IncomingMessage, ReactionEvent};

use crate::auth::AuthGate;
use crate::classifier::ReactionClassifier;
use crate::reconciler::IntakeReconciler;
use crate::store::PendingStore;

/// Routes decoded updates into the pending store and the reconciler.
pub struct UpdateDispatcher {
    store: Arc<PendingStore>,
    classifier: ReactionClassifier,
    reconciler: Arc<IntakeReconciler>,
    gate: AuthGate,
}

impl UpdateDispatcher {
    pub fn new(
        store: Arc<PendingStore>,
        classifier: ReactionClassifier,
        reconciler: Arc<IntakeReconciler>,
        gate: AuthGate,
    ) -> Self {
        Self {
            store,
            classifier,
            reconciler,
            gate,
        }
    }

    /// Consume updates until the channel closes or `cancel` fires.
    pub async fn run(&self, mut updates: mpsc::Receiver<ChatUpdate>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("dispatcher shutting down");
                    break;
                }
                maybe_update = updates.recv() => {
                    match maybe_update {
                        Some(update) => self.dispatch(update),
                        None => {
                            info!("update channel closed, dispatcher stopping");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Route one update. Synchronous: storage writes are lock-only and
    /// reconciliations run on their own tasks.
    pub fn dispatch(&self, update: ChatUpdate) {
        match update {
            ChatUpdate::Message(msg) => self.handle_message(msg),
            ChatUpdate::Reaction(event) => self.handle_reaction(event),
            ChatUpdate::Other => {
                debug!("ignoring unrecognized update kind");
            }
        }
    }

    fn handle_message(&self, msg: IncomingMessage) {
        if !self.gate.is_authorized(msg.sender) {
            // Stored anyway: harmless, since the sender can never confirm it.
            debug!(
                conversation = msg.conversation.0,
                message = msg.message.0,
                sender = ?msg.sender,
                "storing message from unauthorized sender"
            );
        }

        debug!(
            conversation = msg.conversation.0,
            message = msg.message.0,
            chars = msg.text.chars().count(),
            "message stored pending confirmation"
        );
        self.store.put(msg.key(), msg.text);
    }

    fn handle_reaction(&self, event: ReactionEvent) {
        if !self.classifier.is_confirm_trigger(&event) {
            debug!(
                conversation = event.conversation.0,
                message = event.message.0,
                "reaction without confirm marker dropped"
            );
            return;
        }

        let reconciler = self.reconciler.clone();
        tokio::spawn(async move {
            reconciler.try_confirm(event).await;
        });
    }
}
