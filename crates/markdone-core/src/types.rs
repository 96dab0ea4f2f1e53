// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the intake pipeline and the platform adapters.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifier of a conversation (a Telegram chat).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub i64);

/// Identifier of a message within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub i32);

/// Identifier of a chat platform user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

/// Identifier of a created record in the external record store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

/// Composite key addressing one pending intake entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntakeKey {
    pub conversation: ConversationId,
    pub message: MessageId,
}

impl IntakeKey {
    pub fn new(conversation: ConversationId, message: MessageId) -> Self {
        Self {
            conversation,
            message,
        }
    }
}

/// Processing status of a pending intake entry.
///
/// `Confirmed` and `Failed` are terminal: an entry reaching either is
/// removed from the store immediately, so only `Stored` and `Confirming`
/// are ever observable in the store itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum IntakeStatus {
    Stored,
    Confirming,
    Confirmed,
    Failed,
}

/// A normalized message-kind update (new message or edit).
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub conversation: ConversationId,
    pub message: MessageId,
    /// Absent for channel posts and other senderless messages.
    pub sender: Option<UserId>,
    pub text: String,
}

impl IncomingMessage {
    pub fn key(&self) -> IntakeKey {
        IntakeKey::new(self.conversation, self.message)
    }
}

/// A normalized reaction-kind update: the full marker list on a message
/// after a reaction change, as reported by the platform.
#[derive(Debug, Clone)]
pub struct ReactionEvent {
    pub conversation: ConversationId,
    pub message: MessageId,
    /// The user whose reaction changed. Absent for anonymous actors.
    pub actor: Option<UserId>,
    /// Plain emoji markers present after the change. Custom and paid
    /// reactions are dropped during decoding; they can never confirm.
    pub markers: Vec<String>,
}

impl ReactionEvent {
    pub fn key(&self) -> IntakeKey {
        IntakeKey::new(self.conversation, self.message)
    }
}

/// One update flowing through the dispatcher, regardless of which
/// ingestion channel delivered it.
#[derive(Debug, Clone)]
pub enum ChatUpdate {
    /// A new message or an edit to an existing one. Both carry overwrite
    /// semantics in the pending store, so they share a variant.
    Message(IncomingMessage),
    /// A reaction change on some message.
    Reaction(ReactionEvent),
    /// Anything else the platform delivers; logged and dropped.
    Other,
}
