// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decoding of Telegram updates into the channel-agnostic [`ChatUpdate`].
//!
//! Both ingestion paths go through here: the long-poll loop decodes
//! [`Update`] values it already holds, the webhook endpoint decodes raw
//! JSON payloads. Everything that is not a text message, an edit, or a
//! reaction change maps to [`ChatUpdate::Other`].

use teloxide::types::{Message, MessageReactionUpdated, ReactionType, Update, UpdateKind};
use tracing::debug;

use markdone_core::types::{
    ChatUpdate, ConversationId, IncomingMessage, MessageId, ReactionEvent, UserId,
};

/// Decode one Telegram update into the internal update type.
pub fn decode_update(update: Update) -> ChatUpdate {
    match update.kind {
        UpdateKind::Message(msg) | UpdateKind::EditedMessage(msg) => decode_message(msg),
        UpdateKind::MessageReaction(reaction) => decode_reaction(reaction),
        _ => ChatUpdate::Other,
    }
}

/// Decode a raw webhook payload.
///
/// Malformed payloads error (the gateway answers 400); structurally valid
/// updates of unknown kind decode to [`ChatUpdate::Other`].
pub fn decode_json(payload: serde_json::Value) -> Result<ChatUpdate, serde_json::Error> {
    // Teloxide's custom `Update` deserializer silently falls back to
    // `UpdateKind::Error` when driven by `serde_json::Value`'s deserializer,
    // so parse from the serialized text instead.
    serde_json::from_str::<Update>(&payload.to_string()).map(decode_update)
}

fn decode_message(msg: Message) -> ChatUpdate {
    // Only plain text can become a task title; media and service messages
    // are dropped here rather than stored unconfirmable.
    let Some(text) = msg.text() else {
        debug!(message = msg.id.0, "ignoring non-text message");
        return ChatUpdate::Other;
    };

    ChatUpdate::Message(IncomingMessage {
        conversation: ConversationId(msg.chat.id.0),
        message: MessageId(msg.id.0),
        sender: msg.from.as_ref().map(|u| UserId(u.id.0)),
        text: text.to_string(),
    })
}

fn decode_reaction(reaction: MessageReactionUpdated) -> ChatUpdate {
    // The marker list reflects the state after the change. Custom-emoji and
    // paid reactions carry no plain emoji and can never be the confirm
    // marker, so they are dropped from the list.
    let markers = reaction
        .new_reaction
        .iter()
        .filter_map(|r| match r {
            ReactionType::Emoji { emoji } => Some(emoji.clone()),
            _ => None,
        })
        .collect();

    ChatUpdate::Reaction(ReactionEvent {
        conversation: ConversationId(reaction.chat.id.0),
        message: MessageId(reaction.message_id.0),
        actor: reaction.user().map(|u| UserId(u.id.0)),
        markers,
    })
}
