// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Confirm-trigger classification of reaction events.

use markdone_core::types::ReactionEvent;

/// Decides whether a reaction event is the confirm trigger or noise.
///
/// An event triggers iff the configured confirm emoji appears anywhere in
/// its post-change marker list; whatever else is present is ignored, not an
/// error. A withdrawal of the confirm marker yields a list without it and is
/// therefore non-triggering -- once confirmation is in flight, withdrawing
/// the reaction does not roll it back.
#[derive(Debug, Clone)]
pub struct ReactionClassifier {
    confirm_emoji: String,
}

impl ReactionClassifier {
    pub fn new(confirm_emoji: impl Into<String>) -> Self {
        Self {
            confirm_emoji: confirm_emoji.into(),
        }
    }

    /// The emoji this classifier triggers on.
    pub fn confirm_emoji(&self) -> &str {
        &self.confirm_emoji
    }

    /// Returns true iff the confirm marker is present in `event`.
    pub fn is_confirm_trigger(&self, event: &ReactionEvent) -> bool {
        event.markers.iter().any(|m| *m == self.confirm_emoji)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdone_core::types::{ConversationId, MessageId, UserId};

    fn event(markers: &[&str]) -> ReactionEvent {
        ReactionEvent {
            conversation: ConversationId(1),
            message: MessageId(100),
            actor: Some(UserId(7)),
            markers: markers.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn triggers_on_confirm_marker() {
        let classifier = ReactionClassifier::new("👍");
        assert!(classifier.is_confirm_trigger(&event(&["👍"])));
    }

    #[test]
    fn triggers_when_mixed_with_other_markers() {
        let classifier = ReactionClassifier::new("👍");
        assert!(classifier.is_confirm_trigger(&event(&["🔥", "👍", "❤"])));
    }

    #[test]
    fn ignores_non_confirming_markers() {
        let classifier = ReactionClassifier::new("👍");
        assert!(!classifier.is_confirm_trigger(&event(&["🔥", "❤"])));
    }

    #[test]
    fn withdrawal_is_non_triggering() {
        // A reaction-removed event reports the markers left after the
        // change; the confirm marker is gone, so nothing triggers.
        let classifier = ReactionClassifier::new("👍");
        assert!(!classifier.is_confirm_trigger(&event(&[])));
    }
}
