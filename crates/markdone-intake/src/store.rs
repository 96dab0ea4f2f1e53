// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store of unconfirmed messages.
//!
//! The store is the only shared mutable state in the intake pipeline. All
//! mutations are serialized per key through the map's shard locks; no lock
//! is ever held across a network call. Entries are volatile: a process
//! restart forgets everything unconfirmed.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use markdone_core::types::{IntakeKey, IntakeStatus};

/// One not-yet-confirmed chat message.
#[derive(Debug, Clone)]
pub struct PendingIntake {
    /// Latest text of the message; edits overwrite it in place.
    pub text: String,
    /// Current processing status. Terminal states are never observable
    /// here because reaching one removes the entry.
    pub status: IntakeStatus,
}

/// Keyed table of pending intake entries.
///
/// At most one entry exists per `(conversation, message)` key. The
/// `Stored -> Confirming` transition is a single atomic check-and-set
/// ([`begin_confirming`](PendingStore::begin_confirming)), which is what
/// makes duplicate reaction delivery safe.
#[derive(Debug, Default)]
pub struct PendingStore {
    entries: DashMap<IntakeKey, PendingIntake>,
}

impl PendingStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Upsert a message.
    ///
    /// A fresh key creates a `Stored` entry. An existing `Stored` entry has
    /// its text overwritten (edit semantics -- the latest edit wins at
    /// confirmation time). An entry already `Confirming` is left untouched:
    /// the reconciliation in flight owns it.
    pub fn put(&self, key: IntakeKey, text: String) {
        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if entry.status == IntakeStatus::Stored {
                    entry.text = text;
                } else {
                    debug!(
                        conversation = key.conversation.0,
                        message = key.message.0,
                        "edit arrived while entry is confirming, keeping original text"
                    );
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(PendingIntake {
                    text,
                    status: IntakeStatus::Stored,
                });
            }
        }
    }

    /// Fetch a snapshot of an entry.
    pub fn get(&self, key: IntakeKey) -> Option<PendingIntake> {
        self.entries.get(&key).map(|e| e.clone())
    }

    /// Remove an entry, if present.
    pub fn remove(&self, key: IntakeKey) {
        self.entries.remove(&key);
    }

    /// Atomic `Stored -> Confirming` check-and-set.
    ///
    /// Returns the stored text iff the entry exists and was `Stored`; the
    /// entry is left in `Confirming` so any concurrently delivered duplicate
    /// reaction observes a non-`Stored` status and becomes a no-op. The
    /// check and the transition happen under one shard lock.
    pub fn begin_confirming(&self, key: IntakeKey) -> Option<String> {
        let mut entry = self.entries.get_mut(&key)?;
        if entry.status != IntakeStatus::Stored {
            return None;
        }
        entry.status = IntakeStatus::Confirming;
        Some(entry.text.clone())
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdone_core::types::{ConversationId, MessageId};

    fn key(c: i64, m: i32) -> IntakeKey {
        IntakeKey::new(ConversationId(c), MessageId(m))
    }

    #[test]
    fn put_creates_stored_entry() {
        let store = PendingStore::new();
        store.put(key(1, 100), "Buy milk".into());

        let entry = store.get(key(1, 100)).unwrap();
        assert_eq!(entry.text, "Buy milk");
        assert_eq!(entry.status, IntakeStatus::Stored);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn put_overwrites_stored_text() {
        let store = PendingStore::new();
        store.put(key(1, 100), "Buy milk".into());
        store.put(key(1, 100), "Buy oat milk".into());

        let entry = store.get(key(1, 100)).unwrap();
        assert_eq!(entry.text, "Buy oat milk");
        assert_eq!(store.len(), 1, "re-sending a key must not duplicate it");
    }

    #[test]
    fn put_does_not_clobber_confirming_entry() {
        let store = PendingStore::new();
        store.put(key(1, 100), "original".into());
        assert!(store.begin_confirming(key(1, 100)).is_some());

        store.put(key(1, 100), "late edit".into());

        let entry = store.get(key(1, 100)).unwrap();
        assert_eq!(entry.text, "original");
        assert_eq!(entry.status, IntakeStatus::Confirming);
    }

    #[test]
    fn begin_confirming_returns_text_once() {
        let store = PendingStore::new();
        store.put(key(1, 100), "Buy milk".into());

        assert_eq!(store.begin_confirming(key(1, 100)).as_deref(), Some("Buy milk"));
        // Second CAS on the same key observes Confirming and refuses.
        assert!(store.begin_confirming(key(1, 100)).is_none());
    }

    #[test]
    fn begin_confirming_on_absent_key_is_none() {
        let store = PendingStore::new();
        assert!(store.begin_confirming(key(9, 9)).is_none());
    }

    #[test]
    fn remove_clears_entry() {
        let store = PendingStore::new();
        store.put(key(1, 100), "x".into());
        store.remove(key(1, 100));
        assert!(store.get(key(1, 100)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn keys_are_independent() {
        let store = PendingStore::new();
        store.put(key(1, 100), "a".into());
        store.put(key(1, 101), "b".into());
        store.put(key(2, 100), "c".into());

        assert!(store.begin_confirming(key(1, 100)).is_some());
        assert_eq!(store.get(key(1, 101)).unwrap().status, IntakeStatus::Stored);
        assert_eq!(store.get(key(2, 100)).unwrap().status, IntakeStatus::Stored);
    }
}
