// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The intake state machine: `Stored -> Confirming -> {Confirmed | Failed}`.
//!
//! One reconciliation attempt drives a single pending entry from a
//! qualifying reaction to a terminal outcome: authorization check, atomic
//! claim of the entry, bounded-retry record creation, and exactly one
//! terminal marker on the originating message.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use markdone_core::error::CreateRecordError;
use markdone_core::traits::{RecordStore, StatusReflector};
use markdone_core::types::{ReactionEvent, RecordId};

use crate::auth::AuthGate;
use crate::store::PendingStore;

/// Retry policy for the external record-creation call.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts per logical creation, first try included.
    pub max_attempts: u32,
    /// Base delay between attempts; the wait grows linearly with the
    /// number of attempts already made.
    pub base_delay: Duration,
    /// Per-call timeout, independent of the platform's own deadline.
    pub request_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            request_timeout: Duration::from_secs(5),
        }
    }
}

/// Drives pending entries through confirmation.
///
/// The reconciler borrows entries from the [`PendingStore`] only through
/// its atomic check-and-set; it never holds a store lock across the
/// record-store call.
pub struct IntakeReconciler {
    store: Arc<PendingStore>,
    records: Arc<dyn RecordStore>,
    reflector: Arc<dyn StatusReflector>,
    gate: AuthGate,
    policy: RetryPolicy,
}

impl IntakeReconciler {
    pub fn new(
        store: Arc<PendingStore>,
        records: Arc<dyn RecordStore>,
        reflector: Arc<dyn StatusReflector>,
        gate: AuthGate,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            store,
            records,
            reflector,
            gate,
            policy,
        }
    }

    /// Attempt to confirm the entry addressed by a qualifying reaction.
    ///
    /// No-ops silently when the actor is unauthorized (no information leaks
    /// to the denied actor), when the key has no pending entry, or when the
    /// entry is already being confirmed -- the last is the idempotency guard
    /// that makes duplicated reaction delivery safe.
    pub async fn try_confirm(&self, event: ReactionEvent) {
        let key = event.key();

        if !self.gate.is_authorized(event.actor) {
            debug!(
                conversation = key.conversation.0,
                message = key.message.0,
                actor = ?event.actor,
                "confirm reaction from unauthorized actor ignored"
            );
            return;
        }

        let Some(text) = self.store.begin_confirming(key) else {
            debug!(
                conversation = key.conversation.0,
                message = key.message.0,
                "confirm reaction without a stored entry, nothing to do"
            );
            return;
        };

        // Visible feedback that work has started. Best-effort: a marker
        // failure must not block the pipeline.
        if let Err(e) = self
            .reflector
            .mark_processing(key.conversation, key.message)
            .await
        {
            warn!(error = %e, "failed to apply processing marker");
        }

        let outcome = self.create_with_retry(&text).await;

        // Terminal either way: the entry leaves the store before the
        // outcome marker is applied.
        self.store.remove(key);

        match outcome {
            Ok(record_id) => {
                info!(
                    conversation = key.conversation.0,
                    message = key.message.0,
                    record_id = %record_id.0,
                    "task record created"
                );
                if let Err(e) = self
                    .reflector
                    .mark_success(key.conversation, key.message)
                    .await
                {
                    warn!(error = %e, "failed to apply success marker");
                }
            }
            Err(e) => {
                warn!(
                    conversation = key.conversation.0,
                    message = key.message.0,
                    error = %e,
                    "task creation failed"
                );
                if let Err(e) = self
                    .reflector
                    .mark_failure(key.conversation, key.message)
                    .await
                {
                    warn!(error = %e, "failed to apply failure marker");
                }
            }
        }
    }

    /// Run the record-creation call under the retry policy.
    ///
    /// Only transient failures consume further attempts; validation
    /// failures (including an empty derived title) terminate immediately.
    async fn create_with_retry(&self, text: &str) -> Result<RecordId, CreateRecordError> {
        let title = text.trim();
        if title.is_empty() {
            return Err(CreateRecordError::Validation {
                message: "message text is empty, no task title can be derived".into(),
            });
        }

        let mut last_error = None;

        for attempt in 1..=self.policy.max_attempts {
            if attempt > 1 {
                let delay = self.policy.base_delay * (attempt - 1);
                debug!(attempt, delay_ms = delay.as_millis() as u64, "retrying record creation");
                tokio::time::sleep(delay).await;
            }

            let result = tokio::time::timeout(
                self.policy.request_timeout,
                self.records.create_record(title),
            )
            .await;

            let error = match result {
                Ok(Ok(record_id)) => return Ok(record_id),
                Ok(Err(e)) => e,
                Err(_) => CreateRecordError::Transient {
                    message: format!(
                        "record creation timed out after {:?}",
                        self.policy.request_timeout
                    ),
                    source: None,
                },
            };

            if !error.is_transient() {
                return Err(error);
            }

            warn!(attempt, error = %error, "transient record-store failure");
            last_error = Some(error);
        }

        Err(last_error.unwrap_or(CreateRecordError::Transient {
            message: "record creation failed with no attempts made".into(),
            source: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdone_core::types::{ConversationId, IntakeKey, MessageId, UserId};
    use markdone_test_utils::{MarkerKind, MockRecordStore, MockReflector, ScriptedOutcome};

    const CHAT: ConversationId = ConversationId(1);
    const MSG: MessageId = MessageId(100);
    const USER: UserId = UserId(42);

    fn key() -> IntakeKey {
        IntakeKey::new(CHAT, MSG)
    }

    fn confirm_event() -> ReactionEvent {
        ReactionEvent {
            conversation: CHAT,
            message: MSG,
            actor: Some(USER),
            markers: vec!["👍".into()],
        }
    }

    /// Fast policy so retry tests do not sleep for real seconds.
    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            request_timeout: Duration::from_millis(200),
        }
    }

    struct Fixture {
        store: Arc<PendingStore>,
        records: Arc<MockRecordStore>,
        reflector: Arc<MockReflector>,
        reconciler: IntakeReconciler,
    }

    fn fixture_with(records: MockRecordStore, gate: AuthGate) -> Fixture {
        let store = Arc::new(PendingStore::new());
        let records = Arc::new(records);
        let reflector = Arc::new(MockReflector::new());
        let reconciler = IntakeReconciler::new(
            store.clone(),
            records.clone(),
            reflector.clone(),
            gate,
            fast_policy(),
        );
        Fixture {
            store,
            records,
            reflector,
            reconciler,
        }
    }

    #[tokio::test]
    async fn end_to_end_confirmation_creates_record_and_marks_success() {
        let f = fixture_with(
            MockRecordStore::with_script(vec![ScriptedOutcome::Success("abc".into())]),
            AuthGate::new(Some(USER)),
        );
        f.store.put(key(), "Buy milk".into());

        f.reconciler.try_confirm(confirm_event()).await;

        assert_eq!(f.records.captured_titles().await, vec!["Buy milk"]);
        assert_eq!(f.reflector.count_of(MarkerKind::Processing).await, 1);
        assert_eq!(f.reflector.count_of(MarkerKind::Success).await, 1);
        assert_eq!(f.reflector.count_of(MarkerKind::Failure).await, 0);
        assert!(f.store.get(key()).is_none(), "entry must be removed");
    }

    #[tokio::test]
    async fn orphan_reaction_is_a_no_op() {
        let f = fixture_with(MockRecordStore::new(), AuthGate::new(Some(USER)));

        f.reconciler.try_confirm(confirm_event()).await;

        assert_eq!(f.records.call_count().await, 0);
        assert!(f.reflector.applied_markers().await.is_empty());
    }

    #[tokio::test]
    async fn unauthorized_actor_cannot_confirm() {
        let f = fixture_with(MockRecordStore::new(), AuthGate::new(Some(USER)));
        f.store.put(key(), "Buy milk".into());

        let mut event = confirm_event();
        event.actor = Some(UserId(999));
        f.reconciler.try_confirm(event).await;

        assert_eq!(f.records.call_count().await, 0);
        assert!(f.store.get(key()).is_some(), "entry stays stored");

        // The authorized identity still can.
        f.reconciler.try_confirm(confirm_event()).await;
        assert_eq!(f.records.call_count().await, 1);
    }

    #[tokio::test]
    async fn retry_exhaustion_marks_failure_and_removes_entry() {
        let f = fixture_with(MockRecordStore::always_transient(), AuthGate::new(Some(USER)));
        f.store.put(key(), "Buy milk".into());

        f.reconciler.try_confirm(confirm_event()).await;

        assert_eq!(f.records.call_count().await, 3, "exactly max_attempts calls");
        assert_eq!(f.reflector.count_of(MarkerKind::Failure).await, 1);
        assert_eq!(f.reflector.count_of(MarkerKind::Success).await, 0);
        assert!(f.store.get(key()).is_none());
    }

    #[tokio::test]
    async fn transient_then_success_consumes_two_attempts() {
        let f = fixture_with(
            MockRecordStore::with_script(vec![
                ScriptedOutcome::Transient,
                ScriptedOutcome::Success("r2".into()),
            ]),
            AuthGate::new(Some(USER)),
        );
        f.store.put(key(), "Buy milk".into());

        f.reconciler.try_confirm(confirm_event()).await;

        assert_eq!(f.records.call_count().await, 2);
        assert_eq!(f.reflector.count_of(MarkerKind::Success).await, 1);
    }

    #[tokio::test]
    async fn validation_failure_is_not_retried() {
        let f = fixture_with(
            MockRecordStore::with_script(vec![ScriptedOutcome::Validation]),
            AuthGate::new(Some(USER)),
        );
        f.store.put(key(), "Buy milk".into());

        f.reconciler.try_confirm(confirm_event()).await;

        assert_eq!(f.records.call_count().await, 1, "no retry on validation");
        assert_eq!(f.reflector.count_of(MarkerKind::Failure).await, 1);
        assert!(f.store.get(key()).is_none());
    }

    #[tokio::test]
    async fn whitespace_only_text_fails_without_any_external_call() {
        let f = fixture_with(MockRecordStore::new(), AuthGate::new(Some(USER)));
        f.store.put(key(), "   \n\t ".into());

        f.reconciler.try_confirm(confirm_event()).await;

        assert_eq!(f.records.call_count().await, 0);
        assert_eq!(f.reflector.count_of(MarkerKind::Failure).await, 1);
        assert!(f.store.get(key()).is_none());
    }

    #[tokio::test]
    async fn edit_wins_over_original_text() {
        let f = fixture_with(MockRecordStore::new(), AuthGate::new(Some(USER)));
        f.store.put(key(), "Buy milk".into());
        f.store.put(key(), "Buy oat milk".into());

        f.reconciler.try_confirm(confirm_event()).await;

        assert_eq!(f.records.captured_titles().await, vec!["Buy oat milk"]);
    }

    #[tokio::test]
    async fn duplicate_reactions_confirm_at_most_once() {
        let f = fixture_with(MockRecordStore::new(), AuthGate::new(Some(USER)));
        f.store.put(key(), "Buy milk".into());

        for _ in 0..5 {
            f.reconciler.try_confirm(confirm_event()).await;
        }

        assert_eq!(f.records.call_count().await, 1);
        assert_eq!(f.reflector.count_of(MarkerKind::Success).await, 1);
    }

    #[tokio::test]
    async fn concurrent_duplicates_take_one_transition() {
        let f = fixture_with(
            MockRecordStore::new().with_delay(Duration::from_millis(50)),
            AuthGate::new(Some(USER)),
        );
        f.store.put(key(), "Buy milk".into());

        let reconciler = Arc::new(f.reconciler);
        let a = {
            let r = reconciler.clone();
            tokio::spawn(async move { r.try_confirm(confirm_event()).await })
        };
        let b = {
            let r = reconciler.clone();
            tokio::spawn(async move { r.try_confirm(confirm_event()).await })
        };
        a.await.unwrap();
        b.await.unwrap();

        assert_eq!(f.records.call_count().await, 1, "one transition out of Stored");
        assert_eq!(f.reflector.count_of(MarkerKind::Success).await, 1);
    }

    #[tokio::test]
    async fn marker_failures_never_change_the_outcome() {
        let store = Arc::new(PendingStore::new());
        let records = Arc::new(MockRecordStore::new());
        let reflector = Arc::new(MockReflector::failing());
        let reconciler = IntakeReconciler::new(
            store.clone(),
            records.clone(),
            reflector.clone(),
            AuthGate::new(Some(USER)),
            fast_policy(),
        );
        store.put(key(), "Buy milk".into());

        reconciler.try_confirm(confirm_event()).await;

        // Record creation went through and the entry is gone even though
        // every reflector call errored.
        assert_eq!(records.call_count().await, 1);
        assert!(store.get(key()).is_none());
        assert_eq!(reflector.count_of(MarkerKind::Success).await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_record_store_counts_as_transient_timeout() {
        // Each call sleeps far past the per-call timeout; the paused clock
        // auto-advances, so the test runs instantly.
        let f = fixture_with(
            MockRecordStore::always_transient().with_delay(Duration::from_secs(60)),
            AuthGate::new(Some(USER)),
        );
        f.store.put(key(), "Buy milk".into());

        f.reconciler.try_confirm(confirm_event()).await;

        assert_eq!(f.records.call_count().await, 3);
        assert_eq!(f.reflector.count_of(MarkerKind::Failure).await, 1);
        assert!(f.store.get(key()).is_none());
    }
}
