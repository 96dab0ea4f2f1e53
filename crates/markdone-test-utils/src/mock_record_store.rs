// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock record store with scripted outcomes and call capture.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use markdone_core::error::CreateRecordError;
use markdone_core::traits::RecordStore;
use markdone_core::types::RecordId;

/// One scripted response for a `create_record` call.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    /// Succeed with the given record id.
    Success(String),
    /// Fail with a transient (retryable) error.
    Transient,
    /// Fail with a validation (non-retryable) error.
    Validation,
}

/// A mock record store for testing the reconciler.
///
/// Outcomes are consumed front-to-back from a scripted queue; once the
/// queue is empty every call succeeds with a fresh uuid. All call titles
/// are captured for assertion.
pub struct MockRecordStore {
    script: Mutex<VecDeque<ScriptedOutcome>>,
    calls: Mutex<Vec<String>>,
    /// Artificial latency per call, for interleaving tests.
    delay: Option<Duration>,
}

impl MockRecordStore {
    /// Create a mock where every call succeeds.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Create a mock that replays the given outcomes in order, then succeeds.
    pub fn with_script(outcomes: Vec<ScriptedOutcome>) -> Self {
        Self {
            script: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Create a mock where every call fails with a transient error.
    ///
    /// "Every" is approximated by a long script; intake retry budgets are
    /// single digits.
    pub fn always_transient() -> Self {
        Self::with_script(vec![ScriptedOutcome::Transient; 64])
    }

    /// Add artificial latency to each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Titles passed to `create_record`, in call order.
    pub async fn captured_titles(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    /// Number of `create_record` invocations so far.
    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

impl Default for MockRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn create_record(&self, title: &str) -> Result<RecordId, CreateRecordError> {
        self.calls.lock().await.push(title.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.script.lock().await.pop_front() {
            None => Ok(RecordId(format!("mock-{}", uuid::Uuid::new_v4()))),
            Some(ScriptedOutcome::Success(id)) => Ok(RecordId(id)),
            Some(ScriptedOutcome::Transient) => Err(CreateRecordError::Transient {
                message: "scripted transient failure".into(),
                source: None,
            }),
            Some(ScriptedOutcome::Validation) => Err(CreateRecordError::Validation {
                message: "scripted validation failure".into(),
            }),
        }
    }
}
