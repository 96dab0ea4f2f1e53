// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record-store adapter trait for the structured-data backend.

use async_trait::async_trait;

use crate::error::CreateRecordError;
use crate::types::RecordId;

/// Adapter for the external structured-data store that holds confirmed tasks.
///
/// Durability of confirmed tasks is delegated entirely to the implementation;
/// Markdone itself keeps no record state. Implementations classify failures
/// into [`CreateRecordError::Transient`] (retried by the reconciler) and
/// [`CreateRecordError::Validation`] (terminal).
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Creates one task record titled `title`.
    ///
    /// Must be safe to call again after a transient failure: the reconciler
    /// retries a single logical creation up to its attempt budget.
    async fn create_record(&self, title: &str) -> Result<RecordId, CreateRecordError>;
}
