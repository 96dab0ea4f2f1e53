// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Markdone task-capture bot.

use thiserror::Error;

/// The primary error type used across Markdone crates.
#[derive(Debug, Error)]
pub enum MarkdoneError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Chat platform errors (polling failure, reaction API failure, decode problems).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Gateway HTTP server errors (bind failure, serve failure).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Failure modes of the external record-store `create_record` operation.
///
/// The reconciler's retry policy is driven by this classification: transient
/// failures consume a retry attempt, validation failures terminate
/// immediately.
#[derive(Debug, Error)]
pub enum CreateRecordError {
    /// Network failure, timeout, rate limiting, or a 5xx from the record store.
    #[error("transient record-store error: {message}")]
    Transient {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The request itself is unacceptable (empty title, schema mismatch, 4xx).
    #[error("record validation error: {message}")]
    Validation { message: String },
}

impl CreateRecordError {
    /// Returns true if a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, CreateRecordError::Transient { .. })
    }
}
