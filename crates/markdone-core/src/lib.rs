// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Markdone task-capture bot.
//!
//! Provides the foundational types, error enums, and adapter traits shared
//! by the intake pipeline and the platform adapter crates.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{CreateRecordError, MarkdoneError};
pub use types::{ConversationId, IntakeKey, IntakeStatus, MessageId, RecordId, UserId};

pub use traits::{RecordStore, StatusReflector};
