// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The reaction-confirmed task-intake pipeline.
//!
//! A chat message becomes a task only after the sender reacts to it with
//! the confirm marker. This crate reconciles the two independently-arriving
//! update streams against the in-memory [`PendingStore`]:
//!
//! - message-kind updates upsert the store (edits overwrite in place),
//! - reaction-kind updates pass the [`ReactionClassifier`] and, when they
//!   carry the confirm marker, hand the pending entry to the
//!   [`IntakeReconciler`], which claims it atomically, creates the task
//!   record with bounded retries, and reflects the outcome back onto the
//!   original message.
//!
//! The store is in-memory only; unconfirmed messages do not survive a
//! restart.

pub mod auth;
pub mod classifier;
pub mod dispatcher;
pub mod reconciler;
pub mod store;

pub use auth::AuthGate;
pub use classifier::ReactionClassifier;
pub use dispatcher::UpdateDispatcher;
pub use reconciler::{IntakeReconciler, RetryPolicy};
pub use store::{PendingIntake, PendingStore};
