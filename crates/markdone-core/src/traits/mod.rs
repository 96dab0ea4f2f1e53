// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for Markdone's external collaborators.
//!
//! The intake pipeline only ever talks to the record store and the chat
//! platform through these traits, so tests can substitute deterministic
//! stubs. All traits use `#[async_trait]` for dynamic dispatch.

pub mod record_store;
pub mod reflector;

pub use record_store::RecordStore;
pub use reflector::StatusReflector;
