// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the Markdone workspace.
//!
//! Mock implementations of the [`RecordStore`](markdone_core::RecordStore)
//! and [`StatusReflector`](markdone_core::StatusReflector) adapter traits
//! with scripted outcomes and call capture for deterministic tests.

pub mod mock_record_store;
pub mod mock_reflector;

pub use mock_record_store::{MockRecordStore, ScriptedOutcome};
pub use mock_reflector::{MarkerKind, MockReflector};
