// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notion record-store adapter.
//!
//! Implements [`RecordStore`](markdone_core::traits::RecordStore) by
//! creating a page in a configured Notion database for each confirmed task.

pub mod client;
pub mod types;

pub use client::NotionClient;
