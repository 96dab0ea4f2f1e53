// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook gateway for Markdone.
//!
//! Telegram pushes reaction updates to a webhook; long polling never sees
//! them. This crate hosts that endpoint and feeds decoded updates into the
//! same channel the poller writes to, so the dispatcher stays the single
//! consumer regardless of which path an update arrived on.

pub mod handlers;
pub mod server;

pub use server::{build_router, start_server, GatewayState, ServerConfig};
