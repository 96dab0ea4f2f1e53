// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./markdone.toml` > `~/.config/markdone/markdone.toml`
//! > `/etc/markdone/markdone.toml` with environment variable overrides via
//! `MARKDONE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MarkdoneConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/markdone/markdone.toml` (system-wide)
/// 3. `~/.config/markdone/markdone.toml` (user XDG config)
/// 4. `./markdone.toml` (local directory)
/// 5. `MARKDONE_*` environment variables
pub fn load_config() -> Result<MarkdoneConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MarkdoneConfig::default()))
        .merge(Toml::file("/etc/markdone/markdone.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("markdone/markdone.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("markdone.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and for callers that already hold the TOML text.
pub fn load_config_from_str(toml_content: &str) -> Result<MarkdoneConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MarkdoneConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MarkdoneConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MarkdoneConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `MARKDONE_TELEGRAM_BOT_TOKEN` must map
/// to `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("MARKDONE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped,
        // e.g. MARKDONE_TELEGRAM_BOT_TOKEN -> "telegram_bot_token".
        let mapped = key
            .as_str()
            .replacen("agent_", "agent.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("notion_", "notion.", 1)
            .replacen("intake_", "intake.", 1);
        mapped.into()
    })
}
