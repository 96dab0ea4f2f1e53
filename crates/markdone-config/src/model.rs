// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Markdone.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Markdone configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MarkdoneConfig {
    /// Bot identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Webhook push-endpoint settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Notion record-store settings.
    #[serde(default)]
    pub notion: NotionConfig,

    /// Intake reconciler settings.
    #[serde(default)]
    pub intake: IntakeConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the bot, used in log output.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "markdone".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required to run `serve`.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// The single authorized Telegram user id. `None` leaves the
    /// authorization gate permissive, which is only acceptable for
    /// development use.
    #[serde(default)]
    pub authorized_user: Option<u64>,

    /// The reaction emoji that promotes a stored message to task creation.
    #[serde(default = "default_confirm_emoji")]
    pub confirm_emoji: String,

    /// Emoji the bot sets while task creation is in flight.
    #[serde(default = "default_processing_emoji")]
    pub processing_emoji: String,

    /// Emoji the bot sets after the task record was created.
    #[serde(default = "default_success_emoji")]
    pub success_emoji: String,

    /// Emoji the bot sets after the retry budget was exhausted.
    #[serde(default = "default_failure_emoji")]
    pub failure_emoji: String,

    /// Long-poll timeout for getUpdates, in seconds.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u32,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            authorized_user: None,
            confirm_emoji: default_confirm_emoji(),
            processing_emoji: default_processing_emoji(),
            success_emoji: default_success_emoji(),
            failure_emoji: default_failure_emoji(),
            poll_timeout_secs: default_poll_timeout_secs(),
        }
    }
}

fn default_confirm_emoji() -> String {
    "👍".to_string()
}

fn default_processing_emoji() -> String {
    "👀".to_string()
}

fn default_success_emoji() -> String {
    "🎉".to_string()
}

fn default_failure_emoji() -> String {
    "👎".to_string()
}

fn default_poll_timeout_secs() -> u32 {
    25
}

/// Webhook push-endpoint configuration.
///
/// Telegram delivers reaction updates only to a webhook, never through
/// getUpdates long polling. With the gateway disabled, Markdone still
/// captures messages but nothing can ever be confirmed.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Enable the webhook endpoint.
    #[serde(default)]
    pub enabled: bool,

    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// URL path the webhook listens on.
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,

    /// Expected value of the `X-Telegram-Bot-Api-Secret-Token` header.
    /// `None` disables the check.
    #[serde(default)]
    pub secret_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: default_gateway_host(),
            port: default_gateway_port(),
            webhook_path: default_webhook_path(),
            secret_token: None,
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8443
}

fn default_webhook_path() -> String {
    "/telegram/webhook".to_string()
}

/// Notion record-store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NotionConfig {
    /// Notion integration token. Required to run `serve`.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Id of the Notion database that receives task records.
    #[serde(default)]
    pub database_id: Option<String>,

    /// Notion API version string.
    #[serde(default = "default_notion_api_version")]
    pub api_version: String,

    /// Per-call timeout for record creation, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            database_id: None,
            api_version: default_notion_api_version(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_notion_api_version() -> String {
    "2022-06-28".to_string()
}

fn default_request_timeout_secs() -> u64 {
    5
}

/// Intake reconciler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IntakeConfig {
    /// Total attempts per logical record creation (first try included).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay between attempts in seconds; grows linearly per attempt.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_secs() -> u64 {
    2
}
