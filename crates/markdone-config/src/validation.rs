// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty emoji markers and a sane retry budget.

use crate::diagnostic::ConfigError;
use crate::model::MarkdoneConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MarkdoneConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Gateway host must look like an IP or hostname.
    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    // Webhook path must be absolute.
    if !config.gateway.webhook_path.starts_with('/') {
        errors.push(ConfigError::Validation {
            message: format!(
                "gateway.webhook_path must start with `/`, got `{}`",
                config.gateway.webhook_path
            ),
        });
    }

    // Every reaction marker must be set.
    for (key, value) in [
        ("telegram.confirm_emoji", &config.telegram.confirm_emoji),
        ("telegram.processing_emoji", &config.telegram.processing_emoji),
        ("telegram.success_emoji", &config.telegram.success_emoji),
        ("telegram.failure_emoji", &config.telegram.failure_emoji),
    ] {
        if value.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        }
    }

    // The two terminal markers must be distinguishable, or the outcome is
    // unreadable.
    if config.telegram.success_emoji == config.telegram.failure_emoji {
        errors.push(ConfigError::Validation {
            message: "telegram.success_emoji and telegram.failure_emoji must differ".to_string(),
        });
    }

    // The confirm trigger must not collide with a terminal marker, or a
    // glance at the chat cannot tell a request from its outcome.
    for (key, value) in [
        ("telegram.success_emoji", &config.telegram.success_emoji),
        ("telegram.failure_emoji", &config.telegram.failure_emoji),
    ] {
        if *value == config.telegram.confirm_emoji {
            errors.push(ConfigError::Validation {
                message: format!("{key} must differ from telegram.confirm_emoji"),
            });
        }
    }

    if config.intake.max_attempts == 0 {
        errors.push(ConfigError::Validation {
            message: "intake.max_attempts must be at least 1".to_string(),
        });
    }

    if config.intake.max_attempts > 10 {
        errors.push(ConfigError::Validation {
            message: format!(
                "intake.max_attempts must be at most 10, got {}",
                config.intake.max_attempts
            ),
        });
    }

    if config.notion.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "notion.request_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.telegram.poll_timeout_secs == 0 || config.telegram.poll_timeout_secs > 50 {
        errors.push(ConfigError::Validation {
            message: format!(
                "telegram.poll_timeout_secs must be between 1 and 50, got {}",
                config.telegram.poll_timeout_secs
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
