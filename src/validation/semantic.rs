//! Semantic validation for configuration values.

use crate::config::model::AppConfig;

use super::{ValidationIssue, ValidationResult};

/// Timeouts above this are legal but make callers wait a long time.
const MAX_SENSIBLE_TIMEOUT_SECS: u64 = 30;

/// Attempts above this multiply the worst-case request latency.
const MAX_SENSIBLE_ATTEMPTS: u32 = 5;

/// Valid log level names.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validates semantic correctness of configuration values.
pub fn validate(config: &AppConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    if !VALID_LOG_LEVELS.contains(&config.log_level.to_lowercase().as_str()) {
        result.add(
            ValidationIssue::error(
                "log_level",
                format!("Unknown log level '{}'", config.log_level),
            )
            .with_suggestion(format!("Use one of: {}", VALID_LOG_LEVELS.join(", "))),
        );
    }

    if config.server.port == 0 {
        result.add(ValidationIssue::error("server.port", "Port must be non-zero"));
    }

    if config.server.max_body_bytes == 0 {
        result.add(ValidationIssue::error(
            "server.max_body_bytes",
            "Body size limit must be greater than zero",
        ));
    }

    validate_telegram(config, &mut result);
    validate_retry(config, &mut result);

    result
}

fn validate_telegram(config: &AppConfig, result: &mut ValidationResult) {
    let telegram = &config.telegram;

    let api_base = telegram.api_base.trim();
    if !api_base.is_empty() {
        match reqwest::Url::parse(api_base) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => result.add(ValidationIssue::error(
                "telegram.api_base",
                format!("Unsupported URL scheme '{}'", url.scheme()),
            )),
            Err(e) => result.add(ValidationIssue::error(
                "telegram.api_base",
                format!("Invalid URL '{}': {}", api_base, e),
            )),
        }
    }

    if telegram.timeout_seconds == 0 {
        result.add(
            ValidationIssue::error("telegram.timeout_seconds", "Timeout must be at least 1 second")
                .with_suggestion("The default of 5 seconds suits the Bot API"),
        );
    } else if telegram.timeout_seconds > MAX_SENSIBLE_TIMEOUT_SECS {
        result.add(ValidationIssue::warning(
            "telegram.timeout_seconds",
            format!(
                "Timeout of {}s keeps the submitting browser waiting on a slow Bot API",
                telegram.timeout_seconds
            ),
        ));
    }

    // Bot tokens look like "123456789:AAE...". Anything else is probably a paste error.
    if let Some(token) = telegram.bot_token.as_deref().filter(|t| !t.trim().is_empty()) {
        let well_formed = token
            .split_once(':')
            .map(|(id, secret)| {
                !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) && !secret.is_empty()
            })
            .unwrap_or(false);

        if !well_formed {
            result.add(
                ValidationIssue::warning(
                    "telegram.bot_token",
                    "Token does not look like '<bot id>:<secret>'",
                )
                .with_suggestion("Copy the token exactly as BotFather printed it"),
            );
        }
    }
}

fn validate_retry(config: &AppConfig, result: &mut ValidationResult) {
    let retry = &config.retry;

    if retry.max_attempts == 0 {
        result.add(
            ValidationIssue::error("retry.max_attempts", "At least one attempt is required")
                .with_suggestion("Use 1 to disable retries"),
        );
    } else if retry.max_attempts > MAX_SENSIBLE_ATTEMPTS {
        result.add(ValidationIssue::warning(
            "retry.max_attempts",
            format!(
                "{} attempts can hold a request open for a long time",
                retry.max_attempts
            ),
        ));
    }
}
