//! Schema validation for required configuration fields.

use crate::config::model::AppConfig;
use crate::config::{BOT_TOKEN_ENV, CHAT_ID_ENV};
use super::{ValidationIssue, ValidationResult};

/// Validates that every field the relay cannot run without is present.
pub fn validate(config: &AppConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    if is_blank(config.telegram.bot_token.as_deref()) {
        result.add(
            ValidationIssue::error("telegram.bot_token", "Telegram bot token is required")
                .with_suggestion(format!("Set telegram.bot_token or export {}", BOT_TOKEN_ENV)),
        );
    }

    if is_blank(config.telegram.chat_id.as_deref()) {
        result.add(
            ValidationIssue::error("telegram.chat_id", "Telegram chat id is required")
                .with_suggestion(format!("Set telegram.chat_id or export {}", CHAT_ID_ENV)),
        );
    }

    if config.telegram.api_base.trim().is_empty() {
        result.add(ValidationIssue::error(
            "telegram.api_base",
            "Telegram API base URL cannot be empty",
        ));
    }

    if config.server.host.trim().is_empty() {
        result.add(ValidationIssue::error("server.host", "Bind host cannot be empty"));
    }

    result
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}
