//! Configuration file loading and parsing.

use std::path::Path;

use anyhow::Result;

use super::model::AppConfig;
use super::{BOT_TOKEN_ENV, CHAT_ID_ENV};
use crate::error::ConfigError;
use crate::validation::{report, validate_config};

/// Loads the configuration file from disk and parses it.
pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    // An empty file is a valid "all defaults" config.
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }

    let config: AppConfig =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok(config)
}

/// Loads the optional config file and applies environment overrides.
pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_from_path(path)?,
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Overrides the Telegram secrets from the environment when set.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = lookup(BOT_TOKEN_ENV).filter(|v| !v.is_empty()) {
        config.telegram.bot_token = Some(token);
    }
    if let Some(chat_id) = lookup(CHAT_ID_ENV).filter(|v| !v.is_empty()) {
        config.telegram.chat_id = Some(chat_id);
    }
}

/// Validates a loaded configuration, logging warnings and failing on errors.
pub fn ensure_valid(config: &AppConfig) -> Result<()> {
    let result = validate_config(config);

    for issue in result.warnings() {
        tracing::warn!(
            path = %issue.path,
            message = %issue.message,
            suggestion = ?issue.suggestion,
            "Config validation warning"
        );
    }

    if !result.is_valid() {
        tracing::error!("{}", report::format_report(&result));
        anyhow::bail!(ConfigError::ValidationFailed {
            error_count: result.error_count()
        });
    }

    Ok(())
}
