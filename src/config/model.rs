//! Configuration data structures.

use serde::{Deserialize, Serialize};

/// Root configuration structure containing all settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Telegram Bot API settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Retry settings for outbound delivery.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Prometheus metrics settings.
    #[serde(default)]
    pub prometheus: PrometheusConfig,
}

impl AppConfig {
    /// Returns a copy with secrets redacted, as printed by `config-show`.
    pub fn redacted(&self) -> Self {
        Self {
            telegram: self.telegram.redacted(),
            ..self.clone()
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest request body accepted, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Telegram Bot API configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot authorization token (`<bot id>:<secret>`).
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Destination chat identifier.
    #[serde(default)]
    pub chat_id: Option<String>,

    /// Base URL of the Bot API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Per-attempt timeout for `sendMessage`.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl TelegramConfig {
    /// Returns the token and chat id when both are set and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let token = self.bot_token.as_deref().filter(|t| !t.trim().is_empty())?;
        let chat_id = self.chat_id.as_deref().filter(|c| !c.trim().is_empty())?;
        Some((token, chat_id))
    }

    /// Returns a copy safe to print or log.
    pub fn redacted(&self) -> Self {
        Self {
            bot_token: self.bot_token.as_ref().map(|_| "<redacted>".to_string()),
            ..self.clone()
        }
    }
}

// Manual impl so the token never reaches a log line through `{:?}`.
impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Retry configuration for outbound delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (1 = no retry, 2 = one retry).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry; doubles on each further attempt.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

/// Prometheus metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrometheusConfig {
    /// Whether to expose `GET /metrics`.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_timeout_seconds() -> u64 {
    5
}

fn default_max_attempts() -> u32 {
    2
}

fn default_backoff_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            server: ServerConfig::default(),
            telegram: TelegramConfig::default(),
            retry: RetryConfig::default(),
            prometheus: PrometheusConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            api_base: default_api_base(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_require_both_values() {
        let mut telegram = TelegramConfig {
            bot_token: Some("123:abc".to_string()),
            ..Default::default()
        };
        assert!(telegram.credentials().is_none());

        telegram.chat_id = Some("  ".to_string());
        assert!(telegram.credentials().is_none());

        telegram.chat_id = Some("-100200".to_string());
        assert_eq!(telegram.credentials(), Some(("123:abc", "-100200")));
    }

    #[test]
    fn test_debug_output_hides_token() {
        let telegram = TelegramConfig {
            bot_token: Some("123:super-secret".to_string()),
            chat_id: Some("42".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", telegram);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_shown_yaml_hides_token() {
        let mut config = AppConfig::default();
        config.telegram.bot_token = Some("123:super-secret".to_string());
        config.telegram.chat_id = Some("-100200".to_string());

        let yaml = serde_yaml::to_string(&config.redacted()).unwrap();
        assert!(!yaml.contains("super-secret"));
        assert!(yaml.contains("<redacted>"));
        assert!(yaml.contains("-100200"));

        let unset = serde_yaml::to_string(&AppConfig::default().redacted()).unwrap();
        assert!(!unset.contains("<redacted>"));
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telegram.api_base, "https://api.telegram.org");
        assert_eq!(config.telegram.timeout_seconds, 5);
        assert_eq!(config.retry.max_attempts, 2);
        assert!(config.prometheus.enabled);
    }
}
