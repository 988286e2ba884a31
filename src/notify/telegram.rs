//! Telegram Bot API `sendMessage` client.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::prometheus::Metrics;
use crate::config::model::{RetryConfig, TelegramConfig};
use crate::error::{DeliveryError, NotificationError};

/// A rendered message addressed to one chat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    pub chat_id: String,
    pub text: String,
    pub parse_mode: &'static str,
}

/// Submits text to a chat and reports whether the provider accepted it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageDelivery: Send + Sync {
    /// Delivers one message. Resolves once the provider has answered or the
    /// attempts are exhausted.
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), DeliveryError>;
}

/// Sends messages through the Telegram Bot API.
pub struct TelegramClient {
    /// Full `sendMessage` URL. Contains the bot token, never log it.
    endpoint: String,
    /// Per-attempt timeout.
    timeout: Duration,
    /// Total attempts including the first.
    max_attempts: u32,
    /// Delay before the first retry.
    backoff: Duration,
    metrics: Option<Arc<Metrics>>,
    client: reqwest::Client,
}

impl TelegramClient {
    /// Creates a client for the given bot token.
    pub fn new(
        bot_token: &str,
        telegram: &TelegramConfig,
        retry: &RetryConfig,
    ) -> Result<Self, NotificationError> {
        let timeout = Duration::from_secs(telegram.timeout_seconds);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotificationError::ClientBuildFailed(e.to_string()))?;

        Ok(Self {
            endpoint: format!(
                "{}/bot{}/sendMessage",
                telegram.api_base.trim_end_matches('/'),
                bot_token
            ),
            timeout,
            max_attempts: retry.max_attempts.max(1),
            backoff: Duration::from_millis(retry.backoff_ms),
            metrics: None,
            client,
        })
    }

    /// Counts retries in the given metrics registry.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Makes a single `sendMessage` call.
    async fn send_once(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(message)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        // Non-JSON bodies (proxies, HTML error pages) are passed on verbatim.
        let detail: Value = serde_json::from_str(&body).unwrap_or_else(|_| Value::String(body));
        let accepted = detail.get("ok").and_then(Value::as_bool).unwrap_or(false);

        if status.is_success() && accepted {
            return Ok(());
        }

        let description = detail
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("no description");
        error!(status = %status, description, "Telegram sendMessage failed");

        Err(DeliveryError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }

    /// Maps a reqwest error, dropping the URL so the token stays out of errors.
    fn classify(&self, e: reqwest::Error) -> DeliveryError {
        if e.is_timeout() {
            DeliveryError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            DeliveryError::Transport(e.without_url().to_string())
        }
    }

    /// Backoff before the given retry (1-based), doubling each time.
    fn retry_delay(&self, retry: u32) -> Duration {
        let factor = 1u32 << (retry.saturating_sub(1)).min(16);
        self.backoff.saturating_mul(factor)
    }
}

#[async_trait]
impl MessageDelivery for TelegramClient {
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        let started = Instant::now();
        let mut attempt = 1;

        loop {
            debug!(attempt, chat_id = %message.chat_id, "Sending Telegram message");

            match self.send_once(message).await {
                Ok(()) => {
                    info!(
                        attempt,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Telegram message delivered"
                    );
                    return Ok(());
                }
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.retry_delay(attempt);
                    warn!(
                        attempt,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "Telegram delivery failed, retrying"
                    );
                    if let Some(metrics) = &self.metrics {
                        metrics.record_retry();
                    }
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
