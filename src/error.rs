//! Error types for the essay relay.

use std::path::PathBuf;

use hyper::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

/// Configuration loading and parsing errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {message}")]
    ParseFailed { path: PathBuf, message: String },

    #[error("Config validation failed with {error_count} error(s)")]
    ValidationFailed { error_count: usize },
}

/// HTTP listener errors.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    BindFailed {
        addr: String,
        source: std::io::Error,
    },

    #[error("Failed to accept connection: {0}")]
    AcceptFailed(std::io::Error),
}

/// Metrics and client setup errors.
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Prometheus metrics export failed: {0}")]
    PrometheusFailed(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuildFailed(String),
}

/// Outcome of a failed Telegram `sendMessage` call.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Telegram request failed: {0}")]
    Transport(String),

    #[error("Telegram request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Telegram rejected the message with HTTP {status}")]
    Rejected { status: u16, detail: Value },
}

impl DeliveryError {
    /// Returns true if another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            DeliveryError::Transport(_) | DeliveryError::Timeout { .. } => true,
            DeliveryError::Rejected { status, .. } => *status == 429 || *status >= 500,
        }
    }

    /// Diagnostic payload surfaced to the caller of the relay.
    pub fn detail(&self) -> Value {
        match self {
            DeliveryError::Rejected { detail, .. } => detail.clone(),
            other => Value::String(other.to_string()),
        }
    }
}

/// Inbound body decoding errors.
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Request-level failures, each mapped to an HTTP status and JSON body.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Telegram env vars missing")]
    Configuration,

    #[error("Invalid request body: {0}")]
    InvalidPayload(#[from] PayloadError),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Telegram error")]
    Delivery(#[from] DeliveryError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl RelayError {
    /// HTTP status for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            RelayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::Configuration | RelayError::Delivery(_) | RelayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// JSON body returned to the caller. Internal faults never carry detail.
    pub fn to_body(&self) -> Value {
        match self {
            RelayError::MethodNotAllowed => json!({ "ok": false, "error": "Method not allowed" }),
            RelayError::Configuration => {
                json!({ "ok": false, "error": "Telegram env vars missing" })
            }
            RelayError::InvalidPayload(_) => {
                json!({ "ok": false, "error": "Invalid request body" })
            }
            RelayError::PayloadTooLarge => {
                json!({ "ok": false, "error": "Request body too large" })
            }
            RelayError::Delivery(e) => {
                json!({ "ok": false, "error": "Telegram error", "detail": e.detail() })
            }
            RelayError::Internal(_) => json!({ "ok": false, "error": "Internal server error" }),
        }
    }

    /// Short outcome label used for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            RelayError::MethodNotAllowed => "method_not_allowed",
            RelayError::Configuration => "configuration_error",
            RelayError::InvalidPayload(_) => "invalid_payload",
            RelayError::PayloadTooLarge => "payload_too_large",
            RelayError::Delivery(_) => "delivery_error",
            RelayError::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_error_hides_detail() {
        let body = RelayError::Internal("panic at the disco".to_string()).to_body();
        assert_eq!(body, json!({ "ok": false, "error": "Internal server error" }));
    }

    #[test]
    fn test_delivery_error_carries_provider_payload() {
        let provider = json!({ "ok": false, "description": "Bad Request: chat not found" });
        let err = RelayError::from(DeliveryError::Rejected {
            status: 400,
            detail: provider.clone(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_body()["detail"], provider);
        assert_eq!(err.to_body()["error"], "Telegram error");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(DeliveryError::Timeout { seconds: 5 }.is_retryable());
        assert!(DeliveryError::Transport("connection reset".into()).is_retryable());
        assert!(DeliveryError::Rejected { status: 502, detail: Value::Null }.is_retryable());
        assert!(DeliveryError::Rejected { status: 429, detail: Value::Null }.is_retryable());
        assert!(!DeliveryError::Rejected { status: 400, detail: Value::Null }.is_retryable());
        assert!(!DeliveryError::Rejected { status: 200, detail: Value::Null }.is_retryable());
    }

    #[test]
    fn test_invalid_payload_is_client_error() {
        let err = RelayError::from(PayloadError::NotAnObject("array"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_body(), json!({ "ok": false, "error": "Invalid request body" }));
    }

    #[test]
    fn test_method_not_allowed_status() {
        let err = RelayError::MethodNotAllowed;
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(err.to_body()["ok"], false);
    }
}
