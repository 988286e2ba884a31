//! The notification relay: validates a request, renders the message and
//! hands it to the delivery client.

pub mod request;

use std::sync::Arc;
use std::time::Instant;

use hyper::Method;
use tracing::{error, info, warn};

use crate::config::model::TelegramConfig;
use crate::error::RelayError;
use crate::notify::{MessageDelivery, Metrics, OutboundMessage};
use crate::payload::RelayEvent;
use crate::render::{self, PARSE_MODE};
pub use request::{RelayRequest, RelayResponse, Route, ESSAY_PATH, LEGACY_ESSAY_PATH};

/// Event label used before a body has been decoded.
pub const UNDECODED_EVENT: &str = "unknown";

/// Turns inbound submission and violation events into Telegram messages.
pub struct Relay {
    telegram: TelegramConfig,
    delivery: Arc<dyn MessageDelivery>,
    metrics: Option<Arc<Metrics>>,
}

impl Relay {
    /// Creates a relay sending to the chat configured in `telegram`.
    pub fn new(telegram: TelegramConfig, delivery: Arc<dyn MessageDelivery>) -> Self {
        Self {
            telegram,
            delivery,
            metrics: None,
        }
    }

    /// Records request outcomes in the given metrics registry.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Handles one request. Never fails: every error becomes a JSON response.
    pub async fn handle(&self, request: RelayRequest) -> RelayResponse {
        if request.method != Method::POST {
            return self.reject(UNDECODED_EVENT, RelayError::MethodNotAllowed);
        }

        let chat_id = match self.telegram.credentials() {
            Some((_, chat_id)) => chat_id.to_string(),
            None => return self.reject(UNDECODED_EVENT, RelayError::Configuration),
        };

        let event = match request.route.parse(&request.body) {
            Ok(event) => event,
            Err(e) => return self.reject(UNDECODED_EVENT, e.into()),
        };

        let kind = event.kind();
        match self.relay(&event, chat_id).await {
            Ok(()) => {
                info!(event = kind, "Relayed event to Telegram");
                self.record(kind, "ok");
                RelayResponse::ok()
            }
            Err(e) => self.reject(kind, e),
        }
    }

    /// Renders and delivers a decoded event.
    async fn relay(&self, event: &RelayEvent, chat_id: String) -> Result<(), RelayError> {
        let message = OutboundMessage {
            chat_id,
            text: render::render(event),
            parse_mode: PARSE_MODE,
        };

        let started = Instant::now();
        let result = self.delivery.deliver(&message).await;
        if let Some(metrics) = &self.metrics {
            metrics.observe_delivery(started.elapsed().as_secs_f64());
        }

        result.map_err(RelayError::from)
    }

    /// Logs and records a failure, then converts it into a response.
    pub fn reject(&self, event: &str, error: RelayError) -> RelayResponse {
        match &error {
            RelayError::Delivery(e) => error!(event, error = %e, "Telegram delivery failed"),
            RelayError::Configuration => error!("Telegram bot token or chat id not configured"),
            RelayError::Internal(reason) => error!(event, reason = %reason, "Relay fault"),
            other => warn!(event, error = %other, "Rejected relay request"),
        }

        self.record(event, error.outcome());
        RelayResponse::from(&error)
    }

    fn record(&self, event: &str, outcome: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.record_request(event, outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeliveryError;
    use crate::notify::telegram::MockMessageDelivery;
    use hyper::StatusCode;
    use serde_json::json;

    fn telegram() -> TelegramConfig {
        TelegramConfig {
            bot_token: Some("123:abc".to_string()),
            chat_id: Some("-100500".to_string()),
            ..Default::default()
        }
    }

    fn relay(delivery: MockMessageDelivery) -> Relay {
        Relay::new(telegram(), Arc::new(delivery))
    }

    fn no_calls() -> MockMessageDelivery {
        let mut delivery = MockMessageDelivery::new();
        delivery.expect_deliver().times(0);
        delivery
    }

    const SCENARIO: &str = r#"{
        "studentName": "Anna_B",
        "task1": {"question": "Q1", "answer": "A1.", "wordCount": 2},
        "task2": {"question": "Q2", "answer": "A2!", "wordCount": 2},
        "usedMinutes": 30,
        "remainingMinutes": 0,
        "totalViolations": 0
    }"#;

    #[test]
    fn test_non_post_is_rejected_without_delivery() {
        let relay = relay(no_calls());
        let request = RelayRequest {
            method: Method::GET,
            route: Route::Essay,
            body: SCENARIO.into(),
        };

        let response = tokio_test::block_on(relay.handle(request));
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.body, json!({ "ok": false, "error": "Method not allowed" }));
    }

    #[test]
    fn test_missing_secrets_fail_without_delivery() {
        for telegram in [
            TelegramConfig { bot_token: None, ..telegram() },
            TelegramConfig { chat_id: Some(String::new()), ..telegram() },
        ] {
            let relay = Relay::new(telegram, Arc::new(no_calls()));
            let response = tokio_test::block_on(relay.handle(RelayRequest::post(Route::Essay, SCENARIO)));

            assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(response.body["ok"], false);
            assert_eq!(response.body["error"], "Telegram env vars missing");
        }
    }

    #[test]
    fn test_submission_is_rendered_and_delivered() {
        let mut delivery = MockMessageDelivery::new();
        delivery
            .expect_deliver()
            .withf(|message: &OutboundMessage| {
                message.chat_id == "-100500"
                    && message.parse_mode == "Markdown"
                    && message.text.contains(r"Student: *Anna\_B*")
                    && message.text.contains(r"A1\.")
                    && message.text.contains(r"A2\!")
                    && !message.text.contains("Violations (")
            })
            .times(1)
            .returning(|_| Ok(()));

        let relay = relay(delivery);
        let response = tokio_test::block_on(relay.handle(RelayRequest::post(Route::Essay, SCENARIO)));

        assert_eq!(response, RelayResponse::ok());
    }

    #[test]
    fn test_float_counts_are_relayed() {
        let mut delivery = MockMessageDelivery::new();
        delivery
            .expect_deliver()
            .withf(|message: &OutboundMessage| {
                message.text.contains("*Task 1 Answer* (words: 250):")
                    && message.text.contains("Total violations: *1.5*")
            })
            .times(1)
            .returning(|_| Ok(()));

        let body = r#"{"task1":{"wordCount":250.0},"totalViolations":1.5}"#;
        let response = tokio_test::block_on(relay(delivery).handle(RelayRequest::post(Route::Essay, body)));
        assert_eq!(response, RelayResponse::ok());
    }

    #[test]
    fn test_violation_route_uses_violation_template() {
        let mut delivery = MockMessageDelivery::new();
        delivery
            .expect_deliver()
            .withf(|message: &OutboundMessage| {
                message.text.starts_with("⚠️ *IELTS Writing Test – Violation*")
                    && message.text.contains("Total violations now: *0*")
            })
            .times(1)
            .returning(|_| Ok(()));

        let body = r#"{"eventType":"violation","violation":{"type":"blur","totalViolationsNow":0}}"#;
        let response = tokio_test::block_on(relay(delivery).handle(RelayRequest::post(Route::Essay, body)));
        assert_eq!(response.status, StatusCode::OK);
    }

    #[test]
    fn test_legacy_route_uses_legacy_template() {
        let mut delivery = MockMessageDelivery::new();
        delivery
            .expect_deliver()
            .withf(|message: &OutboundMessage| message.text.contains("Task: *Task 2*"))
            .times(1)
            .returning(|_| Ok(()));

        let body = r#"{"mode":"task2","question":"Q","essay":"E"}"#;
        let response =
            tokio_test::block_on(relay(delivery).handle(RelayRequest::post(Route::LegacyEssay, body)));
        assert_eq!(response.status, StatusCode::OK);
    }

    #[test]
    fn test_provider_rejection_maps_to_delivery_error() {
        let mut delivery = MockMessageDelivery::new();
        delivery.expect_deliver().times(1).returning(|_| {
            Err(DeliveryError::Rejected {
                status: 400,
                detail: json!({ "ok": false, "error_code": 400, "description": "Bad Request: chat not found" }),
            })
        });

        let response = tokio_test::block_on(relay(delivery).handle(RelayRequest::post(Route::Essay, SCENARIO)));

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body["error"], "Telegram error");
        assert_eq!(response.body["detail"]["description"], "Bad Request: chat not found");
    }

    #[test]
    fn test_timeout_maps_to_delivery_error() {
        let mut delivery = MockMessageDelivery::new();
        delivery
            .expect_deliver()
            .returning(|_| Err(DeliveryError::Timeout { seconds: 5 }));

        let response = tokio_test::block_on(relay(delivery).handle(RelayRequest::post(Route::Essay, "{}")));

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body["error"], "Telegram error");
        assert!(response.body["detail"].as_str().unwrap().contains("timed out"));
    }

    #[test]
    fn test_malformed_body_is_bad_request() {
        let relay = relay(no_calls());
        let response = tokio_test::block_on(relay.handle(RelayRequest::post(Route::Essay, "{oops")));

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["ok"], false);
    }

    #[test]
    fn test_outcomes_are_counted() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let relay = Relay::new(telegram(), Arc::new(no_calls())).with_metrics(metrics.clone());

        let request = RelayRequest {
            method: Method::PUT,
            route: Route::Essay,
            body: "".into(),
        };
        tokio_test::block_on(relay.handle(request));

        let text = metrics.gather().unwrap();
        assert!(text.contains(r#"relay_requests_total{event="unknown",outcome="method_not_allowed"} 1"#));
    }
}
