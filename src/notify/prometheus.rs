//! Prometheus metrics for the relay.

use prometheus::{Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder};

use crate::error::NotificationError;

/// Counters and histograms exposed at `GET /metrics`.
pub struct Metrics {
    registry: Registry,
    /// Relay requests by event kind and outcome.
    pub requests_total: CounterVec,
    /// Time spent delivering to Telegram, retries included.
    pub delivery_duration_seconds: Histogram,
    /// Retries issued against the Bot API.
    pub delivery_retries_total: Counter,
}

impl Metrics {
    /// Creates and registers all relay metrics.
    pub fn new() -> Result<Self, NotificationError> {
        let registry = Registry::new();

        let requests_total = CounterVec::new(
            Opts::new("relay_requests_total", "Relay requests by event and outcome"),
            &["event", "outcome"],
        )
        .map_err(prometheus_failed)?;

        let delivery_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "relay_delivery_duration_seconds",
                "Time taken to deliver a message to Telegram",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )
        .map_err(prometheus_failed)?;

        let delivery_retries_total = Counter::new(
            "relay_delivery_retries_total",
            "Retries issued against the Telegram Bot API",
        )
        .map_err(prometheus_failed)?;

        registry
            .register(Box::new(requests_total.clone()))
            .map_err(prometheus_failed)?;
        registry
            .register(Box::new(delivery_duration_seconds.clone()))
            .map_err(prometheus_failed)?;
        registry
            .register(Box::new(delivery_retries_total.clone()))
            .map_err(prometheus_failed)?;

        Ok(Self {
            registry,
            requests_total,
            delivery_duration_seconds,
            delivery_retries_total,
        })
    }

    /// Records a finished relay request.
    pub fn record_request(&self, event: &str, outcome: &str) {
        self.requests_total.with_label_values(&[event, outcome]).inc();
    }

    /// Records how long a delivery took.
    pub fn observe_delivery(&self, seconds: f64) {
        self.delivery_duration_seconds.observe(seconds);
    }

    /// Records one retry.
    pub fn record_retry(&self) {
        self.delivery_retries_total.inc();
    }

    /// Returns the metrics in Prometheus text format.
    pub fn gather(&self) -> Result<String, NotificationError> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(prometheus_failed)?;
        String::from_utf8(buffer).map_err(|e| NotificationError::PrometheusFailed(e.to_string()))
    }
}

fn prometheus_failed(e: prometheus::Error) -> NotificationError {
    NotificationError::PrometheusFailed(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_includes_recorded_values() {
        let metrics = Metrics::new().unwrap();
        metrics.record_request("submission", "ok");
        metrics.record_request("submission", "ok");
        metrics.record_request("violation", "delivery_error");
        metrics.record_retry();
        metrics.observe_delivery(0.2);

        let text = metrics.gather().unwrap();
        assert!(text.contains(r#"relay_requests_total{event="submission",outcome="ok"} 2"#));
        assert!(text.contains(r#"relay_requests_total{event="violation",outcome="delivery_error"} 1"#));
        assert!(text.contains("relay_delivery_retries_total 1"));
        assert!(text.contains("relay_delivery_duration_seconds_count 1"));
    }
}
