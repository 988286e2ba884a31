//! Message rendering.
//!
//! Templates interpolate user text only after it has gone through
//! [`escape_markdown`]. Labels, emoji and the `*` bold markers are part of the
//! template and are never escaped.

pub mod legacy;
pub mod markdown;
pub mod submission;
pub mod violation;

use crate::payload::RelayEvent;
pub use markdown::{escape_markdown, PARSE_MODE};

/// Placeholder for a missing student name or group.
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for a missing violation type.
pub const UNKNOWN_VIOLATION: &str = "unknown";

/// Violations listed in a submission message. Later entries are dropped.
pub const MAX_LISTED_VIOLATIONS: usize = 10;

/// Renders the Telegram message text for an event.
pub fn render(event: &RelayEvent) -> String {
    match event {
        RelayEvent::Submission(payload) => submission::render(payload),
        RelayEvent::Violation(payload) => violation::render(payload),
        RelayEvent::Legacy(payload) => legacy::render(payload),
    }
}

/// Escaped name or group, or [`UNKNOWN`] when missing or empty.
fn escaped_or_unknown(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => escape_markdown(v),
        _ => UNKNOWN.to_string(),
    }
}

/// Escaped text, or empty when missing.
fn escaped_or_empty(value: Option<&str>) -> String {
    value.map(escape_markdown).unwrap_or_default()
}

/// Formats a number the way the test client prints it: `30`, `2.5`.
/// Missing values print as `0`.
fn format_number(value: Option<f64>) -> String {
    let value = value.unwrap_or(0.0);
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(None), "0");
        assert_eq!(format_number(Some(30.0)), "30");
        assert_eq!(format_number(Some(2.5)), "2.5");
        assert_eq!(format_number(Some(-0.0)), "0");
        assert_eq!(format_number(Some(250.0)), "250");
        assert_eq!(format_number(Some(1.5)), "1.5");
    }

    #[test]
    fn test_name_defaults() {
        assert_eq!(escaped_or_unknown(None), "Unknown");
        assert_eq!(escaped_or_unknown(Some("")), "Unknown");
        assert_eq!(escaped_or_unknown(Some("Anna_B")), r"Anna\_B");
        assert_eq!(escaped_or_empty(None), "");
    }
}
