//! Template for a live proctoring violation.

use super::{
    escape_markdown, escaped_or_empty, escaped_or_unknown, format_number, UNKNOWN_VIOLATION,
};
use crate::payload::ViolationPayload;

/// Renders a violation alert.
pub fn render(payload: &ViolationPayload) -> String {
    let violation = payload.violation.clone().unwrap_or_default();

    let name = escaped_or_unknown(payload.student_name.as_deref());
    let group = escaped_or_unknown(payload.student_group.as_deref());
    let kind = match violation.kind.as_deref() {
        Some(k) if !k.is_empty() => k,
        _ => UNKNOWN_VIOLATION,
    };

    let mut text = format!(
        "⚠️ *IELTS Writing Test – Violation*\n\
         Student: *{}*\n\
         Group: *{}*\n\
         Elapsed time: *{}* minute(s)\n\n\
         Type: *{}*\n\
         Message: {}\n",
        name,
        group,
        format_number(payload.elapsed_minutes),
        escape_markdown(kind),
        escaped_or_empty(violation.message.as_deref()),
    );

    if let Some(timestamp) = violation.timestamp.as_deref().filter(|t| !t.is_empty()) {
        text.push_str(&format!("Time: {}\n", escape_markdown(timestamp)));
    }

    if let Some(total) = violation.total_violations_now {
        text.push_str(&format!(
            "Total violations now: *{}*",
            format_number(Some(total))
        ));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::ViolationDetails;

    fn payload(details: ViolationDetails) -> ViolationPayload {
        ViolationPayload {
            student_name: Some("Anna_B".to_string()),
            student_group: Some("G-7".to_string()),
            elapsed_minutes: Some(12.0),
            violation: Some(details),
        }
    }

    #[test]
    fn test_full_violation() {
        let text = render(&payload(ViolationDetails {
            kind: Some("tab_switch".to_string()),
            message: Some("Left the page.".to_string()),
            timestamp: Some("2024-05-01T10:00:00Z".to_string()),
            total_violations_now: Some(3.0),
        }));

        assert_eq!(
            text,
            "⚠️ *IELTS Writing Test – Violation*\n\
             Student: *Anna\\_B*\n\
             Group: *G\\-7*\n\
             Elapsed time: *12* minute(s)\n\n\
             Type: *tab\\_switch*\n\
             Message: Left the page\\.\n\
             Time: 2024\\-05\\-01T10:00:00Z\n\
             Total violations now: *3*"
        );
    }

    #[test]
    fn test_no_time_line_without_timestamp() {
        let text = render(&payload(ViolationDetails {
            kind: Some("copy".to_string()),
            ..Default::default()
        }));
        assert!(!text.contains("Time:"));
        assert!(!text.contains("Total violations now"));
    }

    #[test]
    fn test_zero_total_still_rendered() {
        let text = render(&payload(ViolationDetails {
            total_violations_now: Some(0.0),
            ..Default::default()
        }));
        assert!(text.contains("Total violations now: *0*"));
    }

    #[test]
    fn test_null_total_is_left_out() {
        let payload: ViolationPayload = serde_json::from_str(
            r#"{"violation":{"type":"blur","totalViolationsNow":null}}"#,
        )
        .unwrap();
        assert!(!render(&payload).contains("Total violations now"));
    }

    #[test]
    fn test_defaults_for_empty_payload() {
        let text = render(&ViolationPayload::default());
        assert!(text.contains("Student: *Unknown*"));
        assert!(text.contains("Group: *Unknown*"));
        assert!(text.contains("Elapsed time: *0* minute(s)"));
        assert!(text.contains("Type: *unknown*"));
        assert!(text.ends_with("Message: \n"));
    }
}
