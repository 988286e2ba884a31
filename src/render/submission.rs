//! Template for a finished writing test.

use super::{
    escape_markdown, escaped_or_empty, escaped_or_unknown, format_number,
    MAX_LISTED_VIOLATIONS, UNKNOWN_VIOLATION,
};
use crate::payload::{SubmissionPayload, TaskAnswer, ViolationRecord};

/// Renders a submission with both tasks and, if any, the violations log.
pub fn render(payload: &SubmissionPayload) -> String {
    let name = escaped_or_unknown(payload.student_name.as_deref());
    let group = escaped_or_unknown(payload.student_group.as_deref());
    let total_violations = format_number(payload.total_violations);

    let mut text = format!(
        "✍️ *IELTS Writing Submission*\n\
         Student: *{}*\n\
         Group: *{}*\n\
         Time used: *{}* minute(s)\n\
         Time left: *{}* minute(s)\n\
         Total violations: *{}*",
        name,
        group,
        format_number(payload.used_minutes),
        format_number(payload.remaining_minutes),
        total_violations,
    );

    text.push_str(&task_section(1, payload.task1.as_ref()));
    text.push_str(&task_section(2, payload.task2.as_ref()));

    if let Some(log) = payload.violations_log.as_deref().filter(|l| !l.is_empty()) {
        text.push_str(&format!(
            "\n\n*Violations ({}):*\n{}",
            total_violations,
            escape_markdown(&violation_lines(log))
        ));
    }

    text
}

fn task_section(number: u8, task: Option<&TaskAnswer>) -> String {
    let question = escaped_or_empty(task.and_then(|t| t.question.as_deref()));
    let answer = escaped_or_empty(task.and_then(|t| t.answer.as_deref()));
    let words = format_number(task.and_then(|t| t.word_count));

    format!(
        "\n\n*Task {n} Question:*\n{}\n\n*Task {n} Answer* (words: {}):\n{}",
        question,
        words,
        answer,
        n = number,
    )
}

/// Numbered list of the first violations, unescaped. The caller escapes the
/// whole block, numbering and brackets included.
fn violation_lines(log: &[ViolationRecord]) -> String {
    log.iter()
        .take(MAX_LISTED_VIOLATIONS)
        .enumerate()
        .map(|(i, record)| {
            let kind = match record.kind.as_deref() {
                Some(k) if !k.is_empty() => k,
                _ => UNKNOWN_VIOLATION,
            };
            let timestamp = match record.timestamp.as_deref() {
                Some(t) if !t.is_empty() => format!(" [{}]", t),
                _ => String::new(),
            };
            format!(
                "{}. {}{} – {}",
                i + 1,
                kind,
                timestamp,
                record.message.as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
