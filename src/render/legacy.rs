//! Template for the single-essay payload.

use super::{escaped_or_empty, escaped_or_unknown, format_number, UNKNOWN};
use crate::payload::LegacyEssayPayload;

/// Renders one essay with its question.
pub fn render(payload: &LegacyEssayPayload) -> String {
    let task = payload
        .task_mode()
        .map(|mode| mode.label())
        .unwrap_or(UNKNOWN);

    format!(
        "✍️ *IELTS Writing Essay*\n\
         Student: *{}*\n\
         Group: *{}*\n\
         Task: *{}*\n\n\
         *Question:*\n{}\n\n\
         *Essay* (words: {}):\n{}",
        escaped_or_unknown(payload.student_name.as_deref()),
        escaped_or_unknown(payload.student_group.as_deref()),
        task,
        escaped_or_empty(payload.question.as_deref()),
        format_number(payload.word_count),
        escaped_or_empty(payload.essay.as_deref()),
    )
}
