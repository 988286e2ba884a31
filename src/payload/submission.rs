//! Finished-test submission payload.

use serde::Deserialize;

/// A completed writing test with both tasks and the proctoring log.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub student_name: Option<String>,
    pub student_group: Option<String>,
    pub task1: Option<TaskAnswer>,
    pub task2: Option<TaskAnswer>,
    pub used_minutes: Option<f64>,
    pub remaining_minutes: Option<f64>,
    pub total_violations: Option<f64>,
    /// Violations in the order they happened.
    pub violations_log: Option<Vec<ViolationRecord>>,
}

/// One task's prompt and the student's answer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAnswer {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub word_count: Option<f64>,
}

/// A single entry of the violations log.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViolationRecord {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub message: Option<String>,
    pub timestamp: Option<String>,
}
