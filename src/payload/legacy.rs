//! The older single-essay payload, posted once per task.

use serde::Deserialize;

/// One essay in the format older test clients still send.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyEssayPayload {
    pub student_name: Option<String>,
    pub student_group: Option<String>,
    /// `task1` or `task2`.
    pub mode: Option<String>,
    pub question: Option<String>,
    pub essay: Option<String>,
    pub word_count: Option<f64>,
}

impl LegacyEssayPayload {
    /// Interprets the `mode` field.
    pub fn task_mode(&self) -> Option<TaskMode> {
        match self.mode.as_deref()?.trim() {
            "task1" => Some(TaskMode::Task1),
            "task2" => Some(TaskMode::Task2),
            _ => None,
        }
    }
}

/// Which of the two writing tasks an essay answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskMode {
    Task1,
    Task2,
}

impl TaskMode {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            TaskMode::Task1 => "Task 1",
            TaskMode::Task2 => "Task 2",
        }
    }
}
