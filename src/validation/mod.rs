//! Boot-time configuration validation.
//!
//! Issues are collected rather than failing on the first one, so an operator
//! sees every problem with a config in a single report.

pub mod report;
pub mod schema;
pub mod semantic;

use crate::config::model::AppConfig;

/// How much a validation issue matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSeverity {
    /// Blocks `serve`.
    Error,
    /// Logged at startup only.
    Warning,
}

/// One problem with one config field.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub severity: ValidationSeverity,
    /// Dotted field path, e.g. `telegram.chat_id`.
    pub path: String,
    pub message: String,
    /// Printed as a `hint:` line in the report.
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    fn new(
        severity: ValidationSeverity,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            path: path.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ValidationSeverity::Error, path, message)
    }

    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ValidationSeverity::Warning, path, message)
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    fn is_error(&self) -> bool {
        self.severity == ValidationSeverity::Error
    }
}

/// Every issue found across the schema and semantic passes.
#[derive(Debug, Default)]
pub struct ValidationResult {
    issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, other: ValidationResult) {
        self.issues.extend(other.issues);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Warnings alone still leave the config valid.
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| !i.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }
}

/// Validates the configuration before the server starts.
pub fn validate_config(config: &AppConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    result.extend(schema::validate(config));
    result.extend(semantic::validate(config));

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.telegram.bot_token = Some("123456:ABC-DEF".to_string());
        config.telegram.chat_id = Some("-1001234".to_string());
        config
    }

    #[test]
    fn test_valid_config_has_no_issues() {
        let result = validate_config(&valid_config());
        assert!(result.is_valid());
        assert!(result.is_empty());
    }

    #[test]
    fn test_missing_secrets_are_errors() {
        let result = validate_config(&AppConfig::default());
        assert!(!result.is_valid());

        let paths: Vec<_> = result.errors().map(|i| i.path.as_str()).collect();
        assert!(paths.contains(&"telegram.bot_token"));
        assert!(paths.contains(&"telegram.chat_id"));
    }

    #[test]
    fn test_warnings_do_not_invalidate() {
        let mut config = valid_config();
        config.telegram.timeout_seconds = 60;

        let result = validate_config(&config);
        assert!(result.is_valid());
        assert_eq!(result.warnings().count(), 1);
    }
}
