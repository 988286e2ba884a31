//! Validation report formatting.

use super::{ValidationIssue, ValidationResult, ValidationSeverity};

/// Formats a validation result into a human-readable report.
pub fn format_report(result: &ValidationResult) -> String {
    if result.is_empty() {
        return "Configuration is valid.".to_string();
    }

    let mut report = String::new();

    if !result.is_valid() {
        report.push_str("\nRelay Config Rejected\n");
        report.push_str("=====================\n\n");
    }

    // Errors before warnings so the blocking problems are read first
    for issue in result.errors().chain(result.warnings()) {
        report.push_str(&format_issue(issue));
        report.push('\n');
    }

    report.push_str("---\n");
    report.push_str(&format_brief_summary(result));
    report.push('\n');

    if !result.is_valid() {
        report.push_str("The relay will not start until these are fixed.\n");
    }

    report
}

/// Formats a single validation issue.
fn format_issue(issue: &ValidationIssue) -> String {
    let prefix = match issue.severity {
        ValidationSeverity::Error => "ERROR",
        ValidationSeverity::Warning => "WARNING",
    };

    let mut output = format!("{} {}\n", prefix, issue.path);
    output.push_str(&format!("  └─ {}\n", issue.message));

    if let Some(suggestion) = &issue.suggestion {
        output.push_str(&format!("     hint: {}\n", suggestion));
    }

    output
}

/// One-line summary of a validation result.
pub fn format_brief_summary(result: &ValidationResult) -> String {
    let error_count = result.error_count();
    let warning_count = result.warnings().count();

    match (error_count, warning_count) {
        (0, 0) => "Configuration valid".to_string(),
        (0, w) => format!("Configuration valid with {} warning(s)", w),
        (e, w) => format!("Configuration invalid: {} error(s), {} warning(s)", e, w),
    }
}
