//! Live proctoring violation payload.

use serde::Deserialize;

/// A violation reported while the test is still running.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationPayload {
    pub student_name: Option<String>,
    pub student_group: Option<String>,
    pub elapsed_minutes: Option<f64>,
    pub violation: Option<ViolationDetails>,
}

/// What happened, as reported by the proctoring client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationDetails {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub message: Option<String>,
    pub timestamp: Option<String>,
    /// Running total including this violation. Zero is a real value; `null`
    /// reads as absent, so the total line is left out.
    pub total_violations_now: Option<f64>,
}
