//! Inbound request payloads.
//!
//! Two shapes are accepted on the main route, selected by the `eventType`
//! field. The older essay shape has no discriminator and is served on its own
//! route. The shapes overlap in field names but not in meaning, so they are
//! kept as separate variants.

pub mod legacy;
pub mod submission;
pub mod violation;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::PayloadError;
pub use legacy::{LegacyEssayPayload, TaskMode};
pub use submission::{SubmissionPayload, TaskAnswer, ViolationRecord};
pub use violation::{ViolationDetails, ViolationPayload};

/// Discriminator value selecting the violation template.
pub const VIOLATION_EVENT: &str = "violation";

/// A decoded relay request.
#[derive(Debug, Clone)]
pub enum RelayEvent {
    /// A finished writing test.
    Submission(SubmissionPayload),
    /// A proctoring violation raised during the test.
    Violation(ViolationPayload),
    /// A single essay in the pre-`eventType` format.
    Legacy(LegacyEssayPayload),
}

impl RelayEvent {
    /// Decodes a body posted to the main route.
    ///
    /// `eventType: "violation"` selects the violation shape. Anything else,
    /// including a missing or empty discriminator, is a submission.
    pub fn parse(body: &[u8]) -> Result<Self, PayloadError> {
        let object = parse_object(body)?;

        let is_violation = object
            .get("eventType")
            .and_then(Value::as_str)
            .map(|t| t == VIOLATION_EVENT)
            .unwrap_or(false);

        let event = if is_violation {
            RelayEvent::Violation(from_object(object)?)
        } else {
            RelayEvent::Submission(from_object(object)?)
        };

        Ok(event)
    }

    /// Decodes a body posted to the legacy route.
    pub fn parse_legacy(body: &[u8]) -> Result<Self, PayloadError> {
        let object = parse_object(body)?;
        Ok(RelayEvent::Legacy(from_object(object)?))
    }

    /// Short name used in logs and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayEvent::Submission(_) => "submission",
            RelayEvent::Violation(_) => "violation",
            RelayEvent::Legacy(_) => "legacy",
        }
    }
}

/// Parses the body as a JSON object. An empty body or `null` is `{}`.
fn parse_object(body: &[u8]) -> Result<Map<String, Value>, PayloadError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(body)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        Value::Array(_) => Err(PayloadError::NotAnObject("array")),
        Value::String(_) => Err(PayloadError::NotAnObject("string")),
        Value::Number(_) => Err(PayloadError::NotAnObject("number")),
        Value::Bool(_) => Err(PayloadError::NotAnObject("boolean")),
    }
}

fn from_object<T: DeserializeOwned>(object: Map<String, Value>) -> Result<T, PayloadError> {
    Ok(serde_json::from_value(Value::Object(object))?)
}
