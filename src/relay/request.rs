//! Transport-neutral request and response types for the relay.

use hyper::body::Bytes;
use hyper::{Method, StatusCode};
use serde_json::{json, Value};

use crate::error::{PayloadError, RelayError};
use crate::payload::RelayEvent;

/// Path of the `eventType`-discriminated endpoint.
pub const ESSAY_PATH: &str = "/api/sendEssay";

/// Path of the endpoint accepting the older single-essay shape.
pub const LEGACY_ESSAY_PATH: &str = "/api/sendEssay/legacy";

/// Which payload family a request was posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Essay,
    LegacyEssay,
}

impl Route {
    /// Matches a request path.
    pub fn from_path(path: &str) -> Option<Self> {
        // One trailing slash is tolerated.
        match path.strip_suffix('/').unwrap_or(path) {
            ESSAY_PATH => Some(Route::Essay),
            LEGACY_ESSAY_PATH => Some(Route::LegacyEssay),
            _ => None,
        }
    }

    /// Decodes a body according to this route's payload family.
    pub fn parse(self, body: &[u8]) -> Result<RelayEvent, PayloadError> {
        match self {
            Route::Essay => RelayEvent::parse(body),
            Route::LegacyEssay => RelayEvent::parse_legacy(body),
        }
    }
}

/// An inbound relay request.
#[derive(Debug, Clone)]
pub struct RelayRequest {
    pub method: Method,
    pub route: Route,
    pub body: Bytes,
}

impl RelayRequest {
    /// Builds a `POST` request, the only method the relay accepts.
    pub fn post(route: Route, body: impl Into<Bytes>) -> Self {
        Self {
            method: Method::POST,
            route,
            body: body.into(),
        }
    }
}

/// Status and JSON body returned to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl RelayResponse {
    /// `200 {"ok": true}`.
    pub fn ok() -> Self {
        Self {
            status: StatusCode::OK,
            body: json!({ "ok": true }),
        }
    }
}

impl From<&RelayError> for RelayResponse {
    fn from(error: &RelayError) -> Self {
        Self {
            status: error.status(),
            body: error.to_body(),
        }
    }
}
