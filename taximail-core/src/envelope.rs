//! Result envelope and OTP verification outcome.

use crate::Operation;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which non-object upstream responses are kept.
pub const RAW_RESPONSE_KEY: &str = "response";

// ============================================================================
// ENVELOPE
// ============================================================================

/// Normalized output for one processed item.
///
/// Upstream fields are spread at the top level; tags inserted afterwards
/// overwrite upstream keys of the same name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Envelope(Map<String, Value>);

impl Envelope {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Spread an upstream response into a fresh envelope.
    pub fn from_response(response: Value) -> Self {
        match response {
            Value::Object(map) => Self(map),
            other => {
                let mut map = Map::new();
                map.insert(RAW_RESPONSE_KEY.to_string(), other);
                Self(map)
            }
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Operation tag, if the envelope carries a known one.
    pub fn operation(&self) -> Option<Operation> {
        self.get_str("operation").and_then(|s| s.parse().ok())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

// ============================================================================
// OTP VERIFICATION
// ============================================================================

/// Verification verdict reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerificationResult {
    Valid,
    Invalid,
    Error,
}

impl VerificationResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::Invalid => "INVALID",
            Self::Error => "ERROR",
        }
    }
}

/// Outcome of one OTP verification. Transport failures are data here.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
    Valid { response: Value },
    Invalid { response: Value },
    Error { details: String },
}

impl VerificationOutcome {
    /// Classify an upstream response.
    ///
    /// Valid only when `status == "success"` and `code == 202`; any other
    /// pairing, including success with a different code, is invalid.
    pub fn from_response(response: Value) -> Self {
        if is_accepted(&response) {
            Self::Valid { response }
        } else {
            Self::Invalid { response }
        }
    }

    pub fn result(&self) -> VerificationResult {
        match self {
            Self::Valid { .. } => VerificationResult::Valid,
            Self::Invalid { .. } => VerificationResult::Invalid,
            Self::Error { .. } => VerificationResult::Error,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

fn is_accepted(response: &Value) -> bool {
    response.get("status").and_then(Value::as_str) == Some("success")
        && response.get("code").and_then(Value::as_i64) == Some(202)
}
