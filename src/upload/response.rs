//! Upload response bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Device identity returned with a `201 Created`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Server-assigned device id.
    pub dhid: String,
    pub url: String,
    pub public_url: String,
}

impl DeviceRecord {
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

/// Structured error body returned by the server on rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Free text or a field-to-errors object.
    #[serde(default)]
    pub message: Option<Value>,
}

impl ServerError {
    /// Parse `body`, returning `None` unless it is a JSON object with at
    /// least one of `code`, `type` or `message`.
    pub fn parse(body: &str) -> Option<Self> {
        let err: Self = serde_json::from_str(body).ok()?;
        (err.code.is_some() || err.kind.is_some() || err.message.is_some()).then_some(err)
    }

    /// `message` as display text.
    pub fn message_text(&self) -> String {
        match &self.message {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}
