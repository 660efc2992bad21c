//! Raw error input as handed over by the transport layer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An error value whose shape is not known in advance.
///
/// The engine only reads it. Build one with the `From` impls for strings,
/// [`StructuredError`], or [`RawError::from_value`] for duck-typed JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RawError {
    /// Exception-like object with a message and optional HTTP status.
    Structured(StructuredError),
    /// Plain string, possibly with an embedded JSON payload.
    Text(String),
    /// Anything else (null, numbers, unrecognized objects).
    #[default]
    Unknown,
}

/// Exception-like error with a message and optional status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Transport response body, when the client attached one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_data: Option<Value>,
}

impl StructuredError {
    pub fn new(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status,
            response_data: None,
        }
    }

    /// Attach the transport response body.
    pub fn with_response_data(mut self, data: Value) -> Self {
        self.response_data = Some(data);
        self
    }
}

impl RawError {
    /// Create a structured error from a message and HTTP status.
    pub fn structured(message: impl Into<String>, status: u16) -> Self {
        Self::Structured(StructuredError::new(message, Some(status)))
    }

    /// Classify an untyped JSON value into one of the raw error shapes.
    ///
    /// Recognized:
    /// - a JSON string -> [`RawError::Text`]
    /// - `{"message": "...", "status": 429}` (status optional) -> structured
    /// - `{"response": {"status": 429, "data": ...}}` with an optional top-level
    ///   `message` -> structured, with `data` kept as the response body
    ///
    /// Everything else is [`RawError::Unknown`].
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s.clone()),
            Value::Object(map) => {
                let message = map.get("message").and_then(Value::as_str);
                let response = map.get("response").and_then(Value::as_object);
                let status = map
                    .get("status")
                    .and_then(as_status)
                    .or_else(|| response.and_then(|r| r.get("status")).and_then(as_status));
                let response_data = response.and_then(|r| r.get("data")).cloned();

                match (message, response_data) {
                    (Some(message), response_data) => Self::Structured(StructuredError {
                        message: message.to_string(),
                        status,
                        response_data,
                    }),
                    (None, Some(data)) => Self::Structured(StructuredError {
                        message: response_text(&data),
                        status,
                        response_data: Some(data),
                    }),
                    (None, None) => Self::Unknown,
                }
            }
            _ => Self::Unknown,
        }
    }
}

fn as_status(value: &Value) -> Option<u16> {
    value.as_u64().and_then(|n| u16::try_from(n).ok())
}

fn response_text(data: &Value) -> String {
    match data {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl From<String> for RawError {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for RawError {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<StructuredError> for RawError {
    fn from(value: StructuredError) -> Self {
        Self::Structured(value)
    }
}

impl<T: Into<RawError>> From<Option<T>> for RawError {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Unknown)
    }
}

#[cfg(feature = "reqwest")]
impl From<&reqwest::Error> for RawError {
    fn from(error: &reqwest::Error) -> Self {
        Self::Structured(StructuredError::new(
            error.to_string(),
            error.status().map(|s| s.as_u16()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_with_message_and_status_is_structured() {
        let raw = RawError::from_value(&json!({"message": "Forbidden", "status": 403}));
        assert_eq!(raw, RawError::structured("Forbidden", 403));
    }

    #[test]
    fn non_numeric_status_is_ignored() {
        let raw = RawError::from_value(&json!({"message": "boom", "status": "500"}));
        assert_eq!(raw, RawError::Structured(StructuredError::new("boom", None)));
    }

    #[test]
    fn response_shaped_object_keeps_body() {
        let body = json!({"error": {"code": 429, "message": "slow down", "status": "RESOURCE_EXHAUSTED"}});
        let raw = RawError::from_value(&json!({"response": {"status": 429, "data": body.clone()}}));
        match raw {
            RawError::Structured(err) => {
                assert_eq!(err.status, Some(429));
                assert_eq!(err.response_data, Some(body.clone()));
                assert_eq!(err.message, body.to_string());
            }
            other => panic!("expected structured error, got {other:?}"),
        }
    }

    #[test]
    fn scalars_and_null_are_unknown() {
        assert_eq!(RawError::from_value(&Value::Null), RawError::Unknown);
        assert_eq!(RawError::from_value(&json!(42)), RawError::Unknown);
        assert_eq!(RawError::from_value(&json!({"code": 1})), RawError::Unknown);
    }

    #[test]
    fn none_converts_to_unknown() {
        assert_eq!(RawError::from(None::<&str>), RawError::Unknown);
        assert_eq!(RawError::from(Some("x")), RawError::Text("x".into()));
    }
}
