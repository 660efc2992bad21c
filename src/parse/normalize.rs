//! Input normalization: raw error -> [`NormalizedRecord`].

use tracing::debug;

use crate::types::{ApiErrorEnvelope, NormalizedRecord, Origin, RawError};

/// Preferred anchor when searching a string for an embedded API error.
const API_ERROR_MARKER: &str = "{\"error\":";

/// Message used when the input has no usable shape.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// Build a normalized record from any raw error. Never fails.
///
/// Structured errors are copied verbatim; nested JSON in their message is
/// left for the quota detectors. Strings are searched for an embedded API
/// error envelope and, when one validates, its message is unwrapped once more.
pub fn normalize(raw: &RawError) -> NormalizedRecord {
    match raw {
        RawError::Structured(err) => {
            debug!(origin = %Origin::Structured, status = ?err.status, "normalized structured error");
            NormalizedRecord {
                message: err.message.clone(),
                http_status: err.status,
                api_status: None,
                api_code: None,
                origin: Origin::Structured,
                envelope: None,
                raw: raw.clone(),
            }
        }
        RawError::Text(text) => match extract_envelope(text) {
            Some(envelope) => {
                debug!(
                    origin = %Origin::Json,
                    code = envelope.error.code,
                    status = %envelope.error.status,
                    "normalized embedded API error"
                );
                NormalizedRecord {
                    message: unwrap_nested_message(&envelope.error.message),
                    http_status: None,
                    api_status: Some(envelope.error.status.clone()),
                    api_code: Some(envelope.error.code),
                    origin: Origin::Json,
                    envelope: Some(envelope),
                    raw: raw.clone(),
                }
            }
            None => {
                debug!(origin = %Origin::Text, "no API error payload in string");
                NormalizedRecord {
                    message: text.clone(),
                    http_status: None,
                    api_status: None,
                    api_code: None,
                    origin: Origin::Text,
                    envelope: None,
                    raw: raw.clone(),
                }
            }
        },
        RawError::Unknown => NormalizedRecord {
            message: UNKNOWN_ERROR_MESSAGE.to_string(),
            http_status: None,
            api_status: None,
            api_code: None,
            origin: Origin::Unknown,
            envelope: None,
            raw: RawError::Unknown,
        },
    }
}

/// Find and validate an API error envelope embedded in free text.
///
/// The candidate starts at `{"error":` if present, else at the first `{`,
/// and ends at the last `}` so trailing prose is ignored.
pub fn extract_envelope(text: &str) -> Option<ApiErrorEnvelope> {
    let start = text
        .find(API_ERROR_MARKER)
        .or_else(|| text.find('{'))?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    ApiErrorEnvelope::from_json_str(&text[start..=end])
}

/// Unwrap exactly one level of JSON-encoded API error inside a message.
pub fn unwrap_nested_message(message: &str) -> String {
    match ApiErrorEnvelope::from_json_str(message) {
        Some(nested) => nested.error.message,
        None => message.to_string(),
    }
}
