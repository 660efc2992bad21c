//! API error payloads (`{"error": {"code", "message", "status", "details"}}`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level API error envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

/// Body of an API error. `code`, `message` and `status` are all required;
/// anything missing or mistyped means the payload is not an API error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: u16,
    pub message: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub details: Value,
}

impl ApiErrorEnvelope {
    /// Validate an already-decoded JSON value against the envelope shape.
    ///
    /// A non-empty array is matched on its first element, which is how some
    /// endpoints wrap the envelope.
    pub fn from_value(value: &Value) -> Option<Self> {
        let candidate = match value {
            Value::Array(items) => items.first()?,
            other => other,
        };
        if !candidate.is_object() {
            return None;
        }
        serde_json::from_value(candidate.clone()).ok()
    }

    /// Strictly decode a whole string as an envelope. No substring search.
    pub fn from_json_str(text: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(text).ok()?;
        Self::from_value(&value)
    }
}

impl ApiErrorBody {
    /// Typed view of the `details` array. Entries that do not decode are skipped.
    pub fn details(&self) -> Vec<ErrorDetail> {
        self.details
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// One entry of the `details` array, keyed by its `@type` URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum ErrorDetail {
    #[serde(rename = "type.googleapis.com/google.rpc.QuotaFailure")]
    QuotaFailure {
        #[serde(default)]
        violations: Vec<QuotaViolation>,
    },
    #[serde(rename = "type.googleapis.com/google.rpc.RetryInfo")]
    RetryInfo {
        #[serde(rename = "retryDelay", default)]
        retry_delay: Option<String>,
    },
    #[serde(other)]
    Other,
}

/// A single quota violation from a `QuotaFailure` detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaViolation {
    #[serde(default)]
    pub quota_metric: Option<String>,
    #[serde(default)]
    pub quota_id: Option<String>,
    #[serde(default)]
    pub quota_value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_requires_all_three_fields() {
        assert!(ApiErrorEnvelope::from_json_str(
            r#"{"error":{"code":429,"message":"m","status":"RESOURCE_EXHAUSTED"}}"#
        )
        .is_some());
        assert!(ApiErrorEnvelope::from_json_str(r#"{"error":{"code":429,"message":"m"}}"#).is_none());
        assert!(ApiErrorEnvelope::from_json_str(
            r#"{"error":{"code":"429","message":"m","status":"X"}}"#
        )
        .is_none());
        assert!(ApiErrorEnvelope::from_json_str(r#"{"error":"nope"}"#).is_none());
    }

    #[test]
    fn array_wrapped_envelope_matches_first_element() {
        let env = ApiErrorEnvelope::from_json_str(
            r#"[{"error":{"code":503,"message":"overloaded","status":"UNAVAILABLE"}}]"#,
        )
        .expect("array-wrapped envelope should match");
        assert_eq!(env.error.code, 503);
        assert!(ApiErrorEnvelope::from_json_str("[]").is_none());
    }

    #[test]
    fn details_skip_unknown_and_malformed_entries() {
        let body = ApiErrorBody {
            code: 429,
            message: "m".into(),
            status: "RESOURCE_EXHAUSTED".into(),
            details: json!([
                {"@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "34s"},
                {"@type": "type.googleapis.com/google.rpc.QuotaFailure", "violations": [
                    {"quotaMetric": "generativelanguage.googleapis.com/generate_content_free_tier_requests",
                     "quotaId": "GenerateRequestsPerDayPerProjectPerModel-FreeTier"}
                ]},
                {"@type": "type.googleapis.com/google.rpc.DebugInfo", "detail": "x"},
                {"@type": "type.googleapis.com/google.rpc.ErrorInfo", "reason": "RATE_LIMIT_EXCEEDED"},
                {"@type": "type.googleapis.com/google.rpc.QuotaFailure", "violations": "bad"},
                "not-an-object"
            ]),
        };

        let details = body.details();
        assert_eq!(details.len(), 4);
        assert_eq!(
            details[0],
            ErrorDetail::RetryInfo {
                retry_delay: Some("34s".into())
            }
        );
        match &details[1] {
            ErrorDetail::QuotaFailure { violations } => {
                assert_eq!(
                    violations[0].quota_id.as_deref(),
                    Some("GenerateRequestsPerDayPerProjectPerModel-FreeTier")
                );
            }
            other => panic!("expected quota failure, got {other:?}"),
        }
        assert_eq!(details[2], ErrorDetail::Other);
        assert_eq!(details[3], ErrorDetail::Other);
    }

    #[test]
    fn non_array_details_yield_nothing() {
        let body = ApiErrorBody {
            code: 400,
            message: "m".into(),
            status: "INVALID_ARGUMENT".into(),
            details: json!({"@type": "x"}),
        };
        assert!(body.details().is_empty());
    }
}
