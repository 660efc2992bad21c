//! Presentation of parsed errors for logs and dialogs.

use serde::{Deserialize, Serialize};

use crate::parse::ParsedError;
use crate::types::Origin;

/// Title/body pair for display surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPair {
    pub title: String,
    pub content: String,
}

/// Legacy single-line log format:
/// `[<title>: <message> (Status: <api status>)]`, followed by a newline and
/// the remediation message when there is one. The status suffix is only
/// written for errors parsed from an API payload.
pub fn to_legacy_bracketed_string(parsed: &ParsedError) -> String {
    let record = &parsed.normalized;
    let mut text = match (record.origin, record.api_status.as_deref()) {
        (Origin::Json, Some(status)) => {
            format!("[{}: {} (Status: {status})]", parsed.title, record.message)
        }
        _ => format!("[{}: {}]", parsed.title, record.message),
    };
    if let Some(custom) = &parsed.custom_message {
        text.push('\n');
        text.push_str(custom);
    }
    text
}

/// Title and body for a dialog. The body is the remediation message when
/// there is one, otherwise the error message.
pub fn to_display_pair(parsed: &ParsedError) -> DisplayPair {
    DisplayPair {
        title: parsed.title.to_string(),
        content: parsed
            .custom_message
            .clone()
            .unwrap_or_else(|| parsed.normalized.message.clone()),
    }
}

impl From<&ParsedError> for DisplayPair {
    fn from(parsed: &ParsedError) -> Self {
        to_display_pair(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_error;
    use crate::types::{FormatContext, RawError};
    use pretty_assertions::assert_eq;

    #[test]
    fn text_origin_has_no_status_suffix() {
        let parsed = parse_error(&RawError::from("socket hang up"), &FormatContext::default());
        assert_eq!(to_legacy_bracketed_string(&parsed), "[API Error: socket hang up]");
    }

    #[test]
    fn structured_origin_has_no_status_suffix() {
        let parsed = parse_error(
            &RawError::structured("Service unavailable", 503),
            &FormatContext::default(),
        );
        assert_eq!(
            to_legacy_bracketed_string(&parsed),
            "[API Error: Service unavailable]"
        );
    }

    #[test]
    fn json_origin_carries_api_status() {
        let parsed = parse_error(
            &RawError::from(
                r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#,
            ),
            &FormatContext::default(),
        );
        assert_eq!(
            to_legacy_bracketed_string(&parsed),
            "[API Error: API key not valid. (Status: INVALID_ARGUMENT)]"
        );
    }

    #[test]
    fn remediation_goes_on_its_own_line() {
        let parsed = parse_error(
            &RawError::structured("Too Many Requests", 429),
            &FormatContext::default(),
        );
        let text = to_legacy_bracketed_string(&parsed);
        let (first, rest) = text.split_once('\n').unwrap();
        assert_eq!(first, "[Rate Limit Exceeded: Too Many Requests]");
        assert_eq!(Some(rest), parsed.custom_message.as_deref());
    }

    #[test]
    fn display_pair_prefers_custom_message() {
        let parsed = parse_error(
            &RawError::structured("Too Many Requests", 429),
            &FormatContext::default(),
        );
        let pair = DisplayPair::from(&parsed);
        assert_eq!(pair.title, "Rate Limit Exceeded");
        assert_eq!(Some(pair.content.as_str()), parsed.custom_message.as_deref());
    }
}
