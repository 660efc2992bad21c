//! Error parsing pipeline: normalize, classify, synthesize.
//!
//! ```
//! use errlens::parse::parse_error;
//! use errlens::types::{AuthMethod, ErrorKind, FormatContext, RawError};
//!
//! let ctx = FormatContext::builder().auth_method(AuthMethod::VertexAi).build();
//! let parsed = parse_error(&RawError::structured("Too Many Requests", 429), &ctx);
//! assert_eq!(parsed.kind, ErrorKind::RateLimited);
//! assert!(parsed.custom_message.is_some());
//! ```

pub mod classify;
pub mod normalize;
pub mod quota;

pub use classify::classify;
pub use normalize::{normalize, UNKNOWN_ERROR_MESSAGE};
pub use quota::{
    is_generic_quota_exceeded, is_pro_quota_exceeded, quota_info, DetectionTarget, QuotaInfo,
};

use std::time::Duration;

use serde::Serialize;

use crate::message::synthesize;
use crate::types::{AuthMethod, ErrorKind, FormatContext, NormalizedRecord, RawError};

/// Final classification of one error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedError {
    pub kind: ErrorKind,
    pub title: &'static str,
    /// Remediation text; only set for rate-limit family kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
    #[serde(rename = "record")]
    pub normalized: NormalizedRecord,
}

impl ParsedError {
    /// Message text after normalization.
    pub fn message(&self) -> &str {
        &self.normalized.message
    }

    /// Quota metric, quota id and retry delay, when the payload carries them.
    pub fn quota(&self) -> Option<QuotaInfo> {
        quota_info(DetectionTarget::from_record(&self.normalized))
    }

    pub fn retry_delay(&self) -> Option<Duration> {
        self.quota().and_then(|q| q.retry_delay)
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable(self.normalized.effective_status())
    }

    /// Whether the session should move to the fallback model.
    ///
    /// Only Google-login sessions fall back, and only for pro quota or
    /// plain throttling; generic quota applies to every model.
    pub fn should_fall_back(&self, ctx: &FormatContext) -> bool {
        ctx.auth_method == Some(AuthMethod::GoogleLogin)
            && matches!(
                self.kind,
                ErrorKind::ProQuotaExceeded | ErrorKind::RateLimited
            )
    }
}

/// Run the full pipeline on a raw error.
pub fn parse_error(raw: &RawError, ctx: &FormatContext) -> ParsedError {
    let normalized = normalize(raw);
    let target = DetectionTarget::from_record(&normalized);
    let kind = classify(&normalized, target);
    let custom_message = synthesize(kind, ctx, target);
    ParsedError {
        kind,
        title: kind.title(),
        custom_message,
        normalized,
    }
}

/// Parse and render in the legacy single-line log format.
pub fn parse_and_format_api_error(raw: &RawError, ctx: &FormatContext) -> String {
    crate::format::to_legacy_bracketed_string(&parse_error(raw, ctx))
}
