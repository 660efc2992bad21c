//! Quota detection and quota field extraction.
//!
//! Upstream services sometimes wrap an API error inside the message of
//! another error, so every check looks at the outer level and at one
//! JSON-decode level below it. Deeper nesting is not followed.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::types::{
    ApiErrorEnvelope, ErrorDetail, NormalizedRecord, QuotaViolation, RawError, StructuredError,
};

/// Phrase the API uses when a quota metric is exhausted.
pub const QUOTA_EXCEEDED_PHRASE: &str = "Quota exceeded for quota metric";

/// API status for exhausted resources.
pub const RESOURCE_EXHAUSTED: &str = "RESOURCE_EXHAUSTED";

/// What the quota detectors inspect: the parsed payload or the raw error,
/// not the normalized record.
#[derive(Debug, Clone, Copy)]
pub enum DetectionTarget<'a> {
    Structured(&'a StructuredError),
    Api(&'a ApiErrorEnvelope),
    Text(&'a str),
    Empty,
}

impl<'a> DetectionTarget<'a> {
    pub fn from_record(record: &'a NormalizedRecord) -> Self {
        if let Some(envelope) = &record.envelope {
            return Self::Api(envelope);
        }
        Self::from_raw(&record.raw)
    }

    pub fn from_raw(raw: &'a RawError) -> Self {
        match raw {
            RawError::Structured(err) => Self::Structured(err),
            RawError::Text(text) => Self::Text(text),
            RawError::Unknown => Self::Empty,
        }
    }
}

/// Pro-tier quota exhaustion: a quota metric tied to the premium model.
pub fn is_pro_quota_exceeded(target: DetectionTarget<'_>) -> bool {
    let signals = Signals::collect(target);
    signals
        .messages
        .iter()
        .filter_map(|m| quoted_metric(m))
        .any(is_pro_quota_metric)
        || signals
            .violations()
            .filter_map(|v| v.quota_metric)
            .any(|metric| is_pro_quota_metric(&metric))
}

/// Any quota exhaustion: the quota phrase, a `RESOURCE_EXHAUSTED` status,
/// or a quota violation detail.
pub fn is_generic_quota_exceeded(target: DetectionTarget<'_>) -> bool {
    let signals = Signals::collect(target);
    signals
        .messages
        .iter()
        .any(|m| m.contains(QUOTA_EXCEEDED_PHRASE))
        || signals
            .envelopes
            .iter()
            .any(|e| e.error.status == RESOURCE_EXHAUSTED)
        || signals.violations().next().is_some()
}

/// Whether a quota metric name belongs to the premium model tier.
///
/// Matches `Gemini <version> Pro Requests` style display names and
/// `*paid_tier*` metric ids, with or without a service prefix.
pub fn is_pro_quota_metric(metric: &str) -> bool {
    let name = metric.rsplit('/').next().unwrap_or(metric);
    (name.starts_with("Gemini") && name.ends_with("Pro Requests")) || name.contains("paid_tier")
}

/// Structured quota fields pulled out of an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuotaInfo {
    pub quota_metric: Option<String>,
    pub quota_id: Option<String>,
    #[serde(rename = "retry_delay_ms", serialize_with = "serialize_millis")]
    pub retry_delay: Option<Duration>,
}

impl QuotaInfo {
    pub fn is_empty(&self) -> bool {
        self.quota_metric.is_none() && self.quota_id.is_none() && self.retry_delay.is_none()
    }
}

/// Extract quota metric, quota id and retry delay. `None` when nothing is present.
pub fn quota_info(target: DetectionTarget<'_>) -> Option<QuotaInfo> {
    let signals = Signals::collect(target);

    let violation = signals.violations().next();
    let quota_metric = violation
        .as_ref()
        .and_then(|v| v.quota_metric.clone())
        .or_else(|| {
            signals
                .messages
                .iter()
                .find_map(|m| quoted_metric(m))
                .map(str::to_string)
        });
    let quota_id = violation.and_then(|v| v.quota_id);

    let retry_delay = signals
        .details()
        .find_map(|detail| match detail {
            ErrorDetail::RetryInfo {
                retry_delay: Some(delay),
            } => parse_delay(&delay),
            _ => None,
        })
        .or_else(|| signals.messages.iter().find_map(|m| retry_hint(m)));

    let info = QuotaInfo {
        quota_metric,
        quota_id,
        retry_delay,
    };
    (!info.is_empty()).then_some(info)
}

/// Parse a protobuf-JSON duration such as `34s`, `1.5s` or `900ms`.
pub fn parse_delay(text: &str) -> Option<Duration> {
    static DELAY: OnceLock<Option<Regex>> = OnceLock::new();
    let re = DELAY
        .get_or_init(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)(ms|s)\s*$").ok())
        .as_ref()?;
    let caps = re.captures(text)?;
    to_duration(&caps[1], &caps[2])
}

/// Find a "Please retry in 12.3s" hint in free text.
fn retry_hint(message: &str) -> Option<Duration> {
    static HINT: OnceLock<Option<Regex>> = OnceLock::new();
    let re = HINT
        .get_or_init(|| Regex::new(r"(?i)retry in (\d+(?:\.\d+)?)\s*(ms|s)\b").ok())
        .as_ref()?;
    let caps = re.captures(message)?;
    to_duration(&caps[1], &caps[2].to_ascii_lowercase())
}

fn to_duration(amount: &str, unit: &str) -> Option<Duration> {
    let value: f64 = amount.parse().ok()?;
    let secs = match unit {
        "ms" => value / 1000.0,
        _ => value,
    };
    Duration::try_from_secs_f64(secs).ok()
}

/// Metric name quoted after the quota phrase, e.g. `'generate_content_free_tier'`.
fn quoted_metric(message: &str) -> Option<&str> {
    let start = message.find(QUOTA_EXCEEDED_PHRASE)? + QUOTA_EXCEEDED_PHRASE.len();
    let rest = message[start..].trim_start().strip_prefix('\'')?;
    let end = rest.find('\'')?;
    Some(&rest[..end])
}

fn serialize_millis<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(d) => serializer.serialize_some(&u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
        None => serializer.serialize_none(),
    }
}

/// Messages and payloads gathered from the outer level and one level down.
#[derive(Debug, Default)]
struct Signals {
    messages: Vec<String>,
    envelopes: Vec<ApiErrorEnvelope>,
}

impl Signals {
    fn collect(target: DetectionTarget<'_>) -> Self {
        let mut signals = Self::default();
        match target {
            DetectionTarget::Structured(err) => {
                signals.add_message(&err.message);
                match &err.response_data {
                    Some(Value::String(body)) => signals.add_message(body),
                    Some(body) => {
                        if let Some(envelope) = ApiErrorEnvelope::from_value(body) {
                            signals.add_envelope(envelope);
                        }
                    }
                    None => {}
                }
            }
            DetectionTarget::Api(envelope) => signals.add_envelope(envelope.clone()),
            DetectionTarget::Text(text) => signals.messages.push(text.to_string()),
            DetectionTarget::Empty => {}
        }
        signals
    }

    /// A message, plus the envelope it decodes to (if any) one level down.
    fn add_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
        if let Some(nested) = ApiErrorEnvelope::from_json_str(message) {
            self.messages.push(nested.error.message.clone());
            self.envelopes.push(nested);
        }
    }

    fn add_envelope(&mut self, envelope: ApiErrorEnvelope) {
        let message = envelope.error.message.clone();
        self.envelopes.push(envelope);
        self.add_message(&message);
    }

    fn details(&self) -> impl Iterator<Item = ErrorDetail> + '_ {
        self.envelopes.iter().flat_map(|e| e.error.details())
    }

    fn violations(&self) -> impl Iterator<Item = QuotaViolation> + '_ {
        self.details().flat_map(|detail| match detail {
            ErrorDetail::QuotaFailure { violations } => violations,
            _ => Vec::new(),
        })
    }
}
