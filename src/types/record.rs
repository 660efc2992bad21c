//! Normalized view of a raw error.

use serde::{Deserialize, Serialize};
use strum::Display;

use super::payload::ApiErrorEnvelope;
use super::raw::RawError;

/// Which normalizer path produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Origin {
    Structured,
    Json,
    Text,
    Unknown,
}

/// Canonical record built by [`crate::parse::normalize`].
///
/// `api_status`, `api_code` and `envelope` are only set when `origin` is
/// [`Origin::Json`]; `http_status` only when it is [`Origin::Structured`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub message: String,
    pub http_status: Option<u16>,
    pub api_status: Option<String>,
    pub api_code: Option<u16>,
    pub origin: Origin,
    /// Parsed API payload, kept for quota detection.
    #[serde(skip)]
    pub envelope: Option<ApiErrorEnvelope>,
    /// The input this record was derived from.
    #[serde(skip)]
    pub raw: RawError,
}

impl NormalizedRecord {
    /// Status used for classification: the HTTP status, else the API code.
    pub fn effective_status(&self) -> Option<u16> {
        self.http_status.or(self.api_code)
    }
}
