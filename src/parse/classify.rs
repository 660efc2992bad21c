//! Status-driven classification into [`ErrorKind`].

use tracing::debug;

use super::quota::{is_generic_quota_exceeded, is_pro_quota_exceeded, DetectionTarget};
use crate::types::{ErrorKind, NormalizedRecord};

/// Classify a normalized record.
///
/// The status decides first; message content only refines a 429 into a
/// quota kind. A 401 or 403 is never reconsidered on content.
pub fn classify(record: &NormalizedRecord, target: DetectionTarget<'_>) -> ErrorKind {
    let status = record.effective_status();
    let kind = match status {
        Some(401 | 403) => ErrorKind::AuthFailed,
        Some(429) => {
            if is_pro_quota_exceeded(target) {
                ErrorKind::ProQuotaExceeded
            } else if is_generic_quota_exceeded(target) {
                ErrorKind::GenericQuotaExceeded
            } else {
                ErrorKind::RateLimited
            }
        }
        _ => ErrorKind::Generic,
    };
    debug!(origin = %record.origin, status = ?status, kind = %kind, "classified error");
    kind
}
