//! Error kinds produced by classification.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Closed set of error kinds. Every input maps to exactly one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    ProQuotaExceeded,
    GenericQuotaExceeded,
    RateLimited,
    AuthFailed,
    Generic,
}

impl ErrorKind {
    /// Display title for this kind.
    pub fn title(self) -> &'static str {
        match self {
            Self::ProQuotaExceeded => "Pro Quota Exceeded",
            Self::GenericQuotaExceeded => "Quota Exceeded",
            Self::RateLimited => "Rate Limit Exceeded",
            Self::AuthFailed => "Authentication Error",
            Self::Generic => "API Error",
        }
    }

    /// Kinds that come from a 429 and carry a remediation message.
    pub fn is_rate_limit_family(self) -> bool {
        matches!(
            self,
            Self::ProQuotaExceeded | Self::GenericQuotaExceeded | Self::RateLimited
        )
    }

    /// Whether retrying the same request later may succeed.
    ///
    /// `Generic` is only retryable for server-side statuses, so the status is
    /// passed in.
    pub fn is_retryable(self, status: Option<u16>) -> bool {
        match self {
            Self::RateLimited => true,
            Self::Generic => matches!(status, Some(500..=599)),
            Self::ProQuotaExceeded | Self::GenericQuotaExceeded | Self::AuthFailed => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn titles_are_distinct() {
        let mut titles: Vec<_> = ErrorKind::iter().map(ErrorKind::title).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), 5);
    }

    #[test]
    fn rate_limit_family_is_exactly_the_429_kinds() {
        let family: Vec<_> = ErrorKind::iter()
            .filter(|k| k.is_rate_limit_family())
            .collect();
        assert_eq!(
            family,
            vec![
                ErrorKind::ProQuotaExceeded,
                ErrorKind::GenericQuotaExceeded,
                ErrorKind::RateLimited
            ]
        );
    }

    #[test]
    fn generic_retryability_depends_on_status() {
        assert!(ErrorKind::Generic.is_retryable(Some(503)));
        assert!(!ErrorKind::Generic.is_retryable(Some(400)));
        assert!(!ErrorKind::Generic.is_retryable(None));
        assert!(ErrorKind::RateLimited.is_retryable(Some(429)));
        assert!(!ErrorKind::GenericQuotaExceeded.is_retryable(Some(429)));
    }

    #[test]
    fn display_is_snake_case() {
        assert_eq!(ErrorKind::ProQuotaExceeded.to_string(), "pro_quota_exceeded");
    }
}
