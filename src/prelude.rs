//! Convenience re-exports for common use.

pub use crate::config::ErrlensConfig;
pub use crate::error::{ErrlensError, Result};
pub use crate::format::{to_display_pair, to_legacy_bracketed_string, DisplayPair};
pub use crate::parse::{parse_and_format_api_error, parse_error, ParsedError, QuotaInfo};
pub use crate::types::{
    AccountTier, AuthMethod, ErrorKind, FormatContext, NormalizedRecord, Origin, RawError,
    StructuredError,
};
