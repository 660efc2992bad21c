//! Classification and remediation messages for model API errors.
//!
//! Takes whatever a failed model-serving call produced and classifies it
//! into a small closed set of [`ErrorKind`](types::ErrorKind)s. Rate-limit
//! kinds also get a remediation message that depends on how the user is
//! signed in.
//!
//! # Quick Start
//!
//! ```
//! use errlens::prelude::*;
//!
//! let raw = RawError::from(
//!     r#"{"error":{"code":429,"message":"Quota exceeded for quota metric 'generate_content_free_tier'","status":"RESOURCE_EXHAUSTED"}}"#,
//! );
//! let ctx = FormatContext::builder()
//!     .auth_method(AuthMethod::GoogleLogin)
//!     .account_tier(AccountTier::Free)
//!     .build();
//!
//! let parsed = parse_error(&raw, &ctx);
//! assert_eq!(parsed.kind, ErrorKind::GenericQuotaExceeded);
//! println!("{}", to_legacy_bracketed_string(&parsed));
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod message;
pub mod parse;
pub mod prelude;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
