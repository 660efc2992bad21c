//! Caller-supplied context for message synthesis.

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, VariantNames};

/// Default model named in remediation messages.
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

/// Default model users are switched to after a quota or rate limit.
pub const DEFAULT_FALLBACK_MODEL: &str = "gemini-2.5-flash";

/// Credential scheme in use for the session.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    VariantNames,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AuthMethod {
    /// Google account login (Code Assist).
    #[serde(rename = "oauth-personal")]
    #[strum(serialize = "oauth-personal")]
    GoogleLogin,
    GeminiApiKey,
    VertexAi,
    CloudShell,
}

/// Account tier reported by the session resolver.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    VariantNames,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AccountTier {
    #[serde(rename = "free-tier")]
    #[strum(serialize = "free-tier")]
    Free,
    #[serde(rename = "legacy-tier")]
    #[strum(serialize = "legacy-tier")]
    Legacy,
    #[serde(rename = "standard-tier")]
    #[strum(serialize = "standard-tier")]
    Standard,
}

impl AccountTier {
    /// Legacy and standard tiers are paid.
    pub fn is_paid(self) -> bool {
        matches!(self, Self::Legacy | Self::Standard)
    }
}

/// Context for one synthesis call. Never stored on a parse result.
///
/// ```
/// use errlens::types::{AccountTier, AuthMethod, FormatContext};
///
/// let ctx = FormatContext::builder()
///     .auth_method(AuthMethod::GoogleLogin)
///     .account_tier(AccountTier::Standard)
///     .current_model("gemini-2.5-pro")
///     .build();
/// assert_eq!(ctx.fallback_model(), "gemini-2.5-flash");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Serialize, Deserialize)]
pub struct FormatContext {
    pub auth_method: Option<AuthMethod>,
    pub account_tier: Option<AccountTier>,
    #[builder(into)]
    pub current_model: Option<String>,
    #[builder(into)]
    pub fallback_model: Option<String>,
}

impl FormatContext {
    pub fn current_model(&self) -> &str {
        self.current_model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn fallback_model(&self) -> &str {
        self.fallback_model.as_deref().unwrap_or(DEFAULT_FALLBACK_MODEL)
    }

    /// Missing tier counts as free.
    pub fn is_paid_tier(&self) -> bool {
        self.account_tier.is_some_and(AccountTier::is_paid)
    }
}
