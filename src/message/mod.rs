//! Remediation messages for rate-limit family errors.
//!
//! The policy is a table keyed by auth family, error kind and tier class.
//! Rows may leave a key open (`None`) to match anything; the first matching
//! row wins. Templates are plain interpolation over the model names.

use tracing::debug;

use crate::parse::DetectionTarget;
use crate::types::{AuthMethod, ErrorKind, FormatContext};

const AISTUDIO_KEY_URL: &str = "https://aistudio.google.com/apikey";
const CODE_ASSIST_UPGRADE_URL: &str = "https://goo.gle/set-up-gemini-code-assist";

/// Auth methods grouped by the message family they get.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFamily {
    GoogleLogin,
    GeminiApiKey,
    VertexAi,
    Other,
}

impl AuthFamily {
    pub fn of(method: Option<AuthMethod>) -> Self {
        match method {
            Some(AuthMethod::GoogleLogin) => Self::GoogleLogin,
            Some(AuthMethod::GeminiApiKey) => Self::GeminiApiKey,
            Some(AuthMethod::VertexAi) => Self::VertexAi,
            Some(AuthMethod::CloudShell) | None => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierClass {
    Free,
    Paid,
}

impl TierClass {
    pub fn of(ctx: &FormatContext) -> Self {
        if ctx.is_paid_tier() {
            Self::Paid
        } else {
            Self::Free
        }
    }
}

/// Model names a template may mention.
#[derive(Debug, Clone, Copy)]
pub struct Models<'a> {
    pub current: &'a str,
    pub fallback: &'a str,
}

pub type Template = fn(Models<'_>) -> String;

/// One row of the policy table. `None` keys match any value.
#[derive(Debug, Clone, Copy)]
pub struct PolicyRule {
    pub auth: AuthFamily,
    pub kind: Option<ErrorKind>,
    pub tier: Option<TierClass>,
    pub template: Template,
}

const fn rule(
    auth: AuthFamily,
    kind: Option<ErrorKind>,
    tier: Option<TierClass>,
    template: Template,
) -> PolicyRule {
    PolicyRule {
        auth,
        kind,
        tier,
        template,
    }
}

/// The message policy.
pub static POLICY: &[PolicyRule] = &[
    rule(
        AuthFamily::GoogleLogin,
        Some(ErrorKind::ProQuotaExceeded),
        Some(TierClass::Free),
        |m| format!("{} {}", google_pro_quota(m), free_upgrade_suggestion()),
    ),
    rule(
        AuthFamily::GoogleLogin,
        Some(ErrorKind::ProQuotaExceeded),
        Some(TierClass::Paid),
        |m| {
            format!(
                "{} {} {}",
                google_pro_quota(m),
                paid_appreciation(),
                paid_key_suggestion(m)
            )
        },
    ),
    rule(
        AuthFamily::GoogleLogin,
        Some(ErrorKind::GenericQuotaExceeded),
        Some(TierClass::Free),
        |_| format!("{} {}", google_generic_quota(), free_upgrade_suggestion()),
    ),
    rule(
        AuthFamily::GoogleLogin,
        Some(ErrorKind::GenericQuotaExceeded),
        Some(TierClass::Paid),
        |m| {
            format!(
                "{} {} {}",
                google_generic_quota(),
                paid_appreciation(),
                paid_key_suggestion(m)
            )
        },
    ),
    rule(
        AuthFamily::GoogleLogin,
        Some(ErrorKind::RateLimited),
        Some(TierClass::Free),
        slow_response_fallback,
    ),
    rule(
        AuthFamily::GoogleLogin,
        Some(ErrorKind::RateLimited),
        Some(TierClass::Paid),
        |m| format!("{} {}", slow_response_fallback(m), paid_appreciation()),
    ),
    rule(AuthFamily::GeminiApiKey, None, None, |_| {
        "Please wait and try again later. To increase your limits, request a quota increase \
         through AI Studio, or switch to another /auth method"
            .to_string()
    }),
    rule(AuthFamily::VertexAi, None, None, |_| {
        "Please wait and try again later. To increase your limits, request a quota increase \
         through Vertex, or switch to another /auth method"
            .to_string()
    }),
    rule(AuthFamily::Other, None, None, slow_response_fallback),
];

fn google_pro_quota(m: Models<'_>) -> String {
    format!(
        "You have reached your daily {} quota limit. You will be switched to the {} model for \
         the rest of this session.",
        m.current, m.fallback
    )
}

fn google_generic_quota() -> &'static str {
    "You have reached your daily quota limit."
}

fn slow_response_fallback(m: Models<'_>) -> String {
    format!(
        "Possible quota limitations in place or slow response times detected. Switching to the \
         {} model for the rest of this session.",
        m.fallback
    )
}

fn paid_appreciation() -> &'static str {
    "We appreciate you for choosing Gemini Code Assist and the Gemini CLI."
}

fn paid_key_suggestion(m: Models<'_>) -> String {
    format!(
        "To continue accessing the {} model today, consider using /auth to switch to using a \
         paid API key from AI Studio at {AISTUDIO_KEY_URL}",
        m.current
    )
}

fn free_upgrade_suggestion() -> String {
    format!(
        "To increase your limits, upgrade to a Gemini Code Assist Standard or Enterprise plan \
         with higher limits at {CODE_ASSIST_UPGRADE_URL}, or use /auth to switch to using a \
         paid API key from AI Studio at {AISTUDIO_KEY_URL}"
    )
}

/// First policy row matching the key.
pub fn lookup(auth: AuthFamily, kind: ErrorKind, tier: TierClass) -> Option<&'static PolicyRule> {
    POLICY.iter().find(|row| {
        row.auth == auth
            && row.kind.map_or(true, |k| k == kind)
            && row.tier.map_or(true, |t| t == tier)
    })
}

/// Build the remediation message for a rate-limit family kind.
///
/// Returns `None` for other kinds. The text never starts with a newline;
/// line layout is left to the formatter.
///
/// `_target` is the payload the kind was detected from. [`POLICY`] rows are
/// keyed on the context and the kind alone, so the payload never changes the
/// message. It stays in the signature so callers hand over the same inputs
/// `classify` saw.
pub fn synthesize(
    kind: ErrorKind,
    ctx: &FormatContext,
    _target: DetectionTarget<'_>,
) -> Option<String> {
    if !kind.is_rate_limit_family() {
        return None;
    }
    let auth = AuthFamily::of(ctx.auth_method);
    let tier = TierClass::of(ctx);
    let row = lookup(auth, kind, tier)?;
    debug!(?auth, ?tier, %kind, "selected remediation template");
    Some((row.template)(Models {
        current: ctx.current_model(),
        fallback: ctx.fallback_model(),
    }))
}
