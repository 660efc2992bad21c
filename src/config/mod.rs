//! Configuration system (layered: explicit > env > config file).
//!
//! Only produces a [`FormatContext`]; the parsing engine never reads config.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::VariantNames;

use crate::error::{ErrlensError, Result};
use crate::types::{AccountTier, AuthMethod, FormatContext};

pub const ENV_AUTH_METHOD: &str = "ERRLENS_AUTH_METHOD";
pub const ENV_ACCOUNT_TIER: &str = "ERRLENS_ACCOUNT_TIER";
pub const ENV_MODEL: &str = "ERRLENS_MODEL";
pub const ENV_FALLBACK_MODEL: &str = "ERRLENS_FALLBACK_MODEL";

/// Defaults for the fields of a [`FormatContext`].
///
/// TOML layout:
/// ```toml
/// auth_method = "oauth-personal"
/// account_tier = "standard-tier"
/// model = "gemini-2.5-pro"
/// fallback_model = "gemini-2.5-flash"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ErrlensConfig {
    pub auth_method: Option<AuthMethod>,
    pub account_tier: Option<AccountTier>,
    pub model: Option<String>,
    pub fallback_model: Option<String>,
}

impl ErrlensConfig {
    /// Default config file path (~/.errlens/config.toml).
    pub fn default_path() -> PathBuf {
        default_errlens_dir().join("config.toml")
    }

    /// Load a TOML config file. A missing file yields an empty config.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file");
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(toml::from_str(&raw)?)
    }

    /// Load from environment variables, after loading `.env` if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Ok(Self {
            auth_method: env_var(ENV_AUTH_METHOD)
                .map(|v| parse_auth_method(&v))
                .transpose()?,
            account_tier: env_var(ENV_ACCOUNT_TIER)
                .map(|v| parse_account_tier(&v))
                .transpose()?,
            model: env_var(ENV_MODEL),
            fallback_model: env_var(ENV_FALLBACK_MODEL),
        })
    }

    /// Resolve file then env, env taking precedence. Uses the default path
    /// when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => Self::load_from_path(p)?,
            None => Self::load_from_path(Self::default_path())?,
        };
        Ok(file.overlay(Self::from_env()?))
    }

    /// Values set in `higher` win over values in `self`.
    pub fn overlay(self, higher: Self) -> Self {
        Self {
            auth_method: higher.auth_method.or(self.auth_method),
            account_tier: higher.account_tier.or(self.account_tier),
            model: higher.model.or(self.model),
            fallback_model: higher.fallback_model.or(self.fallback_model),
        }
    }

    pub fn format_context(&self) -> FormatContext {
        FormatContext {
            auth_method: self.auth_method,
            account_tier: self.account_tier,
            current_model: self.model.clone(),
            fallback_model: self.fallback_model.clone(),
        }
    }
}

/// Parse an auth method name such as `oauth-personal` or `vertex-ai`.
pub fn parse_auth_method(value: &str) -> Result<AuthMethod> {
    AuthMethod::from_str(value.trim())
        .map_err(|_| ErrlensError::unknown_value("auth method", value, AuthMethod::VARIANTS))
}

/// Parse an account tier name such as `free-tier` or `standard-tier`.
pub fn parse_account_tier(value: &str) -> Result<AccountTier> {
    AccountTier::from_str(value.trim())
        .map_err(|_| ErrlensError::unknown_value("account tier", value, AccountTier::VARIANTS))
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn default_errlens_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".errlens"))
        .unwrap_or_else(|| PathBuf::from(".errlens"))
}
