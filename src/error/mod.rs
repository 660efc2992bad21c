//! Error types for the ambient surfaces of errlens (config loading, CLI input).
//!
//! The classification engine itself never fails; see [`crate::parse`].

use thiserror::Error;

/// Primary error type for errlens operations that can fail.
#[derive(Error, Debug)]
pub enum ErrlensError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ErrlensError {
    /// Build an `InvalidArgument` error for an unrecognized enum value.
    pub fn unknown_value(field: &str, value: &str, expected: &[&str]) -> Self {
        Self::InvalidArgument(format!(
            "unknown {field} '{value}' (expected one of: {})",
            expected.join(", ")
        ))
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ErrlensError>;
