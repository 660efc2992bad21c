//! CLI entry point for errlens.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::config::{parse_account_tier, parse_auth_method, ErrlensConfig};
use crate::error::Result;
use crate::format::{to_display_pair, to_legacy_bracketed_string, DisplayPair};
use crate::parse::{parse_error, ParsedError, QuotaInfo};
use crate::types::{FormatContext, RawError};

/// Classify a model API error and print what a user should see.
#[derive(Parser, Debug)]
#[command(name = "errlens", version, about = "Classify model API errors")]
pub struct Cli {
    /// Error text (or JSON with --json). Read from stdin when omitted.
    pub error: Option<String>,

    /// Treat the input as an error message with this HTTP status
    #[arg(long)]
    pub status: Option<u16>,

    /// Parse the input as a JSON value (object, string, or null)
    #[arg(long, conflicts_with = "status")]
    pub json: bool,

    /// Auth method (oauth-personal, gemini-api-key, vertex-ai, cloud-shell)
    #[arg(long)]
    pub auth: Option<String>,

    /// Account tier (free-tier, legacy-tier, standard-tier)
    #[arg(long)]
    pub tier: Option<String>,

    /// Current model name used in messages
    #[arg(long)]
    pub model: Option<String>,

    /// Fallback model name used in messages
    #[arg(long)]
    pub fallback_model: Option<String>,

    /// Config file (default: ~/.errlens/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Legacy)]
    pub format: OutputFormat,

    /// Log pipeline decisions to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `[Title: message (Status: X)]` plus remediation line
    Legacy,
    /// Title line, then body
    Display,
    /// Full JSON report
    Json,
}

impl Cli {
    /// Values given on the command line, the highest config layer.
    pub fn explicit_config(&self) -> Result<ErrlensConfig> {
        Ok(ErrlensConfig {
            auth_method: self.auth.as_deref().map(parse_auth_method).transpose()?,
            account_tier: self.tier.as_deref().map(parse_account_tier).transpose()?,
            model: self.model.clone(),
            fallback_model: self.fallback_model.clone(),
        })
    }

    /// Full context: config file, then env, then flags.
    pub fn format_context(&self) -> Result<FormatContext> {
        let explicit = self.explicit_config()?;
        let resolved = ErrlensConfig::load(self.config.as_deref())?.overlay(explicit);
        Ok(resolved.format_context())
    }

    /// Turn the input text into a raw error according to the flags.
    pub fn raw_error(&self, input: &str) -> Result<RawError> {
        if self.json {
            let value: serde_json::Value = serde_json::from_str(input)?;
            return Ok(RawError::from_value(&value));
        }
        Ok(match self.status {
            Some(status) => RawError::structured(input, status),
            None => RawError::Text(input.to_string()),
        })
    }
}

/// JSON report for `--format json`.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub parsed: &'a ParsedError,
    pub display: DisplayPair,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<QuotaInfo>,
    pub retryable: bool,
    pub fall_back: bool,
}

/// Render a parsed error in the requested format.
pub fn render(parsed: &ParsedError, ctx: &FormatContext, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Legacy => Ok(to_legacy_bracketed_string(parsed)),
        OutputFormat::Display => {
            let pair = to_display_pair(parsed);
            Ok(format!("{}\n{}", pair.title, pair.content))
        }
        OutputFormat::Json => {
            let report = Report {
                parsed,
                display: to_display_pair(parsed),
                quota: parsed.quota(),
                retryable: parsed.is_retryable(),
                fall_back: parsed.should_fall_back(ctx),
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
    }
}

/// Classify `input` and render it. The caller supplies the input so stdin
/// handling stays in the binary.
pub fn run(cli: &Cli, ctx: &FormatContext, input: &str) -> Result<String> {
    let raw = cli.raw_error(input.trim_end_matches(|c: char| c == '\r' || c == '\n'))?;
    let parsed = parse_error(&raw, ctx);
    render(&parsed, ctx, cli.format)
}

/// Install a stderr log subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{prelude::*, EnvFilter};

    let fallback = if verbose { "errlens=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let init_result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    if let Err(err) = init_result {
        tracing::warn!(error = %err, "tracing already initialized; skipping setup");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccountTier, AuthMethod, ErrorKind};

    fn parse_cli(args: &[&str]) -> Cli {
        let mut argv = vec!["errlens"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn parse_defaults() {
        let cli = parse_cli(&[]);
        assert_eq!(cli.format, OutputFormat::Legacy);
        assert!(cli.error.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn json_and_status_conflict() {
        assert!(Cli::try_parse_from(["errlens", "--json", "--status", "429", "x"]).is_err());
    }

    #[test]
    fn explicit_config_parses_enums() {
        let cli = parse_cli(&["--auth", "oauth-personal", "--tier", "standard-tier", "x"]);
        let config = cli.explicit_config().unwrap();
        assert_eq!(config.auth_method, Some(AuthMethod::GoogleLogin));
        assert_eq!(config.account_tier, Some(AccountTier::Standard));

        let bad = parse_cli(&["--auth", "nope"]);
        assert!(bad.explicit_config().is_err());
    }

    #[test]
    fn status_flag_builds_structured_error() {
        let cli = parse_cli(&["--status", "403"]);
        assert_eq!(
            cli.raw_error("Forbidden").unwrap(),
            RawError::structured("Forbidden", 403)
        );
    }

    #[test]
    fn json_flag_accepts_null() {
        let cli = parse_cli(&["--json"]);
        assert_eq!(cli.raw_error("null").unwrap(), RawError::Unknown);
        assert!(cli.raw_error("{oops").is_err());
    }

    #[test]
    fn run_renders_display_format() {
        let cli = parse_cli(&["--status", "403", "--format", "display"]);
        let out = run(&cli, &FormatContext::default(), "Forbidden\n").unwrap();
        assert_eq!(out, "Authentication Error\nForbidden");
    }

    #[test]
    fn run_renders_json_report() {
        let cli = parse_cli(&["--status", "429", "--format", "json"]);
        let ctx = FormatContext::builder()
            .auth_method(AuthMethod::GoogleLogin)
            .build();
        let out = run(&cli, &ctx, "Too Many Requests").unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["parsed"]["kind"], ErrorKind::RateLimited.to_string());
        assert_eq!(value["parsed"]["record"]["origin"], "structured");
        assert_eq!(value["retryable"], true);
        assert_eq!(value["fall_back"], true);
    }
}
