//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::StatusFilter;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Campdash - campaign performance dashboard for the terminal
///
/// Fetches campaign metrics from an API, filters them by status and
/// shows totals for clicks, cost and impressions.
///
/// Examples:
///   campdash --api-url http://localhost:8000
///   campdash --api-url http://localhost:8000 --status active
///   campdash --format json --output campaigns.json
///   campdash --interactive
///   campdash --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Campaign API origin (`/campaigns` is appended)
    ///
    /// Can also be set via CAMPDASH_API_URL env var or .campdash.toml config.
    #[arg(long, value_name = "URL", env = "CAMPDASH_API_URL")]
    pub api_url: Option<String>,

    /// Status filter to apply
    #[arg(short, long, value_name = "STATUS")]
    pub status: Option<StatusFilter>,

    /// Output format (text, markdown, json)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the rendered dashboard to a file instead of stdout
    #[arg(short, long, value_name = "FILE", conflicts_with = "interactive")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .campdash.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    ///
    /// Without it the HTTP client default applies. Requests are never retried.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Accept records as decoded, without checking cost, names and ids
    #[arg(long)]
    pub no_validate: bool,

    /// Keep reading status filters from stdin and re-render
    ///
    /// Type all, active or paused; quit or q to exit.
    #[arg(short, long)]
    pub interactive: bool,

    /// Exit with code 2 when no campaign matches the filter
    #[arg(long)]
    pub fail_on_empty: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .campdash.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Terminal text (default)
    #[default]
    Text,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.interactive && self.output.is_some() {
            return Err("Cannot use --output with --interactive".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_args() -> Args {
        Args {
            api_url: Some("http://localhost:8000".to_string()),
            status: None,
            format: None,
            output: None,
            config: None,
            timeout: None,
            no_validate: false,
            interactive: false,
            fail_on_empty: false,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_ok() {
        assert!(make_args().validate().is_ok());

        let mut args = make_args();
        args.api_url = None;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut args = make_args();
        args.api_url = Some("localhost:8000".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.interactive = true;
        args.output = Some(PathBuf::from("out.md"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let mut args = make_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = make_args();
        args.api_url = Some("not-a-url".to_string());
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = Args::try_parse_from([
            "campdash",
            "--api-url",
            "https://api.example.com",
            "--status",
            "paused",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.api_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(args.status, Some(StatusFilter::Paused));
        assert_eq!(args.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
