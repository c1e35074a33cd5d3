//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.campdash.toml` files.

use crate::cli::OutputFormat;
use crate::models::StatusFilter;
use crate::retriever::RetrieverConfig;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".campdash.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Campaign API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Display settings.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,
}

/// Campaign API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API origin; `/campaigns` is appended to it.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in seconds. Unset means the HTTP client default.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Reject records with negative cost, empty names or duplicate ids.
    #[serde(default = "default_true")]
    pub validate_records: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_seconds: None,
            validate_records: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Display settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Status filter applied at startup.
    #[serde(default)]
    pub default_status: StatusFilter,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.campdash.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.api_url {
            self.api.base_url = Some(url.clone());
        }

        if let Some(timeout) = args.timeout {
            self.api.timeout_seconds = Some(timeout);
        }

        if args.no_validate {
            self.api.validate_records = false;
        }

        if let Some(status) = args.status {
            self.display.default_status = status;
        }

        if let Some(format) = args.format {
            self.general.format = format;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// The configured API origin, or an error telling the user how to set it.
    pub fn base_url(&self) -> Result<&str> {
        match self.api.base_url.as_deref().map(str::trim) {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => Ok(url),
            Some(url) if !url.is_empty() => bail!(
                "API URL must start with 'http://' or 'https://' (got '{}' from [api].base_url)",
                url
            ),
            _ => bail!(
                "No campaign API URL configured. Pass --api-url, set CAMPDASH_API_URL, \
                 or add base_url under [api] in {}",
                CONFIG_FILE_NAME
            ),
        }
    }

    /// Retriever settings derived from the `[api]` section.
    pub fn retriever_config(&self) -> RetrieverConfig {
        RetrieverConfig {
            timeout_seconds: self.api.timeout_seconds,
            validate_records: self.api.validate_records,
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let mut config = Config::default();
        config.api.base_url = Some("http://localhost:8000".to_string());
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
