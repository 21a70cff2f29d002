//! # Configuration
//!
//! Resolves the adapter's settings from command-line flags, environment variables
//! and an optional `config.yaml`, in that order of precedence.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::strings::messages;

pub const DEFAULT_API_URL: &str = "https://api.paperinvest.io/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Layout of the optional `config.yaml`.
///
/// The API key itself is never read from the file; `api_key_env` names the
/// environment variable that holds it instead.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct FileConfig {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_key_env: Option<String>, // e.g. "PAPER_INVEST_STAGING_KEY"
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl FileConfig {
    /// Read and parse a YAML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// `<config_dir>/paper-invest-mcp/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("paper-invest-mcp").join("config.yaml"))
    }

    /// Load an explicitly requested file, or fall back to the default location.
    /// Returns the parsed file together with the path it came from.
    ///
    /// A missing explicit file is an error; a missing default file is not.
    pub fn locate(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }
        match Self::default_path() {
            Some(path) if path.exists() => Ok((Self::load(&path)?, Some(path))),
            _ => Ok((Self::default(), None)),
        }
    }
}

/// Values supplied on the command line (or bound from the environment by clap).
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub config_path: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// Fully resolved application configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    /// Config file that contributed to this configuration, if any
    pub config_file: Option<PathBuf>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("log_level", &self.log_level)
            .field("log_file", &self.log_file)
            .field("config_file", &self.config_file)
            .finish()
    }
}

impl AppConfig {
    /// Resolve configuration from overrides, config file and process environment.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        let (file, source) = FileConfig::locate(overrides.config_path.as_deref())?;
        let mut config = Self::from_parts(overrides, file, |name| std::env::var(name).ok())?;
        config.config_file = source;
        Ok(config)
    }

    /// Merge the layers. `env` looks up the variable named by `api_key_env`.
    pub fn from_parts<F>(overrides: ConfigOverrides, file: FileConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = overrides
            .api_key
            .filter(|key| !key.is_empty())
            .or_else(|| {
                file.api_key_env
                    .as_deref()
                    .and_then(|name| env(name))
                    .filter(|key| !key.is_empty())
            });

        let Some(api_key) = api_key else {
            bail!(messages::MISSING_API_KEY);
        };

        let api_url = overrides
            .api_url
            .or(file.api_url)
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = overrides
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            timeout: Duration::from_secs(timeout_secs),
            log_level: overrides
                .log_level
                .or(file.logging.level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_file: overrides.log_file.or(file.logging.file),
            config_file: None,
        })
    }
}
