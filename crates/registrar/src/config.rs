//! Configuration management for registrar.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory under the user config dir holding the config file.
const CONFIG_DIR_NAME: &str = "registrar";

/// Prefix for environment overrides, e.g. `REGISTRAR_API__BASE_URL`.
const ENV_PREFIX: &str = "REGISTRAR_";

/// Where the registration API is hosted unless configured otherwise.
pub const DEFAULT_BASE_URL: &str = "https://walk-talk-inspire-backend.onrender.com";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `REGISTRAR_`, nested keys split on `__`)
/// 2. TOML config file at `~/.config/registrar/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Registration API configuration.
    pub api: ApiConfig,
}

/// Registration API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the API; `/api/registrations` is appended to it.
    pub base_url: String,
    /// Per-request timeout in seconds. Unset means no timeout.
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        self.base_url()?;

        if self.api.timeout_secs == Some(0) {
            return Err(Error::config_validation(
                "timeout_secs must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Parse the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns an error unless the base URL is an absolute `http` or `https`
    /// URL.
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.api.base_url).map_err(|e| {
            Error::config_validation(format!("invalid base_url {:?}: {e}", self.api.base_url))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config_validation(format!(
                "base_url must use http or https, got {:?}",
                url.scheme()
            )));
        }

        Ok(url)
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.api.timeout_secs.map(Duration::from_secs)
    }
}
