//! Client configuration.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::client::BASE_URL;
use crate::error::{ConfigError, ConfigResult};
use crate::transport::DEFAULT_TIMEOUT_SECS;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable overriding [`ClientConfig::application_id`].
pub const ENV_APP_ID: &str = "NUTRITIONIX_APP_ID";
/// Environment variable overriding [`ClientConfig::api_key`].
pub const ENV_APP_KEY: &str = "NUTRITIONIX_APP_KEY";
/// Environment variable overriding [`ClientConfig::debug`].
pub const ENV_DEBUG: &str = "NUTRITIONIX_DEBUG";
/// Environment variable overriding [`ClientConfig::base_url`].
pub const ENV_BASE_URL: &str = "NUTRITIONIX_BASE_URL";
/// Environment variable overriding [`ClientConfig::timeout_secs`].
pub const ENV_TIMEOUT_SECS: &str = "NUTRITIONIX_TIMEOUT_SECS";

/// Construction-time settings for a `NutritionClient`.
///
/// Loaded from `~/.config/nutritionix/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used. The API key is read
/// but never written back out.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Application id sent as `X-APP-ID`
    pub application_id: String,
    /// API key sent as `X-APP-KEY`
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Log every response body through `tracing`
    pub debug: bool,
    /// API root, including the version segment
    pub base_url: String,
    /// Request timeout in seconds, passed to the transport
    pub timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            application_id: String::new(),
            api_key: String::new(),
            debug: false,
            base_url: BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("nutritionix-rs/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("application_id", &self.application_id)
            .field("api_key", &"[REDACTED]")
            .field("debug", &self.debug)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Config with credentials set and everything else defaulted.
    #[must_use]
    pub fn new(application_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Parse configuration from a TOML string. Missing keys take defaults.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            Self::from_toml_str(&contents)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `NUTRITIONIX_APP_ID`: application id
    /// - `NUTRITIONIX_APP_KEY`: API key
    /// - `NUTRITIONIX_DEBUG`: response logging (true/false)
    /// - `NUTRITIONIX_BASE_URL`: API root
    /// - `NUTRITIONIX_TIMEOUT_SECS`: request timeout
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_APP_ID) {
            self.application_id = val;
            tracing::debug!("Override application_id from env");
        }

        if let Some(val) = lookup(ENV_APP_KEY) {
            self.api_key = val;
            tracing::debug!("Override api_key from env");
        }

        if let Some(val) = lookup(ENV_DEBUG) {
            if let Ok(enabled) = val.parse() {
                self.debug = enabled;
                tracing::debug!("Override debug from env: {}", enabled);
            }
        }

        if let Some(val) = lookup(ENV_BASE_URL) {
            tracing::debug!("Override base_url from env: {}", val);
            self.base_url = val;
        }

        if let Some(val) = lookup(ENV_TIMEOUT_SECS) {
            if let Ok(secs) = val.parse() {
                self.timeout_secs = secs;
                tracing::debug!("Override timeout_secs from env: {}", secs);
            }
        }
    }

    /// Check that the config can build a working client.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.application_id.trim().is_empty() {
            return Err(invalid("application_id", "must not be empty"));
        }
        if self.api_key.trim().is_empty() {
            return Err(invalid("api_key", "must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(invalid("timeout_secs", "must be greater than zero"));
        }

        let url = Url::parse(&self.base_url).map_err(|e| invalid("base_url", &e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("base_url", "scheme must be http or https"));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("base_url", "query and fragment are not allowed"));
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/nutritionix/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "nutritionix", "nutritionix")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
