//! Error types for the Nutritionix client.

use thiserror::Error;

/// Errors that can occur while building or dispatching a Nutritionix request.
#[derive(Error, Debug)]
pub enum NutritionixError {
    /// Exactly one of `limit`/`offset` was supplied
    #[error("missing {missing}: limit and offset are required for pagination (got only {present})")]
    MissingPaginationParameter {
        /// The parameter that was not supplied
        missing: &'static str,
        /// The parameter that was supplied on its own
        present: &'static str,
    },

    /// A required request field was absent or blank
    #[error("missing required field: {field}")]
    MissingField {
        /// Field name
        field: &'static str,
    },

    /// Header name or value cannot be sent over HTTP
    #[error("invalid header {name}: {message}")]
    InvalidHeader {
        /// Header name
        name: String,
        /// Error message
        message: String,
    },

    /// Base URL parsed but cannot serve as an API root
    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl {
        /// The rejected URL
        url: String,
        /// Reason for rejection
        reason: &'static str,
    },

    /// Base URL or endpoint could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport failure (connection, timeout, DNS)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// I/O error reading config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, NutritionixError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
