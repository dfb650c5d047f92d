//! Configuration module
//!
//! Loads engine configuration from environment variables.

use std::env;
use std::time::Duration;

/// Log output format for the binaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Default deadline for transfer requests (None = wait for commit)
    pub transfer_timeout: Option<Duration>,

    /// Environment (development, production)
    pub environment: String,

    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transfer_timeout: None,
            environment: "development".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let timeout_ms: u64 = lookup("LEDGER_TRANSFER_TIMEOUT_MS")
            .unwrap_or_else(|| "0".to_string())
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue("LEDGER_TRANSFER_TIMEOUT_MS"))?;
        let transfer_timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));

        let environment = lookup("LEDGER_ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let log_format = match lookup("LEDGER_LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(_) => return Err(ConfigError::InvalidValue("LEDGER_LOG_FORMAT")),
        };

        Ok(Self {
            transfer_timeout,
            environment,
            log_format,
        })
    }

    pub fn with_transfer_timeout(mut self, timeout: Duration) -> Self {
        self.transfer_timeout = Some(timeout);
        self
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Configuration error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
