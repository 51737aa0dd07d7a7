//! # Configuration Settings
//!
//! Defines the configuration structure for pfx-store. Values are read from
//! `PFX_STORE_*` environment variables; anything unset falls back to the
//! defaults below.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::Validate;

use crate::errors::{Error, Result};
use crate::secrets::{PackagerKind, SecretString};

/// Passphrase applied when `PFX_STORE_PASSPHRASE` is not set.
///
/// Kept for compatibility with gateways provisioned against containers
/// exported with this value.
pub const DEFAULT_PASSPHRASE: &str = "msazure";

/// Default bound on a single packaging call.
pub const DEFAULT_PACKAGING_TIMEOUT_SECONDS: u64 = 30;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct AppConfig {
    /// Secrets store configuration
    #[validate(nested)]
    pub store: StoreConfig,

    /// Logging configuration
    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load the full configuration from the environment and validate it
    pub fn from_env() -> Result<Self> {
        let config = Self {
            store: StoreConfig::from_env()?,
            observability: ObservabilityConfig::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)?;
        self.store.validate_custom()
    }
}

/// Secrets store configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StoreConfig {
    /// Packager implementation
    pub packager: PackagerKind,

    /// Passphrase protecting every produced container
    pub passphrase: SecretString,

    /// Packaging timeout in seconds (0 = no timeout)
    #[validate(range(max = 600, message = "Packaging timeout must be at most 600 seconds"))]
    pub packaging_timeout_seconds: u64,

    /// openssl binary used by the openssl packager
    pub openssl_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            packager: PackagerKind::Native,
            passphrase: SecretString::new(DEFAULT_PASSPHRASE),
            packaging_timeout_seconds: DEFAULT_PACKAGING_TIMEOUT_SECONDS,
            openssl_path: PathBuf::from("openssl"),
        }
    }
}

impl StoreConfig {
    /// Create StoreConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let packager = match env_value("PFX_STORE_PACKAGER") {
            Some(value) => value.parse::<PackagerKind>().map_err(Error::config)?,
            None => defaults.packager,
        };

        let passphrase = match std::env::var("PFX_STORE_PASSPHRASE") {
            Ok(value) => SecretString::new(value),
            Err(_) => {
                warn!("PFX_STORE_PASSPHRASE not set, using the compatibility default passphrase");
                defaults.passphrase
            }
        };

        let packaging_timeout_seconds = match env_value("PFX_STORE_PACKAGING_TIMEOUT_SECONDS") {
            Some(value) => value.parse::<u64>().map_err(|e| {
                Error::config(format!(
                    "Invalid PFX_STORE_PACKAGING_TIMEOUT_SECONDS '{}': {}",
                    value, e
                ))
            })?,
            None => defaults.packaging_timeout_seconds,
        };

        let openssl_path =
            env_value("PFX_STORE_OPENSSL_PATH").map(PathBuf::from).unwrap_or(defaults.openssl_path);

        Ok(Self { packager, passphrase, packaging_timeout_seconds, openssl_path })
    }

    /// Get packaging timeout as Duration (None if 0)
    pub fn packaging_timeout(&self) -> Option<Duration> {
        if self.packaging_timeout_seconds == 0 {
            None
        } else {
            Some(Duration::from_secs(self.packaging_timeout_seconds))
        }
    }

    /// Whether the compatibility passphrase is in effect
    pub fn uses_default_passphrase(&self) -> bool {
        self.passphrase.expose_secret() == DEFAULT_PASSPHRASE
    }

    pub(crate) fn validate_custom(&self) -> Result<()> {
        if self.packager == PackagerKind::Openssl && self.openssl_path.as_os_str().is_empty() {
            return Err(Error::validation("openssl packager requires a non-empty openssl path"));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error), used when RUST_LOG is unset
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self { log_level: "info".to_string(), json_logging: false }
    }
}

impl ObservabilityConfig {
    /// Create ObservabilityConfig from environment variables
    pub fn from_env() -> Self {
        let log_level = env_value("PFX_STORE_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let json_logging = env_value("PFX_STORE_LOG_JSON")
            .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        Self { log_level, json_logging }
    }
}

/// Trimmed, non-empty value of an environment variable
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}
