//! # Structured Logging
//!
//! Installs the global `tracing` subscriber. Secret keys are always logged as
//! the `secret_key` field; key material and passphrases never are.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};

/// Initialize the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured log level. Output goes to
/// stderr so command output on stdout stays machine-readable. Calling this
/// when a subscriber is already installed (tests, embedding processes) is
/// not an error.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| Error::config(format!("Invalid log level '{}': {}", config.log_level, e)))?;

    let registry = tracing_subscriber::registry().with(filter);

    // An already-installed subscriber wins.
    let _ = if config.json_logging {
        registry
            .with(fmt::layer().json().with_current_span(true).with_writer(std::io::stderr))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true).with_writer(std::io::stderr)).try_init()
    };
    Ok(())
}

/// Log configuration at startup
pub fn log_config_info(config: &crate::config::AppConfig) {
    tracing::info!(
        packager = %config.store.packager,
        packaging_timeout_seconds = config.store.packaging_timeout_seconds,
        default_passphrase = config.store.uses_default_passphrase(),
        json_logging = config.observability.json_logging,
        "pfx-store configuration"
    );
}
