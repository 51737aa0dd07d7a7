//! # Observability Infrastructure
//!
//! Structured logging and conversion metrics for the secrets store.

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, log_config_info};
pub use metrics::{describe_metrics, ConversionMetrics};

use crate::config::ObservabilityConfig;
use crate::errors::Result;

/// Initialize logging and register metric descriptions
pub fn init_observability(config: &ObservabilityConfig) -> Result<()> {
    init_logging(config)?;
    describe_metrics();

    tracing::debug!(
        log_level = %config.log_level,
        json_logging = config.json_logging,
        "Observability initialized"
    );
    Ok(())
}
