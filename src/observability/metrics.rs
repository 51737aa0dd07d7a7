//! # Metrics Collection
//!
//! Conversion metrics recorded through the `metrics` facade. Installing an
//! exporter is left to the embedding process; without one the calls are no-ops.

use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit,
};

/// Register metric descriptions with the installed recorder.
pub fn describe_metrics() {
    describe_counter!("pfx_conversions_total", "Secret conversions by packager and outcome");
    describe_histogram!(
        "pfx_conversion_duration_seconds",
        Unit::Seconds,
        "Time spent converting a secret, including waiting for the conversion lock"
    );
    describe_counter!("pfx_deletions_total", "Secret deletions processed");
    describe_gauge!("pfx_cache_entries", "Packaged certificates currently cached");
}

/// Records secrets store activity
#[derive(Debug, Clone, Default)]
pub struct ConversionMetrics;

impl ConversionMetrics {
    /// Create a new metrics recorder instance
    pub fn new() -> Self {
        Self
    }

    /// Record a finished conversion with its outcome label
    pub fn record_conversion(&self, packager: &str, outcome: &str, duration: f64) {
        let labels = [("packager", packager.to_string()), ("outcome", outcome.to_string())];
        counter!("pfx_conversions_total", &labels).increment(1);

        let duration_labels = [("packager", packager.to_string())];
        histogram!("pfx_conversion_duration_seconds", &duration_labels).record(duration);
    }

    /// Record a processed deletion
    pub fn record_deletion(&self) {
        counter!("pfx_deletions_total").increment(1);
    }

    /// Update the cached entries gauge
    pub fn update_cache_entries(&self, entries: usize) {
        gauge!("pfx_cache_entries").set(entries as f64);
    }
}
