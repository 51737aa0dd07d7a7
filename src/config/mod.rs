//! # Configuration Management
//!
//! Environment-driven configuration for the secrets store and its logging.

pub mod settings;

pub use settings::{
    AppConfig, ObservabilityConfig, StoreConfig, DEFAULT_PACKAGING_TIMEOUT_SECONDS,
    DEFAULT_PASSPHRASE,
};
