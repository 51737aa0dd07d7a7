//! # pfx-store
//!
//! Converts Kubernetes `kubernetes.io/tls` secrets (a PEM certificate plus a
//! PEM private key) into password-protected PKCS#12 containers and keeps the
//! latest container for each secret in memory for gateways that only accept
//! that format.
//!
//! ## Architecture
//!
//! ```text
//! secret events / manifests → SecretsStore → ConversionPipeline → CertificatePackager
//!                                  ↓                  ↓
//!                            conversion lock    CredentialCache ← retrieve
//! ```
//!
//! ## Core Components
//!
//! - **Secrets Store**: serializes conversions and deletions, serves lookups
//! - **Conversion Pipeline**: validates, packages under a timeout, commits on success
//! - **Packagers**: in-process PKCS#12 writer or the external `openssl` tool
//! - **Manifests and CLI**: offline conversion of Secret manifests to `.pfx` files
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pfx_store::{secrets::CredentialRecord, AppConfig, Result, SecretsStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let store = SecretsStore::from_config(&config.store);
//!
//!     let record = CredentialRecord::tls(std::fs::read("tls.crt")?, std::fs::read("tls.key")?);
//!     store.convert("default/tls-a", &record).await?;
//!
//!     let pfx = store.retrieve("default/tls-a");
//!     assert!(pfx.is_some());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod manifest;
pub mod observability;
pub mod secrets;

// Re-export commonly used types and traits
pub use config::AppConfig;
pub use errors::{Error, Result};
pub use secrets::{ConversionError, PackagedCertificate, SecretsKeeper, SecretsStore};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
