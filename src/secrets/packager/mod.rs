//! Certificate packagers turn a PEM certificate/key pair into a PKCS#12 container.
//!
//! Two realizations are provided:
//! - [`NativePackager`]: in-process, pure Rust, key material stays in memory.
//! - [`OpensslPackager`]: shells out to `openssl pkcs12 -export`, staging the
//!   key material in temporary files that are removed on every exit path.
//!
//! The native packager is the default. The openssl packager exists for
//! deployments that need byte-for-byte compatibility with the command-line tool.

mod keypair;
mod native;
mod openssl;
mod pkcs8;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::Result;
use super::record::KeyMaterial;
use super::types::SecretString;

pub use native::{build_pkcs12, NativePackager, DEFAULT_ALIAS};
pub use openssl::OpensslPackager;

/// Capability that packages a certificate and private key into a PKCS#12 container.
///
/// Implementations report failures as `ConversionError`; an implementation
/// that stages material outside memory reports `StagingError`/`WriteError`,
/// anything else goes through `PackagingError` with a diagnostic.
#[async_trait]
pub trait CertificatePackager: Send + Sync + fmt::Debug {
    /// Short name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Package `material` into a container protected by `passphrase`.
    async fn package(&self, material: KeyMaterial, passphrase: &SecretString) -> Result<Vec<u8>>;
}

/// Selects which packager implementation a store uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PackagerKind {
    #[default]
    Native,
    Openssl,
}

impl PackagerKind {
    /// Build the packager this kind names.
    pub fn build(self, openssl_path: impl Into<PathBuf>) -> Arc<dyn CertificatePackager> {
        match self {
            PackagerKind::Native => Arc::new(NativePackager::new()),
            PackagerKind::Openssl => Arc::new(OpensslPackager::new(openssl_path)),
        }
    }
}

impl fmt::Display for PackagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackagerKind::Native => write!(f, "native"),
            PackagerKind::Openssl => write!(f, "openssl"),
        }
    }
}

impl FromStr for PackagerKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "native" => Ok(PackagerKind::Native),
            "openssl" => Ok(PackagerKind::Openssl),
            other => Err(format!("unknown packager '{other}', expected 'native' or 'openssl'")),
        }
    }
}
