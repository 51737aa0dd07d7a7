//! Conversion pipeline: validate, package, commit.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error};

use super::cache::CredentialCache;
use super::error::{ConversionError, Result};
use super::packager::CertificatePackager;
use super::record::{CredentialRecord, KeyMaterial, PackagedCertificate};
use super::types::SecretString;

/// Turns credential records into cached PKCS#12 containers.
///
/// The sequence is fail-fast. Nothing is written to the cache until the
/// packager has returned a non-empty container, so a failed conversion
/// leaves the previous entry (or its absence) in place.
#[derive(Debug, Clone)]
pub struct ConversionPipeline {
    packager: Arc<dyn CertificatePackager>,
    passphrase: SecretString,
    timeout: Option<Duration>,
    cache: CredentialCache,
}

impl ConversionPipeline {
    pub fn new(
        packager: Arc<dyn CertificatePackager>,
        passphrase: SecretString,
        timeout: Option<Duration>,
        cache: CredentialCache,
    ) -> Self {
        Self { packager, passphrase, timeout, cache }
    }

    pub fn packager(&self) -> &dyn CertificatePackager {
        self.packager.as_ref()
    }

    /// Validate and package `record` without touching the cache.
    pub async fn package(
        &self,
        key: &str,
        record: &CredentialRecord,
    ) -> Result<PackagedCertificate> {
        let material = KeyMaterial::from_record(key, record)?;

        let packaging = self.packager.package(material, &self.passphrase);
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, packaging).await.map_err(|_| {
                ConversionError::PackagingTimeout { timeout_ms: limit.as_millis() as u64 }
            })??,
            None => packaging.await?,
        };

        PackagedCertificate::new(output)
    }

    /// Package `record` and store the result under `key`.
    pub async fn convert(&self, key: &str, record: &CredentialRecord) -> Result<()> {
        let started = Instant::now();

        match self.package(key, record).await {
            Ok(packaged) => {
                debug!(
                    secret_key = %key,
                    packager = self.packager.name(),
                    bytes = packaged.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Converted secret"
                );
                self.cache.put(key, packaged);
                Ok(())
            }
            Err(err) => {
                error!(
                    secret_key = %key,
                    packager = self.packager.name(),
                    kind = err.kind(),
                    error = %err,
                    "Secret conversion failed"
                );
                Err(err)
            }
        }
    }
}
