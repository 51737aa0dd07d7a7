//! Secrets store façade.
//!
//! Composes the conversion pipeline and the credential cache behind three
//! operations: `convert`, `delete` and `retrieve`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use super::cache::CredentialCache;
use super::error::Result;
use super::packager::CertificatePackager;
use super::pipeline::ConversionPipeline;
use super::record::{CredentialRecord, PackagedCertificate};
use super::types::SecretString;
use crate::config::StoreConfig;
use crate::observability::ConversionMetrics;

/// Interface the cluster event source and downstream consumers use.
#[async_trait]
pub trait SecretsKeeper: Send + Sync {
    /// Packaged container for `key`, if its latest conversion succeeded.
    fn retrieve(&self, key: &str) -> Option<PackagedCertificate>;

    /// Convert `record` and store the result under `key`.
    async fn convert(&self, key: &str, record: &CredentialRecord) -> Result<()>;

    /// Forget the container stored under `key`.
    async fn delete(&self, key: &str);
}

/// Concurrency-safe store of PKCS#12 containers keyed by secret.
///
/// A single mutex is held for the whole of every `convert` and `delete`,
/// whatever the key, so at most one packaging operation runs at a time.
/// `retrieve` reads the cache directly and never waits on that mutex; a
/// reader racing a conversion sees either the previous container or the new
/// one.
#[derive(Debug)]
pub struct SecretsStore {
    conversion_lock: Mutex<()>,
    pipeline: ConversionPipeline,
    cache: CredentialCache,
    metrics: ConversionMetrics,
}

impl SecretsStore {
    /// Create an empty store packaging with `packager`.
    ///
    /// `timeout` bounds each packaging call; `None` waits indefinitely.
    pub fn new(
        packager: Arc<dyn CertificatePackager>,
        passphrase: SecretString,
        timeout: Option<Duration>,
    ) -> Self {
        let cache = CredentialCache::new();
        let pipeline = ConversionPipeline::new(packager, passphrase, timeout, cache.clone());

        Self {
            conversion_lock: Mutex::new(()),
            pipeline,
            cache,
            metrics: ConversionMetrics::new(),
        }
    }

    /// Create an empty store from loaded configuration.
    pub fn from_config(config: &StoreConfig) -> Self {
        let packager = config.packager.build(&config.openssl_path);

        info!(
            packager = packager.name(),
            timeout_seconds = config.packaging_timeout_seconds,
            "Creating secrets store"
        );

        Self::new(packager, config.passphrase.clone(), config.packaging_timeout())
    }

    /// Convert `record` and store the resulting container under `key`.
    ///
    /// On error the cache is left exactly as it was.
    #[instrument(skip(self, record), fields(secret_key = %key))]
    pub async fn convert(&self, key: &str, record: &CredentialRecord) -> Result<()> {
        let _guard = self.conversion_lock.lock().await;
        let started = Instant::now();

        let result = self.pipeline.convert(key, record).await;

        let outcome = match &result {
            Ok(()) => "success",
            Err(err) => err.kind(),
        };
        self.metrics.record_conversion(
            self.pipeline.packager().name(),
            outcome,
            started.elapsed().as_secs_f64(),
        );
        self.metrics.update_cache_entries(self.cache.len());

        result
    }

    /// Remove the container stored under `key`. A no-op for unknown keys.
    #[instrument(skip(self), fields(secret_key = %key))]
    pub async fn delete(&self, key: &str) {
        let _guard = self.conversion_lock.lock().await;

        self.cache.remove(key);
        self.metrics.record_deletion();
        self.metrics.update_cache_entries(self.cache.len());
    }

    /// Latest container for `key`, or `None` if there is none.
    pub fn retrieve(&self, key: &str) -> Option<PackagedCertificate> {
        self.cache.get(key)
    }

    pub fn cache(&self) -> &CredentialCache {
        &self.cache
    }

    pub fn packager_name(&self) -> &'static str {
        self.pipeline.packager().name()
    }
}

#[async_trait]
impl SecretsKeeper for SecretsStore {
    fn retrieve(&self, key: &str) -> Option<PackagedCertificate> {
        SecretsStore::retrieve(self, key)
    }

    async fn convert(&self, key: &str, record: &CredentialRecord) -> Result<()> {
        SecretsStore::convert(self, key, record).await
    }

    async fn delete(&self, key: &str) {
        SecretsStore::delete(self, key).await
    }
}
