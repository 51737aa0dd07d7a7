//! In-memory cache of packaged certificates.
//!
//! Holds exactly one entry per successfully converted secret for as long as
//! the process runs. There is no TTL and no background eviction; entries are
//! only replaced by a later successful conversion or removed by a delete.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use super::record::PackagedCertificate;

/// Concurrent mapping from secret key to packaged certificate.
///
/// Clones share the same underlying map. Every operation is total and safe
/// to call from any number of tasks at once; readers never wait on
/// conversions because packaging happens before the entry is touched.
#[derive(Debug, Clone, Default)]
pub struct CredentialCache {
    inner: Arc<DashMap<String, PackagedCertificate>>,
}

impl CredentialCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the most recently stored container for `key`.
    pub fn get(&self, key: &str) -> Option<PackagedCertificate> {
        self.inner.get(key).map(|entry| entry.value().clone())
    }

    /// Insert or overwrite the container for `key`.
    pub fn put(&self, key: &str, certificate: PackagedCertificate) {
        let replaced = self.inner.insert(key.to_string(), certificate).is_some();
        debug!(secret_key = %key, replaced, "Cached packaged certificate");
    }

    /// Remove the entry for `key`, if any.
    pub fn remove(&self, key: &str) {
        if self.inner.remove(key).is_some() {
            debug!(secret_key = %key, "Removed packaged certificate from cache");
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
