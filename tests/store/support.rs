use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use p12_keystore::KeyStore;
use pfx_store::secrets::{
    CertificatePackager, CredentialRecord, KeyMaterial, NativePackager, Result, SecretString,
    SecretsStore,
};
use rcgen::{generate_simple_self_signed, CertifiedKey};
use tokio::sync::Notify;

pub const PASSPHRASE: &str = "msazure";

/// A freshly generated self-signed certificate and its key.
pub struct TestCertificate {
    pub cert_pem: String,
    pub key_pem: String,
    pub der: Vec<u8>,
}

impl TestCertificate {
    pub fn generate(host: &str) -> Self {
        let CertifiedKey { cert, key_pair } =
            generate_simple_self_signed(vec![host.to_string()]).expect("generate certificate");

        Self { cert_pem: cert.pem(), key_pem: key_pair.serialize_pem(), der: cert.der().to_vec() }
    }

    pub fn record(&self) -> CredentialRecord {
        CredentialRecord::tls(self.cert_pem.clone(), self.key_pem.clone())
    }
}

pub fn native_store() -> SecretsStore {
    store_with(Arc::new(NativePackager::new()))
}

pub fn store_with(packager: Arc<dyn CertificatePackager>) -> SecretsStore {
    SecretsStore::new(packager, SecretString::new(PASSPHRASE), Some(Duration::from_secs(30)))
}

/// Open a container and return its key entry alias and certificate chain as DER.
pub fn open_container(bytes: &[u8], passphrase: &str) -> (String, Vec<Vec<u8>>) {
    let keystore = KeyStore::from_pkcs12(bytes, passphrase).expect("open PKCS#12 container");
    let (alias, chain) = keystore.private_key_chain().expect("container has a key entry");

    (alias.to_string(), chain.chain().iter().map(|cert| cert.as_der().to_vec()).collect())
}

/// Leaf certificate DER of a container protected by [`PASSPHRASE`].
pub fn leaf_der(bytes: &[u8]) -> Vec<u8> {
    let (_, chain) = open_container(bytes, PASSPHRASE);
    chain.into_iter().next().expect("chain has a leaf")
}

/// Echoes the certificate PEM back after a delay and records how many calls overlap.
#[derive(Debug, Default)]
pub struct TrackingPackager {
    delay: Duration,
    active: AtomicUsize,
    max_active: AtomicUsize,
    calls: AtomicUsize,
}

impl TrackingPackager {
    pub fn new(delay: Duration) -> Self {
        Self { delay, ..Default::default() }
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CertificatePackager for TrackingPackager {
    fn name(&self) -> &'static str {
        "tracking"
    }

    async fn package(&self, material: KeyMaterial, _: &SecretString) -> Result<Vec<u8>> {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(material.certificate_pem.clone())
    }
}

/// Blocks inside `package` until released, then echoes the certificate PEM.
#[derive(Debug, Default)]
pub struct GatedPackager {
    pub entered: Notify,
    pub release: Notify,
}

#[async_trait]
impl CertificatePackager for GatedPackager {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn package(&self, material: KeyMaterial, _: &SecretString) -> Result<Vec<u8>> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(material.certificate_pem.clone())
    }
}
