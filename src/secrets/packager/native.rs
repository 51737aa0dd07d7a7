//! In-process PKCS#12 packaging.

use std::sync::Arc;

use async_trait::async_trait;
use p12_keystore::{Certificate, KeyStore, KeyStoreEntry, PrivateKeyChain};
use ring::digest;
use rustls::pki_types::{pem::PemObject, CertificateDer, PrivateKeyDer};
use tokio::sync::Semaphore;

use super::keypair::ensure_key_matches;
use super::pkcs8::to_pkcs8;
use super::CertificatePackager;
use crate::secrets::error::{ConversionError, Result};
use crate::secrets::record::KeyMaterial;
use crate::secrets::types::SecretString;

/// Friendly name given to the key entry inside the container.
pub const DEFAULT_ALIAS: &str = "tls";

/// Packages certificates in-process with `p12-keystore`.
///
/// Key material never leaves memory, so this packager cannot fail with
/// staging or write errors. Encoding runs on the blocking thread pool and a
/// blocking task cannot be cancelled, so an encode abandoned by a timeout
/// keeps its permit until it finishes. Clones share that permit.
#[derive(Debug, Clone)]
pub struct NativePackager {
    alias: String,
    encoder: Arc<Semaphore>,
}

impl NativePackager {
    pub fn new() -> Self {
        Self { alias: DEFAULT_ALIAS.to_string(), encoder: Arc::new(Semaphore::new(1)) }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }
}

impl Default for NativePackager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CertificatePackager for NativePackager {
    fn name(&self) -> &'static str {
        "native"
    }

    async fn package(&self, material: KeyMaterial, passphrase: &SecretString) -> Result<Vec<u8>> {
        let alias = self.alias.clone();
        let passphrase = passphrase.clone();
        let permit = Arc::clone(&self.encoder)
            .acquire_owned()
            .await
            .map_err(|err| ConversionError::packaging(format!("encoder unavailable: {err}")))?;

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            build_pkcs12(&alias, &material, &passphrase)
        })
        .await
        .map_err(|err| ConversionError::packaging(format!("packaging task failed: {err}")))?
    }
}

/// Build a PKCS#12 container from PEM material.
///
/// Every certificate in `tls.crt` is carried in the chain, leaf first. The
/// private key must belong to the leaf certificate. The local key id is the
/// SHA-1 of the leaf, matching what `openssl pkcs12` writes.
pub fn build_pkcs12(
    alias: &str,
    material: &KeyMaterial,
    passphrase: &SecretString,
) -> Result<Vec<u8>> {
    let chain: Vec<CertificateDer<'static>> =
        CertificateDer::pem_slice_iter(&material.certificate_pem)
            .collect::<std::result::Result<_, _>>()
            .map_err(|err| {
                ConversionError::packaging(format!("unable to parse certificate PEM: {err}"))
            })?;

    let leaf = chain
        .first()
        .ok_or_else(|| ConversionError::packaging("no certificates found in certificate PEM"))?;

    let key = PrivateKeyDer::from_pem_slice(&material.private_key_pem).map_err(|err| {
        ConversionError::packaging(format!("unable to parse private key PEM: {err}"))
    })?;
    let pkcs8 = to_pkcs8(&key)?;
    ensure_key_matches(&pkcs8, leaf.as_ref())?;

    let certificates = chain
        .iter()
        .map(|der| Certificate::from_der(der.as_ref()))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|err| ConversionError::packaging(format!("unable to decode certificate: {err}")))?;

    let local_key_id = digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, leaf.as_ref());
    let key_chain = PrivateKeyChain::new(pkcs8.as_slice(), local_key_id.as_ref(), certificates);

    let mut keystore = KeyStore::new();
    keystore.add_entry(alias, KeyStoreEntry::PrivateKeyChain(key_chain));

    keystore.writer(passphrase.expose_secret()).write().map_err(|err| {
        ConversionError::packaging(format!("unable to encode PKCS#12 container: {err}"))
    })
}
