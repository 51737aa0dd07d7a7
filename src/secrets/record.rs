//! Credential records as delivered by the cluster event source, and the
//! packaged containers produced from them.

use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use zeroize::Zeroizing;

use super::error::{ConversionError, Result};

/// Secret type tag identifying Kubernetes TLS secrets.
pub const TLS_SECRET_TYPE: &str = "kubernetes.io/tls";

/// Data field holding the PEM-encoded certificate (chain).
pub const TLS_CERT_KEY: &str = "tls.crt";

/// Data field holding the PEM-encoded private key.
pub const TLS_PRIVATE_KEY_KEY: &str = "tls.key";

/// Build the cache key for a namespaced secret, `namespace/name`.
pub fn secret_key(namespace: &str, name: &str) -> String {
    format!("{namespace}/{name}")
}

/// External representation of a TLS credential: a type tag plus opaque data blobs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialRecord {
    pub secret_type: String,
    pub data: BTreeMap<String, Vec<u8>>,
}

impl CredentialRecord {
    pub fn new(secret_type: impl Into<String>) -> Self {
        Self { secret_type: secret_type.into(), data: BTreeMap::new() }
    }

    /// A `kubernetes.io/tls` record holding the given certificate and key.
    pub fn tls(certificate_pem: impl Into<Vec<u8>>, private_key_pem: impl Into<Vec<u8>>) -> Self {
        Self::new(TLS_SECRET_TYPE)
            .with_field(TLS_CERT_KEY, certificate_pem)
            .with_field(TLS_PRIVATE_KEY_KEY, private_key_pem)
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.data.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&[u8]> {
        self.data.get(name).map(Vec::as_slice)
    }

    pub fn is_tls(&self) -> bool {
        self.secret_type == TLS_SECRET_TYPE
    }
}

// Field values may hold private keys, so only names and sizes are printed.
impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: BTreeMap<&str, usize> =
            self.data.iter().map(|(name, value)| (name.as_str(), value.len())).collect();
        f.debug_struct("CredentialRecord")
            .field("secret_type", &self.secret_type)
            .field("data", &fields)
            .finish()
    }
}

/// Certificate and key bytes extracted from a validated record.
///
/// The private key copy is zeroed on drop.
pub struct KeyMaterial {
    pub certificate_pem: Vec<u8>,
    pub private_key_pem: Zeroizing<Vec<u8>>,
}

impl KeyMaterial {
    /// Validate a record and extract its key material.
    ///
    /// Checks the type tag first, then the presence of both required fields,
    /// so a record that is wrong on both counts reports `UnknownSecretType`.
    pub fn from_record(key: &str, record: &CredentialRecord) -> Result<Self> {
        if !record.is_tls() {
            return Err(ConversionError::unknown_secret_type(key, record.secret_type.as_str()));
        }

        let certificate = non_empty_field(key, record, TLS_CERT_KEY)?;
        let private_key = non_empty_field(key, record, TLS_PRIVATE_KEY_KEY)?;

        Ok(Self {
            certificate_pem: certificate.to_vec(),
            private_key_pem: Zeroizing::new(private_key.to_vec()),
        })
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("certificate_pem", &self.certificate_pem.len())
            .field("private_key_pem", &"[REDACTED]")
            .finish()
    }
}

fn non_empty_field<'a>(
    key: &str,
    record: &'a CredentialRecord,
    field: &'static str,
) -> Result<&'a [u8]> {
    match record.field(field) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ConversionError::malformed_secret(key, field)),
    }
}

/// A PKCS#12 container produced by a packager. Never empty; cheap to clone.
#[derive(Clone, PartialEq, Eq)]
pub struct PackagedCertificate(Bytes);

impl PackagedCertificate {
    /// Wrap packager output, rejecting an empty container.
    pub fn new(bytes: impl Into<Bytes>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(ConversionError::packaging("packager produced an empty container"));
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for PackagedCertificate {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for PackagedCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackagedCertificate({} bytes)", self.0.len())
    }
}
