//! TLS secret conversion and caching.
//!
//! Cluster-managed TLS secrets arrive as a PEM certificate plus a PEM private
//! key. The gateway consuming them only accepts a single PKCS#12 container,
//! so this module converts each secret once and keeps the result in memory
//! until the secret changes or is deleted.
//!
//! # Architecture
//!
//! ```text
//! events ──convert/delete──▶ SecretsStore ──▶ ConversionPipeline ──▶ CertificatePackager
//!                                 │                  │
//!                                 │                  └──put──▶ CredentialCache
//! consumer ──────retrieve─────────┴─────────get──────────────▶ CredentialCache
//! ```
//!
//! - [`SecretsStore`] serializes every `convert` and `delete` behind one lock
//!   so only one packaging operation runs at a time.
//! - [`ConversionPipeline`] validates the record, packages it under a timeout
//!   and commits the container only when packaging succeeded.
//! - [`CredentialCache`] is a concurrent map readers can hit at any time.
//! - [`CertificatePackager`] is implemented in-process by [`NativePackager`]
//!   and by [`OpensslPackager`], which runs the `openssl` tool.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pfx_store::secrets::{CredentialRecord, NativePackager, SecretString, SecretsStore};
//!
//! let store = SecretsStore::new(
//!     Arc::new(NativePackager::new()),
//!     SecretString::new("msazure"),
//!     Some(std::time::Duration::from_secs(30)),
//! );
//!
//! store.convert("default/tls-a", &CredentialRecord::tls(cert_pem, key_pem)).await?;
//! let pfx = store.retrieve("default/tls-a").expect("converted");
//! ```

pub mod cache;
pub mod error;
pub mod packager;
pub mod pipeline;
pub mod record;
pub mod store;
pub mod types;

pub use cache::CredentialCache;
pub use error::{ConversionError, Result};
pub use packager::{
    build_pkcs12, CertificatePackager, NativePackager, OpensslPackager, PackagerKind, DEFAULT_ALIAS,
};
pub use pipeline::ConversionPipeline;
pub use record::{
    secret_key, CredentialRecord, KeyMaterial, PackagedCertificate, TLS_CERT_KEY,
    TLS_PRIVATE_KEY_KEY, TLS_SECRET_TYPE,
};
pub use store::{SecretsKeeper, SecretsStore};
pub use types::SecretString;
