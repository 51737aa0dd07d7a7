//! Error types for credential conversion.

use thiserror::Error;

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConversionError>;

/// Errors that can occur while converting a TLS secret into a PKCS#12 container.
///
/// Every variant is returned to the caller of `convert`; none are retried
/// internally. When any of them is returned the credential cache is unchanged.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The record's type tag is not `kubernetes.io/tls`.
    #[error("Secret '{key}' has type '{actual}', expected 'kubernetes.io/tls'")]
    UnknownSecretType { key: String, actual: String },

    /// A required certificate or key field is missing or empty.
    #[error("Secret '{key}' is malformed: '{field}' is missing or empty")]
    MalformedSecret { key: String, field: &'static str },

    /// Temporary storage for key material could not be allocated.
    #[error("Unable to stage key material: {source}")]
    StagingError {
        #[source]
        source: std::io::Error,
    },

    /// Staged key material could not be written.
    #[error("Unable to write staged {what}: {source}")]
    WriteError {
        what: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The packager failed or produced no output.
    #[error("PKCS#12 packaging failed: {detail}")]
    PackagingError { detail: String },

    /// The packager did not finish within the configured timeout.
    #[error("PKCS#12 packaging timed out after {timeout_ms}ms")]
    PackagingTimeout { timeout_ms: u64 },
}

impl ConversionError {
    /// Create an unknown secret type error.
    pub fn unknown_secret_type(key: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::UnknownSecretType { key: key.into(), actual: actual.into() }
    }

    /// Create a malformed secret error for the named field.
    pub fn malformed_secret(key: impl Into<String>, field: &'static str) -> Self {
        Self::MalformedSecret { key: key.into(), field }
    }

    /// Create a staging error.
    pub fn staging(source: std::io::Error) -> Self {
        Self::StagingError { source }
    }

    /// Create a write error for the named piece of key material.
    pub fn write(what: &'static str, source: std::io::Error) -> Self {
        Self::WriteError { what, source }
    }

    /// Create a packaging error carrying the tool's diagnostic output.
    pub fn packaging(detail: impl Into<String>) -> Self {
        Self::PackagingError { detail: detail.into() }
    }

    /// Short, stable label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownSecretType { .. } => "unknown_secret_type",
            Self::MalformedSecret { .. } => "malformed_secret",
            Self::StagingError { .. } => "staging_error",
            Self::WriteError { .. } => "write_error",
            Self::PackagingError { .. } => "packaging_error",
            Self::PackagingTimeout { .. } => "packaging_timeout",
        }
    }
}
