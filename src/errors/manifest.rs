use thiserror::Error;

/// Errors surfaced while reading Kubernetes secret manifests.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The document is neither valid YAML nor JSON for a manifest.
    #[error("Failed to parse manifest: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
    },

    /// The document describes some other kind of object.
    #[error("Manifest kind '{kind}' is not a Secret")]
    NotASecret { kind: String },

    /// `metadata.name` is missing or empty.
    #[error("Secret manifest has no metadata.name")]
    MissingName,

    /// `metadata.name` or `metadata.namespace` is not a DNS-1123 name.
    #[error("Secret {field} '{value}' is not a valid DNS-1123 name")]
    InvalidName { field: &'static str, value: String },

    /// A `data` value is not valid base64.
    #[error("Secret '{secret}' field '{field}' is not valid base64: {source}")]
    InvalidBase64 {
        secret: String,
        field: String,
        #[source]
        source: base64::DecodeError,
    },
}
