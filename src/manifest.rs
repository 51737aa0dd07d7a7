//! Kubernetes Secret manifests.
//!
//! Reads `v1/Secret` objects from YAML or JSON (one or many documents) and
//! turns them into [`CredentialRecord`]s keyed the way the cluster cache keys
//! them, `namespace/name`.

use std::collections::BTreeMap;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::errors::{ManifestError, Result};
use crate::secrets::{secret_key, CredentialRecord};

const DEFAULT_NAMESPACE: &str = "default";
const DEFAULT_SECRET_TYPE: &str = "Opaque";

const MAX_NAME_LENGTH: usize = 253;
const MAX_NAMESPACE_LENGTH: usize = 63;

lazy_static! {
    // DNS-1123 subdomain, as required for object names.
    static ref NAME_REGEX: Regex =
        Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
            .expect("NAME_REGEX should be a valid regex pattern");
    // DNS-1123 label, as required for namespaces.
    static ref NAMESPACE_REGEX: Regex = Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$")
        .expect("NAMESPACE_REGEX should be a valid regex pattern");
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecretManifest {
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default, rename = "type")]
    secret_type: Option<String>,
    #[serde(default)]
    data: BTreeMap<String, String>,
    #[serde(default)]
    string_data: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct ObjectMeta {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    namespace: Option<String>,
}

/// A secret read from a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretDocument {
    pub namespace: String,
    pub name: String,
    pub record: CredentialRecord,
}

impl SecretDocument {
    /// Cache key for this secret, `namespace/name`.
    pub fn key(&self) -> String {
        secret_key(&self.namespace, &self.name)
    }

    fn from_manifest(manifest: SecretManifest) -> std::result::Result<Self, ManifestError> {
        if let Some(kind) = manifest.kind.filter(|kind| kind != "Secret") {
            return Err(ManifestError::NotASecret { kind });
        }

        let name =
            manifest.metadata.name.filter(|n| !n.is_empty()).ok_or(ManifestError::MissingName)?;
        let namespace = manifest
            .metadata
            .namespace
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        // Both end up in cache keys and output file names.
        if name.len() > MAX_NAME_LENGTH || !NAME_REGEX.is_match(&name) {
            return Err(ManifestError::InvalidName { field: "metadata.name", value: name });
        }
        if namespace.len() > MAX_NAMESPACE_LENGTH || !NAMESPACE_REGEX.is_match(&namespace) {
            return Err(ManifestError::InvalidName {
                field: "metadata.namespace",
                value: namespace,
            });
        }

        let mut record = CredentialRecord::new(
            manifest.secret_type.unwrap_or_else(|| DEFAULT_SECRET_TYPE.to_string()),
        );

        for (field, encoded) in manifest.data {
            let compact: String = encoded.split_whitespace().collect();
            let decoded = STANDARD.decode(compact).map_err(|source| ManifestError::InvalidBase64 {
                secret: secret_key(&namespace, &name),
                field: field.clone(),
                source,
            })?;
            record.data.insert(field, decoded);
        }

        // stringData wins over data, as on the API server.
        for (field, value) in manifest.string_data {
            record.data.insert(field, value.into_bytes());
        }

        Ok(Self { namespace, name, record })
    }
}

/// Parse every secret in a (possibly multi-document) YAML or JSON string.
///
/// Empty documents are skipped.
pub fn parse_secrets(input: &str) -> std::result::Result<Vec<SecretDocument>, ManifestError> {
    let mut secrets = Vec::new();

    for document in serde_yaml::Deserializer::from_str(input) {
        let value = serde_yaml::Value::deserialize(document)
            .map_err(|source| ManifestError::Parse { source })?;
        if value.is_null() {
            continue;
        }

        let manifest: SecretManifest =
            serde_yaml::from_value(value).map_err(|source| ManifestError::Parse { source })?;
        secrets.push(SecretDocument::from_manifest(manifest)?);
    }

    Ok(secrets)
}

/// Read and parse every secret in the file at `path`.
pub fn read_secrets(path: &Path) -> Result<Vec<SecretDocument>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(parse_secrets(&contents)?)
}
