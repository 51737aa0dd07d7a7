//! PKCS#12 packaging through the `openssl` command-line tool.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::{Builder, NamedTempFile};
use tokio::process::Command;
use tracing::debug;

use super::CertificatePackager;
use crate::secrets::error::{ConversionError, Result};
use crate::secrets::record::KeyMaterial;
use crate::secrets::types::SecretString;

/// Environment variable the child reads its output passphrase from.
const PASSOUT_ENV: &str = "PFX_STORE_PASSOUT";

/// Packages certificates by running `openssl pkcs12 -export`.
///
/// Certificate and key are staged in exclusively-owned temporary files that
/// are deleted when they go out of scope, whichever way `package` returns.
/// The passphrase is passed through the child's environment so it never
/// shows up in the process list. The child is killed if the packaging future
/// is dropped, which is how the pipeline's timeout stops a hung tool.
#[derive(Debug, Clone)]
pub struct OpensslPackager {
    program: PathBuf,
    staging_dir: Option<PathBuf>,
}

impl OpensslPackager {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), staging_dir: None }
    }

    /// Stage key material under `dir` instead of the system temp directory.
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    /// Write certificate and key to temporary files on the blocking pool.
    async fn stage_material(&self, material: KeyMaterial) -> Result<StagedMaterial> {
        let staging_dir = self.staging_dir.clone();

        tokio::task::spawn_blocking(move || {
            StagedMaterial::write(staging_dir.as_deref(), &material)
        })
        .await
        .map_err(|err| ConversionError::packaging(format!("staging task failed: {err}")))?
    }
}

/// Staged PEM files, removed on drop.
struct StagedMaterial {
    certificate: NamedTempFile,
    private_key: NamedTempFile,
}

impl StagedMaterial {
    fn write(dir: Option<&Path>, material: &KeyMaterial) -> Result<Self> {
        let certificate = stage(dir, "pfx-store-cert", &material.certificate_pem, "certificate")?;
        let private_key = stage(dir, "pfx-store-key", &material.private_key_pem, "private key")?;
        Ok(Self { certificate, private_key })
    }
}

fn stage(
    dir: Option<&Path>,
    prefix: &str,
    contents: &[u8],
    what: &'static str,
) -> Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(prefix).suffix(".pem");

    let mut file = match dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(ConversionError::staging)?;

    file.write_all(contents)
        .and_then(|_| file.flush())
        .map_err(|err| ConversionError::write(what, err))?;

    Ok(file)
}

#[async_trait]
impl CertificatePackager for OpensslPackager {
    fn name(&self) -> &'static str {
        "openssl"
    }

    async fn package(&self, material: KeyMaterial, passphrase: &SecretString) -> Result<Vec<u8>> {
        let staged = self.stage_material(material).await?;

        debug!(program = %self.program.display(), "Running openssl pkcs12 export");

        let output = Command::new(&self.program)
            .args(["pkcs12", "-export", "-in"])
            .arg(staged.certificate.path())
            .arg("-inkey")
            .arg(staged.private_key.path())
            .arg("-passout")
            .arg(format!("env:{PASSOUT_ENV}"))
            .env(PASSOUT_ENV, passphrase.expose_secret())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| {
                ConversionError::packaging(format!(
                    "unable to run {}: {err}",
                    self.program.display()
                ))
            })?;

        if !output.status.success() || output.stdout.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConversionError::packaging(format!(
                "openssl exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }
}
