//! `pfx-store convert`
//!
//! Reads secret manifests, runs every secret through a [`SecretsStore`] and
//! writes each resulting container to `<namespace>_<name>.pfx`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use validator::Validate;

use super::output::{print_json, print_table_header, truncate};
use crate::config::StoreConfig;
use crate::manifest::{read_secrets, SecretDocument};
use crate::secrets::{PackagerKind, SecretsStore};

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Secret manifest files (YAML or JSON)
    #[arg(value_name = "MANIFEST", required = true)]
    pub manifests: Vec<PathBuf>,

    /// Directory the .pfx files are written to
    #[arg(short = 'd', long, value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Packager override (defaults to PFX_STORE_PACKAGER)
    #[arg(long, value_enum)]
    pub packager: Option<PackagerKind>,

    /// openssl binary override (defaults to PFX_STORE_OPENSSL_PATH)
    #[arg(long, value_name = "PATH")]
    pub openssl_path: Option<PathBuf>,

    /// Packaging timeout override in seconds, 0 disables it
    #[arg(long, value_name = "SECONDS")]
    pub timeout_seconds: Option<u64>,

    /// Output format (json or table)
    #[arg(short, long, default_value = "table", value_parser = ["json", "table"])]
    pub output: String,
}

/// Result of converting one secret.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub secret: String,
    pub converted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConversionReport {
    fn failed(secret: String, error: impl ToString) -> Self {
        Self { secret, converted: false, file: None, bytes: None, error: Some(error.to_string()) }
    }
}

/// File name a secret is written to.
pub fn pfx_file_name(secret: &SecretDocument) -> String {
    format!("{}_{}.pfx", secret.namespace, secret.name)
}

pub async fn handle_convert_command(args: ConvertArgs, mut config: StoreConfig) -> Result<()> {
    if let Some(packager) = args.packager {
        config.packager = packager;
    }
    if let Some(path) = args.openssl_path.clone() {
        config.openssl_path = path;
    }
    if let Some(seconds) = args.timeout_seconds {
        config.packaging_timeout_seconds = seconds;
    }
    config.validate().map_err(crate::Error::from)?;
    config.validate_custom()?;

    let mut secrets = Vec::new();
    for path in &args.manifests {
        let documents = read_secrets(path)
            .with_context(|| format!("Failed to read manifest '{}'", path.display()))?;
        secrets.extend(documents);
    }
    if secrets.is_empty() {
        anyhow::bail!("No secrets found in the given manifests");
    }

    std::fs::create_dir_all(&args.out_dir).with_context(|| {
        format!("Failed to create output directory '{}'", args.out_dir.display())
    })?;

    let store = SecretsStore::from_config(&config);
    let reports = convert_secrets(&store, &secrets, &args.out_dir).await;

    if args.output == "json" {
        print_json(&reports)?;
    } else {
        print_reports_table(&reports);
    }

    let failed = reports.iter().filter(|report| !report.converted).count();
    if failed > 0 {
        anyhow::bail!("{} of {} secrets failed to convert", failed, reports.len());
    }

    Ok(())
}

/// Convert every secret through `store` and write the successes to `out_dir`.
///
/// Failures are reported per secret; one bad secret does not stop the rest.
pub async fn convert_secrets(
    store: &SecretsStore,
    secrets: &[SecretDocument],
    out_dir: &Path,
) -> Vec<ConversionReport> {
    let mut reports = Vec::with_capacity(secrets.len());

    for secret in secrets {
        let key = secret.key();

        if let Err(err) = store.convert(&key, &secret.record).await {
            reports.push(ConversionReport::failed(key, err));
            continue;
        }

        let Some(container) = store.retrieve(&key) else {
            reports.push(ConversionReport::failed(key, "container missing after conversion"));
            continue;
        };

        let file = out_dir.join(pfx_file_name(secret));
        match std::fs::write(&file, container.as_bytes()) {
            Ok(()) => reports.push(ConversionReport {
                secret: key,
                converted: true,
                file: Some(file),
                bytes: Some(container.len()),
                error: None,
            }),
            Err(err) => reports.push(ConversionReport::failed(
                key,
                format!("Failed to write '{}': {}", file.display(), err),
            )),
        }
    }

    reports
}

fn print_reports_table(reports: &[ConversionReport]) {
    print_table_header(&[("Secret", 40), ("Status", 10), ("Result", 60)]);

    for report in reports {
        let (status, detail) = match (&report.file, &report.error) {
            (Some(file), _) => ("converted", file.display().to_string()),
            (None, Some(error)) => ("failed", error.clone()),
            (None, None) => ("failed", String::new()),
        };
        println!("{:<40} {:<10} {}", truncate(&report.secret, 40), status, truncate(&detail, 60));
    }
    println!();
}
