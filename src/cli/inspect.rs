//! `pfx-store inspect`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use p12_keystore::KeyStore;
use serde::Serialize;
use x509_parser::prelude::*;

use super::output::print_json;
use crate::config::StoreConfig;
use crate::secrets::SecretString;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// PKCS#12 file to open
    #[arg(value_name = "PFX")]
    pub file: PathBuf,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// What a container holds, as shown by `inspect`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ContainerSummary {
    pub alias: String,
    pub chain_length: usize,
    pub subject: String,
    pub issuer: String,
    pub serial_number: String,
    pub not_before: String,
    pub not_after: String,
}

pub fn handle_inspect_command(args: InspectArgs, config: &StoreConfig) -> Result<()> {
    let der = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read '{}'", args.file.display()))?;

    let summary = inspect_container(&der, &config.passphrase)
        .with_context(|| format!("Failed to open '{}'", args.file.display()))?;

    if args.json {
        print_json(&summary)?;
    } else {
        println!("Alias:         {}", summary.alias);
        println!("Chain length:  {}", summary.chain_length);
        println!("Subject:       {}", summary.subject);
        println!("Issuer:        {}", summary.issuer);
        println!("Serial:        {}", summary.serial_number);
        println!("Not before:    {}", summary.not_before);
        println!("Not after:     {}", summary.not_after);
    }

    Ok(())
}

/// Open a container with `passphrase` and describe its key entry and leaf certificate.
pub fn inspect_container(der: &[u8], passphrase: &SecretString) -> Result<ContainerSummary> {
    let keystore = KeyStore::from_pkcs12(der, passphrase.expose_secret())
        .map_err(|e| anyhow::anyhow!("Unable to decrypt PKCS#12 container: {}", e))?;

    let (alias, key_chain) =
        keystore.private_key_chain().context("Container holds no private key entry")?;

    let leaf = key_chain.chain().first().context("Key entry has no certificate chain")?;
    let (_, parsed) = X509Certificate::from_der(leaf.as_der())
        .map_err(|e| anyhow::anyhow!("Unable to parse leaf certificate: {}", e))?;

    Ok(ContainerSummary {
        alias: alias.to_string(),
        chain_length: key_chain.chain().len(),
        subject: parsed.subject().to_string(),
        issuer: parsed.issuer().to_string(),
        serial_number: format!("{:x}", parsed.serial),
        not_before: parsed.validity().not_before.to_string(),
        not_after: parsed.validity().not_after.to_string(),
    })
}
