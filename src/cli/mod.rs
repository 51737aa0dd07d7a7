//! # Command Line Interface
//!
//! Offline tooling around the secrets store: convert Kubernetes TLS secret
//! manifests to PKCS#12 files and inspect the files it produced.

pub mod convert;
pub mod inspect;
pub mod output;

use clap::{Parser, Subcommand};

use crate::config::{AppConfig, ObservabilityConfig};
use crate::observability::{init_observability, log_config_info};

#[derive(Parser)]
#[command(name = "pfx-store")]
#[command(about = "Convert Kubernetes TLS secrets to PKCS#12 containers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert secret manifests to .pfx files
    #[command(
        long_about = "Convert kubernetes.io/tls Secret manifests (YAML or JSON, multi-document allowed) to PKCS#12 files.\n\nEach secret is written to <OUT_DIR>/<namespace>_<name>.pfx. The command exits non-zero if any secret fails to convert.",
        after_help = "EXAMPLES:\n    # Convert every secret in a manifest\n    pfx-store convert secrets.yaml --out-dir ./pfx\n\n    # Package with the openssl tool and a 10 second timeout\n    pfx-store convert secrets.yaml --out-dir ./pfx --packager openssl --timeout-seconds 10"
    )]
    Convert(convert::ConvertArgs),

    /// Show the contents of a .pfx file
    #[command(
        long_about = "Open a PKCS#12 file with the configured passphrase and print its alias, chain length, and leaf certificate details.",
        after_help = "EXAMPLES:\n    # Inspect a converted secret\n    pfx-store inspect ./pfx/default_tls-a.pfx\n\n    # Machine-readable output\n    pfx-store inspect ./pfx/default_tls-a.pfx --json"
    )]
    Inspect(inspect::InspectArgs),
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    initialise_logging(cli.verbose)?;

    let config = AppConfig::from_env()?;
    log_config_info(&config);

    match cli.command {
        Commands::Convert(args) => convert::handle_convert_command(args, config.store).await?,
        Commands::Inspect(args) => inspect::handle_inspect_command(args, &config.store)?,
    }

    Ok(())
}

fn initialise_logging(verbose: bool) -> anyhow::Result<()> {
    let mut observability = ObservabilityConfig::from_env();
    if verbose {
        observability.log_level = "debug".to_string();
    }

    init_observability(&observability)?;
    Ok(())
}
