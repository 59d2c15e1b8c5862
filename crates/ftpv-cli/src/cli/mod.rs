//! CLI for the ftpv verification toolkit.

mod commands;


use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ftpv_core::capability::DigestCapability;
use ftpv_core::config::{self, FtpvConfig};
use std::path::Path;

use commands::{run_checksum, run_compare};

/// Top-level CLI for the ftpv verification toolkit.
#[derive(Debug, Parser)]
#[command(name = "ftpv")]
#[command(about = "ftpv: post-transfer integrity verification toolkit", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Compute a digest of a file (e.g. after a transfer).
    Checksum {
        /// Path to the file.
        path: String,

        /// Digest algorithm: md5, crc, sha1, sha256, sha512 (default from config).
        #[arg(long)]
        algo: Option<String>,
    },

    /// Digest two local files with the same algorithm and report whether they match.
    Compare {
        /// First file.
        path_a: String,

        /// Second file.
        path_b: String,

        /// Digest algorithm: md5, crc, sha1, sha256, sha512 (default from config).
        #[arg(long)]
        algo: Option<String>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Checksum { path, algo } => {
                let algo = resolve_algo(algo.as_deref(), &cfg)?;
                run_checksum(Path::new(&path), algo).await?
            }
            CliCommand::Compare { path_a, path_b, algo } => {
                let algo = resolve_algo(algo.as_deref(), &cfg)?;
                run_compare(Path::new(&path_a), Path::new(&path_b), algo).await?
            }
        }
        Ok(())
    }
}

fn resolve_algo(arg: Option<&str>, cfg: &FtpvConfig) -> Result<DigestCapability> {
    match arg {
        Some(name) => name.parse().context("parse --algo"),
        None => Ok(cfg.default_algorithm),
    }
}
