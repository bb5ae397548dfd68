//! CLI interface for songhistory: command parsing, argument validation and
//! orchestration. All business logic (extraction, conversion, the upload
//! pipeline) lives in the `songhistory-core` crate; this module is strictly
//! CLI glue.
//!
//! ## Commands
//! - `sync`: the full weekly run (trigger gate, convert, upload).
//! - `export`: convert and write the CSV only, no network.
//! - `upload`: conditionally upload an already-written CSV file.
//!
//! `--force` on `sync`/`upload` bypasses the trigger window for manual runs.
//!
//! ## How To Use
//! - For command-line users: use the installed `songhistory` binary with `--help`.
//! - For programmatic/integration use: call [`run`] with a constructed [`Cli`].

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use songhistory_core::synchronise::{
    export_history, synchronise, upload_existing, SyncOutcome, SynchroniseReport,
};

use crate::load_config::load_config;
use crate::upload::DropboxClient;

/// CLI for songhistory: convert an EasyWorship song history to CSV and publish it to Dropbox.
#[derive(Parser)]
#[clap(
    name = "songhistory",
    version,
    about = "Convert an EasyWorship song history to CSV and publish it to Dropbox on a weekly trigger"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: trigger gate, convert the history, upload the CSV
    Sync {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Run even outside the configured trigger window
        #[clap(long)]
        force: bool,
    },
    /// Convert the history and write the CSV locally, without uploading
    Export {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Upload the already-written CSV file if the trigger window permits
    Upload {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Run even outside the configured trigger window
        #[clap(long)]
        force: bool,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Sync { config, force } => {
            let mut config = load_config(config)?;
            if force {
                config.trigger = None;
            }
            let uploader = DropboxClient::new_from_env()
                .map_err(|e| anyhow::anyhow!("Failed to construct Dropbox client: {e}"))?;
            tracing::info!(command = "sync", "Starting synchronisation");
            let now = Local::now().naive_local();
            match synchronise(&config, &uploader, now).await {
                Ok(report) => {
                    log_report("sync", &report);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "sync", error = %e, "Synchronisation failed");
                    Err(anyhow::Error::msg(e))
                }
            }
        }
        Commands::Export { config } => {
            let config = load_config(config)?;
            tracing::info!(command = "export", "Starting export");
            match export_history(&config).await {
                Ok(report) => {
                    tracing::info!(
                        command = "export",
                        csv_path = %report.csv_path.display(),
                        songs = report.song_count,
                        "Export complete"
                    );
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "export", error = %e, "Export failed");
                    Err(anyhow::Error::msg(e))
                }
            }
        }
        Commands::Upload { config, force } => {
            let mut config = load_config(config)?;
            if force {
                config.trigger = None;
            }
            let uploader = DropboxClient::new_from_env()
                .map_err(|e| anyhow::anyhow!("Failed to construct Dropbox client: {e}"))?;
            tracing::info!(command = "upload", "Starting conditional upload");
            let now = Local::now().naive_local();
            match upload_existing(&config, &uploader, now).await {
                Ok(report) => {
                    log_report("upload", &report);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "upload", error = %e, "Upload failed");
                    Err(anyhow::Error::msg(e))
                }
            }
        }
    }
}

fn log_report(command: &str, report: &SynchroniseReport) {
    match &report.outcome {
        SyncOutcome::OutsideWindow => {
            tracing::info!(command, "Outside trigger window, nothing to do");
        }
        SyncOutcome::IgnoredFilename { file_name, prefix } => {
            tracing::info!(
                command,
                file_name = %file_name,
                prefix = %prefix,
                "File name matches ignore prefix, not uploaded"
            );
        }
        SyncOutcome::Uploaded { receipt } => {
            tracing::info!(
                command,
                remote_path = %receipt.remote_path,
                size = receipt.size,
                songs = report.song_count,
                "Song history uploaded"
            );
        }
    }
}
