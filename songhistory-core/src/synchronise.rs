//! High-level pipeline: trigger gate → extract → convert → upload.
//!
//! This module provides the top-level orchestration for publishing the song
//! history. Three entry points:
//!   - [`export_history`]: extract the projection history, convert it to CSV
//!     and write it locally. No gate, no network.
//!   - [`synchronise`]: the full weekly run. Checks the trigger window,
//!     regenerates the CSV, then uploads it via a [`Uploader`].
//!   - [`upload_existing`]: conditionally upload an already-written CSV file
//!     without regenerating it (the file must exist).
//!
//! # Responsibilities
//! - Fail-fast orchestration: each failed step returns immediately with a
//!   formatted error; callers log and surface these.
//! - Skipped runs (outside the window, ignored file name) are outcomes, not
//!   errors: the host scheduler sees a clean exit.
//! - Does not mutate configuration: all inputs are in-memory.
//!
//! # Callable From
//! - Used by both the CLI crate and integration tests.
//! - Expects a concrete (async) [`Uploader`] implementation for uploads.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::{debug, error, info};

use crate::config::SynchroniseConfig;
use crate::contract::{UploadReceipt, UploadRequest, Uploader};
use crate::convert::HistoryConverter;
use crate::extract::HistoryDatabase;
use crate::ignore::IgnoreList;

/// What a run did, for logging and exit handling.
#[derive(Debug)]
pub enum SyncOutcome {
    /// Outside the trigger window; nothing was read, nothing was sent.
    OutsideWindow,
    /// The local file name matched an ignore prefix; nothing was sent.
    IgnoredFilename { file_name: String, prefix: String },
    /// Upload completed.
    Uploaded { receipt: UploadReceipt },
}

#[derive(Debug)]
pub struct SynchroniseReport {
    /// Songs written to the CSV; `None` when the CSV was not regenerated.
    pub song_count: Option<usize>,
    pub outcome: SyncOutcome,
}

#[derive(Debug)]
pub struct ExportReport {
    pub csv_path: PathBuf,
    pub song_count: usize,
}

/// Extract, convert and write the CSV locally. No trigger gate, no upload.
pub async fn export_history(config: &SynchroniseConfig) -> Result<ExportReport, String> {
    info!("Reading and converting song history");

    let ignore = IgnoreList::load(&config.ignore_prefixes_path).map_err(|e| {
        error!(error = ?e, path = %config.ignore_prefixes_path.display(), "Failed to load ignore prefixes");
        format!(
            "Failed to load ignore prefixes from {:?}: {e}",
            config.ignore_prefixes_path
        )
    })?;

    let database = HistoryDatabase::open(&config.database_path)
        .await
        .map_err(|e| format!("Failed to open song history database: {e}"))?;
    let records = database
        .projection_history()
        .await
        .map_err(|e| format!("Failed to read projection history: {e}"))?;

    let converter = HistoryConverter::new(ignore);
    let csv = converter
        .convert(&records)
        .map_err(|e| format!("Failed to convert song history: {e}"))?;

    std::fs::write(&config.csv_path, &csv.content).map_err(|e| {
        error!(error = ?e, path = %config.csv_path.display(), "Failed to write CSV");
        format!("Failed to write CSV to {:?}: {e}", config.csv_path)
    })?;

    info!(
        csv_path = %config.csv_path.display(),
        songs = csv.song_count,
        "Song history exported"
    );
    Ok(ExportReport {
        csv_path: config.csv_path.clone(),
        song_count: csv.song_count,
    })
}

/// The full weekly run: trigger gate, regenerate the CSV, upload it.
pub async fn synchronise<U>(
    config: &SynchroniseConfig,
    uploader: &U,
    now: NaiveDateTime,
) -> Result<SynchroniseReport, String>
where
    U: Uploader + Sync,
{
    if let Some(outcome) = check_window(config, now) {
        return Ok(SynchroniseReport {
            song_count: None,
            outcome,
        });
    }

    let export = export_history(config).await?;
    let outcome = upload_csv_file(config, uploader).await?;
    Ok(SynchroniseReport {
        song_count: Some(export.song_count),
        outcome,
    })
}

/// Conditionally upload the already-written CSV file, without regenerating it.
/// A missing file is a reported error; the next scheduled trigger is the retry.
pub async fn upload_existing<U>(
    config: &SynchroniseConfig,
    uploader: &U,
    now: NaiveDateTime,
) -> Result<SynchroniseReport, String>
where
    U: Uploader + Sync,
{
    if let Some(outcome) = check_window(config, now) {
        return Ok(SynchroniseReport {
            song_count: None,
            outcome,
        });
    }

    if !config.csv_path.exists() {
        error!(path = %config.csv_path.display(), "Song history file not found");
        return Err(format!(
            "Song history file not found: {:?}",
            config.csv_path
        ));
    }

    let outcome = upload_csv_file(config, uploader).await?;
    Ok(SynchroniseReport {
        song_count: None,
        outcome,
    })
}

/// The trigger gate. Returns the skip outcome when `now` is outside the window.
fn check_window(config: &SynchroniseConfig, now: NaiveDateTime) -> Option<SyncOutcome> {
    match &config.trigger {
        Some(window) if !window.permits(now) => {
            info!(?window, %now, "Outside trigger window, nothing to do");
            Some(SyncOutcome::OutsideWindow)
        }
        _ => None,
    }
}

/// Shared final step: ignore-prefix gate on the file name, then upload.
async fn upload_csv_file<U>(
    config: &SynchroniseConfig,
    uploader: &U,
) -> Result<SyncOutcome, String>
where
    U: Uploader + Sync,
{
    let file_name = config
        .csv_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let ignore = IgnoreList::load(&config.ignore_prefixes_path)
        .map_err(|e| format!("Failed to load ignore prefixes: {e}"))?;
    if let Some(prefix) = ignore.matches(&file_name) {
        info!(file_name = %file_name, prefix = %prefix, "File name matches ignore prefix, not uploading");
        return Ok(SyncOutcome::IgnoredFilename {
            file_name,
            prefix: prefix.to_string(),
        });
    }

    let content = std::fs::read(&config.csv_path)
        .map_err(|e| format!("Failed to read CSV from {:?}: {e}", config.csv_path))?;

    info!(
        remote_path = %config.remote_path,
        size = content.len(),
        "Uploading converted song history"
    );
    let receipt = uploader
        .upload(UploadRequest {
            remote_path: config.remote_path.clone(),
            content,
        })
        .await
        .map_err(|e| {
            error!(error = ?e, "Upload failed");
            format!("Upload failed: {e}")
        })?;

    info!(remote_path = %receipt.remote_path, size = receipt.size, "Song history uploaded");
    match serde_json::to_string_pretty(&receipt) {
        Ok(json) => debug!(json = %json, "Upload receipt"),
        Err(e) => error!(error = ?e, "Failed to serialize upload receipt"),
    }
    Ok(SyncOutcome::Uploaded { receipt })
}
