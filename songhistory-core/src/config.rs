//! Pipeline configuration.
//!
//! All settings are loaded once at start-up (by the CLI's `load_config`) and
//! passed explicitly into the pipeline functions; there is no process-global
//! state.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::trigger::TriggerWindow;

#[derive(Debug, Clone)]
pub struct SynchroniseConfig {
    /// The EasyWorship database file (read-only from our side).
    pub database_path: PathBuf,
    /// Text file with one ignore prefix per line.
    pub ignore_prefixes_path: PathBuf,
    /// Where the converted CSV is written locally.
    pub csv_path: PathBuf,
    /// Destination path in the remote account.
    pub remote_path: String,
    /// When invocations are allowed to do work; `None` runs unconditionally
    /// (the CLI's `--force`).
    pub trigger: Option<TriggerWindow>,
}

impl SynchroniseConfig {
    pub fn trace_loaded(&self) {
        info!(
            database_path = %self.database_path.display(),
            csv_path = %self.csv_path.display(),
            remote_path = %self.remote_path,
            "Loaded SynchroniseConfig"
        );
        debug!(?self, "SynchroniseConfig loaded (full debug)");
    }
}
