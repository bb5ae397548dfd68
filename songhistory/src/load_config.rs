//! `load_config` module: loads and adapts a static YAML config into the
//! internal `SynchroniseConfig`.
//!
//! This is the only place where untrusted YAML is parsed and mapped to rich,
//! strongly-typed internal structs.
//!
//! # Responsibilities
//! - Parse the user-supplied YAML configuration file into type-safe structs
//! - Map loosely-typed YAML keys (e.g. the weekday name) to enums and rich types
//! - Ensure robust error messages for CLI and tests: any failure in loading
//!   must result in clear diagnostics
//! - Acts as the adapter layer decoupling the input schema from the domain core
//!
//! Secrets never live in the YAML: the Dropbox token comes from the
//! environment (see [`crate::upload`]).
//!
//! # Errors
//! All errors in this module use `anyhow::Error` for context-rich diagnostics,
//! surfaced at the CLI boundary.
//!
//! For the accepted YAML schema, see the README.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Weekday;
use serde::Deserialize;
use songhistory_core::config::SynchroniseConfig;
use songhistory_core::trigger::TriggerWindow;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
struct RawConfig {
    history: HistorySection,
    upload: UploadSection,
    #[serde(default)]
    trigger: Option<TriggerSection>,
}

#[derive(Debug, Deserialize)]
struct HistorySection {
    database_path: PathBuf,
    ignore_prefixes_path: PathBuf,
    csv_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct UploadSection {
    remote_path: String,
}

#[derive(Debug, Deserialize)]
struct TriggerSection {
    weekday: Option<String>,
    from_hour: Option<u32>,
}

/// Loads the static YAML config file (no secrets) and maps it to the core config.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SynchroniseConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let raw: RawConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if !raw.upload.remote_path.starts_with('/') {
        error!(remote_path = %raw.upload.remote_path, "remote_path must start with '/'");
        return Err(anyhow::anyhow!(
            "upload.remote_path must start with '/': got {:?}",
            raw.upload.remote_path
        ));
    }

    let trigger = match raw.trigger {
        None => TriggerWindow::default(),
        Some(section) => {
            let weekday = match section.weekday {
                None => TriggerWindow::default().weekday,
                Some(name) => name.parse::<Weekday>().map_err(|_| {
                    anyhow::anyhow!("trigger.weekday is not a weekday name: {name:?}")
                })?,
            };
            if let Some(hour) = section.from_hour {
                if hour > 23 {
                    return Err(anyhow::anyhow!(
                        "trigger.from_hour must be 0-23: got {hour}"
                    ));
                }
            }
            TriggerWindow {
                weekday,
                from_hour: section.from_hour,
            }
        }
    };

    let config = SynchroniseConfig {
        database_path: raw.history.database_path,
        ignore_prefixes_path: raw.history.ignore_prefixes_path,
        csv_path: raw.history.csv_path,
        remote_path: raw.upload.remote_path,
        trigger: Some(trigger),
    };
    config.trace_loaded();
    Ok(config)
}
