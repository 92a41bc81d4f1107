//! Where the importer keeps its config and logs

use std::path::PathBuf;
use std::sync::OnceLock;

const APP_DIR: &str = ".session-import";
const LOG_FILE: &str = "session-import.log";

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Pin the data directory for the rest of the process (`--data-dir`, or the
/// home-relative default). Only the first call takes effect; returns whether
/// this one did.
pub fn init_data_dir(custom_path: Option<PathBuf>) -> bool {
    let requested = custom_path.unwrap_or_else(default_data_dir);
    match DATA_DIR.set(requested) {
        Ok(()) => true,
        Err(requested) => {
            tracing::debug!(
                requested = %requested.display(),
                active = %data_dir().display(),
                "Ignoring second data directory"
            );
            false
        }
    }
}

fn default_data_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(APP_DIR),
        None => PathBuf::from(APP_DIR),
    }
}

/// Pinned data directory, or the default when nothing was pinned
pub fn data_dir() -> PathBuf {
    DATA_DIR.get().cloned().unwrap_or_else(default_data_dir)
}

pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Append-only tracing output for the CLI
pub fn log_file_path() -> PathBuf {
    logs_dir().join(LOG_FILE)
}

/// Optional TOML overrides read by [`crate::Config::load`]
pub fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}
