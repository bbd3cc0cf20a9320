//! Log file setup.
//!
//! The terminal is owned by the menu, so diagnostics go to a file.
//! Filtering follows `RUST_LOG`, defaulting to `info`.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::APP_DIR;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// `<data dir>/windowsfix/windowsfix.log`.
pub fn default_log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("windowsfix.log")
}

/// Install the global subscriber, appending to `path` (or the default).
///
/// Returns the path actually used.
pub fn init(path: Option<&Path>) -> Result<PathBuf, LoggingError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_log_path);

    let open_err = |source| LoggingError::Open {
        path: path.clone(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(open_err)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(open_err)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_names(true)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))?;

    Ok(path)
}

// ============================================================================
// TESTS
// ============================================================================
