//! User configuration, loaded from JSON.
//!
//! Every field has a default, so an absent config file is not an error.
//! An explicitly named file that cannot be read is.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application directory name under the platform config/data dirs.
pub const APP_DIR: &str = "windowsfix";

/// Config file name inside [`default_config_path`]'s directory.
pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Menu presentation and operation tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Title line at the top of the menu.
    pub title: String,

    /// Status text shown before anything has run.
    pub idle_status: String,

    /// Footer hint.
    pub help: String,

    /// Quick Access folders left pinned by the unpin operation.
    pub keep_pinned: Vec<String>,

    /// Pause between killing and restarting Explorer.
    pub restart_delay_ms: u64,

    /// Same pause, for the folder-grouping reset.
    pub grouping_restart_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            title: "WindowsFix - Scripts TUI".to_string(),
            idle_status: "Choose an option and press Enter to execute ;)".to_string(),
            help: "Use arrow keys to navigate, q to quit.".to_string(),
            keep_pinned: vec![
                "Desktop".to_string(),
                "Downloads".to_string(),
                "Pictures".to_string(),
            ],
            restart_delay_ms: 3000,
            grouping_restart_delay_ms: 1000,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// With `Some(path)`, the file must exist and parse. With `None`, the
    /// default location is tried and a missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(p) => Config::from_file(p),
            None => {
                let p = default_config_path();
                if p.exists() {
                    Config::from_file(&p)
                } else {
                    tracing::debug!(path = %p.display(), "no config file, using defaults");
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    pub fn grouping_restart_delay(&self) -> Duration {
        Duration::from_millis(self.grouping_restart_delay_ms)
    }
}

/// `<config dir>/windowsfix/config.json`, falling back to the working directory.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

// ============================================================================
// TESTS
// ============================================================================
