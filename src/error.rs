//! Top-level application error.
//!
//! Only startup and terminal faults end up here. Operation failures are
//! outcomes, shown in the menu, and never reach this type.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::logging::LoggingError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}
