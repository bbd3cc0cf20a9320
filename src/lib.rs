//! windowsfix: a terminal menu for one-shot Windows Explorer maintenance.

pub mod command;
pub mod config;
pub mod error;
pub mod logging;
pub mod operations;
pub mod outcome;
pub mod registry;
pub mod tui;
