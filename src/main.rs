//! windowsfix CLI
//!
//! Interactive menu of Windows Explorer maintenance tweaks.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use windowsfix::command::{CommandRunner, DryRunRunner, SystemRunner};
use windowsfix::config::Config;
use windowsfix::error::AppError;
use windowsfix::logging;
use windowsfix::registry::Registry;
use windowsfix::tui;

#[derive(Parser)]
#[command(name = "windowsfix")]
#[command(about = "Interactive menu of Windows Explorer maintenance tweaks")]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/windowsfix/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file (default: <data dir>/windowsfix/windowsfix.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log commands instead of running them
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let log_path = logging::init(cli.log_file.as_deref())?;
    tracing::info!(log = %log_path.display(), dry_run = cli.dry_run, "starting");

    let config = Config::load(cli.config.as_deref())?;

    let runner: Arc<dyn CommandRunner> = if cli.dry_run {
        Arc::new(DryRunRunner)
    } else {
        if !cfg!(windows) {
            tracing::warn!("not running on Windows; operations will report failures");
        }
        Arc::new(SystemRunner)
    };

    let registry = Registry::standard(&config, runner);
    tui::run::run(registry, &config)?;

    tracing::info!("exiting");
    Ok(())
}
