//! External process execution.
//!
//! Operations never touch `std::process` directly. They go through a
//! [`CommandRunner`], so the same operation code runs for real, in dry-run
//! mode, or against a recording fake in tests.

use std::io;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use thiserror::Error;

/// Failure to run an external command to a successful exit.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The process could not be started at all.
    #[error("could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The process ran but exited unsuccessfully.
    #[error("{program} exited with {}", describe_code(.code))]
    Status { program: String, code: Option<i32> },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// Runs external programs on behalf of operations.
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` to completion.
    ///
    /// Output is discarded; the terminal belongs to the menu.
    fn run(&self, program: &str, args: &[&str]) -> Result<(), CommandError>;

    /// Block the calling worker for `duration`.
    fn pause(&self, duration: Duration);
}

// ============================================================================
// SYSTEM RUNNER
// ============================================================================

/// Spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<(), CommandError> {
        tracing::debug!(program, ?args, "running command");

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| CommandError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(CommandError::Status {
                program: program.to_string(),
                code: status.code(),
            })
        }
    }

    fn pause(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

// ============================================================================
// DRY-RUN RUNNER
// ============================================================================

/// Logs every command instead of running it. Always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunRunner;

impl CommandRunner for DryRunRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<(), CommandError> {
        tracing::info!(program, ?args, "dry run: command not executed");
        Ok(())
    }

    fn pause(&self, duration: Duration) {
        tracing::info!(?duration, "dry run: pause skipped");
    }
}

// ============================================================================
// TEST SUPPORT
// ============================================================================


// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_always_succeeds() {
        let runner = DryRunRunner;
        assert!(runner.run("reg", &["add", "HKCU\\Nowhere", "/f"]).is_ok());
        runner.pause(Duration::from_secs(3600));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let err = SystemRunner
            .run("windowsfix-definitely-not-a-real-program", &[])
            .unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
        assert!(err.to_string().contains("could not start"));
    }

    #[test]
    fn status_error_display_includes_code() {
        let err = CommandError::Status {
            program: "reg".into(),
            code: Some(1),
        };
        assert_eq!(err.to_string(), "reg exited with status 1");

        let err = CommandError::Status {
            program: "reg".into(),
            code: None,
        };
        assert!(err.to_string().contains("signal"));
    }

    #[test]
    fn recording_runner_fails_matching_prefix() {
        let runner = recording::RecordingRunner::failing(&["reg add"]);
        assert!(runner.run("reg", &["add", "X"]).is_err());
        assert!(runner.run("reg", &["delete", "X"]).is_ok());
        assert_eq!(runner.calls(), vec!["reg add X", "reg delete X"]);
    }
}
