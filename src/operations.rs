//! Maintenance operations launched from the menu.
//!
//! Each operation is a blocking body that ends in exactly one [`Outcome`].
//! Errors never escape: required steps that fail become `Outcome::Failure`,
//! best-effort steps that fail are logged and skipped.
//!
//! The runtime moves the body onto a worker thread, so nothing here needs
//! to care about the UI.

use std::sync::Arc;
use std::time::Duration;

use crate::command::{CommandError, CommandRunner};
use crate::outcome::Outcome;

/// Something the menu can launch.
pub trait Operation: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    /// Perform the work. Blocks until done.
    fn run(&self) -> Outcome;
}

// ============================================================================
// REGISTRY KEYS
// ============================================================================

const NETWORK_CLSID_KEY: &str =
    r"HKCU\Software\Classes\CLSID\{F02C1A0D-BE21-4350-88B0-7367FC96EF3C}";

const BAGS_KEY: &str = r"HKCU\Software\Classes\Local Settings\Software\Microsoft\Windows\Shell\Bags";

const ALL_FOLDERS_SHELL_KEY: &str =
    r"HKCU\Software\Classes\Local Settings\Software\Microsoft\Windows\Shell\Bags\AllFolders\Shell";

const EXPLORER_ADVANCED_KEY: &str =
    r"HKCU\Software\Microsoft\Windows\CurrentVersion\Explorer\Advanced";

/// `(value name, type, data)` written under [`ALL_FOLDERS_SHELL_KEY`].
const GROUPING_VALUES: [(&str, &str, &str); 4] = [
    ("FolderType", "REG_SZ", "NotSpecified"),
    ("GroupBy", "REG_SZ", "System.Null"),
    ("Sort", "REG_SZ", "System.Null"),
    ("ViewMode", "REG_DWORD", "1"),
];

const RESET_FOLDERS_SCRIPT: &str = "$shell = New-Object -ComObject Shell.Application; \
$folder = $shell.Namespace(0); $folder.Self.InvokeVerb('Reset Folders')";

// ============================================================================
// SHARED STEPS
// ============================================================================

fn reg_add(
    runner: &dyn CommandRunner,
    key: &str,
    value: &str,
    kind: &str,
    data: &str,
) -> Result<(), CommandError> {
    runner.run("reg", &["add", key, "/v", value, "/t", kind, "/d", data, "/f"])
}

/// Run a step whose failure does not fail the operation.
fn best_effort(step: &str, result: Result<(), CommandError>) {
    if let Err(e) = result {
        tracing::warn!(step, error = %e, "best-effort step failed");
    }
}

/// Kill Explorer, wait, start it again. Only the restart is required.
fn restart_explorer(runner: &dyn CommandRunner, delay: Duration) -> Result<(), CommandError> {
    best_effort(
        "kill explorer",
        runner.run("taskkill", &["/F", "/IM", "explorer.exe"]),
    );
    runner.pause(delay);
    runner.run("cmd", &["/c", "start", "explorer.exe"])
}

/// Single-quoted PowerShell literal: no expansion, `'` doubled.
fn ps_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// PowerShell script that unpins every Quick Access folder not in `keep`.
fn quick_access_script(keep: &[String]) -> String {
    let keep_list = keep
        .iter()
        .map(|name| ps_literal(name))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "$shell = New-Object -ComObject Shell.Application\n\
         $quickAccess = $shell.Namespace(\"shell:::{{679f85cb-0220-4080-b29b-5540cc05aab6}}\")\n\
         $keepPinned = @({keep_list})\n\
         foreach ($item in $quickAccess.Items()) {{\n\
         \x20   if ($item.IsFolder -and $keepPinned -notcontains $item.Name) {{\n\
         \x20       $item.InvokeVerb(\"unpinfromhome\")\n\
         \x20   }}\n\
         }}\n"
    )
}

/// "A, B, and C" for the success message.
fn human_list(names: &[String]) -> String {
    match names {
        [] => "none".to_string(),
        [one] => one.clone(),
        [a, b] => format!("{} and {}", a, b),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    }
}

// ============================================================================
// OPERATIONS
// ============================================================================

/// Hide the Network entry from Explorer's navigation pane.
pub struct UnpinNetworkFolder {
    runner: Arc<dyn CommandRunner>,
    restart_delay: Duration,
}

impl UnpinNetworkFolder {
    pub fn new(runner: Arc<dyn CommandRunner>, restart_delay: Duration) -> Self {
        UnpinNetworkFolder {
            runner,
            restart_delay,
        }
    }
}

impl Operation for UnpinNetworkFolder {
    fn name(&self) -> &str {
        "unpin-network-folder"
    }

    fn run(&self) -> Outcome {
        let runner = self.runner.as_ref();
        if let Err(e) = reg_add(
            runner,
            NETWORK_CLSID_KEY,
            "System.IsPinnedToNameSpaceTree",
            "REG_DWORD",
            "0",
        ) {
            return Outcome::failed(format!("Failed to modify registry - {}", e));
        }
        if let Err(e) = restart_explorer(runner, self.restart_delay) {
            return Outcome::failed(format!("Failed to restart explorer - {}", e));
        }
        Outcome::succeeded(
            "Network folder has been unpinned from File Explorer's Navigation Panel.",
        )
    }
}

/// Turn off grouping and sorting for every folder view, then reset views.
pub struct ResetFolderGrouping {
    runner: Arc<dyn CommandRunner>,
    restart_delay: Duration,
}

impl ResetFolderGrouping {
    pub fn new(runner: Arc<dyn CommandRunner>, restart_delay: Duration) -> Self {
        ResetFolderGrouping {
            runner,
            restart_delay,
        }
    }
}

impl Operation for ResetFolderGrouping {
    fn name(&self) -> &str {
        "reset-folder-grouping"
    }

    fn run(&self) -> Outcome {
        let runner = self.runner.as_ref();
        for (value, kind, data) in GROUPING_VALUES {
            if let Err(e) = reg_add(runner, ALL_FOLDERS_SHELL_KEY, value, kind, data) {
                return Outcome::failed(format!(
                    "Failed to set registry for grouping - {}",
                    e
                ));
            }
        }

        // Absent on a fresh profile.
        best_effort(
            "clear shell bags",
            runner.run("reg", &["delete", BAGS_KEY, "/f"]),
        );

        if let Err(e) = restart_explorer(runner, self.restart_delay) {
            return Outcome::failed(format!("Failed to restart explorer - {}", e));
        }

        best_effort(
            "reset folder views",
            runner.run("powershell", &["-Command", RESET_FOLDERS_SCRIPT]),
        );

        Outcome::succeeded("Folder grouping set to None and views reset.")
    }
}

/// Unpin Quick Access folders, keeping a configured few.
pub struct UnpinQuickAccess {
    runner: Arc<dyn CommandRunner>,
    keep_pinned: Vec<String>,
}

impl UnpinQuickAccess {
    pub fn new(runner: Arc<dyn CommandRunner>, keep_pinned: Vec<String>) -> Self {
        UnpinQuickAccess {
            runner,
            keep_pinned,
        }
    }
}

impl Operation for UnpinQuickAccess {
    fn name(&self) -> &str {
        "unpin-quick-access"
    }

    fn run(&self) -> Outcome {
        let script = quick_access_script(&self.keep_pinned);
        if let Err(e) = self.runner.run("powershell", &["-Command", &script]) {
            return Outcome::failed(format!("Failed to unpin Quick Access folders - {}", e));
        }
        Outcome::succeeded(format!(
            "Quick Access folders unpinned except {}.",
            human_list(&self.keep_pinned)
        ))
    }
}

/// Hide every desktop icon.
pub struct HideDesktopIcons {
    runner: Arc<dyn CommandRunner>,
    restart_delay: Duration,
}

impl HideDesktopIcons {
    pub fn new(runner: Arc<dyn CommandRunner>, restart_delay: Duration) -> Self {
        HideDesktopIcons {
            runner,
            restart_delay,
        }
    }
}

impl Operation for HideDesktopIcons {
    fn name(&self) -> &str {
        "hide-desktop-icons"
    }

    fn run(&self) -> Outcome {
        let runner = self.runner.as_ref();
        if let Err(e) = reg_add(runner, EXPLORER_ADVANCED_KEY, "HideIcons", "REG_DWORD", "1") {
            return Outcome::failed(format!("Failed to modify registry - {}", e));
        }
        if let Err(e) = restart_explorer(runner, self.restart_delay) {
            return Outcome::failed(format!("Failed to restart explorer - {}", e));
        }
        Outcome::succeeded("All desktop icons have been hidden.")
    }
}

// ============================================================================
// TESTS
// ============================================================================
