//! The ordered menu catalogue.
//!
//! Position is identity: the state machine refers to items by index only.
//! The registry is read-only once built.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::command::CommandRunner;
use crate::config::Config;
use crate::operations::{
    HideDesktopIcons, Operation, ResetFolderGrouping, UnpinNetworkFolder, UnpinQuickAccess,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("menu must contain at least one item")]
    Empty,

    #[error("menu has no exit item")]
    NoExit,
}

/// What selecting a row does.
#[derive(Clone)]
pub enum MenuAction {
    /// Launch an operation on a worker.
    Run(Arc<dyn Operation>),
    /// End the event loop. This is the terminal item.
    Exit,
}

impl fmt::Debug for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuAction::Run(op) => f.debug_tuple("Run").field(&op.name()).finish(),
            MenuAction::Exit => f.write_str("Exit"),
        }
    }
}

/// One menu row.
#[derive(Debug, Clone)]
pub struct MenuItem {
    pub label: String,
    pub action: MenuAction,
    /// Whether launching this item marks the menu busy.
    pub affects_busy: bool,
    /// Status text shown while the item runs. Empty leaves the status alone.
    pub in_progress: String,
}

impl MenuItem {
    /// A busy-marking operation row.
    pub fn operation(
        label: impl Into<String>,
        in_progress: impl Into<String>,
        op: Arc<dyn Operation>,
    ) -> Self {
        MenuItem {
            label: label.into(),
            action: MenuAction::Run(op),
            affects_busy: true,
            in_progress: in_progress.into(),
        }
    }

    /// The terminal row.
    pub fn exit(label: impl Into<String>) -> Self {
        MenuItem {
            label: label.into(),
            action: MenuAction::Exit,
            affects_busy: false,
            in_progress: String::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.action, MenuAction::Exit)
    }
}

/// Non-empty, ordered list of [`MenuItem`]s with at least one exit row.
#[derive(Debug, Clone)]
pub struct Registry {
    items: Vec<MenuItem>,
}

impl Registry {
    pub fn new(items: Vec<MenuItem>) -> Result<Self, RegistryError> {
        if items.is_empty() {
            return Err(RegistryError::Empty);
        }
        if !items.iter().any(MenuItem::is_terminal) {
            return Err(RegistryError::NoExit);
        }
        Ok(Registry { items })
    }

    /// The stock Explorer maintenance menu, ending with "Exit".
    pub fn standard(config: &Config, runner: Arc<dyn CommandRunner>) -> Self {
        let items = vec![
            MenuItem::operation(
                "Explorer: Unpin Network Folder",
                "Unpinning network folder...",
                Arc::new(UnpinNetworkFolder::new(
                    runner.clone(),
                    config.restart_delay(),
                )),
            ),
            MenuItem::operation(
                "Explorer: Globally Set Grouping To None",
                "Globally setting grouping to none...",
                Arc::new(ResetFolderGrouping::new(
                    runner.clone(),
                    config.grouping_restart_delay(),
                )),
            ),
            MenuItem::operation(
                "Explorer: Unpin Quick Access Folders",
                "Unpinning Quick Access folders...",
                Arc::new(UnpinQuickAccess::new(
                    runner.clone(),
                    config.keep_pinned.clone(),
                )),
            ),
            MenuItem::operation(
                "Desktop: Remove All Icons",
                "Hiding all desktop icons...",
                Arc::new(HideDesktopIcons::new(runner, config.restart_delay())),
            ),
            MenuItem::exit("Exit"),
        ];
        Registry { items }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&MenuItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Highest valid cursor position.
    pub fn last_index(&self) -> usize {
        self.items.len() - 1
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::DryRunRunner;

    fn standard() -> Registry {
        Registry::standard(&Config::default(), Arc::new(DryRunRunner))
    }

    #[test]
    fn empty_registry_is_rejected() {
        assert_eq!(Registry::new(vec![]).unwrap_err(), RegistryError::Empty);
    }

    #[test]
    fn registry_without_exit_is_rejected() {
        let op = Registry::standard(&Config::default(), Arc::new(DryRunRunner))
            .get(0)
            .unwrap()
            .clone();
        assert_eq!(Registry::new(vec![op]).unwrap_err(), RegistryError::NoExit);
    }

    #[test]
    fn single_exit_item_is_valid() {
        let registry = Registry::new(vec![MenuItem::exit("Exit")]).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.last_index(), 0);
        assert!(!registry.is_empty());
    }

    #[test]
    fn standard_menu_order_and_terminal_item() {
        let registry = standard();
        let labels: Vec<_> = registry.items().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Explorer: Unpin Network Folder",
                "Explorer: Globally Set Grouping To None",
                "Explorer: Unpin Quick Access Folders",
                "Desktop: Remove All Icons",
                "Exit",
            ]
        );
        assert!(registry.get(4).unwrap().is_terminal());
        assert!(registry.items()[..4].iter().all(|i| !i.is_terminal()));
    }

    #[test]
    fn standard_operations_mark_busy_with_progress_text() {
        let registry = standard();
        for item in &registry.items()[..4] {
            assert!(item.affects_busy, "{} should mark busy", item.label);
            assert!(item.in_progress.ends_with("..."));
        }
        let exit = registry.get(4).unwrap();
        assert!(!exit.affects_busy);
        assert!(exit.in_progress.is_empty());
    }

    #[test]
    fn standard_operations_succeed_in_dry_run() {
        let registry = standard();
        for item in registry.items() {
            if let MenuAction::Run(op) = &item.action {
                assert!(op.run().is_success(), "{} failed in dry run", op.name());
            }
        }
    }

    #[test]
    fn debug_shows_operation_name() {
        let registry = standard();
        let debug = format!("{:?}", registry.get(0).unwrap().action);
        assert_eq!(debug, "Run(\"unpin-network-folder\")");
    }
}
