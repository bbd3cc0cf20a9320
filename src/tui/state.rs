//! TUI state algebra: pure types, zero effects.
//!
//! These types define the whole menu state space. The transition function
//! (`update`) and the rendering layer (`view`) both program against them.
//!
//! Design principle: `MenuState` carries only what changes. The item list
//! is shared, read-only data and lives in the [`Registry`](crate::registry::Registry),
//! which is passed alongside the state.

use std::collections::BTreeSet;

use crossterm::event::KeyEvent;

use crate::outcome::Outcome;

// ============================================================================
// APP EVENTS
// ============================================================================

/// Everything the event loop can receive from its channel.
///
/// Two kinds of producer feed a single mpsc channel:
/// - A key reader thread sends `Key` variants
/// - Operation workers send exactly one `Outcome` each
///
/// Key events go through `map_key → update`; outcomes go straight to
/// `update` as [`Event::OutcomeReceived`].
#[derive(Debug)]
pub enum AppEvent {
    /// A terminal key event from the crossterm reader thread.
    Key(KeyEvent),
    /// A launched operation finished.
    Outcome(Outcome),
    /// The key reader could not read from the terminal and has stopped.
    InputError(std::io::Error),
}

// ============================================================================
// MENU STATE
// ============================================================================

/// Mutable menu state, owned by the event loop.
///
/// Invariants, upheld by `update`:
/// - `cursor` is a valid item index
/// - `busy` implies `last_launched` is set and not yet completed
/// - indices never leave `completed`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuState {
    /// Focused row.
    pub cursor: usize,

    /// Rows whose operation has reported back. Forward-only.
    pub completed: BTreeSet<usize>,

    /// An operation is outstanding; activation is refused.
    pub busy: bool,

    /// Row of the most recent launch, until its outcome arrives.
    pub last_launched: Option<usize>,

    /// Status line text.
    pub status: String,
}

impl MenuState {
    /// Startup state: top row focused, nothing run.
    pub fn new(idle_status: impl Into<String>) -> Self {
        MenuState {
            cursor: 0,
            completed: BTreeSet::new(),
            busy: false,
            last_launched: None,
            status: idle_status.into(),
        }
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.contains(&index)
    }
}

// ============================================================================
// EVENTS
// ============================================================================

/// Input to the transition function.
///
/// The effects layer maps key presses to the first four variants;
/// workers produce `OutcomeReceived`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Move cursor up.
    MoveUp,
    /// Move cursor down.
    MoveDown,
    /// Run the focused row.
    Activate,
    /// Leave immediately, busy or not.
    Quit,
    /// The outstanding operation finished.
    OutcomeReceived(Outcome),
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Side effect requested by a pure transition.
///
/// Pure code never executes these, it only describes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Launch the operation of the row at this index.
    Launch(usize),
    /// End the event loop.
    Terminate,
}

/// Result of a pure state transition: the next state plus at most one effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: MenuState,
    pub effect: Effect,
}

impl Transition {
    /// Next state with no side effect.
    pub fn stay(state: MenuState) -> Self {
        Transition {
            state,
            effect: Effect::None,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_starts_idle_at_top() {
        let state = MenuState::new("Pick one");
        assert_eq!(state.cursor, 0);
        assert!(state.completed.is_empty());
        assert!(!state.busy);
        assert_eq!(state.last_launched, None);
        assert_eq!(state.status, "Pick one");
    }

    #[test]
    fn is_completed_reads_set() {
        let mut state = MenuState::new("");
        state.completed.insert(2);
        assert!(state.is_completed(2));
        assert!(!state.is_completed(0));
    }

    #[test]
    fn stay_carries_no_effect() {
        let t = Transition::stay(MenuState::new("x"));
        assert_eq!(t.effect, Effect::None);
        assert_eq!(t.state.status, "x");
    }
}
