//! Pure state transitions: (MenuState, Event) → Transition.
//!
//! This is the core logic of the menu. Fully testable without a terminal
//! or real operations. Events that make no sense in the current state
//! return the state unchanged with no effect.

use crate::registry::Registry;

use super::state::{Effect, Event, MenuState, Transition};

/// Pure state transition function.
///
/// Given the current state, an event, and the read-only item list,
/// produces the next state and at most one effect. The effects boundary
/// interprets the effect.
pub fn update(state: MenuState, event: &Event, registry: &Registry) -> Transition {
    match event {
        Event::MoveUp => move_up(state),
        Event::MoveDown => move_down(state, registry),
        Event::Activate => activate(state, registry),
        Event::Quit => Transition {
            state,
            effect: Effect::Terminate,
        },
        Event::OutcomeReceived(outcome) => {
            let mut state = state;
            state.status = outcome.message().to_string();
            state.busy = false;
            // A stray outcome with nothing launched still updates the status.
            if let Some(index) = state.last_launched.take() {
                state.completed.insert(index);
            }
            Transition::stay(state)
        }
    }
}

// ============================================================================
// PER-EVENT HANDLERS
// ============================================================================

fn move_up(mut state: MenuState) -> Transition {
    state.cursor = state.cursor.saturating_sub(1);
    Transition::stay(state)
}

fn move_down(mut state: MenuState, registry: &Registry) -> Transition {
    state.cursor = (state.cursor + 1).min(registry.last_index());
    Transition::stay(state)
}

/// Activate: refused while busy or when the row already reported back.
fn activate(mut state: MenuState, registry: &Registry) -> Transition {
    if state.busy || state.is_completed(state.cursor) {
        return Transition::stay(state);
    }

    let Some(item) = registry.get(state.cursor) else {
        return Transition::stay(state);
    };

    if item.is_terminal() {
        return Transition {
            state,
            effect: Effect::Terminate,
        };
    }

    let index = state.cursor;
    state.busy = item.affects_busy;
    state.last_launched = Some(index);
    if !item.in_progress.is_empty() {
        state.status = item.in_progress.clone();
    }

    Transition {
        state,
        effect: Effect::Launch(index),
    }
}

// ============================================================================
// TESTS
// ============================================================================
