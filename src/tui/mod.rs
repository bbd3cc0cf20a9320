//! TUI module for the interactive menu.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: Pure data types (MenuState, Event, Effect, Transition)
//! - `update`: Pure transitions
//! - `view`: Pure rendering
//! - `theme`: Style constants
//! - `run`: Effects (terminal, key reader, operation workers)

pub mod run;
pub mod state;
pub mod theme;
pub mod update;
pub mod view;
