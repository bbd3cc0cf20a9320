//! TUI color semantics and style constants.
//!
//! Pure data, consumed by the rendering layer.
//!
//! Color semantics:
//! - Green: success (checkmarks, success status)
//! - Red: failure (error status)
//! - Yellow: the cursor marker
//! - Gray: neutral status and the help footer

use ratatui::style::{Color, Modifier, Style};

use crate::outcome::StatusKind;

// ============================================================================
// UI ELEMENT STYLES
// ============================================================================

/// Title line.
pub const STYLE_TITLE: Style = Style::new().fg(Color::Indexed(39)).add_modifier(Modifier::BOLD);

/// "Available Options" heading.
pub const STYLE_HEADING: Style = Style::new().add_modifier(Modifier::BOLD);

/// Cursor marker on the focused row.
pub const STYLE_CURSOR: Style = Style::new().fg(Color::LightYellow);

/// Checkmark on completed rows.
pub const STYLE_CHECKED: Style = Style::new().fg(Color::Green);

/// Footer / help line.
pub const STYLE_HELP: Style = Style::new().fg(Color::Indexed(240));

// ============================================================================
// STATUS STYLES
// ============================================================================

pub const STYLE_STATUS_SUCCESS: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

pub const STYLE_STATUS_ERROR: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);

pub const STYLE_STATUS_NEUTRAL: Style = Style::new().fg(Color::Indexed(244));

/// Style for a status line of the given class.
pub const fn status_style(kind: StatusKind) -> Style {
    match kind {
        StatusKind::Success => STYLE_STATUS_SUCCESS,
        StatusKind::Error => STYLE_STATUS_ERROR,
        StatusKind::Neutral => STYLE_STATUS_NEUTRAL,
    }
}

// ============================================================================
// TESTS
// ============================================================================
