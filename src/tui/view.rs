//! Pure rendering: map menu state to ratatui text.
//!
//! `menu_lines` is the whole view as data (state in, lines out, no
//! hidden state). `render` only hands those lines to the frame.

use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::config::Config;
use crate::outcome::StatusKind;
use crate::registry::Registry;

use super::state::MenuState;
use super::theme;

/// Marker drawn before the focused row.
pub const CURSOR_MARKER: &str = ">";

/// Marker drawn inside the brackets of a completed row.
pub const COMPLETED_MARKER: &str = "✓";

/// Static text around the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chrome {
    pub title: String,
    pub help: String,
}

impl From<&Config> for Chrome {
    fn from(config: &Config) -> Self {
        Chrome {
            title: config.title.clone(),
            help: config.help.clone(),
        }
    }
}

impl Default for Chrome {
    fn default() -> Self {
        Chrome::from(&Config::default())
    }
}

// ============================================================================
// DISPATCH
// ============================================================================

/// Draw the menu into the terminal frame.
pub fn render(state: &MenuState, registry: &Registry, chrome: &Chrome, frame: &mut Frame) {
    let paragraph = Paragraph::new(menu_lines(state, registry, chrome)).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, frame.area());
}

/// The full menu as styled lines.
pub fn menu_lines(state: &MenuState, registry: &Registry, chrome: &Chrome) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(chrome.title.clone(), theme::STYLE_TITLE)),
        Line::from(""),
        Line::from(Span::styled("Available Options:", theme::STYLE_HEADING)),
        Line::from(""),
    ];

    for (i, item) in registry.items().iter().enumerate() {
        lines.push(item_line(&item.label, i == state.cursor, state.is_completed(i)));
    }

    lines.push(Line::from(""));
    lines.push(status_line(&state.status));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(chrome.help.clone(), theme::STYLE_HELP)));
    lines
}

/// Unstyled text of the menu, one line per row.
#[cfg(test)]
fn menu_text(state: &MenuState, registry: &Registry, chrome: &Chrome) -> String {
    menu_lines(state, registry, chrome)
        .iter()
        .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// PIECES
// ============================================================================

/// `> [✓] Label` with either marker replaced by a space when absent.
fn item_line(label: &str, focused: bool, completed: bool) -> Line<'static> {
    let cursor = if focused {
        Span::styled(CURSOR_MARKER, theme::STYLE_CURSOR)
    } else {
        Span::raw(" ")
    };
    let check = if completed {
        Span::styled(COMPLETED_MARKER, theme::STYLE_CHECKED)
    } else {
        Span::raw(" ")
    };

    Line::from(vec![
        cursor,
        Span::raw(" ["),
        check,
        Span::raw("] "),
        Span::raw(label.to_string()),
    ])
}

fn status_line(status: &str) -> Line<'static> {
    let style = theme::status_style(StatusKind::classify(status));
    Line::from(Span::styled(status.to_string(), style))
}

// ============================================================================
// TESTS
// ============================================================================
