//! Operation outcomes and the status-text convention.
//!
//! Every launched operation produces exactly one [`Outcome`]. The message it
//! carries becomes the menu's status line verbatim; its prefix decides how
//! the line is styled.

/// Prefix marking a status line as a success.
pub const SUCCESS_MARKER: &str = "Success:";

/// Prefix marking a status line as an error.
pub const ERROR_MARKER: &str = "Error:";

/// Result of a single operation run.
///
/// Carries no reference to the item that produced it. Correlation back to
/// the menu row happens in the state machine, which allows only one
/// operation in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Failure(String),
}

impl Outcome {
    /// Build a success outcome whose message starts with [`SUCCESS_MARKER`].
    pub fn succeeded(detail: impl AsRef<str>) -> Self {
        Outcome::Success(format!("{} {}", SUCCESS_MARKER, detail.as_ref()))
    }

    /// Build a failure outcome whose message starts with [`ERROR_MARKER`].
    pub fn failed(detail: impl AsRef<str>) -> Self {
        Outcome::Failure(format!("{} {}", ERROR_MARKER, detail.as_ref()))
    }

    /// The message text, exactly as it will appear in the status line.
    pub fn message(&self) -> &str {
        match self {
            Outcome::Success(msg) | Outcome::Failure(msg) => msg,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

/// Rendering class of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
    Neutral,
}

impl StatusKind {
    /// Classify status text by its literal prefix.
    ///
    /// Only the exact, case-sensitive markers count. The tag of the
    /// originating [`Outcome`] is irrelevant here: a `Success` outcome with
    /// an unmarked message renders neutral.
    pub fn classify(text: &str) -> Self {
        if text.starts_with(SUCCESS_MARKER) {
            StatusKind::Success
        } else if text.starts_with(ERROR_MARKER) {
            StatusKind::Error
        } else {
            StatusKind::Neutral
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
