//! The core diagnostic type for the geotable error system.
//!
//! A [`Diagnostic`] represents a single error or warning with an optional
//! error code, labeled rows, and help text.

use std::fmt;

use crate::{
    error::{Severity, error_code::ErrorCode, label::Label},
    row::RowRef,
};

/// A diagnostic message with row location information.
///
/// # Example
///
/// ```text
/// warning[E002]: station `641+4x.67` is not a number
///    |
/// 10 | Element: Linear
///    | --------------- in this element
/// 12 | PVI | 641+4x.67 | 41.74
///    | ------------------------- station cell
///    |
///    = help: the station was read as 0.00
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use geotable_parser::error::{Diagnostic, ErrorCode};
    /// # use geotable_parser::RowRef;
    ///
    /// let diag = Diagnostic::warning("row matches no rule")
    ///     .with_code(ErrorCode::E001)
    ///     .with_label(RowRef::new(0, 3), "discarded");
    /// ```
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, row: RowRef, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(row, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, row: RowRef, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(row, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Table index of the first primary label, if any.
    pub fn table(&self) -> Option<usize> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(|label| label.row().table())
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "warning[E001]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}
