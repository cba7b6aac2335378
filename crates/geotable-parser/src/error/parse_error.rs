//! The ParseError type for wrapping input errors.
//!
//! [`ParseError`] wraps one or more [`Diagnostic`]s that rejected an input
//! document as a whole.

use std::fmt;

use crate::error::{Diagnostic, ErrorCode};

/// Error type for an input that cannot be parsed.
///
/// Wraps one or more diagnostics.
#[derive(Debug)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    /// Create a new parse error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// An empty-input error.
    pub fn empty(what: &str) -> Self {
        Diagnostic::error(format!("input contains no {what}"))
            .with_code(ErrorCode::E100)
            .with_help("supply at least one row or alignment")
            .into()
    }

    /// A malformed-document error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Diagnostic::error(message)
            .with_code(ErrorCode::E101)
            .with_help(
                "expected a list of rows, a list of row lists, a report with `alignments`, \
                 an alignment object or a list of them, or a `GeotableReport` markup document",
            )
            .into()
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.diagnostics.first() {
            write!(f, "{}", first)?;
            if self.diagnostics.len() > 1 {
                write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}
