//! Collector for accumulating diagnostics during a parse pass.

use crate::error::{Diagnostic, ParseError};

/// A collector for accumulating diagnostics during a parse pass.
///
/// Warnings are kept and handed back on success; any error turns the
/// result into a [`ParseError`] carrying every diagnostic.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Finish collection.
    ///
    /// - If there are errors, returns `Err(ParseError)` with all diagnostics.
    /// - Otherwise returns the collected warnings.
    pub fn finish(self) -> Result<Vec<Diagnostic>, ParseError> {
        if self.has_errors {
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(self.diagnostics)
        }
    }
}
