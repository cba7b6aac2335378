//! Error adapter for converting geotable errors and diagnostics to miette
//! reports.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Row Listings
//!
//! Geotable inputs are JSON, so a diagnostic points at a row of a table rather
//! than at a byte range of the file. Each diagnostic is shown against a
//! listing of its table with one row per line (cells joined by ` | `), so the
//! line numbers miette prints are the row numbers.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan, SourceSpan};

use geotable::{GeotableError, GeotableInput};
use geotable_parser::{
    RowRef,
    error::{Diagnostic, Severity},
};

/// Listing of one input table, with the byte span of every row.
#[derive(Debug)]
struct TableListing {
    table: usize,
    text: String,
    spans: Vec<SourceSpan>,
}

impl TableListing {
    fn new(input: &GeotableInput, table: usize) -> Option<Self> {
        let rows = input.table(table)?;
        let mut text = String::new();
        let mut spans = Vec::with_capacity(rows.len());

        for row in rows {
            let line = row.to_string();
            spans.push(SourceSpan::new(text.len().into(), line.len()));
            text.push_str(&line);
            text.push('\n');
        }

        Some(Self { table, text, spans })
    }

    fn span(&self, row: RowRef) -> Option<SourceSpan> {
        if row.table() != self.table {
            return None;
        }
        self.spans.get(row.row()).copied()
    }
}

/// Adapter for a single geotable diagnostic.
///
/// This adapter wraps a single [`Diagnostic`] and implements
/// [`MietteDiagnostic`] to enable rich error formatting in the CLI.
pub struct DiagnosticAdapter<'a> {
    /// The wrapped diagnostic
    diag: &'a Diagnostic,
    /// Listing of the table the diagnostic points at
    listing: Option<TableListing>,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create an adapter that shows the diagnostic against its table in `input`.
    pub fn new(diag: &'a Diagnostic, input: &GeotableInput) -> Self {
        let listing = diag
            .table()
            .and_then(|table| TableListing::new(input, table));
        Self { diag, listing }
    }

    /// Create an adapter with no source listing.
    pub fn without_source(diag: &'a Diagnostic) -> Self {
        Self {
            diag,
            listing: None,
        }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.diag.severity() {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.listing
            .as_ref()
            .map(|listing| &listing.text as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let listing = self.listing.as_ref()?;
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().filter_map(|label| {
            let span = listing.span(label.row())?;
            let message = Some(label.message().to_string());
            Some(if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            })
        })))
    }
}

/// Adapter for non-diagnostic [`GeotableError`] variants.
///
/// This adapter handles errors that don't have rich diagnostic information,
/// such as I/O, configuration and export errors.
pub struct ErrorAdapter<'a>(pub &'a GeotableError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            GeotableError::Io(_) => "geotable::io",
            GeotableError::InputShape(_) => return None,
            GeotableError::Config(_) => "geotable::config",
            GeotableError::Export(_) => "geotable::export",
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a single diagnostic or a non-diagnostic error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A diagnostic, shown against its table when one is known.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<miette::Severity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`GeotableError`] into a list of reportable errors.
///
/// For [`GeotableError::InputShape`], this returns one [`Reportable`] for
/// each diagnostic in the error. For other error variants, this returns a
/// single [`Reportable`].
pub fn to_reportables(err: &GeotableError) -> Vec<Reportable<'_>> {
    match err {
        GeotableError::InputShape(parse_err) => parse_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::without_source(d)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

/// Convert parse warnings into reportables shown against their tables.
pub fn warning_reportables<'a>(
    diagnostics: &'a [Diagnostic],
    input: &GeotableInput,
) -> Vec<Reportable<'a>> {
    diagnostics
        .iter()
        .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, input)))
        .collect()
}

/// Render a reportable with miette's graphical handler.
///
/// Falls back to the plain message if rendering fails.
pub fn render(reportable: &Reportable<'_>) -> String {
    let mut writer = String::new();
    match GraphicalReportHandler::new().render_report(&mut writer, reportable) {
        Ok(()) => writer,
        Err(_) => reportable.to_string(),
    }
}
