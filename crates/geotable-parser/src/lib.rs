//! # Geotable Parser
//!
//! Turns geotable exports (ordered rows of two or three text cells) into the
//! alignment model of [`geotable_core`].
//!
//! ## Usage
//!
//! ```
//! # use geotable_parser::{GeotableInput, parse, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let input = GeotableInput::from_json(r#"[
//!         ["Horizontal Alignment Name:", "Prop_AshNB"],
//!         ["Element: Linear", "", ""],
//!         ["POB", "641+44.67", "42.97"]
//!     ]"#)?;
//!
//!     let output = parse(&input)?;
//!     assert_eq!(output.alignments().alignments()[0].name(), "Prop_AshNB");
//!     Ok(())
//! }
//! ```

mod classifier;
pub mod error;
mod input;
mod markup;
mod parser;
#[cfg(test)]
mod parser_tests;
mod row;

pub use input::{GeotableInput, Report, ReportEntry};
pub use row::{Row, RowRef, RowShapeError};

use log::{debug, info};

use geotable_core::model::{Alignment, AlignmentSet};

use error::{Diagnostic, DiagnosticCollector, ParseError};

/// Alignments parsed from an input, with the row-level warnings found on the way.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    alignments: AlignmentSet,
    diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    pub fn alignments(&self) -> &AlignmentSet {
        &self.alignments
    }

    /// Warnings for rows that were skipped or read with a fallback.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (AlignmentSet, Vec<Diagnostic>) {
        (self.alignments, self.diagnostics)
    }
}

/// Parse a single table of rows.
///
/// Never fails: rows that cannot be used are skipped and reported in the
/// returned diagnostics.
pub fn parse_rows(rows: &[Row]) -> (Alignment, Vec<Diagnostic>) {
    let mut collector = DiagnosticCollector::new();
    let alignment = parser::parse_table(0, rows, &mut collector);
    // Row findings are warnings only.
    let diagnostics = collector.finish().unwrap_or_default();
    (alignment, diagnostics)
}

/// Parse a decoded input into an alignment set.
///
/// Row lists are parsed; alignment objects are passed through unchanged.
///
/// # Errors
///
/// Returns [`ParseError`] with `E100` when the input holds no rows or
/// alignments.
pub fn parse(input: &GeotableInput) -> Result<ParseOutput, ParseError> {
    let mut collector = DiagnosticCollector::new();

    let set = match input {
        GeotableInput::Rows(rows) => {
            if rows.is_empty() {
                return Err(ParseError::empty("rows"));
            }
            AlignmentSet::new(vec![parser::parse_table(0, rows, &mut collector)])
        }
        GeotableInput::Tables(tables) => {
            if tables.is_empty() {
                return Err(ParseError::empty("tables"));
            }
            let alignments = tables
                .iter()
                .enumerate()
                .map(|(table, rows)| parser::parse_table(table, rows, &mut collector))
                .collect();
            AlignmentSet::new(alignments)
        }
        GeotableInput::Report(report) => {
            if report.alignments().is_empty() {
                return Err(ParseError::empty("alignments"));
            }
            let alignments = report
                .alignments()
                .iter()
                .enumerate()
                .map(|(table, entry)| match entry {
                    ReportEntry::Rows(rows) => parser::parse_table(table, rows, &mut collector),
                    ReportEntry::Alignment(alignment) => alignment.clone(),
                })
                .collect();

            let mut set = AlignmentSet::new(alignments);
            if let Some(project_name) = report.project_name() {
                set = set.with_project_name(project_name);
            }
            if let Some(timestamp) = report.timestamp() {
                set = set.with_timestamp(timestamp);
            }
            set
        }
        GeotableInput::Alignment(alignment) => AlignmentSet::new(vec![alignment.as_ref().clone()]),
    };

    for alignment in set.alignments() {
        debug!(
            name = alignment.name(),
            elements = alignment.elements().len(),
            stations = alignment.station_points().count();
            "Parsed alignment"
        );
    }

    let diagnostics = collector.finish()?;
    info!(
        alignments = set.len(),
        diagnostics = diagnostics.len();
        "Parsed geotable input"
    );

    Ok(ParseOutput {
        alignments: set,
        diagnostics,
    })
}
