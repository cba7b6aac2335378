//! Error and diagnostic system for the geotable parser.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Labels pointing at rows of the input tables
//! - Severity levels
//! - Diagnostic collector for accumulating row-level findings
//!
//! # Overview
//!
//! Row-level problems (an unclassified row, a station cell that is not a
//! number) never stop the parser. They are recorded as warning
//! [`Diagnostic`]s and returned next to the parsed alignments. Problems with
//! the shape of the whole input are errors, wrapped in [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use geotable_parser::error::{Diagnostic, ErrorCode};
//! # use geotable_parser::RowRef;
//!
//! let diag = Diagnostic::warning("station `641+4x.67` is not a number")
//!     .with_code(ErrorCode::E002)
//!     .with_label(RowRef::new(0, 11), "station cell")
//!     .with_secondary_label(RowRef::new(0, 9), "in this element")
//!     .with_help("the station was read as 0.00");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
