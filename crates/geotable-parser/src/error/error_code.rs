//! Error codes for the geotable diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Row classification findings
//! - `E1xx` - Input document errors

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Row Findings (E0xx)
    // =========================================================================
    /// Unclassified row.
    ///
    /// The row matched no classification rule and was discarded.
    E001,

    /// Non-numeric station cell.
    ///
    /// A station row has a numeric elevation but its station cell is not in
    /// `H+RR.rr` or decimal notation. The station is read as `0.0`.
    E002,

    /// Non-numeric header value.
    ///
    /// A header row such as `Length:` or `Start Station:` carries a value that
    /// is not a number. The alignment field keeps its previous value.
    E003,

    // =========================================================================
    // Input Errors (E1xx)
    // =========================================================================
    /// Empty input.
    ///
    /// The input holds no rows and no alignments.
    E100,

    /// Malformed input document.
    ///
    /// The input is neither a row sequence, a list of row sequences, a report
    /// envelope nor an alignment structure.
    E101,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
        }
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            // Row findings
            ErrorCode::E001 => "unclassified row",
            ErrorCode::E002 => "non-numeric station",
            ErrorCode::E003 => "non-numeric header value",
            // Input errors
            ErrorCode::E100 => "empty input",
            ErrorCode::E101 => "malformed input document",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
