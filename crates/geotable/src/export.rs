//! Export functionality for geotable reports.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! converting a parsed [`AlignmentSet`] into an output document. It is the
//! final stage of the report pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Input rows
//!     ↓ parse
//! Alignment model
//!     ↓ export (this module)
//! Report document
//! ```
//!
//! # Available Backends
//!
//! - [`markup`] - structured XML report
//! - [`text`] - fixed-width plain-text report
//! - `paginated` - printable PDF report (requires the `pdf` feature)
//!
//! All backends share the column layout and number formatting in [`layout`].
//!
//! # Error Handling
//!
//! Export operations return [`Error`] for rendering failures. Writing the
//! rendered document to disk is the caller's concern. [`Error`] converts into [`GeotableError::Export`] at the crate
//! boundary.
//!
//! [`GeotableError::Export`]: crate::GeotableError::Export

pub mod layout;
pub mod markup;
#[cfg(feature = "pdf")]
pub mod paginated;
pub mod text;

use geotable_core::model::AlignmentSet;

/// Abstraction for report export backends.
pub trait Exporter {
    /// The rendered document: text for markup and plain-text reports, bytes
    /// for paginated ones.
    type Output;

    /// Renders every alignment of `set` into one document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the set cannot be converted to the target
    /// format.
    fn export_alignments(&mut self, set: &AlignmentSet) -> Result<Self::Output, Error>;
}

/// Errors that can occur during report export.
///
/// This type is converted into [`GeotableError::Export`] at the crate
/// boundary via the [`From`] implementation in [`crate::error`].
///
/// [`GeotableError::Export`]: crate::GeotableError::Export
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::Render(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeotableError;

    #[test]
    fn test_render_error_reaches_crate_boundary() {
        let err = GeotableError::from(Error::Render("page tree is empty".to_string()));

        assert!(matches!(err, GeotableError::Export(_)));
        assert_eq!(
            err.to_string(),
            "Export error: Render error: page tree is empty"
        );
    }

    #[test]
    fn test_format_error_is_a_render_error() {
        let err = Error::from(std::fmt::Error);
        assert!(matches!(err, Error::Render(_)));
    }
}
