//! Error types for geotable operations.
//!
//! This module provides the main error type [`GeotableError`] which wraps
//! the error conditions of a report run: reading or writing files, an input
//! that is not a geotable document, configuration problems and renderer
//! failures.

use std::io;

use thiserror::Error;

use geotable_parser::error::ParseError;

/// The main error type for geotable operations.
///
/// # Diagnostic Variants
///
/// The `InputShape` variant carries the parser diagnostics that rejected
/// the input document.
#[derive(Debug, Error)]
pub enum GeotableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    InputShape(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for GeotableError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}
