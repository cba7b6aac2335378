//! Labeled row references for diagnostic messages.

use crate::row::RowRef;

/// A message attached to a row of the input.
///
/// - **Primary labels** mark the row the diagnostic is about.
/// - **Secondary labels** give context, such as the `Element:` row that
///   opened the element the primary row belongs to.
#[derive(Debug, Clone)]
pub struct Label {
    row: RowRef,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(row: RowRef, message: impl Into<String>) -> Self {
        Self {
            row,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(row: RowRef, message: impl Into<String>) -> Self {
        Self {
            row,
            message: message.into(),
            is_primary: false,
        }
    }

    /// Get the row this label points at.
    pub fn row(&self) -> RowRef {
        self.row
    }

    /// Get the label message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this is a primary label.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Check if this is a secondary label.
    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}
