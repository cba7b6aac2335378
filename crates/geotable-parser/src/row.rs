//! Input rows and row references.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A row must carry at least this many cells.
const MIN_CELLS: usize = 2;
/// A row may carry at most this many cells.
const MAX_CELLS: usize = 3;

/// Error for a row with the wrong number of cells.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("a row must have 2 or 3 cells, found {0}")]
pub struct RowShapeError(usize);

/// One row of a geotable export: a label, a value and an optional third cell.
///
/// Cells are kept as written. Deserializes from a JSON array of two or three
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Row {
    label: String,
    value: String,
    third: Option<String>,
}

impl Row {
    /// Create a two-cell row.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            third: None,
        }
    }

    /// Create a three-cell row.
    pub fn with_third(
        label: impl Into<String>,
        value: impl Into<String>,
        third: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            third: Some(third.into()),
        }
    }

    /// First cell, trimmed.
    pub fn label(&self) -> &str {
        self.label.trim()
    }

    /// Second cell, trimmed.
    pub fn value(&self) -> &str {
        self.value.trim()
    }

    /// Third cell, trimmed, when present and non-empty.
    pub fn third(&self) -> Option<&str> {
        self.third
            .as_deref()
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
    }

    /// Whether every cell is blank.
    pub fn is_blank(&self) -> bool {
        self.label().is_empty() && self.value().is_empty() && self.third().is_none()
    }

    /// Cells as written, for listings.
    pub fn cells(&self) -> impl Iterator<Item = &str> {
        [Some(self.label.as_str()), Some(self.value.as_str()), self.third.as_deref()]
            .into_iter()
            .flatten()
    }
}

impl TryFrom<Vec<String>> for Row {
    type Error = RowShapeError;

    fn try_from(cells: Vec<String>) -> Result<Self, Self::Error> {
        let count = cells.len();
        if !(MIN_CELLS..=MAX_CELLS).contains(&count) {
            return Err(RowShapeError(count));
        }

        let mut cells = cells.into_iter();
        let label = cells.next().unwrap_or_default();
        let value = cells.next().unwrap_or_default();
        Ok(Self {
            label,
            value,
            third: cells.next(),
        })
    }
}

impl From<Row> for Vec<String> {
    fn from(row: Row) -> Self {
        let mut cells = vec![row.label, row.value];
        cells.extend(row.third);
        cells
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<&str> = self.cells().collect();
        write!(f, "{}", cells.join(" | "))
    }
}

/// Location of a row: the index of its table within the input and the
/// index of the row within that table, both zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowRef {
    table: usize,
    row: usize,
}

impl RowRef {
    pub fn new(table: usize, row: usize) -> Self {
        Self { table, row }
    }

    pub fn table(&self) -> usize {
        self.table
    }

    pub fn row(&self) -> usize {
        self.row
    }
}

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table {}, row {}", self.table + 1, self.row + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_accessors_trim() {
        let row = Row::with_third(" POB ", "641+44.67 ", " 42.97");
        assert_eq!(row.label(), "POB");
        assert_eq!(row.value(), "641+44.67");
        assert_eq!(row.third(), Some("42.97"));
    }

    #[test]
    fn test_empty_third_is_absent() {
        let row = Row::with_third("Tangent Grade:", "-2.411", "  ");
        assert_eq!(row.third(), None);
        assert!(Row::with_third("", " ", "").is_blank());
    }

    #[test]
    fn test_deserialize_row_shapes() {
        let row: Row = serde_json::from_str(r#"["Project Name:", "Codman_Final"]"#).unwrap();
        assert_eq!(row, Row::new("Project Name:", "Codman_Final"));

        let row: Row = serde_json::from_str(r#"["POB", "641+44.67", "42.97"]"#).unwrap();
        assert_eq!(row.third(), Some("42.97"));

        let err = serde_json::from_str::<Row>(r#"["lonely"]"#).unwrap_err();
        assert!(err.to_string().contains("a row must have 2 or 3 cells, found 1"));

        assert!(serde_json::from_str::<Row>(r#"["a", "b", "c", "d"]"#).is_err());
        assert!(serde_json::from_str::<Row>(r#"["a", 1]"#).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Row::with_third("PVI", "641+95.67", "41.74").to_string(),
            "PVI | 641+95.67 | 41.74"
        );
        assert_eq!(RowRef::new(0, 9).to_string(), "table 1, row 10");
    }
}
