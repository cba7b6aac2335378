//! Input documents.
//!
//! A geotable input arrives as JSON in one of five shapes:
//!
//! - a list of rows: `[["Project Name:", "Codman_Final"], ...]`
//! - a list of row lists, one per alignment
//! - a report envelope: `{"project_name": ..., "timestamp": ..., "alignments": [...]}`
//!   whose entries are row lists or alignment objects
//! - a single alignment object, passed through unchanged
//! - a list of alignment objects, each passed through unchanged
//!
//! A markup report written earlier is also accepted, either as XML text
//! ([`GeotableInput::from_xml`]) or as a JSON string holding that text.
//!
//! [`GeotableInput::from_value`] decides the shape once and fails with a
//! [`ParseError`] when the document matches none of them.

use serde::Deserialize;
use serde_json::Value;

use geotable_core::model::Alignment;

use crate::{
    error::ParseError,
    markup,
    row::{Row, RowRef},
};

/// A decoded input document.
#[derive(Debug, Clone, PartialEq)]
pub enum GeotableInput {
    /// One table of rows.
    Rows(Vec<Row>),
    /// Several tables, each parsed into its own alignment.
    Tables(Vec<Vec<Row>>),
    /// A report envelope, a list of alignment objects or a markup report.
    Report(Report),
    /// An already-parsed alignment.
    Alignment(Box<Alignment>),
}

/// A report envelope as written by the alignment extractor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Report {
    #[serde(default)]
    project_name: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    alignments: Vec<ReportEntry>,
}

/// One alignment of a report envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ReportEntry {
    Rows(Vec<Row>),
    Alignment(Alignment),
}

impl Report {
    pub fn new(alignments: Vec<ReportEntry>) -> Self {
        Self {
            project_name: None,
            timestamp: None,
            alignments,
        }
    }

    pub fn with_project_name(mut self, project_name: impl Into<String>) -> Self {
        self.project_name = Some(project_name.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    pub fn alignments(&self) -> &[ReportEntry] {
        &self.alignments
    }
}

impl GeotableInput {
    /// Decode JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] with `E101` for invalid JSON or an unrecognized
    /// shape, and `E100` for an empty document.
    pub fn from_json(text: &str) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|err| ParseError::malformed(format!("input is not valid JSON: {err}")))?;
        Self::from_value(value)
    }

    /// Decode a markup report written by the markup renderer.
    ///
    /// Every alignment of the report is passed through unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] with `E101` for text that is not a markup
    /// report, and `E100` for a report without alignments.
    pub fn from_xml(text: &str) -> Result<Self, ParseError> {
        let report = markup::read_report(text)?;
        if report.alignments.is_empty() {
            return Err(ParseError::empty("alignments"));
        }
        Ok(Self::Report(report))
    }

    /// Decode a JSON value.
    ///
    /// # Errors
    ///
    /// See [`GeotableInput::from_json`].
    pub fn from_value(value: Value) -> Result<Self, ParseError> {
        match value {
            Value::Array(items) if items.is_empty() => Err(ParseError::empty("rows")),
            Value::Array(items) if items.first().is_some_and(Value::is_object) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::Object(map) => serde_json::from_value(Value::Object(map))
                        .map(ReportEntry::Alignment)
                        .map_err(|err| {
                            ParseError::malformed(format!("invalid alignment {}: {err}", index + 1))
                        }),
                    other => Err(ParseError::malformed(format!(
                        "alignment {} is {}, not an alignment object",
                        index + 1,
                        describe(&other)
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(|entries| Self::Report(Report::new(entries))),
            Value::Array(items) if is_table_list(&items) => items
                .into_iter()
                .enumerate()
                .map(|(table, item)| match item {
                    Value::Array(rows) => decode_rows(table, rows),
                    other => Err(ParseError::malformed(format!(
                        "table {} is {}, not a list of rows",
                        table + 1,
                        describe(&other)
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Tables),
            Value::Array(items) => decode_rows(0, items).map(Self::Rows),
            Value::Object(ref map) if map.contains_key("alignments") => {
                let report: Report = serde_json::from_value(value)
                    .map_err(|err| ParseError::malformed(format!("invalid report: {err}")))?;
                if report.alignments.is_empty() {
                    return Err(ParseError::empty("alignments"));
                }
                Ok(Self::Report(report))
            }
            Value::Object(_) => serde_json::from_value::<Alignment>(value)
                .map(|alignment| Self::Alignment(Box::new(alignment)))
                .map_err(|err| ParseError::malformed(format!("invalid alignment: {err}"))),
            Value::String(text) if text.trim_start().starts_with('<') => Self::from_xml(&text),
            other => Err(ParseError::malformed(format!(
                "expected an array, an object or a markup report, found {}",
                describe(&other)
            ))),
        }
    }

    /// Rows of the table with the given index, if that table is a row list.
    ///
    /// Table indices match the ones in diagnostic labels.
    pub fn table(&self, index: usize) -> Option<&[Row]> {
        match self {
            Self::Rows(rows) => (index == 0).then_some(rows.as_slice()),
            Self::Tables(tables) => tables.get(index).map(Vec::as_slice),
            Self::Report(report) => match report.alignments.get(index) {
                Some(ReportEntry::Rows(rows)) => Some(rows.as_slice()),
                _ => None,
            },
            Self::Alignment(_) => None,
        }
    }
}

impl From<Vec<Row>> for GeotableInput {
    fn from(rows: Vec<Row>) -> Self {
        Self::Rows(rows)
    }
}

impl From<Alignment> for GeotableInput {
    fn from(alignment: Alignment) -> Self {
        Self::Alignment(Box::new(alignment))
    }
}

/// Whether the first item is itself a list of rows (or an empty list).
fn is_table_list(items: &[Value]) -> bool {
    items
        .first()
        .and_then(Value::as_array)
        .is_some_and(|first| first.first().is_none_or(Value::is_array))
}

fn decode_rows(table: usize, items: Vec<Value>) -> Result<Vec<Row>, ParseError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|err| {
                ParseError::malformed(format!("{}: {err}", RowRef::new(table, index)))
            })
        })
        .collect()
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ErrorCode;

    fn code(err: &ParseError) -> Option<ErrorCode> {
        err.diagnostics()[0].code()
    }

    #[test]
    fn test_row_list() {
        let input = GeotableInput::from_json(
            r#"[["Project Name:", "Codman_Final"], ["POB", "641+44.67", "42.97"]]"#,
        )
        .unwrap();

        let GeotableInput::Rows(rows) = &input else {
            panic!("expected rows, got {input:?}");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(input.table(0).map(<[Row]>::len), Some(2));
        assert!(input.table(1).is_none());
    }

    #[test]
    fn test_table_list() {
        let input = GeotableInput::from_value(json!([
            [["Horizontal Alignment Name:", "A"]],
            [],
            [["Horizontal Alignment Name:", "B"]]
        ]))
        .unwrap();

        let GeotableInput::Tables(tables) = &input else {
            panic!("expected tables, got {input:?}");
        };
        assert_eq!(tables.len(), 3);
        assert!(tables[1].is_empty());
        assert_eq!(input.table(2).map(|rows| rows[0].value()), Some("B"));
    }

    #[test]
    fn test_report_envelope() {
        let input = GeotableInput::from_value(json!({
            "project_name": "Rail Corridor",
            "timestamp": "2025-11-10 12:00:00",
            "alignments": [
                [["Horizontal Alignment Name:", "A"]],
                {"name": "Main_Rail_Line", "length": 120.5}
            ]
        }))
        .unwrap();

        let GeotableInput::Report(report) = &input else {
            panic!("expected report, got {input:?}");
        };
        assert_eq!(report.project_name(), Some("Rail Corridor"));
        assert_eq!(report.timestamp(), Some("2025-11-10 12:00:00"));
        assert!(matches!(report.alignments()[0], ReportEntry::Rows(_)));
        assert!(matches!(report.alignments()[1], ReportEntry::Alignment(_)));
        assert!(input.table(0).is_some());
        assert!(input.table(1).is_none());
    }

    #[test]
    fn test_alignment_object() {
        let input = GeotableInput::from_value(json!({"name": "Main_Rail_Line"})).unwrap();
        let GeotableInput::Alignment(alignment) = input else {
            panic!("expected alignment");
        };
        assert_eq!(alignment.name(), "Main_Rail_Line");
    }

    #[test]
    fn test_alignment_object_list() {
        let input = GeotableInput::from_json(
            r#"[{"name": "Main_Rail_Line"}, {"name": "Spur", "length": 42.5}]"#,
        )
        .unwrap();

        let GeotableInput::Report(report) = &input else {
            panic!("expected report, got {input:?}");
        };
        assert_eq!(report.project_name(), None);
        let names: Vec<&str> = report
            .alignments()
            .iter()
            .map(|entry| match entry {
                ReportEntry::Alignment(alignment) => alignment.name(),
                ReportEntry::Rows(_) => panic!("expected alignment entries"),
            })
            .collect();
        assert_eq!(names, ["Main_Rail_Line", "Spur"]);
        assert!(input.table(0).is_none());
    }

    #[test]
    fn test_alignment_object_list_rejects_mixed_items() {
        let err = GeotableInput::from_value(json!([{"name": "A"}, ["POB", "1+00", "1"]]))
            .unwrap_err();
        assert_eq!(code(&err), Some(ErrorCode::E101));
        assert!(err.to_string().contains("alignment 2 is an array"), "unexpected message: {err}");

        let err = GeotableInput::from_value(json!([{"nme": "A"}])).unwrap_err();
        assert!(err.to_string().contains("invalid alignment 1"), "unexpected message: {err}");
    }

    #[test]
    fn test_markup_report_text() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<GeotableReport version="1.0">
  <ProjectInfo><ProjectName>Codman_Final</ProjectName></ProjectInfo>
  <Alignments count="1"><Alignment name="Prop_AshNB" id=""/></Alignments>
</GeotableReport>"#;

        for input in [
            GeotableInput::from_xml(xml).unwrap(),
            GeotableInput::from_value(Value::String(xml.to_string())).unwrap(),
        ] {
            let GeotableInput::Report(report) = &input else {
                panic!("expected report, got {input:?}");
            };
            assert_eq!(report.project_name(), Some("Codman_Final"));
            assert_eq!(report.alignments().len(), 1);
        }

        let err = GeotableInput::from_xml("<GeotableReport><Alignments/></GeotableReport>")
            .unwrap_err();
        assert_eq!(code(&err), Some(ErrorCode::E100));
    }

    #[test]
    fn test_empty_inputs() {
        let err = GeotableInput::from_json("[]").unwrap_err();
        assert_eq!(code(&err), Some(ErrorCode::E100));

        let err = GeotableInput::from_value(json!({"alignments": []})).unwrap_err();
        assert_eq!(code(&err), Some(ErrorCode::E100));
    }

    #[test]
    fn test_malformed_inputs() {
        for text in [
            "42",
            "\"rows\"",
            "\"<Report/>\"",
            "null",
            "[[\"a\"]]",
            "{\"nme\": 1}",
            "[1, 2]",
            "{",
        ] {
            let err = GeotableInput::from_json(text).unwrap_err();
            assert_eq!(code(&err), Some(ErrorCode::E101), "input: {text}");
        }
    }

    #[test]
    fn test_malformed_row_names_its_position() {
        let err = GeotableInput::from_value(json!([["a", "b"], ["c"]])).unwrap_err();
        assert!(
            err.to_string().contains("table 1, row 2"),
            "unexpected message: {err}"
        );
    }
}
