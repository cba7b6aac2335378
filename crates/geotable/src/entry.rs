//! Single-call entry points.
//!
//! Each call takes the input document, an output path and an orientation
//! selector, and always returns a string: the rendered document when the
//! path is empty, the save message when a file was written, or a message
//! starting with `Error:`. Errors never escape these functions.
//!
//! ```
//! use serde_json::json;
//!
//! let rows = json!([
//!     ["Vertical Alignment Name:", "Prop_AshNB"],
//!     ["Element: Linear", "", ""],
//!     ["POB", "641+44.67", "42.97"]
//! ]);
//!
//! let text = geotable::entry::text(rows, "", "auto");
//! assert!(text.contains("641+44.67"));
//!
//! let error = geotable::entry::text(json!(42), "", "auto");
//! assert!(error.starts_with("Error:"));
//! ```

use log::error;
use serde_json::Value;

use geotable_core::orientation::Orientation;
use geotable_parser::error::ParseError;

use crate::{GeotableError, GeotableInput, ReportBuilder, ReportFormat};

/// Render `input` in `format`.
///
/// With an empty `output_path` the document is returned as a string. A
/// paginated request needs a path and yields an error message without one.
pub fn run(format: ReportFormat, input: Value, output_path: &str, orientation: &str) -> String {
    run_with(&ReportBuilder::default(), format, input, output_path, orientation)
}

/// Like [`run`], with a configured builder. The orientation argument
/// replaces the builder's.
pub fn run_with(
    builder: &ReportBuilder,
    format: ReportFormat,
    input: Value,
    output_path: &str,
    orientation: &str,
) -> String {
    match try_run(builder, format, input, output_path, orientation) {
        Ok(message) => message,
        Err(err) => error_message(err),
    }
}

/// Markup report.
pub fn markup(input: Value, output_path: &str, orientation: &str) -> String {
    run(ReportFormat::Markup, input, output_path, orientation)
}

/// Paginated report, falling back to text when the backend is unavailable.
pub fn paginated(input: Value, output_path: &str, orientation: &str) -> String {
    run(ReportFormat::Paginated, input, output_path, orientation)
}

/// Plain-text report.
pub fn text(input: Value, output_path: &str, orientation: &str) -> String {
    run(ReportFormat::Text, input, output_path, orientation)
}

fn try_run(
    builder: &ReportBuilder,
    format: ReportFormat,
    input: Value,
    output_path: &str,
    orientation: &str,
) -> Result<String, EntryError> {
    let orientation: Orientation = orientation
        .parse()
        .map_err(|err: &str| EntryError::Usage(format!("{err} `{orientation}`")))?;
    let builder = builder.clone().with_orientation(orientation);

    let input = GeotableInput::from_value(input).map_err(GeotableError::from)?;
    let output = builder.parse(&input)?;
    let set = output.alignments();

    if output_path.trim().is_empty() {
        let missing_path =
            || EntryError::Usage("paginated output requires an output path".to_string());
        if format == ReportFormat::Paginated {
            return Err(missing_path());
        }
        return builder.render(set, format)?.into_text().ok_or_else(missing_path);
    }

    Ok(builder.write_report(set, format, output_path)?.to_string())
}

/// Failures of a single entry call.
enum EntryError {
    Usage(String),
    Report(GeotableError),
}

impl From<GeotableError> for EntryError {
    fn from(err: GeotableError) -> Self {
        Self::Report(err)
    }
}

fn error_message(err: EntryError) -> String {
    let message = match &err {
        EntryError::Usage(message) => message.clone(),
        EntryError::Report(GeotableError::InputShape(err)) => input_shape_message(err),
        EntryError::Report(err) => err.to_string(),
    };
    error!(err:% = message; "Report failed");
    format!("Error: {message}")
}

/// The rejecting diagnostic without its severity prefix, code last.
fn input_shape_message(err: &ParseError) -> String {
    match err.diagnostics().first() {
        Some(diagnostic) => match diagnostic.code() {
            Some(code) => format!("{} ({code})", diagnostic.message()),
            None => diagnostic.message().to_string(),
        },
        None => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::Capabilities;

    fn codman() -> Value {
        json!([
            ["Project Name:", "Codman_Final"],
            ["Description:", ""],
            ["Vertical Alignment Name:", "Prop_AshNB"],
            ["Description:", ""],
            ["Style:", "Default"],
            ["", "STATION", "ELEVATION"],
            ["Element: Linear", "", ""],
            ["POB", "641+44.67", "42.97"],
            ["PVI", "641+95.67", "41.74"],
            ["Tangent Grade:", "-2.411", ""]
        ])
    }

    #[test]
    fn test_in_memory_markup() {
        let xml = markup(codman(), "", "");
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<Alignment name=\"Prop_AshNB\""));
    }

    #[test]
    fn test_in_memory_paginated_is_an_error() {
        assert_eq!(
            paginated(codman(), "", "auto"),
            "Error: paginated output requires an output path"
        );
    }

    #[test]
    fn test_bad_orientation() {
        let message = text(codman(), "", "diagonal");
        assert_eq!(message, "Error: Unsupported orientation `diagonal`");
    }

    #[test]
    fn test_input_shape_message_has_single_prefix() {
        assert_eq!(
            text(json!([]), "", "auto"),
            "Error: input contains no rows (E100)"
        );

        let message = markup(json!(42), "", "auto");
        assert!(
            message.starts_with("Error: expected an array, an object or a markup report, found a number"),
            "unexpected message: {message}"
        );
        assert!(message.ends_with("(E101)"), "unexpected message: {message}");
        assert!(!message.contains("error["), "unexpected message: {message}");
    }

    #[test]
    fn test_bad_input_shape() {
        for input in [json!(42), json!("rows"), json!([]), json!({"alignments": []})] {
            let message = text(input, "", "auto");
            assert!(message.starts_with("Error:"), "unexpected message: {message}");
        }
    }

    #[test]
    fn test_written_file_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codman.txt");

        let message = text(codman(), path.to_str().unwrap(), "vertical");

        assert_eq!(message, format!("TEXT report saved to: {}", path.display()));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Project Name: Codman_Final\n"));
    }

    #[test]
    fn test_paginated_fallback_writes_text() {
        let dir = tempfile::tempdir().unwrap();
        let builder = ReportBuilder::default().with_capabilities(Capabilities::without_paginated());
        let path = dir.path().join("codman.pdf");

        let message = run_with(
            &builder,
            ReportFormat::Paginated,
            codman(),
            path.to_str().unwrap(),
            "auto",
        );

        let expected = dir.path().join("codman.txt");
        assert_eq!(
            message,
            format!(
                "TEXT report saved to: {}\n(TEXT mode (paginated backend not available))",
                expected.display()
            )
        );
        assert!(expected.exists());
        assert!(!path.exists());
    }

    #[test]
    fn test_write_to_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.xml");

        let message = markup(codman(), path.to_str().unwrap(), "auto");
        assert!(message.starts_with("Error: I/O error:"), "unexpected message: {message}");
    }
}
