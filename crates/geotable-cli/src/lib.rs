//! CLI logic for the geotable report tool.
//!
//! This module contains the core CLI logic: read the input file, parse it,
//! surface row warnings, and write or print the requested report.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use log::{info, warn};

use geotable::{GeotableError, GeotableInput, ReportBuilder, ReportFormat};

use error_adapter::{render, warning_reportables};

/// Run the geotable CLI application
///
/// Parses the input file and writes the report to the output path, or
/// prints it to stdout when no output path is given. Paginated reports are
/// never printed: without an output path they are written next to the input.
/// Row-level warnings are logged and do not stop the run. An input with an
/// `.xml` extension is read as a previously rendered markup report; any other
/// input is read as JSON.
///
/// # Errors
///
/// Returns `GeotableError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Input documents that are not geotable inputs
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), GeotableError> {
    info!(
        input_path = args.input,
        format:% = args.format;
        "Processing geotable"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let input = if is_markup(&args.input) {
        GeotableInput::from_xml(&source)?
    } else {
        GeotableInput::from_json(&source)?
    };

    let builder = ReportBuilder::new(app_config).with_orientation(args.orientation);
    let output = builder.parse(&input)?;

    for reportable in warning_reportables(output.diagnostics(), &input) {
        warn!("{}", render(&reportable));
    }

    let set = output.alignments();
    let output_path = match (&args.output, args.format) {
        (Some(path), _) => Some(PathBuf::from(path)),
        // A paginated document is never printed; it goes next to the input.
        (None, ReportFormat::Paginated) => Some(Path::new(&args.input).with_extension("pdf")),
        (None, _) => None,
    };

    match output_path {
        Some(path) => {
            let outcome = builder.write_report(set, args.format, path)?;
            info!(output_file:? = outcome.path(); "Report exported successfully");
            println!("{outcome}");
        }
        None => {
            let document = builder.render(set, args.format)?;
            std::io::stdout().write_all(document.as_bytes())?;
        }
    }

    Ok(())
}

fn is_markup(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}
