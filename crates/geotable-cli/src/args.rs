//! Command-line argument definitions for the geotable CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, report format and
//! orientation, configuration file selection, and logging verbosity.

use clap::Parser;

use geotable::{ReportFormat, orientation::Orientation};

/// Command-line arguments for the geotable report tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input JSON or markup report file
    #[arg(help = "Path to the input file (rows, tables, report or alignment JSON, or an .xml markup report)")]
    pub input: String,

    /// Path to the output file; the report is printed when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Report format (markup, paginated, text)
    #[arg(short, long, default_value = "markup")]
    pub format: ReportFormat,

    /// Column layout (auto, vertical, horizontal)
    #[arg(long, default_value = "auto")]
    pub orientation: Orientation,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
