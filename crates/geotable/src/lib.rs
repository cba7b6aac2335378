//! Geotable - alignment geotable reports.
//!
//! Parses geotable exports (ordered rows of two or three text cells written by
//! a civil alignment report) into an alignment model and renders it as a
//! structured markup document, a paginated PDF document or fixed-width plain
//! text.

pub mod config;
pub mod entry;

mod capability;
mod error;
mod export;
mod report;

pub use geotable_core::{model, orientation, station};
pub use geotable_parser::{GeotableInput, ParseOutput, Row, RowRef};

pub use capability::Capabilities;
pub use error::GeotableError;
pub use report::{Rendered, ReportFormat, UnknownFormat, WriteOutcome};

use std::{fs, path::Path};

use chrono::Local;
use log::{debug, info, trace};

use geotable_core::{model::AlignmentSet, orientation::Orientation};

use config::AppConfig;
use export::Exporter;

/// Format of the generation date written into reports.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Builder for parsing geotable inputs and rendering reports.
///
/// The builder holds everything a render depends on besides the alignments:
/// configuration, backend capabilities, the orientation selector and an
/// optional fixed generation date.
///
/// # Examples
///
/// ```rust
/// use geotable::{ReportBuilder, config::AppConfig};
///
/// let rows = r#"[
///     ["Project Name:", "Codman_Final"],
///     ["Vertical Alignment Name:", "Prop_AshNB"],
///     ["Element: Linear", "", ""],
///     ["POB", "641+44.67", "42.97"]
/// ]"#;
///
/// let builder = ReportBuilder::new(AppConfig::default());
/// let output = builder.parse_json(rows).expect("Failed to parse");
///
/// let text = builder
///     .render_text(output.alignments())
///     .expect("Failed to render");
/// assert!(text.contains("Element: Linear"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    config: AppConfig,
    capabilities: Capabilities,
    orientation: Orientation,
    timestamp: Option<String>,
}

impl ReportBuilder {
    /// Create a new report builder with the given configuration.
    ///
    /// Capabilities are detected from the build and the orientation is
    /// [`Orientation::Auto`].
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Replace the detected backend capabilities.
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Fix the generation date written into markup reports.
    ///
    /// Without it the input's timestamp is used, and failing that the
    /// current local time.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Parse a decoded input into alignments.
    ///
    /// # Errors
    ///
    /// Returns [`GeotableError::InputShape`] when the input holds no rows or
    /// alignments.
    pub fn parse(&self, input: &GeotableInput) -> Result<ParseOutput, GeotableError> {
        info!("Parsing geotable input");
        let output = geotable_parser::parse(input)?;
        debug!(
            alignments = output.alignments().len(),
            warnings = output.diagnostics().len();
            "Input parsed successfully"
        );
        trace!(alignments:? = output.alignments(); "Parsed alignments");
        Ok(output)
    }

    /// Decode JSON text and parse it.
    ///
    /// # Errors
    ///
    /// Returns [`GeotableError::InputShape`] when the text is not a geotable
    /// input document.
    pub fn parse_json(&self, text: &str) -> Result<ParseOutput, GeotableError> {
        let input = GeotableInput::from_json(text)?;
        self.parse(&input)
    }

    /// Read a markup report written earlier and parse its alignments.
    ///
    /// # Errors
    ///
    /// Returns [`GeotableError::InputShape`] when the text is not a markup
    /// report or holds no alignments.
    pub fn parse_xml(&self, text: &str) -> Result<ParseOutput, GeotableError> {
        let input = GeotableInput::from_xml(text)?;
        self.parse(&input)
    }

    /// Render alignments to a markup document.
    ///
    /// # Errors
    ///
    /// Returns [`GeotableError::Export`] if the document cannot be written.
    pub fn render_markup(&self, set: &AlignmentSet) -> Result<String, GeotableError> {
        info!(alignments = set.len(); "Rendering markup report");
        let generated = self.generated_date(set);
        let mut exporter = export::markup::Markup::new(self.config.markup(), generated);
        Ok(exporter.export_alignments(set)?)
    }

    /// Render alignments to fixed-width plain text.
    ///
    /// # Errors
    ///
    /// Returns [`GeotableError::Export`] if the document cannot be written.
    pub fn render_text(&self, set: &AlignmentSet) -> Result<String, GeotableError> {
        info!(alignments = set.len(); "Rendering text report");
        let mut exporter = export::text::Text::new(self.orientation);
        Ok(exporter.export_alignments(set)?)
    }

    /// Render alignments to a paginated document, or to plain text when the
    /// paginated backend is not available.
    ///
    /// # Errors
    ///
    /// Returns [`GeotableError::Export`] if the document cannot be built.
    pub fn render_paginated(&self, set: &AlignmentSet) -> Result<Rendered, GeotableError> {
        if !self.capabilities.paginated() {
            info!("Paginated backend not available, rendering text instead");
            return self.render_text(set).map(Rendered::Text);
        }
        self.render_pdf(set).map(Rendered::Paginated)
    }

    /// Render alignments in the requested format.
    ///
    /// # Errors
    ///
    /// See the per-format `render_*` methods.
    pub fn render(
        &self,
        set: &AlignmentSet,
        format: ReportFormat,
    ) -> Result<Rendered, GeotableError> {
        match format {
            ReportFormat::Markup => self.render_markup(set).map(Rendered::Markup),
            ReportFormat::Paginated => self.render_paginated(set),
            ReportFormat::Text => self.render_text(set).map(Rendered::Text),
        }
    }

    /// Render alignments and write the document to `path`.
    ///
    /// Paginated documents are written with a `.pdf` extension, or `.txt`
    /// when the request fell back to text.
    ///
    /// # Errors
    ///
    /// Returns [`GeotableError::Io`] if the file cannot be written, or any
    /// error of [`ReportBuilder::render`].
    pub fn write_report(
        &self,
        set: &AlignmentSet,
        format: ReportFormat,
        path: impl AsRef<Path>,
    ) -> Result<WriteOutcome, GeotableError> {
        let rendered = self.render(set, format)?;
        let written = rendered.format();
        let path = report::output_path(path.as_ref(), format, written);

        fs::write(&path, rendered.as_bytes())?;

        info!(path:? = path, format:% = written; "Report written");
        Ok(WriteOutcome::new(format, written, path))
    }

    #[cfg(feature = "pdf")]
    fn render_pdf(&self, set: &AlignmentSet) -> Result<Vec<u8>, GeotableError> {
        info!(alignments = set.len(); "Rendering paginated report");
        let mut exporter = export::paginated::Paginated::new(self.config.page(), self.orientation);
        Ok(exporter.export_alignments(set)?)
    }

    #[cfg(not(feature = "pdf"))]
    fn render_pdf(&self, _set: &AlignmentSet) -> Result<Vec<u8>, GeotableError> {
        Err(export::Error::Render("built without the `pdf` feature".to_string()).into())
    }

    fn generated_date(&self, set: &AlignmentSet) -> String {
        self.timestamp
            .as_deref()
            .or(set.timestamp())
            .map(str::to_string)
            .unwrap_or_else(|| Local::now().format(TIMESTAMP_FORMAT).to_string())
    }
}
