//! Configuration types for geotable report rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file; every field is optional and falls back to its default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining markup and page settings.
//! - [`MarkupConfig`] - Namespace, report type and indentation of markup reports.
//! - [`PageConfig`] - Font size and margin of paginated reports.
//!
//! # Example
//!
//! ```
//! # use geotable::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.markup().indent(), 2);
//! assert_eq!(config.page().font_size(), 8.0);
//! ```

use serde::Deserialize;

/// Default markup namespace.
pub const DEFAULT_NAMESPACE: &str = "http://civil3d.autodesk.com/geotable";
/// Default markup report type.
pub const DEFAULT_REPORT_TYPE: &str = "Rail Alignment Geotable";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Markup report section.
    #[serde(default)]
    markup: MarkupConfig,

    /// Paginated report section.
    #[serde(default)]
    page: PageConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(markup: MarkupConfig, page: PageConfig) -> Self {
        Self { markup, page }
    }

    /// Returns the markup configuration.
    pub fn markup(&self) -> &MarkupConfig {
        &self.markup
    }

    /// Returns the page configuration.
    pub fn page(&self) -> &PageConfig {
        &self.page
    }
}

/// Settings of the markup renderer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    namespace: String,
    report_type: String,
    indent: usize,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            report_type: DEFAULT_REPORT_TYPE.to_string(),
            indent: 2,
        }
    }
}

impl MarkupConfig {
    pub fn new(namespace: impl Into<String>, report_type: impl Into<String>, indent: usize) -> Self {
        Self {
            namespace: namespace.into(),
            report_type: report_type.into(),
            indent,
        }
    }

    /// Namespace written on the root element.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Text of `ProjectInfo/ReportType`.
    pub fn report_type(&self) -> &str {
        &self.report_type
    }

    /// Spaces per nesting level.
    pub fn indent(&self) -> usize {
        self.indent
    }
}

/// Settings of the paginated renderer.
///
/// Sizes are in points (1/72 inch).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    font_size: f32,
    margin: f32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            font_size: 8.0,
            margin: 36.0,
        }
    }
}

impl PageConfig {
    pub fn new(font_size: f32, margin: f32) -> Self {
        Self { font_size, margin }
    }

    /// Table font size.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Page margin on every side.
    pub fn margin(&self) -> f32 {
        self.margin
    }
}
