//! Report formats and render results.

use std::{
    fmt::{self, Display},
    path::{Path, PathBuf},
    str::FromStr,
};

use thiserror::Error;

/// Output representation requested by the caller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    /// Structured XML document (default)
    #[default]
    Markup,
    /// Printable PDF document
    Paginated,
    /// Fixed-width plain text
    Text,
}

/// A format name that is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported report format `{0}`; expected markup, paginated or text")]
pub struct UnknownFormat(String);

impl FromStr for ReportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markup" | "xml" => Ok(Self::Markup),
            "paginated" | "pdf" => Ok(Self::Paginated),
            "text" | "txt" => Ok(Self::Text),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

impl From<ReportFormat> for &'static str {
    fn from(val: ReportFormat) -> Self {
        match val {
            ReportFormat::Markup => "markup",
            ReportFormat::Paginated => "paginated",
            ReportFormat::Text => "text",
        }
    }
}

impl Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// A rendered report document.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Markup(String),
    Paginated(Vec<u8>),
    Text(String),
}

impl Rendered {
    /// Format of the document actually produced.
    pub fn format(&self) -> ReportFormat {
        match self {
            Self::Markup(_) => ReportFormat::Markup,
            Self::Paginated(_) => ReportFormat::Paginated,
            Self::Text(_) => ReportFormat::Text,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Markup(text) | Self::Text(text) => text.as_bytes(),
            Self::Paginated(bytes) => bytes,
        }
    }

    /// The document as text, unless it is a paginated document.
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Markup(text) | Self::Text(text) => Some(text),
            Self::Paginated(_) => None,
        }
    }
}

/// Where a report was written and in which format.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    requested: ReportFormat,
    written: ReportFormat,
    path: PathBuf,
}

impl WriteOutcome {
    pub(crate) fn new(requested: ReportFormat, written: ReportFormat, path: PathBuf) -> Self {
        Self {
            requested,
            written,
            path,
        }
    }

    pub fn requested(&self) -> ReportFormat {
        self.requested
    }

    pub fn written(&self) -> ReportFormat {
        self.written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a paginated request fell back to plain text.
    pub fn is_fallback(&self) -> bool {
        self.requested != self.written
    }
}

impl Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.written {
            ReportFormat::Markup => "XML",
            ReportFormat::Paginated => "PDF",
            ReportFormat::Text => "TEXT",
        };
        write!(f, "{kind} report saved to: {}", self.path.display())?;

        if self.requested == ReportFormat::Paginated {
            let mode = if self.is_fallback() {
                "TEXT mode (paginated backend not available)"
            } else {
                "PDF mode (paginated backend available)"
            };
            write!(f, "\n({mode})")?;
        }
        Ok(())
    }
}

/// Output path for a rendered document.
///
/// Paginated requests always end in `.pdf`, or `.txt` when they fell back to
/// text. Other formats keep the path as given.
pub(crate) fn output_path(path: &Path, requested: ReportFormat, written: ReportFormat) -> PathBuf {
    match (requested, written) {
        (ReportFormat::Paginated, ReportFormat::Paginated) => path.with_extension("pdf"),
        (ReportFormat::Paginated, _) => path.with_extension("txt"),
        _ => path.to_path_buf(),
    }
}
