//! Report layout shared by every backend.
//!
//! The markup, text and paginated backends walk an alignment in the same
//! order (header fields, then each element with its station points and its
//! properties) and format numbers the same way. Everything that decides
//! *what* a report shows lives here; the backends only decide *where*.

use geotable_core::{
    model::{Alignment, Element, StationPoint, UNKNOWN_NAME},
    orientation::Layout,
    station,
};

/// Width of the point-type and property-name column.
pub const LABEL_WIDTH: usize = 36;
/// Width of every value column.
pub const VALUE_WIDTH: usize = 15;
/// Indentation of rows under an `Element:` line.
pub const ROW_INDENT: usize = 4;

/// Style shown when an alignment has none.
const DEFAULT_STYLE: &str = "Default";

/// One `Label: value` line of the report header.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderLine {
    indent: usize,
    label: &'static str,
    value: String,
}

impl HeaderLine {
    fn new(indent: usize, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            indent,
            label,
            value: value.into(),
        }
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Header block of one alignment.
///
/// The horizontal and vertical blocks appear only when the alignment names
/// them.
pub fn header_lines(alignment: &Alignment) -> Vec<HeaderLine> {
    let project_name = non_empty(alignment.project_name()).unwrap_or(UNKNOWN_NAME);
    let style = non_empty(alignment.style()).unwrap_or(DEFAULT_STYLE);

    let mut lines = vec![
        HeaderLine::new(0, "Project Name:", project_name),
        HeaderLine::new(3, "Description:", alignment.description()),
    ];

    let named_blocks = [
        ("Horizontal Alignment Name:", alignment.horizontal_alignment()),
        ("Vertical Alignment Name:", alignment.vertical_alignment()),
    ];
    for (label, name) in named_blocks {
        if name.is_empty() {
            continue;
        }
        lines.push(HeaderLine::new(0, label, name));
        lines.push(HeaderLine::new(3, "Description:", ""));
        lines.push(HeaderLine::new(8, "Style:", style));
    }

    lines
}

/// Value column titles for a layout.
pub fn columns(layout: Layout) -> &'static [&'static str] {
    match layout {
        Layout::Vertical => &["STATION", "ELEVATION"],
        Layout::Horizontal => &["STATION", "NORTHING", "EASTING"],
    }
}

/// A row of an element table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRow<'a> {
    /// A station point; one cell per [`columns`] entry. Missing values are
    /// empty cells.
    Station {
        point_type: &'a str,
        cells: Vec<String>,
    },
    Property {
        name: &'a str,
        value: &'a str,
    },
}

/// Rows of an element table: station points in reading order, then
/// properties in insertion order.
pub fn element_rows(element: &Element, layout: Layout) -> Vec<TableRow<'_>> {
    let stations = element.stations().iter().map(|point| TableRow::Station {
        point_type: point.point_type(),
        cells: station_cells(point, layout),
    });
    let properties = element
        .properties()
        .iter()
        .map(|(name, value)| TableRow::Property { name, value });

    stations.chain(properties).collect()
}

/// Cells of a station point under the given layout.
///
/// Northing is `y` and easting is `x`.
pub fn station_cells(point: &StationPoint, layout: Layout) -> Vec<String> {
    let station = station::format(point.station());
    match layout {
        Layout::Vertical => vec![station, point.elevation().map(elevation).unwrap_or_default()],
        Layout::Horizontal => vec![station, planar(point.y()), planar(point.x())],
    }
}

/// Elevation, 2 decimals.
pub fn elevation(value: f64) -> String {
    format!("{value:.2}")
}

/// Planar coordinate, 4 decimals.
pub fn planar(value: f64) -> String {
    format!("{value:.4}")
}

/// Length, radius or offset, 3 decimals.
pub fn length(value: f64) -> String {
    format!("{value:.3}")
}

/// Direction or bearing, 6 decimals.
pub fn angle(value: f64) -> String {
    format!("{value:.6}")
}

/// Cross slope, 4 decimals.
pub fn slope(value: f64) -> String {
    format!("{value:.4}")
}

fn non_empty(text: &str) -> Option<&str> {
    (!text.is_empty()).then_some(text)
}
