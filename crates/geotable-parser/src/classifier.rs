//! Row classification rules.
//!
//! A geotable export has no grammar markers: whether a row is metadata, an
//! element header, a station point or a property is decided from its cells
//! and from whether an element is currently open. [`classify`] applies the
//! rules in a fixed order and the first match wins.

use crate::row::Row;

/// Prefix of an element header row, matched case-insensitively.
const ELEMENT_PREFIX: &str = "element:";

/// What a row means to the parser.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum RowKind<'a> {
    /// Every cell is empty.
    Blank,
    /// `["", "STATION", ...]` or `["", "NORTHING", ...]`.
    ColumnHeader,
    ProjectName(&'a str),
    HorizontalName(&'a str),
    VerticalName(&'a str),
    Style(&'a str),
    Description(&'a str),
    /// `Element: <type>`; carries the trimmed type.
    ElementHeader(&'a str),
    Station {
        point_type: &'a str,
        station: &'a str,
        elevation: f64,
    },
    Property {
        name: &'a str,
        value: &'a str,
    },
    Length(&'a str),
    StartStation(&'a str),
    EndStation(&'a str),
    Id(&'a str),
    /// Matches no rule.
    Unclassified,
}

/// Classify a row.
///
/// Header rules apply anywhere in the stream. Station and property rules
/// apply only while an element is open, and the station rule is tried first.
/// Header fallbacks (length, start/end station, id) apply only before the
/// first element.
pub(crate) fn classify(row: &Row, element_open: bool) -> RowKind<'_> {
    let label = row.label();
    let value = row.value();
    let key = normalize(label);

    if row.is_blank() {
        return RowKind::Blank;
    }

    if label.is_empty()
        && (value.eq_ignore_ascii_case("STATION") || value.eq_ignore_ascii_case("NORTHING"))
    {
        return RowKind::ColumnHeader;
    }

    if key.contains("project name") {
        return RowKind::ProjectName(value);
    }
    if key.contains("horizontal alignment name") {
        return RowKind::HorizontalName(value);
    }
    if key.contains("vertical alignment name") {
        return RowKind::VerticalName(value);
    }
    if key == "style" {
        return RowKind::Style(value);
    }
    if key == "description" {
        return RowKind::Description(value);
    }

    if let Some(element_type) = element_type(label) {
        return RowKind::ElementHeader(element_type);
    }

    if element_open {
        let elevation = row.third().and_then(number);
        if let Some(elevation) = elevation.filter(|_| !value.is_empty()) {
            return RowKind::Station {
                point_type: label,
                station: value,
                elevation,
            };
        }
        if !label.is_empty() && !value.is_empty() {
            return RowKind::Property { name: label, value };
        }
        return RowKind::Unclassified;
    }

    if value.is_empty() {
        return RowKind::Unclassified;
    }
    if key.contains("length") {
        RowKind::Length(value)
    } else if key.contains("start") && key.contains("station") {
        RowKind::StartStation(value)
    } else if key.contains("end") && key.contains("station") {
        RowKind::EndStation(value)
    } else if key == "id" || key.ends_with(" id") {
        RowKind::Id(value)
    } else {
        RowKind::Unclassified
    }
}

/// Lower-cased label without a trailing colon.
fn normalize(label: &str) -> String {
    label
        .trim()
        .trim_end_matches(':')
        .trim_end()
        .to_lowercase()
}

/// Type of an `Element:` row: the text after the colon, trimmed.
fn element_type(label: &str) -> Option<&str> {
    let prefix = label.get(..ELEMENT_PREFIX.len())?;
    if prefix.eq_ignore_ascii_case(ELEMENT_PREFIX) {
        label.get(ELEMENT_PREFIX.len()..).map(str::trim)
    } else {
        None
    }
}

/// A finite decimal number.
pub(crate) fn number(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
