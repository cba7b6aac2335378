//! Row stream parser.
//!
//! Walks one table of rows through the [`classify`] rules and builds an
//! [`Alignment`]. The parser is in one of two states: before the first
//! `Element:` row (header rows and fallbacks apply) or inside an element
//! (station and property rows attach to the open element). Rows that cannot
//! be used are reported as warnings and skipped; parsing never fails.

use log::trace;

use geotable_core::{
    model::{Alignment, Element, StationPoint},
    station,
};

use crate::{
    classifier::{RowKind, classify, number},
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    row::{Row, RowRef},
};

/// Parse one table of rows into an alignment.
///
/// `table` is the index used in diagnostic labels.
pub(crate) fn parse_table(
    table: usize,
    rows: &[Row],
    diagnostics: &mut DiagnosticCollector,
) -> Alignment {
    let mut parser = TableParser::new(table, diagnostics);
    for (index, row) in rows.iter().enumerate() {
        parser.consume(index, row);
    }
    parser.finish()
}

/// An element being filled, with the row that opened it.
struct OpenElement {
    element: Element,
    header: RowRef,
}

struct TableParser<'a> {
    table: usize,
    alignment: Alignment,
    open: Option<OpenElement>,
    diagnostics: &'a mut DiagnosticCollector,
}

impl<'a> TableParser<'a> {
    fn new(table: usize, diagnostics: &'a mut DiagnosticCollector) -> Self {
        Self {
            table,
            alignment: Alignment::new(),
            open: None,
            diagnostics,
        }
    }

    fn consume(&mut self, index: usize, row: &Row) {
        let at = RowRef::new(self.table, index);
        let kind = classify(row, self.open.is_some());
        trace!(row:% = at, kind:? = kind; "Classified row");

        match kind {
            RowKind::Blank | RowKind::ColumnHeader => {}
            RowKind::ProjectName(value) => self.alignment.set_project_name(value),
            RowKind::HorizontalName(value) => {
                self.alignment.set_horizontal_alignment(value);
                if self.alignment.has_default_name() {
                    self.alignment.set_name(value);
                }
            }
            RowKind::VerticalName(value) => self.alignment.set_vertical_alignment(value),
            RowKind::Style(value) => self.alignment.set_style(value),
            RowKind::Description(value) => self.alignment.set_description(value),
            RowKind::ElementHeader(element_type) => {
                self.close_element();
                self.open = Some(OpenElement {
                    element: Element::new(element_type),
                    header: at,
                });
            }
            RowKind::Station {
                point_type,
                station,
                elevation,
            } => self.station(at, point_type, station, elevation),
            RowKind::Property { name, value } => {
                if let Some(open) = self.open.as_mut() {
                    open.element.insert_property(name, value);
                }
            }
            RowKind::Length(value) => {
                if let Some(length) = self.header_number(at, row, value, "length", number) {
                    self.alignment.set_length(length);
                }
            }
            RowKind::StartStation(value) => {
                if let Some(start) =
                    self.header_number(at, row, value, "start station", station_number)
                {
                    self.alignment.set_start_station(start);
                }
            }
            RowKind::EndStation(value) => {
                if let Some(end) = self.header_number(at, row, value, "end station", station_number)
                {
                    self.alignment.set_end_station(end);
                }
            }
            RowKind::Id(value) => self.alignment.set_id(value),
            RowKind::Unclassified => self.unclassified(at, row),
        }
    }

    fn station(&mut self, at: RowRef, point_type: &str, text: &str, elevation: f64) {
        let Some(open) = self.open.as_mut() else {
            return;
        };

        let value = match station::try_parse(text) {
            Ok(value) => value,
            Err(err) => {
                self.diagnostics.emit(
                    Diagnostic::warning(format!("station `{text}` is not a number"))
                        .with_code(ErrorCode::E002)
                        .with_label(at, err.to_string())
                        .with_secondary_label(open.header, "in this element")
                        .with_help("the station was read as 0.00; write it as `H+RR.rr` or a decimal"),
                );
                station::parse(text)
            }
        };

        open.element
            .push_station(StationPoint::new(point_type, value).with_elevation(elevation));
    }

    fn header_number(
        &mut self,
        at: RowRef,
        row: &Row,
        value: &str,
        field: &str,
        read: fn(&str) -> Option<f64>,
    ) -> Option<f64> {
        let parsed = read(value);
        if parsed.is_none() {
            self.diagnostics.emit(
                Diagnostic::warning(format!("`{}` value `{value}` is not a number", row.label()))
                    .with_code(ErrorCode::E003)
                    .with_label(at, "header value")
                    .with_help(format!("the alignment {field} was left unchanged")),
            );
        }
        parsed
    }

    fn unclassified(&mut self, at: RowRef, row: &Row) {
        let help = if self.open.is_some() {
            "rows inside an element need a label and a value"
        } else {
            "rows before the first `Element:` row must be header rows"
        };
        self.diagnostics.emit(
            Diagnostic::warning(format!("row `{row}` matches no rule"))
                .with_code(ErrorCode::E001)
                .with_label(at, "discarded")
                .with_help(help),
        );
    }

    fn close_element(&mut self) {
        if let Some(open) = self.open.take() {
            self.alignment.push_element(open.element);
        }
    }

    fn finish(mut self) -> Alignment {
        self.close_element();
        self.alignment.derive_samples();
        self.alignment
    }
}

fn station_number(text: &str) -> Option<f64> {
    station::try_parse(text).ok()
}
