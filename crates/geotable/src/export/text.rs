//! Fixed-width plain-text report backend.
//!
//! Also the fallback for paginated reports when that backend is not built in.

use std::fmt::Write;

use log::debug;

use geotable_core::{
    model::{Alignment, AlignmentSet},
    orientation::Orientation,
};

use crate::export::{
    self, Exporter,
    layout::{self, LABEL_WIDTH, ROW_INDENT, TableRow, VALUE_WIDTH},
};

/// Plain-text exporter.
///
/// Each alignment is laid out as:
///
/// ```text
/// Project Name: Codman_Final
///    Description:
/// ...
///
///                                                  STATION       ELEVATION
///
/// Element: Linear
///     POB                                        641+44.67           42.97
///     Tangent Grade:                                -2.411
/// ```
///
/// Alignments follow each other separated by a blank line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Text {
    orientation: Orientation,
}

impl Text {
    pub fn new(orientation: Orientation) -> Self {
        Self { orientation }
    }

    fn write_alignment(&self, out: &mut String, alignment: &Alignment) -> std::fmt::Result {
        let layout = self.orientation.resolve(alignment);

        for line in layout::header_lines(alignment) {
            let indent = line.indent();
            let text = format!("{:indent$}{} {}", "", line.label(), line.value());
            writeln!(out, "{}", text.trim_end())?;
        }
        writeln!(out)?;

        write!(out, "{:width$}", "", width = ROW_INDENT + LABEL_WIDTH)?;
        for column in layout::columns(layout) {
            write!(out, " {column:>VALUE_WIDTH$}")?;
        }
        writeln!(out)?;
        writeln!(out)?;

        for element in alignment.elements() {
            writeln!(out, "Element: {}", element.element_type())?;
            for row in layout::element_rows(element, layout) {
                let mut line = String::new();
                match row {
                    TableRow::Station { point_type, cells } => {
                        write!(line, "{:ROW_INDENT$}{point_type:<LABEL_WIDTH$}", "")?;
                        for cell in cells {
                            write!(line, " {cell:>VALUE_WIDTH$}")?;
                        }
                    }
                    TableRow::Property { name, value } => {
                        write!(line, "{:ROW_INDENT$}{name:<LABEL_WIDTH$}", "")?;
                        write!(line, " {value:>VALUE_WIDTH$}")?;
                    }
                }
                writeln!(out, "{}", line.trim_end())?;
            }
            writeln!(out)?;
        }

        Ok(())
    }
}

impl Exporter for Text {
    type Output = String;

    fn export_alignments(&mut self, set: &AlignmentSet) -> Result<String, export::Error> {
        let mut out = String::new();
        for (index, alignment) in set.alignments().iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            self.write_alignment(&mut out, alignment)?;
        }

        debug!(alignments = set.len(), bytes = out.len(); "Rendered text report");
        Ok(out)
    }
}
