//! Paginated PDF report backend.
//!
//! Lays the same content as the text report out on US Letter pages: a
//! titled header block followed by one table per element. Vertical reports
//! are portrait and horizontal reports landscape. Tables are set in Courier,
//! so columns line up the same way they do in the text report.
//!
//! A new page starts for every alignment, and between elements when the next
//! element table does not fit in the space left. Tables longer than a page
//! continue on the next one with the column header repeated.

use encoding_rs::WINDOWS_1252;
use log::debug;
use lopdf::{
    Document, Object, ObjectId, Stream, StringFormat,
    content::{Content, Operation},
    dictionary,
};

use geotable_core::{
    model::{Alignment, AlignmentSet},
    orientation::{Layout, Orientation},
};

use crate::{
    config::PageConfig,
    export::{
        self, Exporter,
        layout::{self, LABEL_WIDTH, ROW_INDENT, TableRow, VALUE_WIDTH},
    },
};

/// US Letter, portrait, in points.
const LETTER: (f32, f32) = (612.0, 792.0);
/// Courier advance width per point of font size.
const COURIER_ADVANCE: f32 = 0.6;
/// Line height per point of font size.
const LEADING: f32 = 1.4;

/// Title printed above each alignment.
const TITLE: &str = "Alignment Geotable Report";

#[derive(Debug, Clone, Copy)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }
}

/// A finished page: its size and content operations.
struct Page {
    width: f32,
    height: f32,
    operations: Vec<Operation>,
}

/// Places lines of text top to bottom, breaking pages as needed.
struct PageCursor {
    margin: f32,
    font_size: f32,
    width: f32,
    height: f32,
    y: f32,
    operations: Vec<Operation>,
    pages: Vec<Page>,
}

impl PageCursor {
    fn new(config: &PageConfig) -> Self {
        Self {
            margin: config.margin(),
            font_size: config.font_size(),
            width: LETTER.0,
            height: LETTER.1,
            y: LETTER.1 - config.margin(),
            operations: Vec::new(),
            pages: Vec::new(),
        }
    }

    fn line_height(&self) -> f32 {
        self.font_size * LEADING
    }

    fn char_width(&self) -> f32 {
        self.font_size * COURIER_ADVANCE
    }

    /// Finishes the current page, if it has content, and starts a new one.
    fn new_page(&mut self, layout: Layout) {
        self.flush();
        (self.width, self.height) = if layout.is_horizontal() {
            (LETTER.1, LETTER.0)
        } else {
            LETTER
        };
        self.y = self.height - self.margin;
    }

    /// Lines that still fit on the current page.
    fn remaining_lines(&self) -> usize {
        let room = (self.y - self.margin) / self.line_height();
        if room < 1.0 { 0 } else { room as usize }
    }

    fn is_fresh(&self) -> bool {
        self.operations.is_empty()
    }

    fn text(&mut self, column: usize, font: Font, size: f32, text: &str) {
        if text.is_empty() {
            return;
        }
        let x = self.margin + column as f32 * self.char_width();
        let baseline = self.y - size;
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.resource().into(), size.into()]),
            Operation::new("Td", vec![x.into(), baseline.into()]),
            Operation::new("Tj", vec![Object::String(win_ansi(text), StringFormat::Literal)]),
            Operation::new("ET", vec![]),
        ]);
    }

    /// Writes `text` so that it ends at `end_column`.
    fn text_right(&mut self, end_column: usize, font: Font, text: &str) {
        let column = end_column.saturating_sub(text.chars().count());
        self.text(column, font, self.font_size, text);
    }

    /// A thin rule under the current line, `columns` characters wide.
    fn rule(&mut self, columns: usize) {
        let y = self.y - self.line_height() + 1.0;
        let x_end = self.margin + columns as f32 * self.char_width();
        self.operations.extend([
            Operation::new("w", vec![0.5_f32.into()]),
            Operation::new("m", vec![self.margin.into(), y.into()]),
            Operation::new("l", vec![x_end.into(), y.into()]),
            Operation::new("S", vec![]),
        ]);
    }

    fn advance(&mut self, lines: f32) {
        self.y -= self.line_height() * lines;
    }

    fn flush(&mut self) {
        if self.operations.is_empty() {
            return;
        }
        self.pages.push(Page {
            width: self.width,
            height: self.height,
            operations: std::mem::take(&mut self.operations),
        });
    }

    fn finish(mut self) -> Vec<Page> {
        self.flush();
        self.pages
    }
}

/// Paginated exporter.
#[derive(Debug)]
pub struct Paginated<'a> {
    config: &'a PageConfig,
    orientation: Orientation,
}

impl<'a> Paginated<'a> {
    pub fn new(config: &'a PageConfig, orientation: Orientation) -> Self {
        Self {
            config,
            orientation,
        }
    }

    fn write_alignment(&self, cursor: &mut PageCursor, alignment: &Alignment) {
        let layout = self.orientation.resolve(alignment);
        cursor.new_page(layout);

        let title_size = cursor.font_size + 4.0;
        cursor.text(0, Font::Bold, title_size, TITLE);
        cursor.y -= title_size * LEADING;
        cursor.text(0, Font::Regular, cursor.font_size, alignment.name());
        cursor.advance(2.0);

        for line in layout::header_lines(alignment) {
            cursor.text(line.indent(), Font::Bold, cursor.font_size, line.label());
            let value_column = line.indent() + line.label().len() + 1;
            cursor.text(value_column, Font::Regular, cursor.font_size, line.value());
            cursor.advance(1.0);
        }
        cursor.advance(1.0);

        let mut needs_columns = true;
        for element in alignment.elements() {
            let rows = layout::element_rows(element, layout);
            // Element line, rows and the gap after them.
            let height = rows.len() + 2;
            let header_height = if needs_columns { 2 } else { 0 };
            if !cursor.is_fresh() && height + header_height > cursor.remaining_lines() {
                cursor.new_page(layout);
                needs_columns = true;
            }
            if needs_columns {
                write_columns(cursor, layout);
                needs_columns = false;
            }

            let title = format!("Element: {}", element.element_type());
            cursor.text(0, Font::Bold, cursor.font_size, &title);
            cursor.advance(1.0);

            for row in rows {
                if cursor.remaining_lines() == 0 {
                    cursor.new_page(layout);
                    write_columns(cursor, layout);
                }
                write_row(cursor, &row);
                cursor.advance(1.0);
            }
            cursor.advance(1.0);
        }
    }
}

/// Encodes `text` for the WinAnsi fonts. Characters outside the code page
/// become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        let (encoded, _, unmappable) = WINDOWS_1252.encode(ch.encode_utf8(&mut buf));
        if unmappable {
            bytes.push(b'?');
        } else {
            bytes.extend_from_slice(&encoded);
        }
    }
    bytes
}

/// Column titles with a rule beneath, aligned like the text report.
fn write_columns(cursor: &mut PageCursor, layout: Layout) {
    let columns = layout::columns(layout);
    let mut end = ROW_INDENT + LABEL_WIDTH;
    for column in columns {
        end += 1 + VALUE_WIDTH;
        cursor.text_right(end, Font::Bold, column);
    }
    cursor.rule(end);
    cursor.advance(2.0);
}

fn write_row(cursor: &mut PageCursor, row: &TableRow<'_>) {
    let mut end = ROW_INDENT + LABEL_WIDTH;
    match row {
        TableRow::Station { point_type, cells } => {
            cursor.text(ROW_INDENT, Font::Regular, cursor.font_size, point_type);
            for cell in cells {
                end += 1 + VALUE_WIDTH;
                cursor.text_right(end, Font::Regular, cell);
            }
        }
        TableRow::Property { name, value } => {
            cursor.text(ROW_INDENT, Font::Regular, cursor.font_size, name);
            cursor.text_right(end + 1 + VALUE_WIDTH, Font::Regular, value);
        }
    }
}

/// Assembles the page tree around the rendered pages.
fn build_document(pages: Vec<Page>) -> Result<Document, export::Error> {
    let mut doc = Document::with_version("1.5");

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = Content {
            operations: page.operations,
        };
        let bytes = content
            .encode()
            .map_err(|err| export::Error::Render(err.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, bytes));

        let media_box = vec![
            Object::Integer(0),
            Object::Integer(0),
            page.width.into(),
            page.height.into(),
        ];
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box,
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => Object::Reference(regular_id),
                    "F2" => Object::Reference(bold_id),
                },
            },
        }));
    }

    let count = page_ids.len() as i64;
    let kids: Vec<Object> = page_ids.iter().copied().map(Object::Reference).collect();
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(count),
    });

    for page_id in page_ids {
        let dict = doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|err| export::Error::Render(err.to_string()))?;
        dict.set("Parent", Object::Reference(pages_id));
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    Ok(doc)
}

impl Exporter for Paginated<'_> {
    type Output = Vec<u8>;

    fn export_alignments(&mut self, set: &AlignmentSet) -> Result<Vec<u8>, export::Error> {
        let mut cursor = PageCursor::new(self.config);
        for alignment in set.alignments() {
            self.write_alignment(&mut cursor, alignment);
        }
        let pages = cursor.finish();
        let page_count = pages.len();

        let mut doc = build_document(pages)?;
        let mut buf = Vec::new();
        doc.save_to(&mut buf)
            .map_err(|err| export::Error::Render(err.to_string()))?;

        debug!(pages = page_count, bytes = buf.len(); "Rendered paginated report");
        Ok(buf)
    }
}
