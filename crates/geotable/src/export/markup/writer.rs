//! Indenting XML writer on top of `quick_xml`.

use std::borrow::Cow;

use quick_xml::{
    Writer,
    escape::partial_escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::export::Error;

/// Streams elements into a buffer, indenting one level per open element.
pub struct XmlWriter {
    inner: Writer<Vec<u8>>,
    open: Vec<&'static str>,
}

impl XmlWriter {
    /// Starts a document with the XML declaration.
    pub fn new(indent: usize) -> Result<Self, Error> {
        let mut writer = Self {
            inner: Writer::new_with_indent(Vec::new(), b' ', indent),
            open: Vec::new(),
        };
        writer.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(writer)
    }

    /// Opens an element that will hold children.
    pub fn open(&mut self, name: &'static str, attrs: &[(&str, &str)]) -> Result<(), Error> {
        self.write(Event::Start(start(name, attrs)))?;
        self.open.push(name);
        Ok(())
    }

    /// Closes the innermost open element.
    pub fn close(&mut self) -> Result<(), Error> {
        let name = self
            .open
            .pop()
            .ok_or_else(|| Error::Render("no open element to close".to_string()))?;
        self.write(Event::End(BytesEnd::new(name)))
    }

    /// Writes an element holding only text. Empty text self-closes.
    pub fn leaf(
        &mut self,
        name: &'static str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> Result<(), Error> {
        if text.is_empty() {
            return self.write(Event::Empty(start(name, attrs)));
        }
        self.write(Event::Start(start(name, attrs)))?;
        let text = xml_chars(text);
        self.write(Event::Text(BytesText::from_escaped(partial_escape(&*text))))?;
        self.write(Event::End(BytesEnd::new(name)))
    }

    /// Returns the document. Fails if an element is still open.
    pub fn finish(self) -> Result<String, Error> {
        if let Some(name) = self.open.last() {
            return Err(Error::Render(format!("element `{name}` is still open")));
        }
        let mut bytes = self.inner.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(|err| Error::Render(err.to_string()))
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), Error> {
        self.inner
            .write_event(event)
            .map_err(|err| Error::Render(err.to_string()))
    }
}

fn start<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for (key, value) in attrs {
        start.push_attribute((*key, &*xml_chars(value)));
    }
    start
}

/// Drops characters that XML 1.0 does not allow in a document.
fn xml_chars(text: &str) -> Cow<'_, str> {
    let allowed = |ch: char| {
        matches!(ch, '\t' | '\n' | '\r')
            || (ch >= ' ' && !matches!(ch, '\u{FFFE}' | '\u{FFFF}'))
    };
    if text.chars().all(allowed) {
        text.into()
    } else {
        text.chars().filter(|&ch| allowed(ch)).collect::<String>().into()
    }
}
