//! A pull cursor over an existing LDML document.
//!
//! Writing a record file regenerates the modeled elements but has to carry
//! everything else through from the previous file in document order. The
//! cursor keeps one event of lookahead so the writer can compare the next
//! element against the one it is about to regenerate and copy nodes up to
//! that point.

use std::cmp::Ordering;
use std::io::Write;
use std::mem;
use std::str;

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::ldml::order;
use crate::ldml::LdmlError;

pub struct LdmlCursor<'a> {
    reader: Reader<&'a [u8]>,
    current: Event<'a>,
}

impl<'a> LdmlCursor<'a> {
    pub fn new(input: &'a str) -> Result<Self, LdmlError> {
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(true);
        let current = reader.read_event()?;
        Ok(LdmlCursor { reader, current })
    }

    /// The event the cursor is holding.
    pub fn current(&self) -> &Event<'a> {
        &self.current
    }

    /// Consume the held event and pull the next one.
    pub fn advance(&mut self) -> Result<Event<'a>, LdmlError> {
        let next = match self.current {
            Event::Eof => Event::Eof,
            _ => self.reader.read_event()?,
        };
        Ok(mem::replace(&mut self.current, next))
    }

    /// The name of the element the cursor is on, if it is on one.
    pub fn element_name(&self) -> Option<&str> {
        match &self.current {
            Event::Start(e) | Event::Empty(e) => str::from_utf8(e.name().into_inner()).ok(),
            _ => None,
        }
    }

    pub fn at_element(&self, name: &str) -> bool {
        self.element_name() == Some(name)
    }

    /// Whether the cursor has reached the end of the current element or of
    /// the document.
    pub fn at_end(&self) -> bool {
        matches!(self.current, Event::End(_) | Event::Eof)
    }

    /// Skip past the document prolog and the start tag of `root`, leaving
    /// the cursor on the first node inside it.
    pub fn enter_document(&mut self, root: &str) -> Result<(), LdmlError> {
        loop {
            match &self.current {
                Event::Start(e) if e.name().as_ref() == root.as_bytes() => {
                    self.advance()?;
                    return Ok(());
                }
                Event::Empty(e) if e.name().as_ref() == root.as_bytes() => {
                    self.current = Event::Eof;
                    return Ok(());
                }
                Event::Eof => {
                    return Err(LdmlError::malformed(format!("no {root} element")));
                }
                Event::Decl(_) | Event::DocType(_) | Event::PI(_) | Event::Comment(_)
                | Event::Text(_) | Event::CData(_) => {
                    self.advance()?;
                }
                _ => {
                    return Err(LdmlError::malformed(format!("expected a {root} element")));
                }
            }
        }
    }

    /// Consume the held node, subtree included, writing nothing.
    pub fn skip(&mut self) -> Result<(), LdmlError> {
        if self.at_end() {
            return Ok(());
        }
        match self.advance()? {
            Event::Start(_) => {
                let mut depth = 1usize;
                while depth > 0 {
                    match self.advance()? {
                        Event::Start(_) => depth += 1,
                        Event::End(_) => depth -= 1,
                        Event::Eof => {
                            return Err(LdmlError::malformed("unexpected end of file"));
                        }
                        _ => {}
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Copy the held node, subtree included, to `writer`.
    pub fn copy_node<W: Write>(&mut self, writer: &mut Writer<W>) -> Result<(), LdmlError> {
        if self.at_end() {
            return Ok(());
        }
        match self.advance()? {
            Event::Start(e) => {
                writer.write_event(Event::Start(e))?;
                let mut depth = 1usize;
                while depth > 0 {
                    let event = self.advance()?;
                    match &event {
                        Event::Start(_) => depth += 1,
                        Event::End(_) => depth -= 1,
                        Event::Eof => {
                            return Err(LdmlError::malformed("unexpected end of file"));
                        }
                        _ => {}
                    }
                    writer.write_event(event)?;
                }
                Ok(())
            }
            event => {
                writer.write_event(event)?;
                Ok(())
            }
        }
    }

    /// Copy nodes to `writer` until the cursor reaches an element that does
    /// not sort before `target`, or the end of the current element.
    /// Comments and text on the way are copied as well.
    pub fn copy_until<W: Write>(
        &mut self,
        writer: &mut Writer<W>,
        target: &str,
    ) -> Result<(), LdmlError> {
        loop {
            if self.at_end() {
                return Ok(());
            }
            if let Some(name) = self.element_name() {
                if order::compare_element_names(name, target) != Ordering::Less {
                    return Ok(());
                }
            }
            self.copy_node(writer)?;
        }
    }

    /// Advance to the next element that does not sort before `target`,
    /// dropping everything on the way. Returns whether the cursor ended up
    /// on `target` itself.
    pub fn find_element(&mut self, target: &str) -> Result<bool, LdmlError> {
        loop {
            if self.at_end() {
                return Ok(false);
            }
            if let Some(name) = self.element_name() {
                if order::compare_element_names(name, target) != Ordering::Less {
                    return Ok(name == target);
                }
            }
            self.skip()?;
        }
    }

    /// Consume the end tag of the enclosing element if the cursor has
    /// reached it.
    pub fn leave(&mut self) -> Result<(), LdmlError> {
        if matches!(self.current, Event::End(_)) {
            self.advance()?;
        }
        Ok(())
    }

    /// Copy every remaining node of the current element to `writer`.
    pub fn copy_to_end<W: Write>(&mut self, writer: &mut Writer<W>) -> Result<(), LdmlError> {
        while !self.at_end() {
            self.copy_node(writer)?;
        }
        Ok(())
    }
}

/// Look up one attribute of an element by name.
pub(crate) fn attribute_value(e: &BytesStart, name: &str) -> Result<Option<String>, LdmlError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn copy_all(input: &str) -> String {
        let mut cursor = LdmlCursor::new(input).expect("Should open");
        cursor.enter_document("ldml").expect("Should find root");
        let mut buf = Vec::new();
        let mut writer = Writer::new(&mut buf);
        cursor.copy_to_end(&mut writer).expect("Should copy");
        String::from_utf8(buf).expect("Should be UTF-8")
    }

    #[test]
    fn copies_subtrees_and_comments() {
        let input = "<?xml version=\"1.0\"?>\n<ldml><!-- note --><identity><language type=\"en\"/></identity></ldml>";
        assert_eq!(
            copy_all(input),
            "<!-- note --><identity><language type=\"en\"/></identity>"
        );
    }

    #[test]
    fn copy_until_stops_at_the_target_and_later_elements() {
        let input = "<ldml><identity/><layout/><collations/></ldml>";
        let mut cursor = LdmlCursor::new(input).expect("Should open");
        cursor.enter_document("ldml").expect("Should find root");
        let mut buf = Vec::new();
        let mut writer = Writer::new(&mut buf);
        cursor.copy_until(&mut writer, "layout").expect("Should copy");
        assert_eq!(String::from_utf8_lossy(buf.as_slice()), "<identity/>");
        assert!(cursor.at_element("layout"));

        cursor.skip().expect("Should skip");
        assert!(cursor.at_element("collations"));
        let mut rest = Vec::new();
        let mut writer = Writer::new(&mut rest);
        cursor.copy_until(&mut writer, "special").expect("Should copy");
        assert!(cursor.at_end());
        assert_eq!(String::from_utf8_lossy(rest.as_slice()), "<collations/>");
    }

    #[test]
    fn find_element_drops_earlier_siblings() {
        let input = "<ldml><identity/><!-- gone --><layout/><collations/></ldml>";
        let mut cursor = LdmlCursor::new(input).expect("Should open");
        cursor.enter_document("ldml").expect("Should find root");
        assert!(cursor.find_element("collations").expect("Should scan"));
        assert!(cursor.at_element("collations"));

        cursor.skip().expect("Should skip");
        assert!(!cursor.find_element("special").expect("Should scan"));
        assert!(cursor.at_end());
        cursor.leave().expect("Should leave");
        assert!(matches!(cursor.current(), Event::Eof));
    }

    #[test]
    fn empty_root_is_immediately_at_end() {
        let mut cursor = LdmlCursor::new("<ldml/>").expect("Should open");
        cursor.enter_document("ldml").expect("Should find root");
        assert!(cursor.at_end());
    }

    #[test]
    fn missing_root_is_malformed() {
        let mut cursor = LdmlCursor::new("<other/>").expect("Should open");
        let error = cursor.enter_document("ldml").expect_err("Should fail");
        assert!(matches!(error, LdmlError::MalformedSourceRecord(_)));
    }

    #[test]
    fn attribute_lookup() {
        let e = BytesStart::from_content("language type=\"en\"", "language".len());
        assert_eq!(
            attribute_value(&e, "type").expect("Should read"),
            Some("en".to_string())
        );
        assert_eq!(attribute_value(&e, "missing").expect("Should read"), None);
    }
}
