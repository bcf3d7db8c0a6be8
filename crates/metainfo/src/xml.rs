//! Minimal element tree over `quick-xml`'s event stream.
//!
//! The schema mapping dispatches on tag names and reads attributes and
//! character data, so a small owned tree is more convenient than threading
//! streaming events through every entity. Only the parts of XML the
//! MetaInfo format uses are kept: elements, attributes and character data.
//! The XML declaration, comments, doctypes and processing instructions are
//! discarded during parsing.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{ParseError, ParseErrorKind};

/// One parsed XML element.
///
/// `text` holds the character data that appears before the first child
/// element; text trailing a child element is dropped. Attribute order is
/// document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), ..Self::default() }
    }

    /// Returns the value of the named attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }
}

/// Parses one XML document into its root [`Element`].
///
/// # Errors
///
/// Fails with [`ParseErrorKind::MalformedXml`] on any syntax error: invalid
/// markup, character data outside the document element, a missing root, an
/// unclosed element, or trailing content after the root. No partial tree is
/// ever returned.
pub fn parse_document(xml: &str) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => exn::bail!(ParseErrorKind::MalformedXml(e.to_string())),
        };
        match event {
            Event::Start(start) => {
                stack.push(element_from_start(&start)?);
            },
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            },
            Event::End(_) => {
                // Mismatched names are already rejected by the reader; a
                // close with nothing open is still possible.
                let Some(element) = stack.pop() else {
                    exn::bail!(ParseErrorKind::MalformedXml("unexpected closing tag".to_string()));
                };
                attach(&mut stack, &mut root, element)?;
            },
            Event::Text(text) => {
                let value = match text.unescape() {
                    Ok(value) => value,
                    Err(e) => exn::bail!(ParseErrorKind::MalformedXml(e.to_string())),
                };
                append_text(&mut stack, &value)?;
            },
            Event::CData(cdata) => {
                let raw = cdata.into_inner();
                let value = String::from_utf8_lossy(&raw);
                append_text(&mut stack, &value)?;
            },
            Event::Decl(_) | Event::Comment(_) | Event::DocType(_) | Event::PI(_) => {},
            Event::Eof => break,
        }
    }
    if !stack.is_empty() {
        exn::bail!(ParseErrorKind::MalformedXml("unclosed element".to_string()));
    }
    match root {
        Some(root) => Ok(root),
        None => exn::bail!(ParseErrorKind::MalformedXml("no element found".to_string())),
    }
}

fn element_from_start(start: &BytesStart) -> Result<Element, ParseError> {
    let mut element = Element::new(String::from_utf8_lossy(start.local_name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = match attr {
            Ok(attr) => attr,
            Err(e) => exn::bail!(ParseErrorKind::MalformedXml(e.to_string())),
        };
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(e) => exn::bail!(ParseErrorKind::MalformedXml(e.to_string())),
        };
        element.attrs.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_some() {
        exn::bail!(ParseErrorKind::MalformedXml("junk after document element".to_string()));
    } else {
        *root = Some(element);
    }
    Ok(())
}

fn append_text(stack: &mut [Element], value: &str) -> Result<(), ParseError> {
    match stack.last_mut() {
        // ElementTree semantics: only character data before the first
        // child element is kept.
        Some(parent) if parent.children.is_empty() => {
            parent.text.get_or_insert_with(String::new).push_str(value);
            Ok(())
        },
        Some(_) => Ok(()),
        None => exn::bail!(ParseErrorKind::MalformedXml("character data outside document element".to_string())),
    }
}

/// Escapes `<`, `>`, `&`, `'` and `"` for output.
pub(crate) fn escape(raw: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(raw)
}
