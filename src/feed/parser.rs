use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use std::borrow::Cow;
use thiserror::Error;

use super::types::{Channel, Item, ItemField, ParsedFeed};

/// Maximum element nesting accepted before the document is rejected.
/// Bounds memory and recursion on hostile input.
pub const MAX_XML_DEPTH: usize = 256;

/// Errors that can occur while turning feed XML into records.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not well-formed XML.
    #[error("XML parse error: {0}")]
    Xml(String),

    /// Element nesting exceeds [`MAX_XML_DEPTH`].
    #[error("XML nesting depth exceeds maximum of {0} levels")]
    MaxDepthExceeded(usize),

    /// The root element has no `<channel>` child.
    #[error("Feed has no <channel> element")]
    MissingChannel,
}

/// Minimal element tree: expanded name, leading text, child elements.
///
/// Only the text before the first child element is kept; text that follows
/// a child (its "tail") is never read by the extractor.
#[derive(Debug, Default)]
struct Element {
    name: Vec<u8>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    fn new(name: Vec<u8>) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    fn push_text(&mut self, text: &str) {
        if !self.children.is_empty() || text.is_empty() {
            return;
        }
        self.text.get_or_insert_with(String::new).push_str(text);
    }

    fn children_named<'a>(&'a self, name: &'a [u8]) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}

/// Parses an RSS document into its channel record and item records.
///
/// The channel record is read from the first `<channel>` directly under the
/// root element. Items are gathered from every such `<channel>`, in
/// document order.
///
/// # Errors
///
/// - [`ParseError::Xml`] if the input is not well-formed
/// - [`ParseError::MaxDepthExceeded`] for pathologically nested input
/// - [`ParseError::MissingChannel`] if the root has no `<channel>` child
///
/// # Security
///
/// `quick-xml` 0.37 never expands `<!ENTITY>` declarations. Only the five
/// predefined entities and character references are resolved; any other
/// entity reference is reported as [`ParseError::Xml`].
pub fn parse_feed(xml: &str) -> Result<ParsedFeed, ParseError> {
    let root = parse_tree(xml)?;

    let first = root
        .children_named(b"channel")
        .next()
        .ok_or(ParseError::MissingChannel)?;

    let mut channel = Channel::default();
    for child in &first.children {
        channel.record(&child.name, child.text.clone());
    }

    let items: Vec<Item> = root
        .children_named(b"channel")
        .flat_map(|c| c.children_named(b"item"))
        .map(extract_item)
        .collect();

    tracing::debug!(items = items.len(), "Parsed feed");

    Ok(ParsedFeed { channel, items })
}

fn extract_item(element: &Element) -> Item {
    let mut item = Item::default();
    for child in &element.children {
        if let Some(field) = ItemField::from_tag(&child.name) {
            item.record(field, child.text.clone());
        }
    }
    item
}

fn parse_tree(xml: &str) -> Result<Element, ParseError> {
    let mut reader = NsReader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position();
        let (namespace, event) = match reader.read_resolved_event() {
            Ok((ns, event)) => (bound_namespace(ns)?, event),
            Err(e) => return Err(xml_error(e)),
        };

        match event {
            Event::Start(e) => {
                if root.is_some() {
                    return Err(junk_after_root());
                }
                if stack.len() >= MAX_XML_DEPTH {
                    return Err(ParseError::MaxDepthExceeded(MAX_XML_DEPTH));
                }
                check_attributes(&reader, &e)?;
                stack.push(Element::new(expanded_name(
                    namespace.as_deref(),
                    e.local_name().as_ref(),
                )));
            }
            Event::Empty(e) => {
                if root.is_some() {
                    return Err(junk_after_root());
                }
                check_attributes(&reader, &e)?;
                let element = Element::new(expanded_name(
                    namespace.as_deref(),
                    e.local_name().as_ref(),
                ));
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                // End names are checked against the open tag by the reader.
                let element = stack
                    .pop()
                    .ok_or_else(|| ParseError::Xml("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(e) => {
                let raw = reader.decoder().decode(&e).map_err(xml_error)?;
                // Line endings are normalized before references are expanded,
                // so `&#13;` survives as a carriage return.
                let normalized = normalize_newlines(&raw);
                let text = unescape(&normalized).map_err(xml_error)?;
                check_chars(&text)?;
                push_text(&mut stack, &root, &text)?;
            }
            Event::CData(e) => {
                let raw = reader.decoder().decode(&e).map_err(xml_error)?;
                let text = normalize_newlines(&raw);
                check_chars(&text)?;
                push_text(&mut stack, &root, &text)?;
            }
            Event::Decl(_) if position != 0 => {
                return Err(ParseError::Xml(
                    "XML declaration not at start of document".to_string(),
                ));
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::Xml(format!(
            "unclosed element <{}>",
            String::from_utf8_lossy(&open.name)
        )));
    }

    root.ok_or_else(|| ParseError::Xml("no element found".to_string()))
}

fn xml_error(e: impl std::fmt::Display) -> ParseError {
    ParseError::Xml(e.to_string())
}

/// Namespace URI an element name resolved to; undeclared prefixes are errors.
fn bound_namespace(ns: ResolveResult<'_>) -> Result<Option<Vec<u8>>, ParseError> {
    match ns {
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Bound(Namespace(uri)) => Ok(Some(uri.to_vec())),
        ResolveResult::Unknown(prefix) => Err(unbound_prefix(&prefix)),
    }
}

fn unbound_prefix(prefix: &[u8]) -> ParseError {
    ParseError::Xml(format!(
        "unbound prefix '{}'",
        String::from_utf8_lossy(prefix)
    ))
}

/// Element name as matched by the extractor: the bare local name outside
/// any namespace, `{uri}local` inside one. Namespaced elements therefore
/// never match the plain RSS tag names.
fn expanded_name(namespace: Option<&[u8]>, local: &[u8]) -> Vec<u8> {
    match namespace {
        None => local.to_vec(),
        Some(uri) => {
            let mut name = Vec::with_capacity(uri.len() + local.len() + 2);
            name.push(b'{');
            name.extend_from_slice(uri);
            name.push(b'}');
            name.extend_from_slice(local);
            name
        }
    }
}

/// Rejects malformed, duplicate or unbound-prefix attributes and attribute
/// values with undefined entities or illegal characters.
fn check_attributes(reader: &NsReader<&[u8]>, e: &BytesStart<'_>) -> Result<(), ParseError> {
    for attr in e.attributes().with_checks(true) {
        let attr = attr.map_err(xml_error)?;
        let key = attr.key.as_ref();
        if !key.starts_with(b"xmlns") && !key.starts_with(b"xml:") {
            if let (ResolveResult::Unknown(prefix), _) = reader.resolve_attribute(attr.key) {
                return Err(unbound_prefix(&prefix));
            }
        }
        let value = attr.unescape_value().map_err(xml_error)?;
        check_chars(&value)?;
    }
    Ok(())
}

/// `\r\n` and lone `\r` become `\n`.
fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Enforces the XML `Char` production.
fn check_chars(text: &str) -> Result<(), ParseError> {
    match text.chars().find(|&c| !is_xml_char(c)) {
        Some(c) => Err(ParseError::Xml(format!(
            "invalid character U+{:04X}",
            c as u32
        ))),
        None => Ok(()),
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || ('\u{20}'..='\u{D7FF}').contains(&c)
        || ('\u{E000}'..='\u{FFFD}').contains(&c)
        || c >= '\u{10000}'
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn push_text(stack: &mut [Element], root: &Option<Element>, text: &str) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(current) => {
            current.push_text(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None if root.is_some() => Err(junk_after_root()),
        None => Err(ParseError::Xml("text outside of root element".to_string())),
    }
}

fn junk_after_root() -> ParseError {
    ParseError::Xml("junk after document element".to_string())
}
