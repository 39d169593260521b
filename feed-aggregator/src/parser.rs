use crate::dialects::FeedDialect;
use crate::types::{AggregatorError, ParsedFeed, Result};
use crate::utils::decode_entities;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use tracing::debug;

/// Namespace URIs we know, mapped to the prefix every lookup uses. An empty
/// prefix means the element is addressed by its bare local name.
const KNOWN_NAMESPACES: &[(&str, &str)] = &[
    ("http://www.w3.org/2005/Atom", ""),
    ("http://purl.org/rss/1.0/", ""),
    ("http://search.yahoo.com/mrss/", "media"),
    ("http://search.yahoo.com/mrss", "media"),
    ("http://www.itunes.com/dtds/podcast-1.0.dtd", "itunes"),
    ("http://www.youtube.com/xml/schemas/2015", "yt"),
    ("http://purl.org/rss/1.0/modules/content/", "content"),
    ("http://purl.org/dc/elements/1.1/", "dc"),
    ("http://www.w3.org/1999/02/22-rdf-syntax-ns#", "rdf"),
];

/// One child of an element, in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// A fully materialized XML element. Names are canonical: a namespaced
/// element is `prefix:local` with the prefix taken from [`KNOWN_NAMESPACES`]
/// regardless of what the document bound it to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub nodes: Vec<Node>,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children().filter(move |c| c.name == name)
    }

    /// Text directly inside this element.
    pub fn text(&self) -> String {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Trimmed text of the first child called `name`, if non-empty.
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.children_named(name)
            .map(|c| c.text().trim().to_string())
            .find(|t| !t.is_empty())
    }

    /// Text of this element and its descendants, in document order.
    pub fn deep_text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.write_text(out),
            }
        }
    }

    /// The element's content serialized back to markup, for inline XHTML.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(&html_escape::encode_text(text)),
                Node::Element(element) => element.write_html(&mut out),
            }
        }
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push_str(&format!(" {}=\"{}\"", key, html_escape::encode_double_quoted_attribute(value)));
        }
        if self.nodes.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        out.push_str(&self.inner_html());
        out.push_str(&format!("</{}>", self.name));
    }
}

fn canonical_name(resolved: &ResolveResult, local: &[u8], qualified: &[u8]) -> String {
    let local = String::from_utf8_lossy(local);
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => {
            let uri = String::from_utf8_lossy(uri);
            match KNOWN_NAMESPACES.iter().find(|(known, _)| *known == uri) {
                Some((_, "")) => local.into_owned(),
                Some((_, prefix)) => format!("{}:{}", prefix, local),
                None => String::from_utf8_lossy(qualified).into_owned(),
            }
        }
        ResolveResult::Unbound => local.into_owned(),
        // Undeclared prefix: keep it as written.
        ResolveResult::Unknown(_) => String::from_utf8_lossy(qualified).into_owned(),
    }
}

fn open_element(reader: &NsReader<&[u8]>, start: &BytesStart) -> Element {
    let (resolved, local) = reader.resolve_element(start.name());
    let mut element = Element::new(canonical_name(&resolved, local.as_ref(), start.name().as_ref()));

    for attr in start.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let value = match attr.unescape_value() {
            Ok(v) => v.into_owned(),
            Err(_) => decode_entities(&String::from_utf8_lossy(&attr.value)),
        };
        element.attributes.push((key, value));
    }
    element
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.nodes.push(Node::Element(element));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(AggregatorError::Parse("multiple root elements".to_string())),
    }
}

fn push_text(stack: &mut [Element], text: &str) {
    let Some(current) = stack.last_mut() else {
        return;
    };
    match current.nodes.last_mut() {
        Some(Node::Text(last)) => last.push_str(text),
        _ => current.nodes.push(Node::Text(text.to_string())),
    }
}

/// Parse a whole XML document into an element tree. Fails on anything that
/// is not well-formed.
pub fn parse_document(content: &str) -> Result<Element> {
    let content = content.trim_start_matches('\u{feff}');
    let mut reader = NsReader::from_str(content);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let element = open_element(&reader, &e);
                stack.push(element);
            }
            Ok(Event::Empty(e)) => {
                let element = open_element(&reader, &e);
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| AggregatorError::Parse("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(e)) => {
                if stack.is_empty() {
                    if !String::from_utf8_lossy(&e).trim().is_empty() {
                        return Err(AggregatorError::Parse("text outside of root element".to_string()));
                    }
                    continue;
                }
                let text = match e.unescape() {
                    Ok(text) => text.into_owned(),
                    Err(_) => decode_entities(&String::from_utf8_lossy(&e)),
                };
                push_text(&mut stack, &text);
            }
            Ok(Event::CData(e)) => {
                push_text(&mut stack, &String::from_utf8_lossy(&e));
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(AggregatorError::Parse(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(AggregatorError::Parse(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| AggregatorError::Parse("document has no root element".to_string()))
}

/// Turns feed text into dialect-independent raw entries.
#[derive(Debug, Default, Clone, Copy)]
pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_feed(&self, content: &str) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let root = parse_document(content)?;
        let dialect = FeedDialect::detect(&root)?;
        let adapter = dialect.adapter();

        let entries = adapter
            .entries(&root)
            .into_iter()
            .map(|entry| adapter.raw_entry(entry))
            .collect::<Vec<_>>();

        debug!("Parsed {:?} feed with {} entries", dialect, entries.len());

        Ok(ParsedFeed {
            dialect,
            title: adapter.feed_title(&root),
            site_url: adapter.site_url(&root),
            entries,
        })
    }
}
