//! Owned SVG element tree.
//!
//! Built from the `quick-xml` event stream and written back with its
//! `Writer`. Only elements are modelled; text, comments, CDATA, processing
//! instructions, the XML declaration and the doctype are kept as owned events
//! and written back unchanged. Attribute values are stored as raw (escaped)
//! text, so values the engine never touches survive byte-for-byte.

use quick_xml::{
    Reader, Writer,
    events::{BytesEnd, BytesStart, Event, attributes::Attribute as XmlAttribute},
    name::QName,
};
use std::borrow::Cow;

use super::error::SvgError;

// ============================================================================
// Node and Element
// ============================================================================

/// A node in the tree.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    /// Any non-element event (text, comment, declaration...).
    Other(Event<'static>),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Other(_) => None,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Self::Other(Event::Comment(_)))
    }
}

/// A single attribute with its raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// An element with its attributes and children.
#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
    self_closing: bool,
}

impl Element {
    fn from_start(start: &BytesStart<'_>, self_closing: bool) -> Result<Self, SvgError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let mut value = String::from_utf8_lossy(&attr.value).into_owned();
            // Single-quoted values may contain `"`; the writer always uses `"`.
            if value.contains('"') {
                value = value.replace('"', "&quot;");
            }
            attributes.push(Attribute {
                name: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                value,
            });
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            self_closing,
        })
    }

    /// Qualified name as written (`svg`, `sodipodi:namedview`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        split_prefix(&self.name).1
    }

    pub fn prefix(&self) -> Option<&str> {
        split_prefix(&self.name).0
    }

    // ------------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------------

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Set an attribute, replacing the existing value in place.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                value,
            }),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|attr| attr.name == name)?;
        Some(self.attributes.remove(index).value)
    }

    /// Keep only the attributes matching the predicate. Returns how many were dropped.
    pub fn retain_attributes(&mut self, mut keep: impl FnMut(&Attribute) -> bool) -> usize {
        let before = self.attributes.len();
        self.attributes.retain(|attr| keep(attr));
        before - self.attributes.len()
    }

    // ------------------------------------------------------------------------
    // Children
    // ------------------------------------------------------------------------

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Other(_) => None,
        })
    }

    /// Follow a path of child indices (into [`Element::children`]).
    pub fn descendant_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut current = self;
        for &index in path {
            current = match current.children.get_mut(index)? {
                Node::Element(element) => element,
                Node::Other(_) => return None,
            };
        }
        Some(current)
    }

    /// First element strictly below this one satisfying the predicate.
    pub fn find_descendant(&self, predicate: &mut impl FnMut(&Element) -> bool) -> Option<&Element> {
        for child in self.child_elements() {
            if predicate(child) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(predicate) {
                return Some(found);
            }
        }
        None
    }

    /// Visit this element and all its descendants, stopping at the first error.
    pub fn try_visit_mut<E>(
        &mut self,
        visit: &mut impl FnMut(&mut Element) -> Result<(), E>,
    ) -> Result<(), E> {
        visit(self)?;
        for child in self.child_elements_mut() {
            child.try_visit_mut(visit)?;
        }
        Ok(())
    }

    fn to_start(&self) -> BytesStart<'_> {
        let mut start = BytesStart::new(self.name.as_str());
        for attr in &self.attributes {
            // Values are stored escaped; push them raw.
            start.push_attribute(XmlAttribute {
                key: QName(attr.name.as_bytes()),
                value: Cow::Borrowed(attr.value.as_bytes()),
            });
        }
        start
    }
}

fn split_prefix(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

// ============================================================================
// Document
// ============================================================================

/// A parsed SVG document: top-level nodes around exactly one root element.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Parse SVG text.
    pub fn parse(content: &str) -> Result<Self, SvgError> {
        let mut reader = Reader::from_str(content);
        let mut stack: Vec<Element> = Vec::new();
        let mut nodes: Vec<Node> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Element::from_start(&start, false)?),
                Event::Empty(start) => {
                    let element = Element::from_start(&start, true)?;
                    attach(&mut stack, &mut nodes, Node::Element(element));
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| SvgError::Malformed("unexpected closing tag".into()))?;
                    attach(&mut stack, &mut nodes, Node::Element(element));
                }
                Event::Eof => break,
                event => attach(&mut stack, &mut nodes, Node::Other(event.into_owned())),
            }
        }

        if let Some(open) = stack.last() {
            return Err(SvgError::Malformed(format!("unclosed element <{}>", open.name)));
        }

        let roots = nodes.iter().filter_map(Node::as_element).count();
        match roots {
            0 => Err(SvgError::Malformed("no root element".into())),
            1 => Ok(Self { nodes }),
            _ => Err(SvgError::Malformed("more than one root element".into())),
        }
    }

    pub fn root(&self) -> &Element {
        self.nodes
            .iter()
            .find_map(Node::as_element)
            .unwrap_or_else(|| unreachable!("parsed documents have a root element"))
    }

    pub fn root_mut(&mut self) -> &mut Element {
        self.nodes
            .iter_mut()
            .find_map(|node| match node {
                Node::Element(element) => Some(element),
                Node::Other(_) => None,
            })
            .unwrap_or_else(|| unreachable!("parsed documents have a root element"))
    }

    /// Drop comments outside the root element. Returns how many were removed.
    pub fn remove_top_level_comments(&mut self) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|node| !node.is_comment());
        before - self.nodes.len()
    }

    /// Serialize back to SVG text.
    pub fn to_svg_string(&self) -> Result<String, SvgError> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.nodes {
            write_node(&mut writer, node)?;
        }
        String::from_utf8(writer.into_inner())
            .map_err(|_| SvgError::Malformed("serialized document is not UTF-8".into()))
    }
}

fn attach(stack: &mut [Element], nodes: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => nodes.push(node),
    }
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<(), SvgError> {
    match node {
        Node::Other(event) => writer.write_event(event.borrow())?,
        Node::Element(element) => {
            let start = element.to_start();
            if element.children.is_empty() && element.self_closing {
                writer.write_event(Event::Empty(start))?;
            } else {
                writer.write_event(Event::Start(start))?;
                for child in &element.children {
                    write_node(writer, child)?;
                }
                writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- icon -->
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
  <g transform="translate(1, 2)" style='font-family:"A"'>
    <path d="M0 0L1 1"/>
    <title>Fish &amp; chips</title>
  </g>
</svg>
"#;

    #[test]
    fn test_round_trip_is_lossless() {
        let doc = Document::parse(SAMPLE).unwrap();
        let out = doc.to_svg_string().unwrap();
        assert_eq!(out, SAMPLE.replace(r#"style='font-family:"A"'"#, r#"style="font-family:&quot;A&quot;""#));
    }

    #[test]
    fn test_root_and_attributes() {
        let doc = Document::parse(SAMPLE).unwrap();
        let root = doc.root();
        assert_eq!(root.name(), "svg");
        assert_eq!(root.attr("viewBox"), Some("0 0 24 24"));

        let group = root.child_elements().next().unwrap();
        assert_eq!(group.attr("transform"), Some("translate(1, 2)"));
        let path = group.child_elements().next().unwrap();
        assert_eq!(path.attr("d"), Some("M0 0L1 1"));
    }

    #[test]
    fn test_set_and_remove_attr() {
        let mut doc = Document::parse(r#"<svg a="1"><path/></svg>"#).unwrap();
        let root = doc.root_mut();
        root.set_attr("a", "2");
        root.set_attr("b", "3");
        assert_eq!(root.remove_attr("a"), Some("2".to_string()));
        assert_eq!(root.remove_attr("missing"), None);
        assert_eq!(doc.to_svg_string().unwrap(), r#"<svg b="3"><path/></svg>"#);
    }

    #[test]
    fn test_descendant_mut_follows_child_indices() {
        let mut doc = Document::parse("<svg>\n<g>\n<path d=\"M1 1\"/></g></svg>").unwrap();
        // children: [text, g]; g children: [text, path]
        let path = doc.root_mut().descendant_mut(&[1, 1]).unwrap();
        assert_eq!(path.local_name(), "path");
        assert!(doc.root_mut().descendant_mut(&[0]).is_none());
    }

    #[test]
    fn test_prefixed_names() {
        let doc = Document::parse(r#"<svg><sodipodi:namedview/></svg>"#).unwrap();
        let child = doc.root().child_elements().next().unwrap();
        assert_eq!(child.prefix(), Some("sodipodi"));
        assert_eq!(child.local_name(), "namedview");
    }

    #[test]
    fn test_malformed_documents() {
        assert!(Document::parse("").is_err());
        assert!(Document::parse("<svg><g></svg>").is_err());
        assert!(Document::parse("<svg>").is_err());
        assert!(Document::parse("<svg/><svg/>").is_err());
    }
}
