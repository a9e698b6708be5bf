//! Owned XML tree
//!
//! A small mutable element tree built from `quick_xml` reader events. Text,
//! comments, CDATA and processing instructions are kept as raw markup so a
//! document can be written back out with only the edits changed.

use std::fmt::Write as _;

use quick_xml::escape::{escape, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::error::XmlTreeError;

/// A node inside an element or around the root element
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    /// Character data, still escaped
    Text(String),
    CData(String),
    Comment(String),
    /// `<?xml ...?>`, stored without the `<?`/`?>` delimiters
    Declaration(String),
    /// Any other `<?target ...?>`, stored without delimiters
    ProcessingInstruction(String),
    DocType(String),
}

/// An element with its attributes in document order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unescaped attribute value
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, keeping its position if it already exists
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|e| e.name == name)
    }

    /// The element at `index` in `children`, if that node is an element
    pub fn element_at(&self, index: usize) -> Option<&XmlElement> {
        match self.children.get(index) {
            Some(XmlNode::Element(element)) => Some(element),
            _ => None,
        }
    }

    pub fn element_at_mut(&mut self, index: usize) -> Option<&mut XmlElement> {
        match self.children.get_mut(index) {
            Some(XmlNode::Element(element)) => Some(element),
            _ => None,
        }
    }

    /// Append a child element and return its index in `children`
    pub fn push_element(&mut self, element: XmlElement) -> usize {
        self.children.push(XmlNode::Element(element));
        self.children.len() - 1
    }

    /// All elements below this one in document order, not including itself
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", key, escape(value.as_str()));
        }

        if self.children.is_empty() {
            out.push_str(" />");
            return;
        }

        out.push('>');
        for child in &self.children {
            child.write_to(out);
        }
        let _ = write!(out, "</{}>", self.name);
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, XmlTreeError> {
        let mut element = XmlElement::new(std::str::from_utf8(start.name().as_ref())?);
        for attr in start.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?;
            let raw = std::str::from_utf8(&attr.value)?;
            element
                .attributes
                .push((key.to_string(), unescape(raw)?.into_owned()));
        }
        Ok(element)
    }
}

impl XmlNode {
    fn write_to(&self, out: &mut String) {
        match self {
            XmlNode::Element(element) => element.write_to(out),
            XmlNode::Text(raw) => out.push_str(raw),
            XmlNode::CData(raw) => {
                let _ = write!(out, "<![CDATA[{}]]>", raw);
            }
            XmlNode::Comment(raw) => {
                let _ = write!(out, "<!--{}-->", raw);
            }
            XmlNode::Declaration(raw) | XmlNode::ProcessingInstruction(raw) => {
                let _ = write!(out, "<?{}?>", raw);
            }
            XmlNode::DocType(raw) => {
                let _ = write!(out, "<!DOCTYPE {}>", raw);
            }
        }
    }
}

/// Preorder walk over the elements of a subtree
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, XmlNode>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(siblings) = self.stack.last_mut() {
            match siblings.next() {
                Some(XmlNode::Element(element)) => {
                    self.stack.push(element.children.iter());
                    return Some(element);
                }
                Some(_) => continue,
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

/// A parsed document: the root element plus whatever surrounds it
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    prolog: Vec<XmlNode>,
    pub root: XmlElement,
    epilog: Vec<XmlNode>,
}

impl XmlDocument {
    pub fn new(root: XmlElement) -> Self {
        Self {
            prolog: vec![XmlNode::Declaration(
                r#"xml version="1.0" encoding="utf-8""#.to_string(),
            )],
            root,
            epilog: Vec::new(),
        }
    }

    /// Parse a complete, single-rooted document
    pub fn parse(content: &str) -> Result<Self, XmlTreeError> {
        let content = content.trim_start_matches('\u{feff}');
        let mut reader = Reader::from_str(content);

        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut root: Option<XmlElement> = None;
        let mut open: Vec<XmlElement> = Vec::new();
        let mut buf = Vec::new();

        loop {
            let node = match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => {
                    if open.is_empty() && root.is_some() {
                        return Err(structure("more than one root element"));
                    }
                    open.push(XmlElement::from_start(e)?);
                    None
                }
                Event::End(_) => {
                    let element = open
                        .pop()
                        .ok_or_else(|| structure("unexpected closing tag"))?;
                    Some(XmlNode::Element(element))
                }
                Event::Empty(ref e) => Some(XmlNode::Element(XmlElement::from_start(e)?)),
                Event::Text(e) => Some(XmlNode::Text(std::str::from_utf8(&e)?.to_string())),
                Event::GeneralRef(e) => Some(XmlNode::Text(format!("&{};", std::str::from_utf8(&e)?))),
                Event::CData(e) => Some(XmlNode::CData(std::str::from_utf8(&e)?.to_string())),
                Event::Comment(e) => Some(XmlNode::Comment(std::str::from_utf8(&e)?.to_string())),
                Event::Decl(e) => Some(XmlNode::Declaration(std::str::from_utf8(&e)?.to_string())),
                Event::PI(e) => Some(XmlNode::ProcessingInstruction(
                    std::str::from_utf8(&e)?.to_string(),
                )),
                Event::DocType(e) => Some(XmlNode::DocType(std::str::from_utf8(&e)?.trim().to_string())),
                Event::Eof => break,
            };
            buf.clear();

            let Some(node) = node else { continue };
            if let Some(parent) = open.last_mut() {
                parent.children.push(node);
                continue;
            }

            match node {
                XmlNode::Element(element) => {
                    if root.is_some() {
                        return Err(structure("more than one root element"));
                    }
                    root = Some(element);
                }
                XmlNode::Text(ref text) if !text.trim().is_empty() => {
                    return Err(structure("text outside the root element"));
                }
                other if root.is_some() => epilog.push(other),
                other => prolog.push(other),
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(structure(&format!("element <{}> is not closed", unclosed.name)));
        }
        let root = root.ok_or_else(|| structure("document has no root element"))?;

        Ok(Self {
            prolog,
            root,
            epilog,
        })
    }

    /// Serialize the document back to markup
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        for node in &self.prolog {
            node.write_to(&mut out);
        }
        self.root.write_to(&mut out);
        for node in &self.epilog {
            node.write_to(&mut out);
        }
        out
    }
}

fn structure(message: &str) -> XmlTreeError {
    XmlTreeError::Structure(message.to_string())
}

#[cfg(test)]
#[path = "xml_tree_tests.rs"]
mod tests;
