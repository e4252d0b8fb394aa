//! Minimal XML element tree.
//!
//! EWS responses are small (a page of projections at most), so they are
//! read into an owned tree and navigated by local name. Namespace prefixes
//! are dropped; EWS never reuses a local name across namespaces in the
//! parts we read.
//!
//! Leaf text is kept verbatim. Whitespace-only text inside an element that
//! has child elements is indentation and is discarded.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{Error, Result};

/// An XML element with its attributes, children and text content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// Local name, without namespace prefix.
    pub name: String,
    /// Attributes by local name, in document order.
    pub attributes: Vec<(String, String)>,
    /// Child elements, in document order.
    pub children: Vec<XmlNode>,
    /// Concatenated text content, untrimmed.
    pub text: String,
}

impl XmlNode {
    /// Parses a document and returns its root element.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or has no root element.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);

        let mut stack: Vec<Self> = Vec::new();
        let mut root: Option<Self> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Self::from_start(&start)?),
                Event::Empty(start) => {
                    let node = Self::from_start(&start)?;
                    attach(&mut stack, &mut root, node);
                }
                Event::End(_) => {
                    let mut node = stack
                        .pop()
                        .ok_or_else(|| Error::Protocol("unbalanced closing tag".to_string()))?;
                    if !node.children.is_empty() && node.text.trim().is_empty() {
                        node.text.clear();
                    }
                    attach(&mut stack, &mut root, node);
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text.unescape()?);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current
                            .text
                            .push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(Error::Protocol("unexpected end of document".to_string()));
        }
        root.ok_or_else(|| Error::Protocol("empty document".to_string()))
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            attributes.push((key, attr.unescape_value()?.into_owned()));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    /// Returns the value of an attribute by local name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the first direct child with the given local name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Returns all direct children with the given local name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Returns the text of a direct child, if present.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    /// Returns the text of a direct child with surrounding whitespace
    /// removed. For enumerations, numbers, timestamps and URLs.
    #[must_use]
    pub fn child_value(&self, name: &str) -> Option<&str> {
        self.child_text(name).map(str::trim)
    }

    /// Depth-first search for the first descendant (or self) named `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Self> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    /// Follows a path of direct child names.
    #[must_use]
    pub fn path(&self, names: &[&str]) -> Option<&Self> {
        names
            .iter()
            .try_fold(self, |node, name| node.child(name))
    }
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_none() {
                *root = Some(node);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_prefixes() {
        let xml = r#"<s:Envelope xmlns:s="x"><s:Body><m:Thing Id="1">hi &amp; bye</m:Thing></s:Body></s:Envelope>"#;
        let root = XmlNode::parse(xml).unwrap();
        assert_eq!(root.name, "Envelope");

        let thing = root.path(&["Body", "Thing"]).unwrap();
        assert_eq!(thing.attr("Id"), Some("1"));
        assert_eq!(thing.text, "hi & bye");
    }

    #[test]
    fn test_empty_elements_are_children() {
        let root = XmlNode::parse(r#"<a><b Id="x"/><b Id="y"/><c/></a>"#).unwrap();
        let ids: Vec<_> = root.children_named("b").filter_map(|b| b.attr("Id")).collect();
        assert_eq!(ids, vec!["x", "y"]);
        assert!(root.child("c").is_some());
    }

    #[test]
    fn test_find_descendant() {
        let root = XmlNode::parse("<a><b><c>deep</c></b></a>").unwrap();
        assert_eq!(root.find("c").unwrap().text, "deep");
        assert!(root.find("d").is_none());
    }

    #[test]
    fn test_leaf_text_is_verbatim() {
        let root = XmlNode::parse("<a>\n  <b>  padded  </b>\n  <c> </c>\n  <d>\n  7\n  </d>\n</a>").unwrap();
        assert_eq!(root.text, "");
        assert_eq!(root.child_text("b"), Some("  padded  "));
        assert_eq!(root.child_text("c"), Some(" "));
        assert_eq!(root.child_value("d"), Some("7"));
    }

    #[test]
    fn test_empty_document_is_error() {
        assert!(XmlNode::parse("").is_err());
    }

    #[test]
    fn test_unterminated_document_is_error() {
        assert!(XmlNode::parse("<a><b>").is_err());
    }
}
