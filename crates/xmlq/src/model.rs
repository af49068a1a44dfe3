use std::path::Path;

use compact_str::CompactString;

use crate::error::{Error, Result};

/// Node classification as reported by the tree adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Element,
    Attribute,
    Text,
    CData,
    Comment,
    ProcessingInstruction,
}

/// Qualified name of an element or attribute node.
///
/// `ns_uri` carries the resolved namespace of the node (if the adapter
/// resolves namespaces at parse time); `prefix` preserves the spelling
/// from the source document so serialization can round-trip it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub prefix: Option<CompactString>,
    pub local: CompactString,
    pub ns_uri: Option<CompactString>,
}

impl QName {
    pub fn local(name: impl Into<CompactString>) -> Self {
        QName {
            prefix: None,
            local: name.into(),
            ns_uri: None,
        }
    }

    /// The name as written in the document (`prefix:local` or `local`).
    pub fn as_written(&self) -> CompactString {
        match &self.prefix {
            Some(p) => compact_str::format_compact!("{p}:{}", self.local),
            None => self.local.clone(),
        }
    }
}

/// Borrowed handle into an XML tree supplied by an external adapter.
///
/// The engine never owns, frees or mutates nodes; it only navigates them.
/// Cloning a handle must be cheap and `Eq` must be node identity (two
/// handles compare equal exactly when they designate the same node), not
/// structural equality.
pub trait XmlNode: Clone + Eq + core::fmt::Debug {
    fn kind(&self) -> NodeKind;

    /// Qualified name for element and attribute nodes, `None` otherwise.
    fn name(&self) -> Option<QName>;

    /// Literal content of text, CDATA, comment, processing-instruction
    /// and attribute nodes. `None` for elements and documents.
    fn value(&self) -> Option<String>;

    fn parent(&self) -> Option<Self>;

    /// Child nodes in document order. Attributes are not children.
    fn children(&self) -> Vec<Self>;

    /// Attribute nodes in document order.
    fn attributes(&self) -> Vec<Self>;

    /// Attribute value looked up by its as-written name.
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes()
            .into_iter()
            .find(|a| a.name().is_some_and(|q| q.as_written() == name))
            .and_then(|a| a.value())
    }

    fn is_element(&self) -> bool {
        self.kind() == NodeKind::Element
    }

    fn first_child(&self) -> Option<Self> {
        self.children().into_iter().next()
    }

    fn last_child(&self) -> Option<Self> {
        self.children().into_iter().next_back()
    }

    /// The next sibling node of any kind.
    fn next_sibling(&self) -> Option<Self> {
        let parent = self.parent()?;
        let siblings = parent.children();
        let idx = siblings.iter().position(|s| s == self)?;
        siblings.into_iter().nth(idx + 1)
    }

    /// The previous sibling node of any kind.
    fn previous_sibling(&self) -> Option<Self> {
        let parent = self.parent()?;
        let siblings = parent.children();
        let idx = siblings.iter().position(|s| s == self)?;
        idx.checked_sub(1).and_then(|i| siblings.into_iter().nth(i))
    }

    /// The nearest following sibling that is an element.
    fn next_element_sibling(&self) -> Option<Self> {
        let mut cur = self.next_sibling();
        while let Some(n) = cur {
            if n.is_element() {
                return Some(n);
            }
            cur = n.next_sibling();
        }
        None
    }

    /// The nearest preceding sibling that is an element.
    fn previous_element_sibling(&self) -> Option<Self> {
        let mut cur = self.previous_sibling();
        while let Some(n) = cur {
            if n.is_element() {
                return Some(n);
            }
            cur = n.previous_sibling();
        }
        None
    }

    /// Concatenated character content of this node's subtree: text and
    /// CDATA sections, descending through element wrappers.
    fn text(&self) -> String {
        fn walk<N: XmlNode>(node: &N, out: &mut String) {
            match node.kind() {
                NodeKind::Text | NodeKind::CData => {
                    if let Some(v) = node.value() {
                        out.push_str(&v);
                    }
                }
                NodeKind::Element | NodeKind::Document => {
                    for child in node.children() {
                        walk(&child, out);
                    }
                }
                _ => {}
            }
        }
        let mut out = String::new();
        walk(self, &mut out);
        out
    }
}

/// Document construction hook for adapters that can build a tree from
/// XML text. Implemented by [`crate::simple_node::SimpleNode`]; embedders
/// with their own tree representation provide their own implementation.
pub trait DocumentParser: XmlNode + Sized {
    /// Parse a complete document, returning its document node.
    fn parse_str(text: &str) -> Result<Self>;

    fn parse_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Parse(e.to_string()))?;
        Self::parse_str(&text)
    }
}
