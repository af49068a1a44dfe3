//! Arc-backed in-memory tree: the default [`XmlNode`] adapter.
//!
//! Focus:
//! - Ergonomic builder for quick tree construction in tests
//! - Identity equality (`Eq` is pointer equality, not structure)
//! - Thread-safe sharing (`Arc` + `RwLock` parent links)
//! - A small well-formed XML reader implementing [`DocumentParser`]
//!
//! Example:
//! ```
//! use xmlq::simple_node::{elem, text, attr};
//! use xmlq::XmlNode;
//!
//! // <root id="r"><child>Hello</child></root>
//! let root = elem("root")
//!     .attr(attr("id", "r"))
//!     .child(elem("child").child(text("Hello")))
//!     .build();
//!
//! assert_eq!(root.name().unwrap().local, "root");
//! assert_eq!(root.text(), "Hello");
//! ```

use std::fmt;
use std::sync::{Arc, RwLock, Weak};

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::model::{DocumentParser, NodeKind, QName, XmlNode};

const XML_NS_URI: &str = "http://www.w3.org/XML/1998/namespace";

struct Inner {
    kind: NodeKind,
    name: Option<QName>,
    value: Option<String>,
    parent: RwLock<Option<Weak<Inner>>>,
    attributes: RwLock<Vec<SimpleNode>>,
    children: RwLock<Vec<SimpleNode>>,
}

/// A node handle. Cloning is an `Arc` bump; equality is node identity.
#[derive(Clone)]
pub struct SimpleNode(Arc<Inner>);

impl PartialEq for SimpleNode {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for SimpleNode {}

impl std::hash::Hash for SimpleNode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for SimpleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleNode")
            .field("kind", &self.0.kind)
            .field("name", &self.0.name)
            .field("value", &self.0.value)
            .finish()
    }
}

impl SimpleNode {
    fn new(kind: NodeKind, name: Option<QName>, value: Option<String>) -> Self {
        SimpleNode(Arc::new(Inner {
            kind,
            name,
            value,
            parent: RwLock::new(None),
            attributes: RwLock::new(Vec::new()),
            children: RwLock::new(Vec::new()),
        }))
    }
}

impl XmlNode for SimpleNode {
    fn kind(&self) -> NodeKind {
        self.0.kind
    }

    fn name(&self) -> Option<QName> {
        self.0.name.clone()
    }

    fn value(&self) -> Option<String> {
        self.0.value.clone()
    }

    fn parent(&self) -> Option<Self> {
        self.0
            .parent
            .read()
            .ok()?
            .as_ref()
            .and_then(Weak::upgrade)
            .map(SimpleNode)
    }

    fn children(&self) -> Vec<Self> {
        self.0.children.read().map(|v| v.clone()).unwrap_or_default()
    }

    fn attributes(&self) -> Vec<Self> {
        self.0
            .attributes
            .read()
            .map(|v| v.clone())
            .unwrap_or_default()
    }
}

pub struct SimpleNodeBuilder {
    node: SimpleNode,
    pending_children: Vec<SimpleNode>,
    pending_attrs: Vec<SimpleNode>,
}

impl SimpleNodeBuilder {
    fn new(kind: NodeKind, name: Option<QName>) -> Self {
        SimpleNodeBuilder {
            node: SimpleNode::new(kind, name, None),
            pending_children: Vec::new(),
            pending_attrs: Vec::new(),
        }
    }

    pub fn child(mut self, child: impl Into<NodeOrBuilder>) -> Self {
        self.pending_children.push(match child.into() {
            NodeOrBuilder::Built(n) => n,
            NodeOrBuilder::Builder(b) => b.build(),
        });
        self
    }

    pub fn attr(mut self, attr: SimpleNode) -> Self {
        debug_assert!(attr.kind() == NodeKind::Attribute);
        self.pending_attrs.push(attr);
        self
    }

    /// Finalize parent links and produce the node.
    pub fn build(self) -> SimpleNode {
        let down = Arc::downgrade(&self.node.0);
        {
            let mut attrs = self.node.0.attributes.write().unwrap();
            for a in &self.pending_attrs {
                *a.0.parent.write().unwrap() = Some(down.clone());
            }
            attrs.extend(self.pending_attrs);
        }
        {
            let mut children = self.node.0.children.write().unwrap();
            for c in &self.pending_children {
                *c.0.parent.write().unwrap() = Some(down.clone());
            }
            children.extend(self.pending_children);
        }
        self.node
    }
}

pub enum NodeOrBuilder {
    Built(SimpleNode),
    Builder(SimpleNodeBuilder),
}
impl From<SimpleNode> for NodeOrBuilder {
    fn from(n: SimpleNode) -> Self {
        NodeOrBuilder::Built(n)
    }
}
impl From<SimpleNodeBuilder> for NodeOrBuilder {
    fn from(b: SimpleNodeBuilder) -> Self {
        NodeOrBuilder::Builder(b)
    }
}

/// Start a document node.
pub fn doc() -> SimpleNodeBuilder {
    SimpleNodeBuilder::new(NodeKind::Document, None)
}

/// Start an element with an unqualified name.
pub fn elem(name: &str) -> SimpleNodeBuilder {
    SimpleNodeBuilder::new(NodeKind::Element, Some(QName::local(name)))
}

/// Start an element with a resolved qualified name.
pub fn elem_qname(name: QName) -> SimpleNodeBuilder {
    SimpleNodeBuilder::new(NodeKind::Element, Some(name))
}

pub fn attr(name: &str, value: &str) -> SimpleNode {
    SimpleNode::new(
        NodeKind::Attribute,
        Some(QName::local(name)),
        Some(value.to_string()),
    )
}

pub fn attr_qname(name: QName, value: &str) -> SimpleNode {
    SimpleNode::new(NodeKind::Attribute, Some(name), Some(value.to_string()))
}

pub fn text(value: &str) -> SimpleNode {
    SimpleNode::new(NodeKind::Text, None, Some(value.to_string()))
}

pub fn cdata(value: &str) -> SimpleNode {
    SimpleNode::new(NodeKind::CData, None, Some(value.to_string()))
}

pub fn comment(value: &str) -> SimpleNode {
    SimpleNode::new(NodeKind::Comment, None, Some(value.to_string()))
}

pub fn pi(target: &str, data: &str) -> SimpleNode {
    SimpleNode::new(
        NodeKind::ProcessingInstruction,
        Some(QName::local(target)),
        Some(data.to_string()),
    )
}

impl DocumentParser for SimpleNode {
    fn parse_str(input: &str) -> Result<Self> {
        Reader::new(input).parse_document()
    }
}

/// Namespace bindings in scope, innermost last. An empty URI unbinds.
type ScopeStack = SmallVec<[(CompactString, CompactString); 8]>;

/// A minimal well-formed XML reader. Covers the declaration, DOCTYPE
/// skipping, comments, processing instructions, CDATA, the predefined
/// and numeric character entities, and namespace resolution. It does not
/// process DTDs or external entities.
struct Reader<'a> {
    rest: &'a str,
    scopes: ScopeStack,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Reader {
            rest: input,
            scopes: SmallVec::new(),
        }
    }

    fn err(msg: impl Into<String>) -> Error {
        Error::Parse(msg.into())
    }

    fn skip_ws(&mut self) {
        self.rest = self
            .rest
            .trim_start_matches(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
    }

    fn eat(&mut self, prefix: &str) -> bool {
        if let Some(rest) = self.rest.strip_prefix(prefix) {
            self.rest = rest;
            true
        } else {
            false
        }
    }

    fn take_until(&mut self, terminator: &str, what: &str) -> Result<&'a str> {
        match self.rest.find(terminator) {
            Some(pos) => {
                let content = &self.rest[..pos];
                self.rest = &self.rest[pos + terminator.len()..];
                Ok(content)
            }
            None => Err(Self::err(format!("unterminated {what}"))),
        }
    }

    fn parse_document(mut self) -> Result<SimpleNode> {
        let mut document = doc();

        if self.rest.starts_with('\u{feff}') {
            self.rest = &self.rest['\u{feff}'.len_utf8()..];
        }
        self.skip_ws();
        if self.eat("<?xml") {
            self.take_until("?>", "XML declaration")?;
        }

        let mut saw_root = false;
        loop {
            self.skip_ws();
            if self.rest.is_empty() {
                break;
            }
            if self.eat("<!--") {
                let body = self.take_until("-->", "comment")?;
                document = document.child(comment(body));
            } else if self.eat("<!DOCTYPE") {
                self.take_until(">", "DOCTYPE")?;
            } else if self.rest.starts_with("<?") {
                document = document.child(self.parse_pi()?);
            } else if self.rest.starts_with('<') {
                if saw_root {
                    return Err(Self::err("content after document element"));
                }
                document = document.child(self.parse_element()?);
                saw_root = true;
            } else {
                return Err(Self::err("text outside document element"));
            }
        }

        if !saw_root {
            return Err(Self::err("no document element"));
        }
        Ok(document.build())
    }

    fn parse_pi(&mut self) -> Result<SimpleNode> {
        self.eat("<?");
        let body = self.take_until("?>", "processing instruction")?;
        let (target, data) = match body.find(|c: char| c.is_ascii_whitespace()) {
            Some(pos) => (&body[..pos], body[pos..].trim_start()),
            None => (body, ""),
        };
        if target.is_empty() {
            return Err(Self::err("processing instruction without a target"));
        }
        Ok(pi(target, data))
    }

    fn parse_element(&mut self) -> Result<SimpleNode> {
        self.eat("<");
        let raw_name = self.read_name()?;
        let scope_mark = self.scopes.len();

        // Attributes first, unresolved: an xmlns declaration binds for
        // the whole tag no matter where it appears in it.
        let mut raw_attrs: Vec<(&'a str, String)> = Vec::new();
        let self_closing = loop {
            self.skip_ws();
            if self.eat("/>") {
                break true;
            }
            if self.eat(">") {
                break false;
            }
            let name = self.read_name()?;
            self.skip_ws();
            if !self.eat("=") {
                return Err(Self::err(format!("attribute {name:?} without a value")));
            }
            self.skip_ws();
            let value = self.read_quoted_value()?;
            raw_attrs.push((name, value));
        };

        for (name, value) in &raw_attrs {
            if *name == "xmlns" {
                self.scopes
                    .push((CompactString::const_new(""), value.as_str().into()));
            } else if let Some(prefix) = name.strip_prefix("xmlns:") {
                self.scopes.push((prefix.into(), value.as_str().into()));
            }
        }

        let mut builder = elem_qname(self.resolve_element_name(raw_name)?);
        for (name, value) in &raw_attrs {
            builder = builder.attr(attr_qname(self.resolve_attr_name(name)?, value));
        }

        if !self_closing {
            builder = self.parse_content(builder, raw_name)?;
        }

        self.scopes.truncate(scope_mark);
        Ok(builder.build())
    }

    fn parse_content(
        &mut self,
        mut builder: SimpleNodeBuilder,
        raw_name: &str,
    ) -> Result<SimpleNodeBuilder> {
        loop {
            if self.eat("</") {
                let close = self.read_name()?;
                if close != raw_name {
                    return Err(Self::err(format!(
                        "mismatched end tag: expected {raw_name:?}, found {close:?}"
                    )));
                }
                self.skip_ws();
                if !self.eat(">") {
                    return Err(Self::err("malformed end tag"));
                }
                return Ok(builder);
            }
            if self.eat("<!--") {
                let body = self.take_until("-->", "comment")?;
                builder = builder.child(comment(body));
            } else if self.eat("<![CDATA[") {
                let body = self.take_until("]]>", "CDATA section")?;
                builder = builder.child(cdata(body));
            } else if self.rest.starts_with("<?") {
                let node = self.parse_pi()?;
                builder = builder.child(node);
            } else if self.rest.starts_with('<') {
                let node = self.parse_element()?;
                builder = builder.child(node);
            } else if self.rest.is_empty() {
                return Err(Self::err(format!("unclosed element {raw_name:?}")));
            } else {
                let end = self.rest.find('<').unwrap_or(self.rest.len());
                let (raw, rest) = self.rest.split_at(end);
                self.rest = rest;
                builder = builder.child(text(&decode_entities(raw)?));
            }
        }
    }

    fn read_name(&mut self) -> Result<&'a str> {
        let end = self
            .rest
            .find(|c: char| c.is_ascii_whitespace() || matches!(c, '=' | '>' | '/' | '<'))
            .unwrap_or(self.rest.len());
        if end == 0 {
            return Err(Self::err("expected a name"));
        }
        let (name, rest) = self.rest.split_at(end);
        self.rest = rest;
        Ok(name)
    }

    fn read_quoted_value(&mut self) -> Result<String> {
        let quote = match self.rest.chars().next() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(Self::err("attribute value must be quoted")),
        };
        self.rest = &self.rest[1..];
        let raw = self.take_until(&quote.to_string(), "attribute value")?;
        decode_entities(raw)
    }

    fn lookup(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(XML_NS_URI);
        }
        self.scopes
            .iter()
            .rev()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
            .filter(|uri| !uri.is_empty())
    }

    fn resolve_element_name(&self, raw: &str) -> Result<QName> {
        match raw.split_once(':') {
            Some((prefix, local)) => {
                let uri = self
                    .lookup(prefix)
                    .ok_or_else(|| Self::err(format!("undeclared namespace prefix {prefix:?}")))?;
                Ok(QName {
                    prefix: Some(prefix.into()),
                    local: local.into(),
                    ns_uri: Some(uri.into()),
                })
            }
            None => Ok(QName {
                prefix: None,
                local: raw.into(),
                ns_uri: self.lookup("").map(CompactString::from),
            }),
        }
    }

    /// Attribute names never take the default namespace, and xmlns
    /// declarations stay plain attributes so serialization round-trips
    /// them.
    fn resolve_attr_name(&self, raw: &str) -> Result<QName> {
        match raw.split_once(':') {
            Some((prefix, local)) if prefix != "xmlns" => {
                let uri = self
                    .lookup(prefix)
                    .ok_or_else(|| Self::err(format!("undeclared namespace prefix {prefix:?}")))?;
                Ok(QName {
                    prefix: Some(prefix.into()),
                    local: local.into(),
                    ns_uri: Some(uri.into()),
                })
            }
            Some((prefix, local)) => Ok(QName {
                prefix: Some(prefix.into()),
                local: local.into(),
                ns_uri: None,
            }),
            None => Ok(QName::local(raw)),
        }
    }
}

fn decode_entities(raw: &str) -> Result<String> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let end = rest
            .find(';')
            .ok_or_else(|| Error::Parse("unterminated entity reference".to_string()))?;
        let entity = &rest[1..end];
        match entity {
            "amp" => out.push('&'),
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "quot" => out.push('"'),
            "apos" => out.push('\''),
            _ => {
                let code = entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .or_else(|| entity.strip_prefix('#').map(str::parse))
                    .transpose()
                    .ok()
                    .flatten()
                    .ok_or_else(|| Error::Parse(format!("unknown entity &{entity};")))?;
                let c = char::from_u32(code)
                    .ok_or_else(|| Error::Parse(format!("invalid character reference &{entity};")))?;
                out.push(c);
            }
        }
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
