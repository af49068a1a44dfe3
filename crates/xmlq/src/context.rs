//! The query context: a document handle, a namespace table and the
//! current node set, with chainable operations in the manner of jQuery.
//!
//! Every operation returns a new context sharing the document and
//! carrying a copy of the namespace table; the receiver is never
//! modified. Selector arguments are compiled before any node is
//! visited, so syntax errors surface even on an empty context.

use std::path::Path;

use compact_str::CompactString;
use tracing::trace;

use crate::error::Result;
use crate::model::{DocumentParser, NodeKind, XmlNode};
use crate::namespace::NamespaceTable;
use crate::nodelist::NodeList;
use crate::parser::compile;
use crate::selector::{CompileMode, Selector};
use crate::serialize;
use crate::{axes, evaluator};

/// A set of nodes under query, tied to the document they came from.
#[derive(Debug, Clone)]
pub struct Context<N: XmlNode> {
    document: Option<N>,
    namespaces: NamespaceTable,
    current: NodeList<N>,
}

impl<N: XmlNode> Default for Context<N> {
    fn default() -> Self {
        Context::new()
    }
}

impl<N: XmlNode> Context<N> {
    /// An empty context. All query operations on it succeed and yield
    /// empty results; extraction yields empty strings.
    pub fn new() -> Self {
        Context {
            document: None,
            namespaces: NamespaceTable::new(),
            current: NodeList::new(),
        }
    }

    /// Wrap an existing document node. The initial node set is the
    /// document itself.
    pub fn from_document(document: N) -> Self {
        let mut current = NodeList::new();
        current.push(document.clone());
        Context {
            document: Some(document),
            namespaces: NamespaceTable::new(),
            current,
        }
    }

    /// A sibling context over the same document with a new node set.
    fn derived(&self, current: NodeList<N>) -> Self {
        Context {
            document: self.document.clone(),
            namespaces: self.namespaces.clone(),
            current,
        }
    }

    pub fn document(&self) -> Option<&N> {
        self.document.as_ref()
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&N> {
        self.current.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &N> {
        self.current.iter()
    }

    pub fn nodes(&self) -> &NodeList<N> {
        &self.current
    }

    /// Register a namespace prefix for use in selectors. Registering a
    /// prefix again replaces the earlier URI; an empty URI makes the
    /// prefix match elements without a namespace.
    pub fn add_namespace(&mut self, prefix: impl Into<CompactString>, uri: impl Into<CompactString>) {
        self.namespaces.add(prefix, uri);
    }

    pub fn namespace_for_prefix(&self, prefix: &str) -> Option<&str> {
        self.namespaces.get(prefix)
    }

    /// Search below every node in the set and collect all matches, in
    /// document order per input node. Duplicates are kept.
    pub fn find(&self, selector: &str) -> Result<Self> {
        trace!(selector, nodes = self.current.len(), "find");
        let sel = compile(selector, CompileMode::Search)?;
        let current = evaluator::evaluate(&sel, &self.current, &self.namespaces)?;
        Ok(self.derived(current))
    }

    /// Alias for [`Context::find`].
    pub fn search(&self, selector: &str) -> Result<Self> {
        self.find(selector)
    }

    /// Keep only the nodes the selector matches in place.
    pub fn filter(&self, selector: &str) -> Result<Self> {
        let sel = compile(selector, CompileMode::Filter)?;
        let mut current = NodeList::new();
        for node in &self.current {
            if evaluator::node_passes_filter(&sel, node, &self.namespaces)? {
                current.push(node.clone());
            }
        }
        Ok(self.derived(current))
    }

    /// Keep only the nodes the selector does not match: the complement
    /// of [`Context::filter`].
    pub fn not(&self, selector: &str) -> Result<Self> {
        let sel = compile(selector, CompileMode::Filter)?;
        let mut current = NodeList::new();
        for node in &self.current {
            if !evaluator::node_passes_filter(&sel, node, &self.namespaces)? {
                current.push(node.clone());
            }
        }
        Ok(self.derived(current))
    }

    /// Element children of every node, optionally filtered in place by
    /// `selector`.
    pub fn children(&self, selector: Option<&str>) -> Result<Self> {
        let sel = self.compile_opt_filter(selector)?;
        let mut current = NodeList::new();
        for node in &self.current {
            for child in axes::element_children(node) {
                if self.passes(sel.as_ref(), &child)? {
                    current.push(child);
                }
            }
        }
        Ok(self.derived(current))
    }

    /// For every node, the nearest of the node itself and its element
    /// ancestors that matches the selector.
    pub fn closest(&self, selector: &str) -> Result<Self> {
        let sel = compile(selector, CompileMode::Filter)?;
        let mut current = NodeList::new();
        for node in &self.current {
            if evaluator::node_passes_filter(&sel, node, &self.namespaces)? {
                current.push(node.clone());
                continue;
            }
            for ancestor in axes::element_ancestors(node) {
                if evaluator::node_passes_filter(&sel, &ancestor, &self.namespaces)? {
                    current.push(ancestor);
                    break;
                }
            }
        }
        Ok(self.derived(current))
    }

    /// The parent element of every node, optionally filtered.
    pub fn parent(&self, selector: Option<&str>) -> Result<Self> {
        let sel = self.compile_opt_filter(selector)?;
        let mut current = NodeList::new();
        for node in &self.current {
            if let Some(p) = node.parent().filter(XmlNode::is_element) {
                if self.passes(sel.as_ref(), &p)? {
                    current.push(p);
                }
            }
        }
        Ok(self.derived(current))
    }

    /// All element ancestors of every node, nearest-first, optionally
    /// filtered. Ancestors shared between input nodes appear once per
    /// input node.
    pub fn parents(&self, selector: Option<&str>) -> Result<Self> {
        let sel = self.compile_opt_filter(selector)?;
        let mut current = NodeList::new();
        for node in &self.current {
            for ancestor in axes::element_ancestors(node) {
                if self.passes(sel.as_ref(), &ancestor)? {
                    current.push(ancestor);
                }
            }
        }
        Ok(self.derived(current))
    }

    /// Element ancestors of every node, nearest-first, up to but not
    /// including the first one the selector matches. With no match the
    /// whole ancestor chain is returned.
    pub fn parents_until(&self, selector: &str) -> Result<Self> {
        let sel = compile(selector, CompileMode::Filter)?;
        let mut current = NodeList::new();
        for node in &self.current {
            for ancestor in axes::element_ancestors(node) {
                if evaluator::node_passes_filter(&sel, &ancestor, &self.namespaces)? {
                    break;
                }
                current.push(ancestor);
            }
        }
        Ok(self.derived(current))
    }

    /// The next element sibling of every node, optionally filtered.
    pub fn next(&self, selector: Option<&str>) -> Result<Self> {
        let sel = self.compile_opt_filter(selector)?;
        let mut current = NodeList::new();
        for node in &self.current {
            if let Some(sib) = node.next_element_sibling() {
                if self.passes(sel.as_ref(), &sib)? {
                    current.push(sib);
                }
            }
        }
        Ok(self.derived(current))
    }

    /// All following element siblings of every node, nearest-first,
    /// optionally filtered.
    pub fn next_all(&self, selector: Option<&str>) -> Result<Self> {
        let sel = self.compile_opt_filter(selector)?;
        let mut current = NodeList::new();
        for node in &self.current {
            for sib in axes::following_element_siblings(node) {
                if self.passes(sel.as_ref(), &sib)? {
                    current.push(sib);
                }
            }
        }
        Ok(self.derived(current))
    }

    /// Following element siblings of every node up to but not including
    /// the first one the selector matches.
    pub fn next_until(&self, selector: &str) -> Result<Self> {
        let sel = compile(selector, CompileMode::Filter)?;
        let mut current = NodeList::new();
        for node in &self.current {
            for sib in axes::following_element_siblings(node) {
                if evaluator::node_passes_filter(&sel, &sib, &self.namespaces)? {
                    break;
                }
                current.push(sib);
            }
        }
        Ok(self.derived(current))
    }

    /// The previous element sibling of every node, optionally filtered.
    pub fn prev(&self, selector: Option<&str>) -> Result<Self> {
        let sel = self.compile_opt_filter(selector)?;
        let mut current = NodeList::new();
        for node in &self.current {
            if let Some(sib) = node.previous_element_sibling() {
                if self.passes(sel.as_ref(), &sib)? {
                    current.push(sib);
                }
            }
        }
        Ok(self.derived(current))
    }

    /// All preceding element siblings of every node, nearest-first
    /// (reverse document order), optionally filtered.
    pub fn prev_all(&self, selector: Option<&str>) -> Result<Self> {
        let sel = self.compile_opt_filter(selector)?;
        let mut current = NodeList::new();
        for node in &self.current {
            for sib in axes::preceding_element_siblings(node) {
                if self.passes(sel.as_ref(), &sib)? {
                    current.push(sib);
                }
            }
        }
        Ok(self.derived(current))
    }

    /// Preceding element siblings of every node, nearest-first, up to
    /// but not including the first one the selector matches.
    pub fn prev_until(&self, selector: &str) -> Result<Self> {
        let sel = compile(selector, CompileMode::Filter)?;
        let mut current = NodeList::new();
        for node in &self.current {
            for sib in axes::preceding_element_siblings(node) {
                if evaluator::node_passes_filter(&sel, &sib, &self.namespaces)? {
                    break;
                }
                current.push(sib);
            }
        }
        Ok(self.derived(current))
    }

    /// A context holding only the first node of the set.
    pub fn first(&self) -> Self {
        let mut current = NodeList::new();
        if let Some(n) = self.current.first() {
            current.push(n.clone());
        }
        self.derived(current)
    }

    /// A context holding only the last node of the set.
    pub fn last(&self) -> Self {
        let mut current = NodeList::new();
        if let Some(n) = self.current.last() {
            current.push(n.clone());
        }
        self.derived(current)
    }

    /// Character content of the first node's subtree, or the empty
    /// string for an empty set.
    pub fn text(&self) -> String {
        self.current.first().map(XmlNode::text).unwrap_or_default()
    }

    /// Value of the named attribute on the first node. `None` when the
    /// set is empty, the node carries no such attribute, or the node is
    /// not an element.
    pub fn attr(&self, name: &str) -> Option<String> {
        self.current.first().and_then(|n| n.attribute(name))
    }

    /// Serialize the first node. A document node produces a full dump
    /// with an XML declaration; any other node produces its subtree
    /// markup. Empty sets produce the empty string.
    pub fn xml(&self) -> String {
        match self.current.first() {
            None => String::new(),
            Some(n) if n.kind() == NodeKind::Document => serialize::document(n),
            Some(n) => serialize::subtree(n),
        }
    }

    fn compile_opt_filter(&self, selector: Option<&str>) -> Result<Option<Selector>> {
        selector.map(|s| compile(s, CompileMode::Filter)).transpose()
    }

    fn passes(&self, sel: Option<&Selector>, node: &N) -> Result<bool> {
        match sel {
            None => Ok(true),
            Some(sel) => evaluator::node_passes_filter(sel, node, &self.namespaces),
        }
    }
}

impl<N: DocumentParser> Context<N> {
    /// Parse XML text into a fresh document and wrap it.
    pub fn parse_str(text: &str) -> Result<Self> {
        Ok(Context::from_document(N::parse_str(text)?))
    }

    /// Read and parse an XML file.
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Context::from_document(N::parse_file(path.as_ref())?))
    }
}

impl<'a, N: XmlNode> IntoIterator for &'a Context<N> {
    type Item = &'a N;
    type IntoIter = core::slice::Iter<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.current.iter()
    }
}
