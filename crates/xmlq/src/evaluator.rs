//! Pipeline execution.
//!
//! A compiled selector runs depth-first: each step fans its input node
//! out into candidates, and the remaining steps run per candidate before
//! the next candidate is considered. That keeps results in document
//! order for downward axes without a sort pass.
//!
//! Namespace prefixes are resolved here, not at compile time, so one
//! compiled selector can run against contexts with different prefix
//! registrations.

use tracing::trace;

use crate::axes;
use crate::error::{Error, Result};
use crate::model::XmlNode;
use crate::namespace::NamespaceTable;
use crate::nodelist::NodeList;
use crate::selector::{NameTest, NsSpec, Selector, StepOp};

/// A [`NameTest`] with its prefix resolved against a namespace table.
#[derive(Debug, Clone, Copy)]
struct ResolvedTest<'a> {
    name: Option<&'a str>,
    ns: ResolvedNs<'a>,
}

#[derive(Debug, Clone, Copy)]
enum ResolvedNs<'a> {
    /// No prefix in the selector: any namespace, or none, is fine.
    Any,
    /// Prefix registered with the empty URI: only nodes without a
    /// namespace match.
    Absent,
    Uri(&'a str),
}

impl<'a> ResolvedTest<'a> {
    fn resolve(test: &'a NameTest, namespaces: &'a NamespaceTable) -> Result<Self> {
        let ns = match &test.ns {
            NsSpec::Any => ResolvedNs::Any,
            NsSpec::None => ResolvedNs::Absent,
            NsSpec::Prefix(prefix) => match namespaces.get(prefix) {
                Some("") => ResolvedNs::Absent,
                Some(uri) => ResolvedNs::Uri(uri),
                None => return Err(Error::UnknownNamespacePrefix(prefix.clone())),
            },
        };
        Ok(ResolvedTest {
            name: test.name.as_deref(),
            ns,
        })
    }

    fn matches<N: XmlNode>(&self, node: &N) -> bool {
        if !node.is_element() {
            return false;
        }
        let Some(qname) = node.name() else {
            return false;
        };
        if let Some(want) = self.name {
            if qname.local != want {
                return false;
            }
        }
        match self.ns {
            ResolvedNs::Any => true,
            ResolvedNs::Absent => qname.ns_uri.is_none(),
            ResolvedNs::Uri(uri) => qname.ns_uri.as_deref() == Some(uri),
        }
    }
}

/// Run `selector` over every node of `input`, in order, appending all
/// results to one output list. Duplicates are kept.
pub fn evaluate<N: XmlNode>(
    selector: &Selector,
    input: &NodeList<N>,
    namespaces: &NamespaceTable,
) -> Result<NodeList<N>> {
    trace!(steps = selector.len(), input = input.len(), "evaluating selector");
    let mut out = NodeList::new();
    for node in input {
        eval_steps(&selector.steps, node, namespaces, &mut out)?;
    }
    Ok(out)
}

/// Evaluate a single node against a full pipeline. Used by the filter
/// predicate, where a node passes iff the pipeline yields exactly that
/// node and nothing else.
pub fn node_passes_filter<N: XmlNode>(
    selector: &Selector,
    node: &N,
    namespaces: &NamespaceTable,
) -> Result<bool> {
    let mut out = NodeList::new();
    eval_steps(&selector.steps, node, namespaces, &mut out)?;
    Ok(out.len() == 1 && out.first() == Some(node))
}

fn eval_steps<N: XmlNode>(
    steps: &[StepOp],
    node: &N,
    namespaces: &NamespaceTable,
    out: &mut NodeList<N>,
) -> Result<()> {
    let Some((op, rest)) = steps.split_first() else {
        return Ok(());
    };

    if rest.is_empty() {
        // Last step: emit straight into the result.
        return apply(op, node, namespaces, out);
    }

    let mut candidates = NodeList::new();
    apply(op, node, namespaces, &mut candidates)?;
    for candidate in &candidates {
        eval_steps(rest, candidate, namespaces, out)?;
    }
    Ok(())
}

fn apply<N: XmlNode>(
    op: &StepOp,
    node: &N,
    namespaces: &NamespaceTable,
    out: &mut NodeList<N>,
) -> Result<()> {
    match op {
        StepOp::Descendants(test) => {
            let test = ResolvedTest::resolve(test, namespaces)?;
            axes::for_each_descendant_element(node, &mut |n| {
                if test.matches(n) {
                    out.push(n.clone());
                }
            });
        }
        StepOp::Children(test) => {
            let test = ResolvedTest::resolve(test, namespaces)?;
            for child in axes::element_children(node) {
                if test.matches(&child) {
                    out.push(child);
                }
            }
        }
        StepOp::NextSibling(test) => {
            let test = ResolvedTest::resolve(test, namespaces)?;
            if let Some(sib) = node.next_element_sibling() {
                if test.matches(&sib) {
                    out.push(sib);
                }
            }
        }
        StepOp::SelfMatch(test) => {
            let test = ResolvedTest::resolve(test, namespaces)?;
            if test.matches(node) {
                out.push(node.clone());
            }
        }
        StepOp::AttrEquals { name, value } => {
            if node.attribute(name).as_deref() == Some(value.as_str()) {
                out.push(node.clone());
            }
        }
        StepOp::CopySelf => out.push(node.clone()),
    }
    Ok(())
}
