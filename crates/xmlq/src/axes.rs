//! Tree traversals shared by the evaluator and the context operations.
//!
//! All walks yield element nodes only, in the order the axis defines:
//! document order for downward and forward axes, nearest-first for
//! ancestors and preceding siblings.

use crate::model::XmlNode;

/// Visit every element in `node`'s subtree, preorder, excluding `node`
/// itself. The walk descends through children of any kind so elements
/// below mixed content are still reached.
pub fn for_each_descendant_element<N: XmlNode>(node: &N, visit: &mut impl FnMut(&N)) {
    for child in node.children() {
        if child.is_element() {
            visit(&child);
        }
        for_each_descendant_element(&child, visit);
    }
}

/// Immediate element children, document order.
pub fn element_children<N: XmlNode>(node: &N) -> Vec<N> {
    node.children().into_iter().filter(N::is_element).collect()
}

/// Element ancestors, nearest-first. The walk stops at the first
/// non-element ancestor, so the document node is never included.
pub fn element_ancestors<N: XmlNode>(node: &N) -> Vec<N> {
    let mut out = Vec::new();
    let mut cur = node.parent();
    while let Some(p) = cur {
        if !p.is_element() {
            break;
        }
        cur = p.parent();
        out.push(p);
    }
    out
}

/// Element siblings after `node`, nearest-first.
pub fn following_element_siblings<N: XmlNode>(node: &N) -> Vec<N> {
    let mut out = Vec::new();
    let mut cur = node.next_element_sibling();
    while let Some(s) = cur {
        cur = s.next_element_sibling();
        out.push(s);
    }
    out
}

/// Element siblings before `node`, nearest-first (reverse document
/// order).
pub fn preceding_element_siblings<N: XmlNode>(node: &N) -> Vec<N> {
    let mut out = Vec::new();
    let mut cur = node.previous_element_sibling();
    while let Some(s) = cur {
        cur = s.previous_element_sibling();
        out.push(s);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentParser;
    use crate::simple_node::SimpleNode;

    fn names(nodes: &[SimpleNode]) -> Vec<String> {
        nodes
            .iter()
            .map(|n| n.name().unwrap().local.to_string())
            .collect()
    }

    fn fixture() -> SimpleNode {
        SimpleNode::parse_str(
            "<doc><a><b/>text<c><d/></c></a><e/><!-- skip --><f/></doc>",
        )
        .unwrap()
    }

    #[test]
    fn descendant_walk_is_preorder_and_elements_only() {
        let doc = fixture();
        let mut seen = Vec::new();
        for_each_descendant_element(&doc, &mut |n| seen.push(n.clone()));
        assert_eq!(names(&seen), ["doc", "a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn element_children_skip_text_and_comments() {
        let doc = fixture();
        let root = doc.first_child().unwrap();
        let a = root.first_child().unwrap();
        assert_eq!(names(&element_children(&a)), ["b", "c"]);
        assert_eq!(names(&element_children(&root)), ["a", "e", "f"]);
    }

    #[test]
    fn ancestors_are_nearest_first_and_exclude_the_document() {
        let doc = fixture();
        let root = doc.first_child().unwrap();
        let a = root.first_child().unwrap();
        let c = a.last_child().unwrap();
        let d = c.first_child().unwrap();
        assert_eq!(names(&element_ancestors(&d)), ["c", "a", "doc"]);
        assert!(element_ancestors(&root).is_empty());
    }

    #[test]
    fn sibling_walks_run_both_directions() {
        let doc = fixture();
        let root = doc.first_child().unwrap();
        let a = root.first_child().unwrap();
        let f = root.last_child().unwrap();
        assert_eq!(names(&following_element_siblings(&a)), ["e", "f"]);
        assert_eq!(names(&preceding_element_siblings(&f)), ["e", "a"]);
    }
}
