//! Markup output for extraction. Serialization is minimal and
//! deterministic: no pretty-printing, attributes in document order,
//! empty elements collapsed to the self-closing form.

use crate::model::{NodeKind, XmlNode};

/// Serialize a full document: XML declaration, then every child of the
/// document node, followed by a trailing newline.
pub fn document<N: XmlNode>(doc: &N) -> String {
    let mut out = String::from("<?xml version=\"1.0\"?>\n");
    for child in doc.children() {
        write_node(&child, &mut out);
    }
    out.push('\n');
    out
}

/// Serialize a single node's subtree, with no declaration or trailing
/// newline.
pub fn subtree<N: XmlNode>(node: &N) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node<N: XmlNode>(node: &N, out: &mut String) {
    match node.kind() {
        NodeKind::Element => write_element(node, out),
        NodeKind::Text => {
            if let Some(v) = node.value() {
                escape_text(&v, out);
            }
        }
        NodeKind::CData => {
            if let Some(v) = node.value() {
                out.push_str("<![CDATA[");
                out.push_str(&v);
                out.push_str("]]>");
            }
        }
        NodeKind::Comment => {
            if let Some(v) = node.value() {
                out.push_str("<!--");
                out.push_str(&v);
                out.push_str("-->");
            }
        }
        NodeKind::ProcessingInstruction => {
            out.push_str("<?");
            if let Some(name) = node.name() {
                out.push_str(&name.as_written());
            }
            if let Some(v) = node.value() {
                if !v.is_empty() {
                    out.push(' ');
                    out.push_str(&v);
                }
            }
            out.push_str("?>");
        }
        NodeKind::Document => {
            for child in node.children() {
                write_node(&child, out);
            }
        }
        NodeKind::Attribute => {}
    }
}

fn write_element<N: XmlNode>(node: &N, out: &mut String) {
    let name = match node.name() {
        Some(q) => q.as_written(),
        None => return,
    };

    out.push('<');
    out.push_str(&name);
    for attr in node.attributes() {
        if let (Some(aname), Some(value)) = (attr.name(), attr.value()) {
            out.push(' ');
            out.push_str(&aname.as_written());
            out.push_str("=\"");
            escape_attr(&value, out);
            out.push('"');
        }
    }

    let children = node.children();
    if children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in children {
        write_node(&child, out);
    }
    out.push_str("</");
    out.push_str(&name);
    out.push('>');
}

fn escape_text(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
