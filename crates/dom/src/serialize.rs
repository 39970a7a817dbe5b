//! Compact markup rendering of snapshots, for test assertions and debugging.
//!
//! Elements created in a non-default namespace carry an `ns` pseudo-attribute
//! only when their namespace differs from their parent's.

use crate::types::Node;

pub fn to_markup(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, None, &mut out);
    out
}

fn write_node(node: &Node, parent_ns: Option<&str>, out: &mut String) {
    match node {
        Node::Document { children, .. } | Node::DocumentFragment { children, .. } => {
            for child in children {
                write_node(child, None, out);
            }
        }
        Node::Element {
            name,
            namespace,
            children,
            ..
        } => {
            let ns = namespace.as_deref();
            out.push('<');
            out.push_str(name);
            if ns != parent_ns {
                out.push_str(" ns=\"");
                out.push_str(ns.unwrap_or(""));
                out.push('"');
            }
            out.push('>');
            for child in children {
                write_node(child, ns, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        Node::Text { text, .. } => out.push_str(text),
        Node::Comment { text, .. } => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
    }
}
