//! HTML serialization.
//!
//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
//!
//! Backs the `innerHTML`/`outerHTML` getters of the DOM bindings.

use wombat_dom::{DomTree, NodeId, NodeType};

use crate::parser::is_void_element;

/// Serialize a node and its subtree (the `outerHTML` view).
#[must_use]
pub fn serialize_node(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, &mut out);
    out
}

/// Serialize the children of a node (the `innerHTML` view).
#[must_use]
pub fn serialize_children(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    for &child in tree.children(id) {
        write_node(tree, child, &mut out);
    }
    out
}

fn write_node(tree: &DomTree, id: NodeId, out: &mut String) {
    match tree.get(id).map(|n| &n.node_type) {
        Some(NodeType::Document) => {
            for &child in tree.children(id) {
                write_node(tree, child, out);
            }
        }
        Some(NodeType::DocumentType(d)) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(&d.name);
            out.push('>');
        }
        Some(NodeType::Element(e)) => {
            out.push('<');
            out.push_str(&e.tag_name);
            // Sort for deterministic output; attribute order is not
            // observable in the DOM.
            let mut attrs: Vec<(&String, &String)> = e.attrs.iter().collect();
            attrs.sort_by_key(|(k, _)| k.as_str());
            for (name, value) in attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            out.push('>');
            if is_void_element(&e.tag_name) {
                return;
            }
            for &child in tree.children(id) {
                write_node(tree, child, out);
            }
            out.push_str("</");
            out.push_str(&e.tag_name);
            out.push('>');
        }
        Some(NodeType::Text(t)) => {
            // Raw-text element content is emitted verbatim.
            let parent_is_raw = tree
                .parent(id)
                .and_then(|p| tree.as_element(p))
                .is_some_and(|e| matches!(e.tag_name.as_str(), "script" | "style"));
            if parent_is_raw {
                out.push_str(t);
            } else {
                out.push_str(&escape_text(t));
            }
        }
        Some(NodeType::Comment(c)) => {
            out.push_str("<!--");
            out.push_str(c);
            out.push_str("-->");
        }
        None => {}
    }
}

/// "Escaping a string... replace any occurrence of the '&' character by
/// '&amp;', any occurrence of the U+00A0 character by '&nbsp;'," plus the
/// angle brackets for text content.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
    out
}
