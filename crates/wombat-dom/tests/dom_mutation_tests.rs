//! Integration tests for DOM tree construction and mutation.

use wombat_dom::{DomTree, ElementData, NodeId, NodeType};

fn make_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag)))
}

#[test]
fn test_new_tree_has_document_root() {
    let tree = DomTree::new();
    assert_eq!(tree.root(), NodeId::ROOT);
    assert!(matches!(
        tree.get(NodeId::ROOT).unwrap().node_type,
        NodeType::Document
    ));
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_append_child_links_parent_and_siblings() {
    let mut tree = DomTree::new();
    let a = make_element(&mut tree, "div");
    let b = make_element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, a);
    tree.append_child(NodeId::ROOT, b);

    assert_eq!(tree.parent(a), Some(NodeId::ROOT));
    assert_eq!(tree.parent(b), Some(NodeId::ROOT));
    assert_eq!(tree.children(NodeId::ROOT), &[a, b]);
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(a));
    assert_eq!(tree.prev_sibling(a), None);
    assert_eq!(tree.next_sibling(b), None);
}

#[test]
fn test_detach_unlinks_in_one_step() {
    let mut tree = DomTree::new();
    let a = make_element(&mut tree, "a");
    let b = make_element(&mut tree, "b");
    let c = make_element(&mut tree, "c");
    tree.append_child(NodeId::ROOT, a);
    tree.append_child(NodeId::ROOT, b);
    tree.append_child(NodeId::ROOT, c);

    tree.detach(b);

    // No dangling back-pointer, siblings re-stitched around the gap.
    assert_eq!(tree.parent(b), None);
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.next_sibling(b), None);
    assert_eq!(tree.children(NodeId::ROOT), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
}

#[test]
fn test_insert_before() {
    let mut tree = DomTree::new();
    let a = make_element(&mut tree, "a");
    let c = make_element(&mut tree, "c");
    tree.append_child(NodeId::ROOT, a);
    tree.append_child(NodeId::ROOT, c);

    let b = make_element(&mut tree, "b");
    tree.insert_before(NodeId::ROOT, b, c);

    assert_eq!(tree.children(NodeId::ROOT), &[a, b, c]);
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(b));
}

#[test]
fn test_append_reparents() {
    let mut tree = DomTree::new();
    let div = make_element(&mut tree, "div");
    let span = make_element(&mut tree, "span");
    let child = make_element(&mut tree, "em");
    tree.append_child(NodeId::ROOT, div);
    tree.append_child(NodeId::ROOT, span);
    tree.append_child(div, child);

    // Appending an already-attached node moves it.
    tree.append_child(span, child);

    assert!(tree.children(div).is_empty());
    assert_eq!(tree.children(span), &[child]);
    assert_eq!(tree.parent(child), Some(span));
}

#[test]
fn test_parent_children_consistency() {
    // Every child's parent pointer is its containing node, and each child
    // appears exactly once in its parent's list.
    let mut tree = DomTree::new();
    let html = make_element(&mut tree, "html");
    let body = make_element(&mut tree, "body");
    let p = make_element(&mut tree, "p");
    let text = tree.create_text("hi");
    tree.append_child(NodeId::ROOT, html);
    tree.append_child(html, body);
    tree.append_child(body, p);
    tree.append_child(p, text);

    for id in tree.iter_all().collect::<Vec<_>>() {
        for &child in tree.children(id) {
            assert_eq!(tree.parent(child), Some(id));
            let occurrences = tree.children(id).iter().filter(|&&c| c == child).count();
            assert_eq!(occurrences, 1);
        }
    }
}

#[test]
fn test_attributes_case_insensitive() {
    let mut data = ElementData::new("INPUT");
    assert_eq!(data.tag_name, "input");
    data.set_attr("TYPE", "text");
    assert_eq!(data.attr("type"), Some("text"));
    assert_eq!(data.attr("Type"), Some("text"));
    assert!(data.has_attr("tYpE"));
    data.remove_attr("Type");
    assert!(!data.has_attr("type"));
}

#[test]
fn test_classes() {
    let mut data = ElementData::new("div");
    data.set_attr("class", "  nav   active\tbtn ");
    assert_eq!(data.classes(), vec!["nav", "active", "btn"]);
    assert!(data.has_class("active"));
    assert!(!data.has_class("act"));
}

#[test]
fn test_text_content_aggregates_descendants() {
    let mut tree = DomTree::new();
    let p = make_element(&mut tree, "p");
    let em = make_element(&mut tree, "em");
    tree.append_child(NodeId::ROOT, p);
    let t1 = tree.create_text("Hello ");
    tree.append_child(p, t1);
    tree.append_child(p, em);
    let t2 = tree.create_text("world");
    tree.append_child(em, t2);

    assert_eq!(tree.text_content(p), "Hello world");
}

#[test]
fn test_set_text_content_replaces_children() {
    let mut tree = DomTree::new();
    let p = make_element(&mut tree, "p");
    let em = make_element(&mut tree, "em");
    tree.append_child(NodeId::ROOT, p);
    tree.append_child(p, em);

    tree.set_text_content(p, "plain");
    assert_eq!(tree.children(p).len(), 1);
    assert_eq!(tree.text_content(p), "plain");
    assert_eq!(tree.parent(em), None);
}

#[test]
fn test_document_element_and_body() {
    let mut tree = DomTree::new();
    let html = make_element(&mut tree, "html");
    let head = make_element(&mut tree, "head");
    let body = make_element(&mut tree, "body");
    tree.append_child(NodeId::ROOT, html);
    tree.append_child(html, head);
    tree.append_child(html, body);

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.head(), Some(head));
    assert_eq!(tree.body(), Some(body));
}

#[test]
fn test_ancestors_and_preceding_siblings() {
    let mut tree = DomTree::new();
    let html = make_element(&mut tree, "html");
    let body = make_element(&mut tree, "body");
    let a = make_element(&mut tree, "a");
    let b = make_element(&mut tree, "b");
    let c = make_element(&mut tree, "c");
    tree.append_child(NodeId::ROOT, html);
    tree.append_child(html, body);
    tree.append_child(body, a);
    tree.append_child(body, b);
    tree.append_child(body, c);

    let ancestors: Vec<NodeId> = tree.ancestors(c).collect();
    assert_eq!(ancestors, vec![body, html, NodeId::ROOT]);

    let preceding: Vec<NodeId> = tree.preceding_siblings(c).collect();
    assert_eq!(preceding, vec![b, a]);
}

#[test]
fn test_descendants_document_order() {
    let mut tree = DomTree::new();
    let html = make_element(&mut tree, "html");
    let head = make_element(&mut tree, "head");
    let body = make_element(&mut tree, "body");
    let p = make_element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, html);
    tree.append_child(html, head);
    tree.append_child(html, body);
    tree.append_child(body, p);

    let order: Vec<NodeId> = tree.descendants(NodeId::ROOT).collect();
    assert_eq!(order, vec![html, head, body, p]);
}
