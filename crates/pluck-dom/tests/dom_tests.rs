//! Tests for tree construction, attribute access, labels and text extraction.

use pluck_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeKind, NodeType};

/// Helper to create an element with attributes and append it to `parent`.
fn element(tree: &mut DomTree, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    tree.append_element(
        parent,
        ElementData {
            tag_name: tag.to_string(),
            attrs: attrs.iter().copied().collect(),
        },
    )
}

/// `<div id="main" class="a b"><p>Hello <b>world</b>!</p><!--note--></div>`
fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
    let mut tree = DomTree::new();
    let div = element(&mut tree, NodeId::ROOT, "div", &[("id", "main"), ("class", "a b")]);
    let p = element(&mut tree, div, "p", &[]);
    let _ = tree.append_text(p, "Hello ");
    let b = element(&mut tree, p, "b", &[]);
    let _ = tree.append_text(b, "world");
    let _ = tree.append_text(p, "!");
    let comment = tree.alloc(NodeType::Comment("note".to_string()));
    tree.append_child(div, comment);
    (tree, div, p, b)
}

// ========== structure ==========

#[test]
fn test_new_tree_has_document_root() {
    let tree = DomTree::new();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.root(), NodeId::ROOT);
    assert_eq!(tree.kind(NodeId::ROOT), Some(NodeKind::Document));
    assert!(tree.first_child(NodeId::ROOT).is_none());
}

#[test]
fn test_append_links_first_child_and_siblings() {
    let (tree, div, p, _) = sample();
    assert_eq!(tree.first_child(NodeId::ROOT), Some(div));
    assert_eq!(tree.first_child(div), Some(p));
    assert_eq!(tree.last_child(NodeId::ROOT), Some(div));

    let children: Vec<NodeId> = tree.child_iter(div).collect();
    assert_eq!(children, tree.children(div));
    assert_eq!(children.len(), 2);
    assert_eq!(tree.next_sibling(children[0]), Some(children[1]));
    assert_eq!(tree.prev_sibling(children[1]), Some(children[0]));
    assert_eq!(tree.next_sibling(children[1]), None);
    assert_eq!(tree.kind(children[1]), Some(NodeKind::Comment));
}

#[test]
fn test_ancestors_and_descendants() {
    let (tree, div, p, b) = sample();
    let ancestors: Vec<NodeId> = tree.ancestors(b).collect();
    assert_eq!(ancestors, vec![p, div, NodeId::ROOT]);
    assert!(tree.is_descendant_of(b, div));
    assert!(!tree.is_descendant_of(div, b));
    assert!(!tree.is_descendant_of(div, div));
}

#[test]
fn test_missing_node_lookups_are_none() {
    let tree = DomTree::new();
    let ghost = NodeId(42);
    assert!(!tree.contains(ghost));
    assert!(tree.get(ghost).is_none());
    assert!(tree.children(ghost).is_empty());
    assert_eq!(tree.attribute(ghost, "id"), None);
    assert_eq!(tree.label(ghost).to_string(), "nil");
}

#[test]
fn test_document_element_and_body() {
    let mut tree = DomTree::new();
    let doctype = tree.alloc(NodeType::Doctype("html".to_string()));
    tree.append_child(NodeId::ROOT, doctype);
    let html = element(&mut tree, NodeId::ROOT, "html", &[]);
    let _head = element(&mut tree, html, "head", &[]);
    let body = element(&mut tree, html, "body", &[]);

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.body(), Some(body));
}

// ========== attributes ==========

#[test]
fn test_attributes_keep_source_order() {
    let attrs: AttributesMap = [("b", "2"), ("a", "1"), ("c", "3")].into_iter().collect();
    let names: Vec<&str> = attrs.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["b", "a", "c"]);
}

#[test]
fn test_attribute_insert_replaces_in_place() {
    let mut attrs = AttributesMap::new();
    assert_eq!(attrs.insert("id", "x"), None);
    assert_eq!(attrs.insert("class", "y"), None);
    assert_eq!(attrs.insert("id", "z"), Some("x".to_string()));

    assert_eq!(attrs.len(), 2);
    assert_eq!(attrs.get("id"), Some("z"));
    assert_eq!(attrs.iter().next().map(|a| a.name.as_str()), Some("id"));
    assert!(attrs.contains_key("class"));
    assert!(!attrs.contains_key("href"));
}

#[test]
fn test_element_id_and_class_are_raw_values() {
    let (tree, div, p, _) = sample();
    let data = tree.as_element(div).unwrap();
    assert_eq!(data.id(), Some("main"));
    assert_eq!(data.class(), Some("a b"));

    assert_eq!(tree.attribute(div, "class"), Some("a b"));
    assert_eq!(tree.attribute(p, "class"), None);
    assert_eq!(tree.tag_name(p), Some("p"));
}

#[test]
fn test_attribute_on_text_node_is_none() {
    let (tree, _, p, _) = sample();
    let text = tree.first_child(p).unwrap();
    assert_eq!(tree.as_text(text), Some("Hello "));
    assert_eq!(tree.attribute(text, "id"), None);
    assert_eq!(tree.tag_name(text), None);
}

// ========== labels ==========

#[test]
fn test_labels_for_each_kind() {
    let (mut tree, div, p, _) = sample();
    let doctype = tree.alloc(NodeType::Doctype("html".to_string()));
    let error = tree.alloc(NodeType::Error("<<".to_string()));
    let text = tree.first_child(p).unwrap();
    let comment = tree.children(div)[1];

    assert_eq!(tree.label(NodeId::ROOT).to_string(), "Document");
    assert_eq!(
        tree.label(div).to_string(),
        r#"<div id="main" class="a b">"#
    );
    assert_eq!(tree.label(p).to_string(), "<p>");
    assert_eq!(tree.label(text).to_string(), "6B of text");
    assert_eq!(tree.label(comment).to_string(), "4B of comments");
    assert_eq!(tree.label(doctype).to_string(), "doctype:html");
    assert_eq!(tree.label(error).to_string(), r#"ErrNode("<<")"#);
}

#[test]
fn test_node_kind_display() {
    assert_eq!(NodeKind::Element.to_string(), "element");
    assert_eq!(NodeKind::Doctype.to_string(), "doctype");
}

// ========== text ==========

#[test]
fn test_text_content_concatenates_descendants() {
    let (tree, div, p, b) = sample();
    assert_eq!(tree.text_content(p), "Hello world!");
    assert_eq!(tree.text_content(div), "Hello world!");
    assert_eq!(tree.text_content(b), "world");
}

#[test]
fn test_text_outline_marks_child_elements() {
    let (tree, _, p, _) = sample();
    assert_eq!(tree.text_outline(p), "Hello \n<b>\nworld\n<~<b>\n!");
}

#[test]
fn test_text_outline_of_leaf_is_empty() {
    let (tree, _, _, b) = sample();
    let text = tree.first_child(b).unwrap();
    assert_eq!(tree.text_outline(text), "");
}
