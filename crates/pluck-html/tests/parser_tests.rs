//! Integration tests for tree construction.

use pluck_dom::{DomTree, NodeId, NodeKind};
use pluck_html::{Document, HTMLParser, HTMLTokenizer, format_tree, parse_document};

/// Helper to parse HTML and return the DOM tree
fn parse(html: &str) -> DomTree {
    let mut tokenizer = HTMLTokenizer::new(html.to_string());
    tokenizer.run();
    let (tokens, _) = tokenizer.into_parts();
    HTMLParser::new(tokens).run()
}

/// Tag names of the element children of `id`.
fn child_tags(tree: &DomTree, id: NodeId) -> Vec<&str> {
    tree.child_iter(id).filter_map(|c| tree.tag_name(c)).collect()
}

fn messages(doc: &Document) -> Vec<&str> {
    doc.issues.iter().map(|i| i.message.as_str()).collect()
}

#[test]
fn test_nested_elements() {
    let tree = parse("<div><p>Hi</p></div>");
    let div = tree.document_element().unwrap();
    assert_eq!(tree.tag_name(div), Some("div"));
    assert_eq!(child_tags(&tree, div), vec!["p"]);
    assert_eq!(tree.text_content(div), "Hi");
}

#[test]
fn test_no_implied_html_head_body() {
    let tree = parse("<p>x</p>");
    assert_eq!(child_tags(&tree, NodeId::ROOT), vec!["p"]);
    assert_eq!(tree.body(), None);
}

#[test]
fn test_void_elements_take_no_children() {
    let tree = parse("<p>a<br>b</p>");
    let p = tree.document_element().unwrap();
    let children = tree.children(p);
    assert_eq!(children.len(), 3);
    assert_eq!(tree.tag_name(children[1]), Some("br"));
    assert!(tree.children(children[1]).is_empty());
    assert_eq!(tree.as_text(children[2]), Some("b"));
}

#[test]
fn test_adjacent_text_is_merged() {
    let tree = parse("<p>a &amp; b</p>");
    let p = tree.document_element().unwrap();
    assert_eq!(tree.children(p).len(), 1);
    assert_eq!(tree.text_content(p), "a & b");
}

#[test]
fn test_p_is_closed_by_block_start() {
    let doc = parse_document("<p>one<p>two<div>three</div>");
    assert_eq!(child_tags(&doc.tree, NodeId::ROOT), vec!["p", "p", "div"]);
    assert!(doc.issues.is_empty());
}

#[test]
fn test_list_items_close_each_other() {
    let doc = parse_document("<ul><li>a<li>b</ul>");
    let ul = doc.tree.document_element().unwrap();
    assert_eq!(child_tags(&doc.tree, ul), vec!["li", "li"]);
    assert!(doc.issues.is_empty());
}

#[test]
fn test_table_cells_and_rows() {
    let tree = parse("<table><tr><td>1<td>2<tr><td>3</table>");
    let table = tree.document_element().unwrap();
    let rows = tree.children(table);
    assert_eq!(child_tags(&tree, table), vec!["tr", "tr"]);
    assert_eq!(child_tags(&tree, rows[0]), vec!["td", "td"]);
    assert_eq!(child_tags(&tree, rows[1]), vec!["td"]);
}

#[test]
fn test_unmatched_end_tag_is_reported_and_ignored() {
    let doc = parse_document("<div></span></div>");
    assert_eq!(child_tags(&doc.tree, NodeId::ROOT), vec!["div"]);
    assert_eq!(messages(&doc), vec!["unexpected-end-tag </span>"]);
    assert_eq!(doc.issues[0].offset, 5);
}

#[test]
fn test_end_tag_closes_misnested_elements() {
    let doc = parse_document("<div><span></div>x");
    let div = doc.tree.document_element().unwrap();
    assert_eq!(child_tags(&doc.tree, div), vec!["span"]);
    assert_eq!(doc.tree.kind(doc.tree.children(NodeId::ROOT)[1]), Some(NodeKind::Text));
    assert_eq!(
        messages(&doc),
        vec!["end-tag-with-unclosed-element <span> before </div>"]
    );
}

#[test]
fn test_eof_reports_unclosed_elements() {
    let doc = parse_document("<div><span>x");
    assert_eq!(
        messages(&doc),
        vec![
            "eof-with-unclosed-element <div>",
            "eof-with-unclosed-element <span>"
        ]
    );
}

#[test]
fn test_document_level_whitespace_is_dropped() {
    let tree = parse("<!DOCTYPE html>\n<html>\n</html>\n");
    let kinds: Vec<Option<NodeKind>> = tree.child_iter(NodeId::ROOT).map(|c| tree.kind(c)).collect();
    assert_eq!(kinds, vec![Some(NodeKind::Doctype), Some(NodeKind::Element)]);
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    let doc = parse_document("<a id=x id=y></a>");
    let a = doc.tree.document_element().unwrap();
    assert_eq!(doc.tree.attribute(a, "id"), Some("x"));
    assert_eq!(messages(&doc), vec!["duplicate-attribute id"]);
}

#[test]
fn test_self_closing_non_void_stays_open() {
    let doc = parse_document("<div/><p>x</p></div>");
    let div = doc.tree.document_element().unwrap();
    assert_eq!(child_tags(&doc.tree, div), vec!["p"]);
    assert_eq!(doc.issues.len(), 1);
}

#[test]
fn test_late_doctype_is_ignored() {
    let doc = parse_document("<div></div><!DOCTYPE html>");
    assert_eq!(doc.tree.len(), 2);
    assert_eq!(messages(&doc), vec!["unexpected-doctype"]);
}

#[test]
fn test_format_tree() {
    let tree = parse(r#"<div id="a">x y<!--c--></div>"#);
    assert_eq!(
        format_tree(&tree, NodeId::ROOT),
        "Document\n  <div id=\"a\">\n    \"x\u{00B7}y\"\n    <!-- c -->\n"
    );
}
