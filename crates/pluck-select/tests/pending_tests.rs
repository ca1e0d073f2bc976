//! Tests for the frame-linked set of pending chains.

use pluck_dom::{DomTree, ElementData, NodeId};
use pluck_select::{PendingSet, find};

fn chains(set: &PendingSet<'_>) -> Vec<String> {
    set.iter().map(|entry| entry.chain().to_string()).collect()
}

#[test]
fn test_seed_drops_duplicates() {
    let set = PendingSet::seed(["div a", "img", "div a"]);
    assert_eq!(chains(&set), vec!["div a", "img"]);
    assert_eq!(set.len(), 2);
    assert_eq!(set.to_string(), r#"{"div a", "img"}"#);
}

#[test]
fn test_empty_frames_keep_inherited_chains() {
    let root = PendingSet::seed(["div a"]);
    let empty = root.child();
    let deeper = empty.child();
    let mut spawned = deeper.child();
    assert!(spawned.insert("a"));
    assert!(!spawned.insert("div a"));

    let below = spawned.child();
    let below_empty = below.child();
    assert_eq!(chains(&below_empty), vec!["div a", "a"]);
    assert!(below_empty.contains("a"));
    assert_eq!(below_empty.len(), 2);
}

#[test]
fn test_sibling_frames_are_isolated() {
    let root = PendingSet::seed(["ul li a"]);
    let mut left = root.child();
    assert!(left.insert("li a"));
    let right = root.child();
    assert!(!right.contains("li a"));
    assert_eq!(chains(&right), vec!["ul li a"]);
    assert_eq!(chains(&left.child()), vec!["ul li a", "li a"]);
}

#[test]
fn test_deep_linear_document() {
    let mut tree = DomTree::new();
    let mut parent = NodeId::ROOT;
    let mut divs = Vec::new();
    for _ in 0..400 {
        parent = tree.append_element(parent, ElementData::new("div"));
        divs.push(parent);
    }
    let leaf = tree.append_element(parent, ElementData::new("a"));

    let found = find(&tree, Some(tree.root()), &["div div a"]).unwrap();
    assert_eq!(found, vec![leaf]);
    let found = find(&tree, Some(tree.root()), &["div div"]).unwrap();
    assert_eq!(found, divs[1..]);
}
