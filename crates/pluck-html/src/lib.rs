//! Lenient HTML loader for the pluck selector engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, RCDATA, RAWTEXT, tag and attribute states
//!   - DOCTYPE, comment, and character reference handling
//!
//! - **Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - Stack of open elements, void elements, common implied end tags
//!
//! Loading never fails. Problems are collected as [`ParseIssue`]s next to
//! the tree.
//!
//! # Not Implemented
//!
//! - Insertion modes and implied `html`/`head`/`body` elements
//! - Foster parenting and the adoption agency algorithm
//! - Script data escape states
//! - The full named character reference table

mod issue;
/// HTML parser and tree construction.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use issue::ParseIssue;
pub use parser::{HTMLParser, format_tree};
pub use tokenizer::{Attribute, HTMLTokenizer, SpannedToken, Token};

use pluck_dom::DomTree;

/// A loaded document.
#[derive(Debug, Clone)]
pub struct Document {
    /// The node tree. `NodeId::ROOT` is the document node.
    pub tree: DomTree,
    /// Tokenizer and tree builder issues, in input order per stage.
    pub issues: Vec<ParseIssue>,
}

/// Tokenize and build a tree from `input`.
///
/// ```
/// let doc = pluck_html::parse_document("<div id=a><p>hi</div>");
/// let div = doc.tree.document_element().unwrap();
/// assert_eq!(doc.tree.attribute(div, "id"), Some("a"));
/// assert!(doc.issues.is_empty());
/// ```
#[must_use]
pub fn parse_document(input: &str) -> Document {
    let mut tokenizer = HTMLTokenizer::new(input.to_string());
    tokenizer.run();
    let (tokens, mut issues) = tokenizer.into_parts();
    let (tree, tree_issues) = HTMLParser::new(tokens).run_with_issues();
    issues.extend(tree_issues);
    Document { tree, issues }
}
