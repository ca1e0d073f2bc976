use std::fmt::Write as _;

use pluck_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

use crate::ParseIssue;
use crate::tokenizer::{Attribute, SpannedToken, Token};

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements only have a start tag; end tags must not be specified for
/// void elements."
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// [§ 13.1.2.4 Optional tags](https://html.spec.whatwg.org/multipage/syntax.html#optional-tags)
///
/// Elements whose end tag may be omitted. Leaving one open at end of input
/// is not reported.
const OPTIONAL_END_TAG_ELEMENTS: &[&str] = &[
    "html", "head", "body", "p", "li", "dt", "dd", "option", "optgroup", "rt", "rp", "tr", "td",
    "th", "thead", "tbody", "tfoot", "colgroup", "caption",
];

/// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
///
/// Start tags that "close a p element" if one is in button scope.
const CLOSES_P: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div", "dl",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hgroup", "hr", "main", "menu", "nav", "ol", "p", "pre", "search", "section",
    "summary", "table", "ul",
];

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
///
/// Default scope markers.
const DEFAULT_SCOPE: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template",
];

/// Tree builder.
///
/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// A single-mode reduction of the standard algorithm: elements nest where
/// their tags appear, with the stack of open elements, void elements and the
/// common implied end tags handled. No `html`, `head` or `body` element is
/// synthesized, and there is no foster parenting or adoption agency.
pub struct HTMLParser {
    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    stack_of_open_elements: Vec<NodeId>,

    /// `NodeId::ROOT` (index 0) is the Document node.
    tree: DomTree,

    /// Input tokens from the tokenizer.
    tokens: Vec<SpannedToken>,

    /// Offset of the token being processed.
    offset: usize,

    /// Whether the end-of-file token has been processed.
    stopped: bool,

    issues: Vec<ParseIssue>,
}

impl HTMLParser {
    /// Create a new parser from a token stream.
    #[must_use]
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Self {
            stack_of_open_elements: Vec::new(),
            tree: DomTree::new(),
            tokens,
            offset: 0,
            stopped: false,
            issues: Vec::new(),
        }
    }

    /// Run the parser and return the tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Run the parser and return both the tree and any parse issues.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        let tokens = std::mem::take(&mut self.tokens);
        for SpannedToken { offset, token } in tokens {
            if self.stopped {
                break;
            }
            self.offset = offset;
            self.process_token(token);
        }
        if !self.stopped {
            self.process_token(Token::EndOfFile);
        }
        (self.tree, self.issues)
    }

    fn process_token(&mut self, token: Token) {
        match token {
            Token::Doctype { name } => self.handle_doctype(name),
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => self.handle_start_tag(name, self_closing, &attributes),
            Token::EndTag { name } => self.handle_end_tag(&name),
            Token::Comment { data } => self.insert_comment(data),
            Token::Character { data } => self.insert_character(data),
            Token::EndOfFile => self.handle_eof(),
        }
    }

    fn parse_error(&mut self, message: impl Into<String>) {
        self.issues.push(ParseIssue {
            message: message.into(),
            offset: self.offset,
        });
    }

    // =========================================================================
    // Token handlers
    // =========================================================================

    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    ///
    /// "A DOCTYPE token: ... Append a DocumentType node to the Document node."
    /// Anywhere after the first element it is a parse error and ignored.
    fn handle_doctype(&mut self, name: Option<String>) {
        let seen_element = self
            .tree
            .child_iter(NodeId::ROOT)
            .any(|id| self.tree.as_element(id).is_some());
        if seen_element || !self.stack_of_open_elements.is_empty() {
            self.parse_error("unexpected-doctype");
            return;
        }
        let doctype = self.tree.alloc(NodeType::Doctype(name.unwrap_or_default()));
        self.tree.append_child(NodeId::ROOT, doctype);
    }

    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    fn handle_start_tag(&mut self, name: String, self_closing: bool, attributes: &[Attribute]) {
        self.close_implied_elements(&name);

        let attrs = self.attributes_to_map(attributes);
        let is_void = VOID_ELEMENTS.contains(&name.as_str());
        if self_closing && !is_void {
            // "non-void-html-element-start-tag-with-trailing-solidus": the flag
            // is ignored and the element stays open.
            self.parse_error(format!(
                "non-void-html-element-start-tag-with-trailing-solidus <{name}/>"
            ));
        }

        let parent = self.current_node().unwrap_or(NodeId::ROOT);
        let element = self.tree.append_element(
            parent,
            ElementData {
                tag_name: name,
                attrs,
            },
        );

        // "Insert an HTML element for the token. Immediately pop the current
        // node off the stack of open elements." for void elements.
        if !is_void {
            self.stack_of_open_elements.push(element);
        }
    }

    /// Close elements whose end tag is implied by the start tag `name`.
    fn close_implied_elements(&mut self, name: &str) {
        // "If the stack of open elements has a p element in button scope,
        // then close a p element."
        if CLOSES_P.contains(&name) && self.has_element_in_button_scope("p") {
            self.pop_until_tag("p");
        }

        match name {
            // "Loop: If node is an li element, then ... pop elements from the
            // stack of open elements until an li element has been popped"
            "li" => self.close_nearest_one_of(&["li"], &["ul", "ol", "table"]),
            "dt" | "dd" => self.close_nearest_one_of(&["dt", "dd"], &["dl", "table"]),
            "option" => {
                if self.current_tag_name() == Some("option") {
                    let _ = self.stack_of_open_elements.pop();
                }
            }
            "tr" => self.close_nearest_one_of(&["tr"], &["table"]),
            "td" | "th" => self.close_nearest_one_of(&["td", "th"], &["tr", "table"]),
            _ => {}
        }
    }

    /// Pop to and including the nearest open element named in `targets`,
    /// unless an element named in `boundaries` is found first.
    fn close_nearest_one_of(&mut self, targets: &[&str], boundaries: &[&str]) {
        let nearest = self
            .stack_of_open_elements
            .iter()
            .rev()
            .filter_map(|&id| self.get_tag_name(id))
            .find(|tag| targets.contains(tag) || boundaries.contains(tag));
        if nearest.is_some_and(|tag| targets.contains(&tag)) {
            self.pop_until_one_of(targets);
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "Any other end tag": walk the stack from the current node; if an
    /// element with the same tag name is found, pop up to and including it.
    /// Otherwise the token is a parse error and is ignored.
    fn handle_end_tag(&mut self, name: &str) {
        if VOID_ELEMENTS.contains(&name) {
            self.parse_error(format!("end-tag-for-void-element </{name}>"));
            return;
        }

        let Some(position) = self
            .stack_of_open_elements
            .iter()
            .rposition(|&id| self.get_tag_name(id) == Some(name))
        else {
            self.parse_error(format!("unexpected-end-tag </{name}>"));
            return;
        };

        let unclosed: Vec<String> = self.stack_of_open_elements[position + 1..]
            .iter()
            .filter_map(|&id| self.get_tag_name(id))
            .filter(|tag| !OPTIONAL_END_TAG_ELEMENTS.contains(tag))
            .map(ToString::to_string)
            .collect();
        for tag in unclosed {
            self.parse_error(format!("end-tag-with-unclosed-element <{tag}> before </{name}>"));
        }
        self.stack_of_open_elements.truncate(position);
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// "If there is a Text node immediately before the adjusted insertion
    /// location, then append data to that Text node's data."
    fn insert_character(&mut self, c: char) {
        let Some(parent_id) = self.current_node() else {
            // Inter-element whitespace at document level carries nothing.
            if Self::is_whitespace(c) {
                return;
            }
            self.append_or_extend_text(NodeId::ROOT, c);
            return;
        };
        self.append_or_extend_text(parent_id, c);
    }

    fn append_or_extend_text(&mut self, parent_id: NodeId, c: char) {
        if let Some(last) = self.tree.last_child(parent_id)
            && let Some(node) = self.tree.get_mut(last)
            && let NodeType::Text(ref mut text) = node.node_type
        {
            text.push(c);
            return;
        }
        let _ = self.tree.append_text(parent_id, c);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    fn insert_comment(&mut self, data: String) {
        let parent_id = self.current_node().unwrap_or(NodeId::ROOT);
        let comment = self.tree.alloc(NodeType::Comment(data));
        self.tree.append_child(parent_id, comment);
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "An end-of-file token: If there is a node in the stack of open
    /// elements that is not ... then this is a parse error. Stop parsing."
    fn handle_eof(&mut self) {
        let unclosed: Vec<String> = self
            .stack_of_open_elements
            .iter()
            .filter_map(|&id| self.get_tag_name(id))
            .filter(|tag| !OPTIONAL_END_TAG_ELEMENTS.contains(tag))
            .map(ToString::to_string)
            .collect();
        for tag in unclosed {
            self.parse_error(format!("eof-with-unclosed-element <{tag}>"));
        }
        self.stack_of_open_elements.clear();
        self.stopped = true;
    }

    // =========================================================================
    // Stack of open elements
    // =========================================================================

    /// "The current node is the bottommost node in this stack of open elements."
    fn current_node(&self) -> Option<NodeId> {
        self.stack_of_open_elements.last().copied()
    }

    fn current_tag_name(&self) -> Option<&str> {
        self.current_node().and_then(|id| self.get_tag_name(id))
    }

    fn get_tag_name(&self, id: NodeId) -> Option<&str> {
        self.tree.tag_name(id)
    }

    /// Pop elements until one with the given tag name has been popped.
    fn pop_until_tag(&mut self, tag_name: &str) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if self.get_tag_name(id) == Some(tag_name) {
                break;
            }
        }
    }

    /// Pop elements until one of the given tag names has been popped.
    fn pop_until_one_of(&mut self, tag_names: &[&str]) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if self.get_tag_name(id).is_some_and(|name| tag_names.contains(&name)) {
                break;
            }
        }
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-button-scope)
    ///
    /// "has an element in button scope": default scope markers plus button.
    fn has_element_in_button_scope(&self, tag_name: &str) -> bool {
        for &node_id in self.stack_of_open_elements.iter().rev() {
            if let Some(node_tag) = self.get_tag_name(node_id) {
                if node_tag == tag_name {
                    return true;
                }
                if node_tag == "button" || DEFAULT_SCOPE.contains(&node_tag) {
                    return false;
                }
            }
        }
        false
    }

    /// Convert token attributes to an `AttributesMap`.
    ///
    /// [§ 13.2.5.33](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    /// "If there is already an attribute on the token with the exact same
    /// name, then this is a duplicate-attribute parse error and the new
    /// attribute must be removed from the token."
    fn attributes_to_map(&mut self, attributes: &[Attribute]) -> AttributesMap {
        let mut map = AttributesMap::new();
        for attr in attributes {
            if map.contains_key(&attr.name) {
                self.parse_error(format!("duplicate-attribute {}", attr.name));
                continue;
            }
            let _ = map.insert(attr.name.clone(), attr.value.clone());
        }
        map
    }

    const fn is_whitespace(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
    }
}

/// Render the subtree at `id` as an indented outline, one node per line.
///
/// Text is shown quoted with newlines escaped and spaces as `·`, so
/// whitespace-only nodes stay visible.
#[must_use]
pub fn format_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_tree(tree, id, 0, &mut out);
    out
}

fn write_tree(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let prefix = "  ".repeat(indent);
    let _ = match &node.node_type {
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            writeln!(out, "{prefix}\"{display}\"")
        }
        NodeType::Comment(data) => writeln!(out, "{prefix}<!-- {data} -->"),
        NodeType::Doctype(name) => writeln!(out, "{prefix}<!DOCTYPE {name}>"),
        _ => writeln!(out, "{prefix}{}", tree.label(id)),
    };
    for child_id in tree.child_iter(id) {
        write_tree(tree, child_id, indent + 1, out);
    }
}
