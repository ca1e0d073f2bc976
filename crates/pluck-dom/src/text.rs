//! Human-readable node labels and text extraction.

use std::fmt;

use crate::{DomTree, NodeId, NodeKind, NodeType};

/// Short display form of a node, for diagnostics and listings.
///
/// | Node      | Label                      |
/// |-----------|----------------------------|
/// | document  | `Document`                 |
/// | element   | `<a href="/" class="nav">` |
/// | text      | `12B of text`              |
/// | comment   | `7B of comments`           |
/// | doctype   | `doctype:html`             |
/// | error     | `ErrNode("...")`           |
///
/// A missing node renders as `nil`.
#[derive(Clone, Copy)]
pub struct NodeLabel<'a> {
    tree: &'a DomTree,
    id: NodeId,
}

impl<'a> NodeLabel<'a> {
    /// The labelled node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Kind of the labelled node, `None` if it is not in the tree.
    #[must_use]
    pub fn kind(&self) -> Option<NodeKind> {
        self.tree.kind(self.id)
    }

    /// Tag name if the labelled node is an element.
    #[must_use]
    pub fn tag_name(&self) -> Option<&'a str> {
        self.tree.tag_name(self.id)
    }
}

impl fmt::Display for NodeLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(node) = self.tree.get(self.id) else {
            return f.write_str("nil");
        };
        match &node.node_type {
            NodeType::Document => f.write_str("Document"),
            NodeType::Element(data) => {
                write!(f, "<{}", data.tag_name)?;
                for attr in &data.attrs {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                f.write_str(">")
            }
            NodeType::Text(text) => write!(f, "{}B of text", text.len()),
            NodeType::Comment(text) => write!(f, "{}B of comments", text.len()),
            NodeType::Doctype(name) => write!(f, "doctype:{name}"),
            NodeType::Error(text) => write!(f, "ErrNode(\"{text}\")"),
        }
    }
}

impl fmt::Debug for NodeLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self, self.id.0)
    }
}

impl DomTree {
    /// Display label for a node.
    #[must_use]
    pub const fn label(&self, id: NodeId) -> NodeLabel<'_> {
        NodeLabel { tree: self, id }
    }

    /// [§ 4.4 textContent](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// Concatenation of every descendant text node, in tree order. A text
    /// node's own content is returned as-is.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Some(text) = self.as_text(id) {
            out.push_str(text);
            return;
        }
        for child in self.child_iter(id) {
            self.collect_text(child, out);
        }
    }

    /// Text of a node's subtree with the structure marked inline.
    ///
    /// Child text is copied verbatim. Every other child is bracketed by its
    /// label: `"\n<label>\n"` before its own outline and `"\n<~<label>\n"`
    /// after it. Useful for eyeballing what a match actually contains.
    #[must_use]
    pub fn text_outline(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_outline(id, &mut out);
        out
    }

    fn collect_outline(&self, id: NodeId, out: &mut String) {
        for child in self.child_iter(id) {
            if let Some(text) = self.as_text(child) {
                out.push_str(text);
                continue;
            }
            let label = self.label(child).to_string();
            out.push('\n');
            out.push_str(&label);
            out.push('\n');
            self.collect_outline(child, out);
            out.push_str("\n<~");
            out.push_str(&label);
            out.push('\n');
        }
    }
}
