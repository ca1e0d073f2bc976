//! Markup tree for the pluck selector engine.
//!
//! Nodes live in one arena and point at each other through [`NodeId`]
//! indices: every node knows its parent, its first and last child and its
//! two siblings. Matching walks first-child and next-sibling links only, so
//! the order children were appended in is the order they are visited in.
//!
//! The node model follows the [DOM Living Standard](https://dom.spec.whatwg.org/)
//! loosely: kinds, tag names and attributes are kept; namespaces, live
//! collections and mutation beyond appending are not.
//!
//! ```
//! use pluck_dom::{DomTree, ElementData, NodeId};
//!
//! let mut tree = DomTree::new();
//! let div = tree.append_element(NodeId::ROOT, ElementData::new("div"));
//! let _ = tree.append_text(div, "hi");
//! assert_eq!(tree.label(div).to_string(), "<div>");
//! assert_eq!(tree.text_content(div), "hi");
//! ```

mod attributes;
mod text;

pub use attributes::{Attribute, AttributesMap};
pub use text::NodeLabel;

use strum_macros::Display;

/// Index of a node in its [`DomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document node every tree starts with.
    pub const ROOT: Self = Self(0);
}

/// One arena slot: a payload and its links.
#[derive(Debug, Clone)]
pub struct Node {
    /// Kind and payload.
    pub node_type: NodeType,
    /// Containing node; `None` for the document and for detached nodes.
    pub parent: Option<NodeId>,
    /// First child in document order.
    pub first_child: Option<NodeId>,
    /// Last child in document order.
    pub last_child: Option<NodeId>,
    /// Following sibling under the same parent.
    pub next_sibling: Option<NodeId>,
    /// Preceding sibling under the same parent.
    pub prev_sibling: Option<NodeId>,
}

impl Node {
    const fn detached(node_type: NodeType) -> Self {
        Self {
            node_type,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// A node's kind together with its payload.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
#[derive(Debug, Clone)]
pub enum NodeType {
    /// The tree root.
    Document,
    /// A tag with attributes.
    Element(ElementData),
    /// Character data, entities already decoded.
    Text(String),
    /// Comment body without the `<!--` `-->` delimiters.
    Comment(String),
    /// Doctype name, e.g. `html`.
    Doctype(String),
    /// Markup the loader could not make sense of, kept verbatim.
    Error(String),
}

impl NodeType {
    /// The payload-free kind of this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Document => NodeKind::Document,
            Self::Element(_) => NodeKind::Element,
            Self::Text(_) => NodeKind::Text,
            Self::Comment(_) => NodeKind::Comment,
            Self::Doctype(_) => NodeKind::Doctype,
            Self::Error(_) => NodeKind::Error,
        }
    }
}

/// The kind of a node, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NodeKind {
    /// The document root.
    Document,
    /// An element with a tag name and attributes.
    Element,
    /// Character data.
    Text,
    /// A comment.
    Comment,
    /// A doctype declaration.
    Doctype,
    /// Unparsable markup.
    Error,
}

/// Tag name and attributes of an element node.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lowercase tag name as the loader produced it.
    pub tag_name: String,
    /// Attributes in source order.
    pub attrs: AttributesMap,
}

impl ElementData {
    /// An element with no attributes.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs: AttributesMap::new(),
        }
    }

    /// The `id` attribute, if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id")
    }

    /// The `class` attribute exactly as written, e.g. `"item featured"`.
    #[must_use]
    pub fn class(&self) -> Option<&str> {
        self.attrs.get("class")
    }
}

/// An arena of nodes rooted at a document node.
///
/// Nodes are only ever appended, never removed, so a [`NodeId`] handed out
/// by a tree stays valid for the tree's lifetime. Lookups with an id from
/// another tree return `None` rather than panicking.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// A tree holding only the document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::detached(NodeType::Document)],
        }
    }

    /// The document node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// The node at `id`.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// The node at `id`, mutably. Links should be changed through
    /// [`append_child`](Self::append_child) only.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Whether `id` refers to a node of this tree.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Number of nodes, the document included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its document node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a detached node and return its id.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::detached(node_type));
        id
    }

    /// Make `child` the last child of `parent`.
    ///
    /// `child` must be detached, as returned by [`alloc`](Self::alloc).
    ///
    /// # Panics
    ///
    /// Panics if either id does not belong to this tree.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let previous = self.nodes[parent.0].last_child.replace(child);
        match previous {
            Some(previous) => {
                self.nodes[previous.0].next_sibling = Some(child);
                self.nodes[child.0].prev_sibling = Some(previous);
            }
            None => self.nodes[parent.0].first_child = Some(child),
        }
        self.nodes[child.0].parent = Some(parent);
    }

    /// Allocate an element under `parent`.
    pub fn append_element(&mut self, parent: NodeId, element: ElementData) -> NodeId {
        let id = self.alloc(NodeType::Element(element));
        self.append_child(parent, id);
        id
    }

    /// Allocate a text node under `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let id = self.alloc(NodeType::Text(text.into()));
        self.append_child(parent, id);
        id
    }

    /// The parent of `id`.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    /// The first child of `id`.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.first_child
    }

    /// The last child of `id`.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.last_child
    }

    /// The sibling after `id`.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.next_sibling
    }

    /// The sibling before `id`.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.prev_sibling
    }

    /// Children of `id` in document order.
    #[must_use]
    pub fn child_iter(&self, id: NodeId) -> SiblingIterator<'_> {
        SiblingIterator {
            tree: self,
            current: self.first_child(id),
        }
    }

    /// Children of `id` collected into a vector.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.child_iter(id).collect()
    }

    /// Proper ancestors of `id`, nearest first, ending at the document.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Whether `ancestor` is a proper ancestor of `descendant`.
    ///
    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// The kind of `id`.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(|node| node.node_type.kind())
    }

    /// Element payload of `id`, if it is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        match self.get(id)?.node_type {
            NodeType::Element(ref data) => Some(data),
            _ => None,
        }
    }

    /// Character data of `id`, if it is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        match self.get(id)?.node_type {
            NodeType::Text(ref text) => Some(text),
            _ => None,
        }
    }

    /// Tag name of `id`, if it is an element.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(|element| element.tag_name.as_str())
    }

    /// Value of attribute `key` on `id`.
    ///
    /// `None` when the node is missing, is not an element, or lacks `key`.
    #[must_use]
    pub fn attribute(&self, id: NodeId, key: &str) -> Option<&str> {
        self.as_element(id)?.attrs.get(key)
    }

    /// The first element child of the document.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.child_iter(NodeId::ROOT)
            .find(|&id| self.as_element(id).is_some())
    }

    /// The first `body` or `frameset` child of the document element.
    ///
    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.child_iter(html)
            .find(|&id| matches!(self.tag_name(id), Some("body" | "frameset")))
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a node's ancestors. See [`DomTree::ancestors`].
#[derive(Debug, Clone)]
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator along next-sibling links. See [`DomTree::child_iter`].
#[derive(Debug, Clone)]
pub struct SiblingIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for SiblingIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.next_sibling(id);
        Some(id)
    }
}
