//! The tree matcher.

use pluck_dom::{DomTree, NodeId};

use crate::pending::PendingSet;
use crate::trace::{NoopSink, TraceEvent, TraceSink};
use crate::FindError;

/// Runs selector chains over a tree in one pre-order traversal.
///
/// A `Matcher` holds no traversal state; one value may serve any number of
/// calls, including concurrent ones from several threads.
#[derive(Clone, Copy)]
pub struct Matcher<'s> {
    sink: &'s dyn TraceSink,
}

impl Matcher<'static> {
    /// A matcher that reports nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self { sink: &NoopSink }
    }
}

impl Default for Matcher<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'s> Matcher<'s> {
    /// A matcher reporting to `sink`.
    #[must_use]
    pub const fn with_sink(sink: &'s dyn TraceSink) -> Self {
        Self { sink }
    }

    /// Every node at or below `root` matched by at least one of `chains`.
    ///
    /// Nodes come back in pre-order, each at most once. A chain stays
    /// pending for the whole subtree below the node where it became pending;
    /// when its first head matches a node, its remainder becomes pending for
    /// that node's descendants as a separate chain.
    ///
    /// # Errors
    ///
    /// - [`FindError::NilRoot`] if `root` is `None` or not a node of `tree`.
    /// - [`FindError::InvalidSelector`] as soon as a pending chain that does
    ///   not parse is tested at a visited node. No partial result is returned.
    pub fn find<S: AsRef<str>>(
        &self,
        tree: &DomTree,
        root: Option<NodeId>,
        chains: &[S],
    ) -> Result<Vec<NodeId>, FindError> {
        let root = root
            .filter(|&id| tree.contains(id))
            .ok_or(FindError::NilRoot)?;
        let pending = PendingSet::seed(chains);
        let mut found = Vec::new();
        self.visit(tree, root, &pending, 0, &mut found)?;
        Ok(found)
    }

    fn visit(
        &self,
        tree: &DomTree,
        id: NodeId,
        pending: &PendingSet<'_>,
        depth: usize,
        found: &mut Vec<NodeId>,
    ) -> Result<(), FindError> {
        let node = tree.label(id);
        self.emit(&TraceEvent::Enter {
            node,
            depth,
            pending,
        });

        let before = found.len();
        let result = self.match_and_descend(tree, id, pending, depth, found);
        self.emit(&TraceEvent::Exit {
            node,
            depth,
            produced: result.is_ok().then_some(found.len() - before),
        });
        result
    }

    fn match_and_descend(
        &self,
        tree: &DomTree,
        id: NodeId,
        pending: &PendingSet<'_>,
        depth: usize,
        found: &mut Vec<NodeId>,
    ) -> Result<(), FindError> {
        let node = tree.label(id);
        let mut next = pending.child();
        let mut matched_here = false;

        for entry in pending.iter() {
            let head = match entry.head() {
                Ok(head) => head,
                Err(error) => {
                    self.emit(&TraceEvent::Failed { node, depth, error });
                    return Err(error.clone().into());
                }
            };
            if !head.matches_node(tree, id) {
                continue;
            }
            if head.is_last() {
                self.emit(&TraceEvent::Matched {
                    node,
                    depth,
                    chain: entry.chain(),
                });
                matched_here = true;
            } else if next.insert(&head.remainder) {
                self.emit(&TraceEvent::Spawned {
                    node,
                    depth,
                    remainder: &head.remainder,
                });
            }
        }

        if matched_here {
            found.push(id);
        }

        for child in tree.child_iter(id) {
            self.visit(tree, child, &next, depth + 1, found)?;
        }
        Ok(())
    }

    fn emit(&self, event: &TraceEvent<'_>) {
        if self.sink.enabled(event.level()) {
            self.sink.record(event);
        }
    }
}

/// [`Matcher::find`] without tracing.
///
/// ```
/// let doc = pluck_html::parse_document("<div><a><img></a></div><img>");
/// let found = pluck_select::find(&doc.tree, Some(doc.tree.root()), &["div img"]).unwrap();
/// assert_eq!(found.len(), 1);
/// ```
///
/// # Errors
///
/// See [`Matcher::find`].
pub fn find<S: AsRef<str>>(
    tree: &DomTree,
    root: Option<NodeId>,
    chains: &[S],
) -> Result<Vec<NodeId>, FindError> {
    Matcher::new().find(tree, root, chains)
}

/// [`find`] with a single chain.
///
/// # Errors
///
/// See [`Matcher::find`].
pub fn find_chain(
    tree: &DomTree,
    root: Option<NodeId>,
    chain: &str,
) -> Result<Vec<NodeId>, FindError> {
    find(tree, root, &[chain])
}
