//! Traversal narration.
//!
//! The matcher reports what it does through a [`TraceSink`]. Events carry
//! their own nesting depth, so sinks need no shared indentation state and
//! any number of traversals may run at once.

use std::io;
use std::sync::Mutex;

use pluck_common::{Level, Verbosity};
use pluck_dom::{NodeKind, NodeLabel};

use crate::{PendingSet, SelectorError};

/// Something the matcher did at one node.
#[derive(Debug, Clone, Copy)]
pub enum TraceEvent<'a> {
    /// Visiting `node` with `pending` chains.
    Enter {
        /// The visited node.
        node: NodeLabel<'a>,
        /// Distance from the traversal root.
        depth: usize,
        /// Chains tested at this node.
        pending: &'a PendingSet<'a>,
    },
    /// `chain` ended at `node`.
    Matched {
        /// The matched node.
        node: NodeLabel<'a>,
        /// Distance from the traversal root.
        depth: usize,
        /// The chain whose last head matched.
        chain: &'a str,
    },
    /// A head matched at `node`; `remainder` is now pending below it.
    Spawned {
        /// The node whose match spawned the remainder.
        node: NodeLabel<'a>,
        /// Distance from the traversal root.
        depth: usize,
        /// The new pending chain.
        remainder: &'a str,
    },
    /// Leaving `node`.
    Exit {
        /// The node being left.
        node: NodeLabel<'a>,
        /// Distance from the traversal root.
        depth: usize,
        /// Matches found in the subtree, `None` if the traversal aborted.
        produced: Option<usize>,
    },
    /// A pending chain failed to parse at `node`; the traversal aborts.
    Failed {
        /// The node at which the chain was tested.
        node: NodeLabel<'a>,
        /// Distance from the traversal root.
        depth: usize,
        /// The parse failure.
        error: &'a SelectorError,
    },
}

impl<'a> TraceEvent<'a> {
    /// The level this event is reported at.
    #[must_use]
    pub const fn level(&self) -> Level {
        match self {
            Self::Enter { .. } | Self::Exit { .. } => Level::Trace,
            Self::Matched { .. } => Level::Debug,
            Self::Spawned { .. } => Level::Verbose,
            Self::Failed { .. } => Level::Error,
        }
    }

    /// The node the event is about.
    #[must_use]
    pub const fn node(&self) -> NodeLabel<'a> {
        match *self {
            Self::Enter { node, .. }
            | Self::Matched { node, .. }
            | Self::Spawned { node, .. }
            | Self::Exit { node, .. }
            | Self::Failed { node, .. } => node,
        }
    }

    /// Distance of the node from the traversal root.
    #[must_use]
    pub const fn depth(&self) -> usize {
        match *self {
            Self::Enter { depth, .. }
            | Self::Matched { depth, .. }
            | Self::Spawned { depth, .. }
            | Self::Exit { depth, .. }
            | Self::Failed { depth, .. } => depth,
        }
    }
}

/// Receiver of [`TraceEvent`]s.
///
/// Sinks are shared by reference across every traversal using them, possibly
/// from several threads at once, so they record through `&self`.
pub trait TraceSink: Sync {
    /// Whether events at `level` should be built and recorded.
    fn enabled(&self, level: Level) -> bool;

    /// Record one event. Only called when [`enabled`](Self::enabled) is true
    /// for the event's level.
    fn record(&self, event: &TraceEvent<'_>);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {
    fn enabled(&self, _level: Level) -> bool {
        false
    }

    fn record(&self, _event: &TraceEvent<'_>) {}
}

/// Forwards events to the `tracing` crate, dropping those the verbosity hides.
///
/// `trace` maps to `TRACE`, `debug` and `verbose` to `DEBUG`, and `error`
/// to `ERROR`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink {
    verbosity: Verbosity,
}

impl TracingSink {
    /// A sink showing events up to `verbosity`.
    #[must_use]
    pub const fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

impl TraceSink for TracingSink {
    fn enabled(&self, level: Level) -> bool {
        self.verbosity.allows(level)
    }

    fn record(&self, event: &TraceEvent<'_>) {
        match *event {
            TraceEvent::Enter {
                node,
                depth,
                pending,
            } => tracing::trace!(depth, node = %node, pending = %pending, "enter"),
            TraceEvent::Matched { node, depth, chain } => {
                tracing::debug!(depth, node = %node, chain, "matched");
            }
            TraceEvent::Spawned {
                node,
                depth,
                remainder,
            } => tracing::debug!(depth, node = %node, remainder, "spawned remainder"),
            TraceEvent::Exit {
                node,
                depth,
                produced: Some(produced),
            } => tracing::trace!(depth, node = %node, produced, "exit"),
            TraceEvent::Exit {
                node,
                depth,
                produced: None,
            } => tracing::trace!(depth, node = %node, "exit after error"),
            TraceEvent::Failed { node, depth, error } => {
                tracing::error!(depth, node = %node, %error, "invalid selector");
            }
        }
    }
}

/// Writes an indented outline of the traversal.
///
/// Elements open a line with their label and close with `</tag>`; other
/// nodes get a single `Skipping "label"` line. Children are indented two
/// spaces past their parent.
///
/// ```text
/// Skipping "Document"
///   <div id="main">
///     Skipping "5B of text"
///   </div>
/// ```
#[derive(Debug)]
pub struct OutlineSink<W> {
    state: Mutex<OutlineState<W>>,
}

#[derive(Debug)]
struct OutlineState<W> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: io::Write> OutlineSink<W> {
    /// An outline written to `writer`.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            state: Mutex::new(OutlineState {
                writer,
                error: None,
            }),
        }
    }

    /// Flush and return the writer.
    ///
    /// # Errors
    ///
    /// Returns the first error from writing the outline, or from flushing.
    pub fn finish(self) -> io::Result<W> {
        let mut state = self
            .state
            .into_inner()
            .map_err(|_| io::Error::other("outline writer poisoned"))?;
        if let Some(error) = state.error {
            return Err(error);
        }
        state.writer.flush()?;
        Ok(state.writer)
    }

    fn line(depth: usize, event: &TraceEvent<'_>) -> Option<String> {
        let indent = "  ".repeat(depth);
        let node = event.node();
        match (event, node.kind()) {
            (TraceEvent::Enter { .. }, Some(NodeKind::Element)) => Some(format!("{indent}{node}")),
            (TraceEvent::Enter { .. }, _) => Some(format!("{indent}Skipping \"{node}\"")),
            (TraceEvent::Exit { .. }, Some(NodeKind::Element)) => {
                Some(format!("{indent}</{}>", node.tag_name().unwrap_or_default()))
            }
            _ => None,
        }
    }
}

impl<W: io::Write + Send> TraceSink for OutlineSink<W> {
    fn enabled(&self, level: Level) -> bool {
        level == Level::Trace
    }

    fn record(&self, event: &TraceEvent<'_>) {
        let Some(line) = Self::line(event.depth(), event) else {
            return;
        };
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if state.error.is_some() {
            return;
        }
        if let Err(error) = writeln!(state.writer, "{line}") {
            state.error = Some(error);
        }
    }
}
