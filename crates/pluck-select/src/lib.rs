//! Descendant-selector queries over [`pluck_dom`] trees.
//!
//! A query is one or more selector chains such as `"div a img"` or
//! `"div#main.gallery a"`. Each chain is a sequence of heads,
//! `tag ['#' id] ['.' class]`, joined by the descendant combinator: every
//! head may match at any depth below the node the previous head matched.
//!
//! [`Matcher::find`] walks the tree once, depth first, carrying a
//! [`PendingSet`] of chains that are still eligible. At each node every
//! pending chain's first head is tested; a match on a last head reports the
//! node, a match on any other head makes the remainder pending for the
//! node's descendants. Chains are never dropped from the set, so nested
//! matches are each found independently.
//!
//! # Not Supported
//!
//! - Combinators other than descendant
//! - Attribute selectors other than exact `#id` and `.class` equality
//! - Multiple classes, class-list membership, pseudo-classes

mod error;
mod matcher;
mod pending;
mod selector;
mod trace;

pub use error::{FindError, SelectorError};
pub use matcher::{Matcher, find, find_chain};
pub use pending::{PendingChain, PendingSet};
pub use selector::{SelectorHead, parse};
pub use trace::{NoopSink, OutlineSink, TraceEvent, TraceSink, TracingSink};
