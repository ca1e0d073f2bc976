//! The set of selector chains still eligible below a node.
//!
//! Each visited node gets its own frame holding only the remainders spawned
//! there, linked to the frame it inherited. A frame is never changed once
//! children start reading it, so sibling subtrees cannot see each other's
//! remainders, and nothing is copied on the way down. Frames that stayed
//! empty are skipped when linking, so the chain of frames is never longer
//! than the number of distinct chains.

use std::{fmt, iter};

use crate::selector::{self, SelectorHead};
use crate::SelectorError;

/// One pending chain and its parsed head.
#[derive(Debug, Clone)]
pub struct PendingChain {
    chain: String,
    head: Result<SelectorHead, SelectorError>,
}

impl PendingChain {
    fn new(chain: &str) -> Self {
        Self {
            chain: chain.to_string(),
            head: selector::parse(chain),
        }
    }

    /// The chain text.
    #[must_use]
    pub fn chain(&self) -> &str {
        &self.chain
    }

    /// The parsed first head, or why the chain does not parse.
    ///
    /// # Errors
    ///
    /// Returns the [`SelectorError`] from parsing the chain.
    pub const fn head(&self) -> Result<&SelectorHead, &SelectorError> {
        self.head.as_ref()
    }
}

/// Chains eligible to match at or below the current node.
///
/// Chains are deduplicated by their exact text across every frame.
#[derive(Debug)]
pub struct PendingSet<'p> {
    entries: Vec<PendingChain>,
    parent: Option<&'p PendingSet<'p>>,
}

impl PendingSet<'static> {
    /// A root frame seeded with `chains`, in order, duplicates dropped.
    #[must_use]
    pub fn seed<I, S>(chains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self {
            entries: Vec::new(),
            parent: None,
        };
        for chain in chains {
            let _ = set.insert(chain.as_ref());
        }
        set
    }
}

impl<'p> PendingSet<'p> {
    /// An empty frame inheriting every chain of `self`.
    #[must_use]
    pub fn child(&self) -> PendingSet<'_> {
        let parent = if self.entries.is_empty() {
            self.parent
        } else {
            Some(self)
        };
        PendingSet {
            entries: Vec::new(),
            parent,
        }
    }

    /// Add `chain` to this frame unless some frame already holds it.
    /// Returns whether it was added.
    pub fn insert(&mut self, chain: &str) -> bool {
        if self.contains(chain) {
            return false;
        }
        self.entries.push(PendingChain::new(chain));
        true
    }

    /// Whether any frame holds `chain`.
    #[must_use]
    pub fn contains(&self, chain: &str) -> bool {
        self.frames()
            .any(|frame| frame.entries.iter().any(|entry| entry.chain == chain))
    }

    /// Total number of chains across all frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames().map(|frame| frame.entries.len()).sum()
    }

    /// Whether no frame holds any chain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every chain, oldest frame first, in insertion order within a frame.
    pub fn iter(&self) -> impl Iterator<Item = &PendingChain> {
        let mut frames: Vec<_> = self.frames().collect();
        frames.reverse();
        frames.into_iter().flat_map(|frame| frame.entries.iter())
    }

    /// This frame followed by its linked ancestors.
    fn frames(&self) -> impl Iterator<Item = &PendingSet<'p>> {
        iter::successors(Some(self), |frame| frame.parent)
    }
}

impl fmt::Display for PendingSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, entry) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}", entry.chain)?;
        }
        f.write_str("}")
    }
}
