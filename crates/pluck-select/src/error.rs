//! Error types for selector parsing and matching.

use thiserror::Error;

/// A selector chain segment that does not fit `tag(#id)?(.class)?( rest)?`.
///
/// Positions are byte offsets into `chain`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The chain is the empty string.
    #[error("empty selector chain")]
    Empty,

    /// The chain does not start with a tag name.
    #[error("expected a tag name at byte {position} of {chain:?}")]
    MissingTagName {
        /// The chain being parsed.
        chain: String,
        /// Where the tag name should start.
        position: usize,
    },

    /// A `#` or `.` is not followed by a name.
    #[error("expected a name after '{marker}' at byte {position} of {chain:?}")]
    MissingName {
        /// The chain being parsed.
        chain: String,
        /// Where the name should start.
        position: usize,
        /// The `#` or `.` that needs a name.
        marker: char,
    },

    /// Something other than `#id`, `.class` or whitespace follows a name.
    #[error("unexpected character {found:?} at byte {position} of {chain:?}")]
    UnexpectedCharacter {
        /// The chain being parsed.
        chain: String,
        /// Offset of the offending character.
        position: usize,
        /// The offending character.
        found: char,
    },
}

/// Why a [`find`](crate::find) call produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FindError {
    /// The root argument is absent or not a node of the tree.
    #[error("root node is absent")]
    NilRoot,

    /// A chain, or a remainder spawned from one, failed to parse.
    #[error("invalid selector: {0}")]
    InvalidSelector(#[from] SelectorError),
}
