//! Selector chain segments.
//!
//! A chain is `head (whitespace head)*`, where each head is
//! `tag ['#' id] ['.' class]`. Parsing splits off the first head and keeps
//! everything after the first run of whitespace, unparsed, as the remainder.
//!
//! Names are one or more ASCII alphanumerics, `_` or `-`. The scanner is
//! anchored at both ends of the head: anything after a name other than `#`,
//! `.` or whitespace (in that order) is an error.

use std::fmt;
use std::str::FromStr;

use pluck_dom::{DomTree, ElementData, NodeId};

use crate::SelectorError;

/// The first segment of a selector chain, plus the unparsed rest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectorHead {
    /// Required tag name, compared exactly.
    pub tag_name: String,
    /// Required `id` attribute value, if any.
    pub id: Option<String>,
    /// Required `class` attribute value, if any. Compared against the whole
    /// attribute, not its individual class names.
    pub class_name: Option<String>,
    /// The chain after this head; empty when this head is the last one.
    pub remainder: String,
}

impl SelectorHead {
    /// Whether this head ends its chain.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.remainder.is_empty()
    }

    /// Whether `element` satisfies this head.
    ///
    /// An absent id or class is no constraint; a present one must equal the
    /// element's attribute value exactly.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        element.tag_name == self.tag_name
            && self.id.as_deref().is_none_or(|id| element.id() == Some(id))
            && self
                .class_name
                .as_deref()
                .is_none_or(|class| element.class() == Some(class))
    }

    /// Whether node `id` of `tree` is an element satisfying this head.
    #[must_use]
    pub fn matches_node(&self, tree: &DomTree, id: NodeId) -> bool {
        tree.as_element(id).is_some_and(|element| self.matches(element))
    }
}

impl fmt::Display for SelectorHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag_name)?;
        if let Some(id) = &self.id {
            write!(f, "#{id}")?;
        }
        if let Some(class) = &self.class_name {
            write!(f, ".{class}")?;
        }
        if !self.remainder.is_empty() {
            write!(f, " {}", self.remainder)?;
        }
        Ok(())
    }
}

impl FromStr for SelectorHead {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Split the first head off `chain`.
///
/// ```
/// let head = pluck_select::parse("div#main.item a img").unwrap();
/// assert_eq!(head.tag_name, "div");
/// assert_eq!(head.id.as_deref(), Some("main"));
/// assert_eq!(head.class_name.as_deref(), Some("item"));
/// assert_eq!(head.remainder, "a img");
/// ```
///
/// # Errors
///
/// Returns a [`SelectorError`] naming the first byte that does not fit the
/// grammar.
pub fn parse(chain: &str) -> Result<SelectorHead, SelectorError> {
    if chain.is_empty() {
        return Err(SelectorError::Empty);
    }

    let mut scanner = Scanner { chain, pos: 0 };
    let tag_name = scanner
        .name()
        .ok_or_else(|| SelectorError::MissingTagName {
            chain: chain.to_string(),
            position: 0,
        })?;
    let id = scanner.qualifier('#')?;
    let class_name = scanner.qualifier('.')?;
    let remainder = scanner.remainder()?;

    Ok(SelectorHead {
        tag_name: tag_name.to_string(),
        id: id.map(str::to_string),
        class_name: class_name.map(str::to_string),
        remainder: remainder.to_string(),
    })
}

/// Characters allowed in tag, id and class names.
const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

struct Scanner<'a> {
    chain: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn rest(&self) -> &'a str {
        &self.chain[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consume a non-empty run of name characters.
    fn name(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let len = rest.find(|c: char| !is_name_char(c)).unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some(&rest[..len])
    }

    /// Consume `marker` followed by a name, if `marker` is next.
    fn qualifier(&mut self, marker: char) -> Result<Option<&'a str>, SelectorError> {
        if self.peek() != Some(marker) {
            return Ok(None);
        }
        self.pos += marker.len_utf8();
        let position = self.pos;
        self.name()
            .map(Some)
            .ok_or_else(|| SelectorError::MissingName {
                chain: self.chain.to_string(),
                position,
                marker,
            })
    }

    /// Everything after the first run of whitespace, or `""` at the end.
    fn remainder(&mut self) -> Result<&'a str, SelectorError> {
        match self.peek() {
            None => Ok(""),
            Some(c) if c.is_ascii_whitespace() => {
                let rest = self.rest().trim_start_matches(|c: char| c.is_ascii_whitespace());
                self.pos = self.chain.len();
                Ok(rest)
            }
            Some(found) => Err(SelectorError::UnexpectedCharacter {
                chain: self.chain.to_string(),
                position: self.pos,
                found,
            }),
        }
    }
}
