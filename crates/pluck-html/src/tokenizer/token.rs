//! Tokens handed from the tokenizer to the tree builder.

use core::fmt;

/// One `name="value"` pair from a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name.
    pub name: String,
    /// Decoded value; empty for a bare attribute such as `hidden`.
    pub value: String,
}

impl Attribute {
    /// Pair `name` with `value`.
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}

/// A unit of markup.
///
/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<!DOCTYPE name ...>`; identifiers after the name are skipped.
    Doctype {
        /// Lowercased name, `None` for a bare `<!DOCTYPE>`.
        name: Option<String>,
    },
    /// `<name attr=value ...>` or `<name ... />`.
    StartTag {
        /// Lowercased tag name.
        name: String,
        /// Whether the tag ended in `/>`.
        self_closing: bool,
        /// Attributes in source order, duplicates included.
        attributes: Vec<Attribute>,
    },
    /// `</name>`; anything after the name is dropped.
    EndTag {
        /// Lowercased tag name.
        name: String,
    },
    /// `<!--data-->`, or a bogus comment such as `<?xml ...>`.
    Comment {
        /// Text between the delimiters.
        data: String,
    },
    /// A single character of text, references already decoded.
    Character {
        /// The character.
        data: char,
    },
    /// No more input.
    EndOfFile,
}

impl Token {
    /// An empty start tag waiting for its name.
    #[must_use]
    pub const fn start_tag() -> Self {
        Self::StartTag {
            name: String::new(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// An empty end tag waiting for its name.
    #[must_use]
    pub const fn end_tag() -> Self {
        Self::EndTag {
            name: String::new(),
        }
    }

    /// An empty comment.
    #[must_use]
    pub const fn comment() -> Self {
        Self::Comment {
            data: String::new(),
        }
    }

    /// Extend the tag name. No-op on other tokens.
    pub fn push_name(&mut self, c: char) {
        if let Self::StartTag { name, .. } | Self::EndTag { name } = self {
            name.push(c);
        }
    }

    /// Begin an empty attribute on a start tag.
    pub fn open_attribute(&mut self) {
        if let Self::StartTag { attributes, .. } = self {
            attributes.push(Attribute::new(String::new(), String::new()));
        }
    }

    fn last_attribute(&mut self) -> Option<&mut Attribute> {
        match self {
            Self::StartTag { attributes, .. } => attributes.last_mut(),
            _ => None,
        }
    }

    /// Extend the name of the attribute opened last.
    pub fn push_attribute_name(&mut self, c: char) {
        if let Some(attr) = self.last_attribute() {
            attr.name.push(c);
        }
    }

    /// Extend the value of the attribute opened last.
    pub fn push_attribute_value(&mut self, c: char) {
        if let Some(attr) = self.last_attribute() {
            attr.value.push(c);
        }
    }

    /// Flag a start tag as ending in `/>`.
    pub const fn mark_self_closing(&mut self) {
        if let Self::StartTag { self_closing, .. } = self {
            *self_closing = true;
        }
    }

    /// Extend comment data or a doctype name.
    pub fn push_data(&mut self, c: char) {
        match self {
            Self::Comment { data } => data.push(c),
            Self::Doctype { name } => name.get_or_insert_with(String::new).push(c),
            _ => {}
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctype { name } => {
                write!(f, "<!DOCTYPE {}>", name.as_deref().unwrap_or_default())
            }
            Self::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                write!(f, "<{name}")?;
                for attr in attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                f.write_str(if *self_closing { " />" } else { ">" })
            }
            Self::EndTag { name } => write!(f, "</{name}>"),
            Self::Comment { data } => write!(f, "<!--{data}-->"),
            Self::Character { data } => write!(f, "{}", data.escape_debug()),
            Self::EndOfFile => f.write_str("EOF"),
        }
    }
}

/// A token and the byte offset where it started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    /// Byte offset of the token's first character.
    pub offset: usize,
    /// The token.
    pub token: Token,
}
