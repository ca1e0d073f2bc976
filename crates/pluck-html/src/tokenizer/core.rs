use strum_macros::Display;

use super::character_reference;
use super::token::{SpannedToken, Token};
use crate::ParseIssue;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The subset of tokenizer states this tokenizer implements. Script data
/// states collapse into RAWTEXT, and the comment and DOCTYPE sub-states are
/// folded into one state each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// Text between tags.
    Data,
    /// Inside `textarea` or `title`: text with references decoded.
    RCDATA,
    /// Inside `script`, `style` and friends: text kept verbatim.
    RAWTEXT,
    /// Just read `<`.
    TagOpen,
    /// Just read `</`.
    EndTagOpen,
    /// Reading a tag name.
    TagName,
    /// Whitespace before an attribute name.
    BeforeAttributeName,
    /// Reading an attribute name.
    AttributeName,
    /// Whitespace after an attribute name, before `=` or the next name.
    AfterAttributeName,
    /// Just read `=`.
    BeforeAttributeValue,
    /// Inside `"..."`.
    AttributeValueDoubleQuoted,
    /// Inside `'...'`.
    AttributeValueSingleQuoted,
    /// Reading an unquoted value.
    AttributeValueUnquoted,
    /// Just closed a quoted value.
    AfterAttributeValueQuoted,
    /// Just read `/` inside a tag.
    SelfClosingStartTag,
    /// Reading `<?...>` or `<!...>` that is neither a comment nor a doctype.
    BogusComment,
    /// Inside `<!--`.
    Comment,
    /// Reading the doctype name.
    DOCTYPE,
    /// Skipping doctype identifiers up to `>`.
    AfterDOCTYPEName,
}

/// Elements whose content is raw text up to the matching end tag.
const RAWTEXT_ELEMENTS: &[&str] = &["script", "style", "xmp", "iframe", "noembed", "noframes"];

/// Elements whose content is text with character references decoded.
const RCDATA_ELEMENTS: &[&str] = &["textarea", "title"];

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// Converts markup text into a stream of [`SpannedToken`]s. Never fails:
/// malformed input is recovered from and reported as a [`ParseIssue`].
pub struct HTMLTokenizer {
    input: String,
    state: TokenizerState,
    current_pos: usize,
    current_input_character: Option<char>,
    reconsume: bool,
    current_token: Option<Token>,
    token_start: usize,
    last_start_tag_name: Option<String>,
    tokens: Vec<SpannedToken>,
    issues: Vec<ParseIssue>,
}

impl HTMLTokenizer {
    /// Create a tokenizer over `input`.
    #[must_use]
    pub const fn new(input: String) -> Self {
        Self {
            input,
            state: TokenizerState::Data,
            current_pos: 0,
            current_input_character: None,
            reconsume: false,
            current_token: None,
            token_start: 0,
            last_start_tag_name: None,
            tokens: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Tokenize the whole input. The last token is always [`Token::EndOfFile`].
    pub fn run(&mut self) {
        while !self.step() {}
    }

    /// Tokens produced so far.
    #[must_use]
    pub fn tokens(&self) -> &[SpannedToken] {
        &self.tokens
    }

    /// Problems encountered so far.
    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Consume the tokenizer, returning its tokens and issues.
    #[must_use]
    pub fn into_parts(self) -> (Vec<SpannedToken>, Vec<ParseIssue>) {
        (self.tokens, self.issues)
    }

    /// Process one input character. Returns `true` once end of file has been
    /// emitted.
    fn step(&mut self) -> bool {
        let c = if self.reconsume {
            self.reconsume = false;
            self.current_input_character
        } else {
            let c = self.consume();
            self.current_input_character = c;
            c
        };

        match self.state {
            TokenizerState::Data => match c {
                Some('<') => {
                    self.token_start = self.current_pos - 1;
                    self.switch_to(TokenizerState::TagOpen);
                }
                Some('&') => self.emit_character_reference(),
                Some(c) => self.emit_character(c),
                None => return self.emit_eof(),
            },

            TokenizerState::RCDATA | TokenizerState::RAWTEXT => match c {
                Some('<') if self.appropriate_end_tag_follows() => {
                    self.token_start = self.current_pos - 1;
                    let _ = self.consume();
                    self.switch_to(TokenizerState::EndTagOpen);
                }
                Some('&') if self.state == TokenizerState::RCDATA => {
                    self.emit_character_reference();
                }
                Some(c) => self.emit_character(c),
                None => return self.emit_eof(),
            },

            TokenizerState::TagOpen => match c {
                Some('!') => self.markup_declaration_open(),
                Some('/') => self.switch_to(TokenizerState::EndTagOpen),
                Some(c) if c.is_ascii_alphabetic() => {
                    self.current_token = Some(Token::start_tag());
                    self.reconsume_in(TokenizerState::TagName);
                }
                Some('?') => {
                    self.issue("unexpected-question-mark-instead-of-tag-name");
                    self.current_token = Some(Token::comment());
                    self.reconsume_in(TokenizerState::BogusComment);
                }
                Some(_) => {
                    self.issue("invalid-first-character-of-tag-name");
                    self.emit_character('<');
                    self.reconsume_in(TokenizerState::Data);
                }
                None => {
                    self.issue("eof-before-tag-name");
                    self.emit_character('<');
                    return self.emit_eof();
                }
            },

            TokenizerState::EndTagOpen => match c {
                Some(c) if c.is_ascii_alphabetic() => {
                    self.current_token = Some(Token::end_tag());
                    self.reconsume_in(TokenizerState::TagName);
                }
                Some('>') => {
                    self.issue("missing-end-tag-name");
                    self.switch_to(TokenizerState::Data);
                }
                Some(_) => {
                    self.issue("invalid-first-character-of-tag-name");
                    self.current_token = Some(Token::comment());
                    self.reconsume_in(TokenizerState::BogusComment);
                }
                None => {
                    self.issue("eof-before-tag-name");
                    self.emit_character('<');
                    self.emit_character('/');
                    return self.emit_eof();
                }
            },

            TokenizerState::TagName => match c {
                Some(c) if is_whitespace(c) => {
                    self.switch_to(TokenizerState::BeforeAttributeName);
                }
                Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
                Some('>') => self.emit_current_tag(),
                Some(c) => self.with_token(|t| t.push_name(c.to_ascii_lowercase())),
                None => return self.eof_in_tag(),
            },

            TokenizerState::BeforeAttributeName => match c {
                Some(c) if is_whitespace(c) => {}
                Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
                Some('=') => {
                    self.issue("unexpected-equals-sign-before-attribute-name");
                    self.with_token(|t| {
                        t.open_attribute();
                        t.push_attribute_name('=');
                    });
                    self.switch_to(TokenizerState::AttributeName);
                }
                Some(_) => {
                    self.with_token(Token::open_attribute);
                    self.reconsume_in(TokenizerState::AttributeName);
                }
            },

            TokenizerState::AttributeName => match c {
                Some(c) if is_whitespace(c) || c == '/' || c == '>' => {
                    self.reconsume_in(TokenizerState::AfterAttributeName);
                }
                None => self.reconsume_in(TokenizerState::AfterAttributeName),
                Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
                Some(c) => {
                    if matches!(c, '"' | '\'' | '<') {
                        self.issue("unexpected-character-in-attribute-name");
                    }
                    self.with_token(|t| t.push_attribute_name(c.to_ascii_lowercase()));
                }
            },

            TokenizerState::AfterAttributeName => match c {
                Some(c) if is_whitespace(c) => {}
                Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
                Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
                Some('>') => self.emit_current_tag(),
                Some(_) => {
                    self.with_token(Token::open_attribute);
                    self.reconsume_in(TokenizerState::AttributeName);
                }
                None => return self.eof_in_tag(),
            },

            TokenizerState::BeforeAttributeValue => match c {
                Some(c) if is_whitespace(c) => {}
                Some('"') => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
                Some('\'') => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
                Some('>') => {
                    self.issue("missing-attribute-value");
                    self.emit_current_tag();
                }
                _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
            },

            TokenizerState::AttributeValueDoubleQuoted
            | TokenizerState::AttributeValueSingleQuoted => {
                let quote = if self.state == TokenizerState::AttributeValueDoubleQuoted {
                    '"'
                } else {
                    '\''
                };
                match c {
                    Some(c) if c == quote => {
                        self.switch_to(TokenizerState::AfterAttributeValueQuoted);
                    }
                    Some('&') => self.append_character_reference_to_attribute(),
                    Some(c) => self.with_token(|t| t.push_attribute_value(c)),
                    None => return self.eof_in_tag(),
                }
            }

            TokenizerState::AttributeValueUnquoted => match c {
                Some(c) if is_whitespace(c) => {
                    self.switch_to(TokenizerState::BeforeAttributeName);
                }
                Some('&') => self.append_character_reference_to_attribute(),
                Some('>') => self.emit_current_tag(),
                Some(c) => {
                    if matches!(c, '"' | '\'' | '<' | '=' | '`') {
                        self.issue("unexpected-character-in-unquoted-attribute-value");
                    }
                    self.with_token(|t| t.push_attribute_value(c));
                }
                None => return self.eof_in_tag(),
            },

            TokenizerState::AfterAttributeValueQuoted => match c {
                Some(c) if is_whitespace(c) => {
                    self.switch_to(TokenizerState::BeforeAttributeName);
                }
                Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
                Some('>') => self.emit_current_tag(),
                Some(_) => {
                    self.issue("missing-whitespace-between-attributes");
                    self.reconsume_in(TokenizerState::BeforeAttributeName);
                }
                None => return self.eof_in_tag(),
            },

            TokenizerState::SelfClosingStartTag => match c {
                Some('>') => {
                    self.with_token(Token::mark_self_closing);
                    self.emit_current_tag();
                }
                Some(_) => {
                    self.issue("unexpected-solidus-in-tag");
                    self.reconsume_in(TokenizerState::BeforeAttributeName);
                }
                None => return self.eof_in_tag(),
            },

            TokenizerState::BogusComment => match c {
                Some('>') => {
                    self.emit_current_token();
                    self.switch_to(TokenizerState::Data);
                }
                Some(c) => self.with_token(|t| t.push_data(c)),
                None => {
                    self.emit_current_token();
                    return self.emit_eof();
                }
            },

            TokenizerState::Comment => match c {
                Some('-') if self.next_few_characters_are("->") => {
                    self.current_pos += 2;
                    self.emit_current_token();
                    self.switch_to(TokenizerState::Data);
                }
                Some('>') if self.current_comment_is_empty() => {
                    self.issue("abrupt-closing-of-empty-comment");
                    self.emit_current_token();
                    self.switch_to(TokenizerState::Data);
                }
                Some(c) => self.with_token(|t| t.push_data(c)),
                None => {
                    self.issue("eof-in-comment");
                    self.emit_current_token();
                    return self.emit_eof();
                }
            },

            TokenizerState::DOCTYPE => match c {
                Some(c) if is_whitespace(c) => {
                    if self.current_doctype_has_name() {
                        self.switch_to(TokenizerState::AfterDOCTYPEName);
                    }
                }
                Some('>') => {
                    self.emit_current_token();
                    self.switch_to(TokenizerState::Data);
                }
                Some(c) => self.with_token(|t| t.push_data(c.to_ascii_lowercase())),
                None => {
                    self.issue("eof-in-doctype");
                    self.emit_current_token();
                    return self.emit_eof();
                }
            },

            TokenizerState::AfterDOCTYPEName => match c {
                Some('>') => {
                    self.emit_current_token();
                    self.switch_to(TokenizerState::Data);
                }
                Some(_) => {}
                None => {
                    self.issue("eof-in-doctype");
                    self.emit_current_token();
                    return self.emit_eof();
                }
            },
        }
        false
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    fn markup_declaration_open(&mut self) {
        if self.next_few_characters_are("--") {
            self.current_pos += 2;
            self.current_token = Some(Token::comment());
            self.switch_to(TokenizerState::Comment);
        } else if self.next_few_characters_are_ignore_case("doctype") {
            self.current_pos += "doctype".len();
            self.current_token = Some(Token::Doctype { name: None });
            self.switch_to(TokenizerState::DOCTYPE);
        } else {
            self.issue("incorrectly-opened-comment");
            self.current_token = Some(Token::comment());
            self.switch_to(TokenizerState::BogusComment);
        }
    }

    // =========================================================================
    // Input helpers
    // =========================================================================

    /// "Consume the next input character"
    fn consume(&mut self) -> Option<char> {
        let c = self.input[self.current_pos..].chars().next()?;
        self.current_pos += c.len_utf8();
        Some(c)
    }

    fn next_few_characters_are(&self, target: &str) -> bool {
        self.input[self.current_pos..].starts_with(target)
    }

    fn next_few_characters_are_ignore_case(&self, target: &str) -> bool {
        self.input
            .get(self.current_pos..self.current_pos + target.len())
            .is_some_and(|s| s.eq_ignore_ascii_case(target))
    }

    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer."
    ///
    /// Called with the `<` consumed; checks for `/name` followed by a tag
    /// terminator.
    fn appropriate_end_tag_follows(&self) -> bool {
        let Some(name) = self.last_start_tag_name.as_deref() else {
            return false;
        };
        let rest = &self.input[self.current_pos..];
        let Some(after_slash) = rest.strip_prefix('/') else {
            return false;
        };
        after_slash
            .get(..name.len())
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name))
            && after_slash[name.len()..]
                .chars()
                .next()
                .is_none_or(|c| is_whitespace(c) || c == '/' || c == '>')
    }

    const fn switch_to(&mut self, state: TokenizerState) {
        self.state = state;
    }

    const fn reconsume_in(&mut self, state: TokenizerState) {
        self.reconsume = true;
        self.state = state;
    }

    // =========================================================================
    // Emission helpers
    // =========================================================================

    fn with_token(&mut self, f: impl FnOnce(&mut Token)) {
        if let Some(token) = self.current_token.as_mut() {
            f(token);
        }
    }

    fn current_comment_is_empty(&self) -> bool {
        matches!(&self.current_token, Some(Token::Comment { data }) if data.is_empty())
    }

    fn current_doctype_has_name(&self) -> bool {
        matches!(&self.current_token, Some(Token::Doctype { name: Some(_) }))
    }

    fn push(&mut self, offset: usize, token: Token) {
        self.tokens.push(SpannedToken { offset, token });
    }

    fn emit_character(&mut self, c: char) {
        let offset = self.current_pos.saturating_sub(c.len_utf8());
        self.push(offset, Token::Character { data: c });
    }

    fn emit_current_token(&mut self) {
        if let Some(token) = self.current_token.take() {
            self.push(self.token_start, token);
        }
    }

    /// Emit the current tag token and return to the data state, or to RAWTEXT
    /// or RCDATA after the start tag of a raw text element.
    fn emit_current_tag(&mut self) {
        let next_state = match &self.current_token {
            Some(Token::StartTag { name, .. }) => {
                self.last_start_tag_name = Some(name.clone());
                if RAWTEXT_ELEMENTS.contains(&name.as_str()) {
                    TokenizerState::RAWTEXT
                } else if RCDATA_ELEMENTS.contains(&name.as_str()) {
                    TokenizerState::RCDATA
                } else {
                    TokenizerState::Data
                }
            }
            _ => TokenizerState::Data,
        };
        self.emit_current_token();
        self.switch_to(next_state);
    }

    fn emit_eof(&mut self) -> bool {
        self.push(self.input.len(), Token::EndOfFile);
        true
    }

    fn eof_in_tag(&mut self) -> bool {
        self.issue("eof-in-tag");
        self.current_token = None;
        self.emit_eof()
    }

    /// Decode a reference after `&` in text; a literal `&` if none matches.
    fn emit_character_reference(&mut self) {
        match self.take_character_reference(false) {
            Some(c) => self.emit_character(c),
            None => self.emit_character('&'),
        }
    }

    fn append_character_reference_to_attribute(&mut self) {
        let c = self.take_character_reference(true).unwrap_or('&');
        self.with_token(|t| t.push_attribute_value(c));
    }

    fn take_character_reference(&mut self, in_attribute: bool) -> Option<char> {
        let reference = character_reference::decode(&self.input[self.current_pos..], in_attribute)?;
        if reference.missing_semicolon {
            self.issue("missing-semicolon-after-character-reference");
        }
        self.current_pos += reference.consumed;
        Some(reference.value)
    }

    fn issue(&mut self, message: &str) {
        self.issues.push(ParseIssue {
            message: format!("{message} (in {} state)", self.state),
            offset: self.current_pos,
        });
    }
}

/// Tab, line feed, form feed, carriage return or space.
const fn is_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}
