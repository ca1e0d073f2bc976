//! HTML tokenizer module.
//!
//! Implements the parts of [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! that real-world pages need in order to produce a usable tree.

/// Character reference decoding per § 13.2.5.72.
pub mod character_reference;
/// Token types produced by the tokenizer.
pub mod token;
/// HTML tokenizer state machine implementation.
pub mod core;

pub use self::core::{HTMLTokenizer, TokenizerState};
pub use token::{Attribute, SpannedToken, Token};
