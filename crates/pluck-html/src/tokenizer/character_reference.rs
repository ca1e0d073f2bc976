//! Character reference decoding.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! Only a handful of named references are known; everything else is left as
//! literal text. The full table has 2,231 entries.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Named references that may appear without a trailing semicolon.
///
/// "for historical reasons" a few entities are recognised without `;`.
const LEGACY: &[&str] = &["amp", "lt", "gt", "quot", "nbsp", "copy", "reg"];

static NAMED_ENTITIES: LazyLock<HashMap<&'static str, char>> = LazyLock::new(|| {
    HashMap::from([
        ("amp", '&'),
        ("lt", '<'),
        ("gt", '>'),
        ("quot", '"'),
        ("apos", '\''),
        ("nbsp", '\u{00A0}'),
        ("copy", '\u{00A9}'),
        ("reg", '\u{00AE}'),
        ("trade", '\u{2122}'),
        ("mdash", '\u{2014}'),
        ("ndash", '\u{2013}'),
        ("hellip", '\u{2026}'),
        ("laquo", '\u{00AB}'),
        ("raquo", '\u{00BB}'),
        ("middot", '\u{00B7}'),
        ("bull", '\u{2022}'),
    ])
});

/// A decoded reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterReference {
    /// The character the reference stands for.
    pub value: char,
    /// Bytes of input consumed after the `&`.
    pub consumed: usize,
    /// Whether the reference lacked its terminating `;`.
    pub missing_semicolon: bool,
}

/// Decode the reference at the start of `rest`, the input just after an `&`.
///
/// Returns `None` when `rest` does not start with a recognised reference; the
/// caller then treats the `&` as a literal ampersand.
#[must_use]
pub fn decode(rest: &str, in_attribute: bool) -> Option<CharacterReference> {
    if let Some(numeric) = rest.strip_prefix('#') {
        return decode_numeric(numeric).map(|r| CharacterReference {
            consumed: r.consumed + 1,
            ..r
        });
    }

    let name_len = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    if name_len == 0 {
        return None;
    }
    let name = &rest[..name_len];
    let value = *NAMED_ENTITIES.get(name)?;

    if rest[name_len..].starts_with(';') {
        return Some(CharacterReference {
            value,
            consumed: name_len + 1,
            missing_semicolon: false,
        });
    }

    // [§ 13.2.5.73](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    // "If the character reference was consumed as part of an attribute, and the
    // last character matched is not a U+003B SEMICOLON character (;), and the next
    // input character is either a U+003D EQUALS SIGN character (=) or an ASCII
    // alphanumeric, then, for historical reasons, flush code points consumed as a
    // character reference and switch to the return state."
    let next_is_equals = rest[name_len..].starts_with('=');
    if !LEGACY.contains(&name) || (in_attribute && next_is_equals) {
        return None;
    }
    Some(CharacterReference {
        value,
        consumed: name_len,
        missing_semicolon: true,
    })
}

/// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
fn decode_numeric(rest: &str) -> Option<CharacterReference> {
    let (digits_start, radix) = match rest.as_bytes().first() {
        Some(b'x' | b'X') => (1, 16),
        _ => (0, 10),
    };
    let digits = &rest[digits_start..];
    let digit_len = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if digit_len == 0 {
        return None;
    }

    // [§ 13.2.5.80 Numeric character reference end state]
    // "If the number is 0x00 ... greater than 0x10FFFF ... a surrogate ...
    // set the character reference code to 0xFFFD."
    let value = u32::from_str_radix(&digits[..digit_len], radix)
        .ok()
        .filter(|&code| code != 0)
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER);

    let terminated = digits[digit_len..].starts_with(';');
    Some(CharacterReference {
        value,
        consumed: digits_start + digit_len + usize::from(terminated),
        missing_semicolon: !terminated,
    })
}
