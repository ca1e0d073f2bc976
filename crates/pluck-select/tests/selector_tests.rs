//! Tests for splitting selector chains into heads.

use pluck_dom::ElementData;
use pluck_select::{SelectorError, SelectorHead, parse};
use quickcheck_macros::quickcheck;

fn head(tag: &str, id: Option<&str>, class: Option<&str>, remainder: &str) -> SelectorHead {
    SelectorHead {
        tag_name: tag.to_string(),
        id: id.map(str::to_string),
        class_name: class.map(str::to_string),
        remainder: remainder.to_string(),
    }
}

fn element(tag: &str, attrs: &[(&str, &str)]) -> ElementData {
    ElementData {
        tag_name: tag.to_string(),
        attrs: attrs.iter().copied().collect(),
    }
}

// ========== parsing ==========

#[test]
fn test_parse_tag_only() {
    assert_eq!(parse("div"), Ok(head("div", None, None, "")));
}

#[test]
fn test_parse_id_and_class() {
    assert_eq!(parse("div#main"), Ok(head("div", Some("main"), None, "")));
    assert_eq!(parse("div.item"), Ok(head("div", None, Some("item"), "")));
    assert_eq!(
        parse("div#main.item"),
        Ok(head("div", Some("main"), Some("item"), ""))
    );
}

#[test]
fn test_parse_splits_remainder_after_first_whitespace_run() {
    assert_eq!(parse("div a img"), Ok(head("div", None, None, "a img")));
    assert_eq!(parse("div \t\n a  img"), Ok(head("div", None, None, "a  img")));
}

#[test]
fn test_trailing_whitespace_leaves_empty_remainder() {
    let parsed = parse("div   ").unwrap();
    assert!(parsed.is_last());
}

#[test]
fn test_names_allow_digits_underscores_and_hyphens() {
    assert_eq!(
        parse("unmatched-tag#x_1.h2-title"),
        Ok(head("unmatched-tag", Some("x_1"), Some("h2-title"), ""))
    );
}

#[test]
fn test_remainder_is_not_validated() {
    assert_eq!(parse("foo %"), Ok(head("foo", None, None, "%")));
}

#[test]
fn test_from_str_and_display() {
    let parsed: SelectorHead = "a#x.y  b c".parse().unwrap();
    assert_eq!(parsed.to_string(), "a#x.y b c");
}

// ========== errors ==========

#[test]
fn test_empty_chain() {
    assert_eq!(parse(""), Err(SelectorError::Empty));
}

#[test]
fn test_missing_tag_name() {
    for chain in ["#main", ".item", " div", ">"] {
        assert_eq!(
            parse(chain),
            Err(SelectorError::MissingTagName {
                chain: chain.to_string(),
                position: 0,
            }),
            "{chain:?}"
        );
    }
}

#[test]
fn test_marker_without_name() {
    assert_eq!(
        parse("div#"),
        Err(SelectorError::MissingName {
            chain: "div#".to_string(),
            position: 4,
            marker: '#',
        })
    );
    assert_eq!(
        parse("div. a"),
        Err(SelectorError::MissingName {
            chain: "div. a".to_string(),
            position: 4,
            marker: '.',
        })
    );
}

#[test]
fn test_unexpected_character_after_head() {
    let cases = [("div>a", 3, '>'), ("div.a.b", 5, '.'), ("div.c#i", 5, '#'), ("a[href]", 1, '[')];
    for (chain, position, found) in cases {
        assert_eq!(
            parse(chain),
            Err(SelectorError::UnexpectedCharacter {
                chain: chain.to_string(),
                position,
                found,
            }),
            "{chain:?}"
        );
    }
}

#[test]
fn test_error_messages_name_position() {
    let error = parse("div#").unwrap_err();
    assert_eq!(error.to_string(), "expected a name after '#' at byte 4 of \"div#\"");
}

// ========== matching ==========

#[test]
fn test_absent_id_and_class_are_no_constraint() {
    let div = element("div", &[]);
    assert!(parse("div").unwrap().matches(&div));
    assert!(!parse("div#x").unwrap().matches(&div));
    assert!(!parse("div.x").unwrap().matches(&div));
}

#[test]
fn test_class_is_compared_as_whole_attribute() {
    let div = element("div", &[("class", "foo bar")]);
    assert!(!parse("div.foo").unwrap().matches(&div));
    assert!(parse("div").unwrap().matches(&div));
}

#[test]
fn test_tag_name_is_case_sensitive() {
    let div = element("div", &[("id", "a")]);
    assert!(parse("div#a").unwrap().matches(&div));
    assert!(!parse("DIV#a").unwrap().matches(&div));
    assert!(!parse("span#a").unwrap().matches(&div));
}

// ========== properties ==========

#[quickcheck]
fn prop_parse_is_deterministic(chain: String) -> bool {
    parse(&chain) == parse(&chain)
}

#[quickcheck]
fn prop_remainder_is_a_suffix(chain: String) -> bool {
    parse(&chain)
        .ok()
        .is_none_or(|head| chain.ends_with(&head.remainder))
}

#[quickcheck]
fn prop_simple_chains_round_trip(parts: Vec<u8>) -> bool {
    const TAGS: [&str; 4] = ["div", "a", "img", "span"];
    if parts.is_empty() {
        return true;
    }
    let chain = parts
        .iter()
        .map(|&p| TAGS[usize::from(p) % TAGS.len()])
        .collect::<Vec<_>>()
        .join(" ");
    parse(&chain).is_ok_and(|head| head.to_string() == chain)
}
