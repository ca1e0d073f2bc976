//! Tests for diagnostic levels and verbosity parsing.

use pluck_common::{Level, Verbosity, VerbosityError};
use strum::IntoEnumIterator;

#[test]
fn test_levels_run_from_trace_to_fatal() {
    let ranks: Vec<i8> = Level::iter().map(Level::rank).collect();
    assert_eq!(ranks, vec![3, 2, 1, 0, -1, -2, -3]);

    let tags: Vec<&str> = Level::iter().map(Level::tag).collect();
    assert_eq!(tags, vec!["trc", "dbg", "vrb", "ifo", "wrn", "err", "ftl"]);
}

#[test]
fn test_level_parses_name_and_tag() {
    assert_eq!("trace".parse::<Level>().unwrap(), Level::Trace);
    assert_eq!("TRC".parse::<Level>().unwrap(), Level::Trace);
    assert_eq!("Verbose".parse::<Level>().unwrap(), Level::Verbose);
    assert_eq!("ftl".parse::<Level>().unwrap(), Level::Fatal);
    assert!("loud".parse::<Level>().is_err());
    assert_eq!(Level::Warn.to_string(), "warn");
}

#[test]
fn test_default_verbosity_shows_info_and_above() {
    let verbosity = Verbosity::default();
    assert_eq!(verbosity.value(), 0);
    assert!(verbosity.allows(Level::Info));
    assert!(verbosity.allows(Level::Warn));
    assert!(verbosity.allows(Level::Fatal));
    assert!(!verbosity.allows(Level::Verbose));
    assert!(!verbosity.allows(Level::Trace));
    assert_eq!(verbosity.max_level(), Level::Info);
}

#[test]
fn test_verbosity_range_is_enforced() {
    assert_eq!(Verbosity::new(3).unwrap().max_level(), Level::Trace);
    assert_eq!(Verbosity::new(-3).unwrap().max_level(), Level::Fatal);
    assert_eq!(
        Verbosity::new(4),
        Err(VerbosityError::OutOfRange { value: 4 })
    );
    assert_eq!(
        Verbosity::new(-300),
        Err(VerbosityError::OutOfRange { value: -300 })
    );
}

#[test]
fn test_saturating_clamps() {
    assert_eq!(Verbosity::saturating(10).value(), 3);
    assert_eq!(Verbosity::saturating(-10).value(), -3);
    assert_eq!(Verbosity::saturating(1).value(), 1);
}

#[test]
fn test_verbosity_from_str() {
    assert_eq!("2".parse::<Verbosity>().unwrap().value(), 2);
    assert_eq!(" -1 ".parse::<Verbosity>().unwrap().value(), -1);
    assert_eq!("debug".parse::<Verbosity>().unwrap(), Verbosity::at(Level::Debug));
    assert!(matches!(
        "7".parse::<Verbosity>(),
        Err(VerbosityError::OutOfRange { value: 7 })
    ));
    assert!(matches!(
        "noisy".parse::<Verbosity>(),
        Err(VerbosityError::Invalid(_))
    ));
}

#[test]
fn test_verbosity_error_messages() {
    let err = Verbosity::new(5).unwrap_err();
    assert_eq!(err.to_string(), "verbosity 5 is out of range [-3, 3]");
}
