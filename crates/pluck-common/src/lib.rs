//! Common utilities for the pluck workspace.
//!
//! This crate provides shared infrastructure used by all pluck components:
//! - **Levels** - the seven named diagnostic levels and the verbosity dial
//!   that decides which of them are shown

pub mod level;

pub use level::{Level, Verbosity, VerbosityError};
