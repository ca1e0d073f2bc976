//! Diagnostic levels and the verbosity dial.
//!
//! Seven named levels run from the chattiest (`trace`) to the most severe
//! (`fatal`). Each level has a rank in `[-3, 3]`; a [`Verbosity`] shows every
//! level whose rank does not exceed it, so turning the dial up reveals more.
//!
//! | Level     | Rank | Tag   |
//! |-----------|------|-------|
//! | `trace`   |  3   | `trc` |
//! | `debug`   |  2   | `dbg` |
//! | `verbose` |  1   | `vrb` |
//! | `info`    |  0   | `ifo` |
//! | `warn`    | -1   | `wrn` |
//! | `error`   | -2   | `err` |
//! | `fatal`   | -3   | `ftl` |

use std::fmt;
use std::str::FromStr;

use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

/// A named diagnostic level.
///
/// Parses from either the full name or the three-letter tag, ignoring case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Level {
    /// Entry/exit narration for every visited node.
    #[strum(to_string = "trace", serialize = "trc")]
    Trace,
    /// Per-match detail.
    #[strum(to_string = "debug", serialize = "dbg")]
    Debug,
    /// Bookkeeping such as newly spawned selector remainders.
    #[strum(to_string = "verbose", serialize = "vrb")]
    Verbose,
    /// Default level.
    #[strum(to_string = "info", serialize = "ifo")]
    Info,
    /// Recoverable problems.
    #[strum(to_string = "warn", serialize = "wrn")]
    Warn,
    /// Failures that abort an operation.
    #[strum(to_string = "error", serialize = "err")]
    Error,
    /// Failures that abort the program.
    #[strum(to_string = "fatal", serialize = "ftl")]
    Fatal,
}

impl Level {
    /// The level's position on the verbosity dial, from `3` (trace) down to
    /// `-3` (fatal).
    #[must_use]
    pub const fn rank(self) -> i8 {
        match self {
            Self::Trace => 3,
            Self::Debug => 2,
            Self::Verbose => 1,
            Self::Info => 0,
            Self::Warn => -1,
            Self::Error => -2,
            Self::Fatal => -3,
        }
    }

    /// Three-letter tag used as a line prefix, e.g. `trc`.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Trace => "trc",
            Self::Debug => "dbg",
            Self::Verbose => "vrb",
            Self::Info => "ifo",
            Self::Warn => "wrn",
            Self::Error => "err",
            Self::Fatal => "ftl",
        }
    }
}

/// Errors from building a [`Verbosity`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerbosityError {
    /// The requested value lies outside `[-3, 3]`.
    #[error("verbosity {value} is out of range [{min}, {max}]", min = Verbosity::MIN, max = Verbosity::MAX)]
    OutOfRange {
        /// The rejected value.
        value: i64,
    },
    /// The text is neither an integer nor a level name.
    #[error("invalid verbosity {0:?}: expected an integer in [-3, 3] or a level name")]
    Invalid(String),
}

/// How much diagnostic output to show.
///
/// A level is shown when its [`Level::rank`] is at most this value. The
/// default, `0`, shows `info` and everything more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Verbosity(i8);

impl Verbosity {
    /// Quietest setting: only `fatal`.
    pub const MIN: i8 = -3;
    /// Loudest setting: everything down to `trace`.
    pub const MAX: i8 = 3;

    /// Build a verbosity from a raw value.
    ///
    /// # Errors
    ///
    /// Returns [`VerbosityError::OutOfRange`] if `value` is outside `[-3, 3]`.
    pub fn new(value: i64) -> Result<Self, VerbosityError> {
        i8::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
            .ok_or(VerbosityError::OutOfRange { value })
    }

    /// Build a verbosity, clamping `value` into `[-3, 3]`.
    #[must_use]
    pub fn saturating(value: i64) -> Self {
        let clamped = value.clamp(i64::from(Self::MIN), i64::from(Self::MAX));
        Self(i8::try_from(clamped).unwrap_or(0))
    }

    /// The verbosity at which `level` is the chattiest level shown.
    #[must_use]
    pub const fn at(level: Level) -> Self {
        Self(level.rank())
    }

    /// The raw dial value.
    #[must_use]
    pub const fn value(self) -> i8 {
        self.0
    }

    /// Whether messages at `level` are shown at this verbosity.
    #[must_use]
    pub const fn allows(self, level: Level) -> bool {
        level.rank() <= self.0
    }

    /// The chattiest level this verbosity shows.
    #[must_use]
    pub const fn max_level(self) -> Level {
        match self.0 {
            3..=i8::MAX => Level::Trace,
            2 => Level::Debug,
            1 => Level::Verbose,
            0 => Level::Info,
            -1 => Level::Warn,
            -2 => Level::Error,
            _ => Level::Fatal,
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Verbosity {
    type Err = VerbosityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            return Self::new(value);
        }
        trimmed
            .parse::<Level>()
            .map(Self::at)
            .map_err(|_| VerbosityError::Invalid(s.to_string()))
    }
}
