//! Error types shared by the `expsmooth` crates.

use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// An error message that is either borrowed or owned.
///
/// Most invariant checks format a message with runtime values; a few hot
/// paths use static strings. This avoids allocating for the latter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrString(Cow<'static, str>);

impl ErrString {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for ErrString {
    fn from(msg: &'static str) -> Self {
        ErrString(Cow::Borrowed(msg))
    }
}

impl From<String> for ErrString {
    fn from(msg: String) -> Self {
        ErrString(Cow::Owned(msg))
    }
}

impl Display for ErrString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExpSmoothError {
    /// A smoothing parameter is outside its legal range. Raised at
    /// construction; retrying with the same parameters cannot succeed.
    #[error("invalid parameter: {0}")]
    InvalidParameter(ErrString),
    /// Merge of two states that each hold more than one raw observation.
    /// The engine should never produce such a plan; this is caller misuse,
    /// not bad data.
    #[error("unsupported merge: {0}")]
    UnsupportedMerge(ErrString),
    /// The time ranges of two fill-gaps states interleave or repeat.
    /// A data-quality error: recoverable, reported to the caller.
    #[error("unordered merge: {0}")]
    UnorderedMerge(ErrString),
    /// A timestamp fed to a fill-gaps state did not increase.
    /// A data-quality error: recoverable, reported to the caller.
    #[error("non-monotonic timestamp: {0}")]
    NonMonotonicTimestamp(ErrString),
    /// An internal invariant was violated, e.g. remapping a state to a
    /// coordinate before its reference. Treat as a defect, not as input.
    #[error("invalid state: {0}")]
    InvalidState(ErrString),
    /// Anything else: truncated serialized state, a gap exceeding the
    /// configured bound, ...
    #[error("{0}")]
    ComputeError(ErrString),
}

pub type ExpSmoothResult<T> = Result<T, ExpSmoothError>;

#[macro_export]
macro_rules! expsmooth_err {
    ($variant:ident: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::ExpSmoothError::$variant(format!($fmt $(, $arg)*).into())
    };
}

#[macro_export]
macro_rules! expsmooth_bail {
    ($variant:ident: $fmt:literal $(, $arg:expr)* $(,)?) => {
        return Err($crate::expsmooth_err!($variant: $fmt $(, $arg)*))
    };
}

#[macro_export]
macro_rules! expsmooth_ensure {
    ($cond:expr, $variant:ident: $fmt:literal $(, $arg:expr)* $(,)?) => {
        if !$cond {
            $crate::expsmooth_bail!($variant: $fmt $(, $arg)*);
        }
    };
}
