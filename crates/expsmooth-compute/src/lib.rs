//! Mergeable, incrementally-updatable forecasting estimators.
//!
//! Three families of exponential smoothing, used as streaming aggregate
//! states inside an analytical query engine:
//!
//! - [`level`]: plain exponential smoothing (a smoothed level),
//! - [`holt`]: double exponential smoothing (level + trend),
//! - [`holt_winters`]: triple exponential smoothing (level + trend + a
//!   seasonal ring buffer),
//!
//! each in three time models: count-indexed, timestamp-indexed ignoring
//! gaps, and timestamp-indexed filling gaps with the model's own forecast.
//!
//! The engine builds estimator states in parallel over disjoint row ranges
//! and later folds them pairwise. The contract of every family:
//!
//! - `add` folds one observation in place, in order;
//! - `merge(a, b)` is pure and reproduces the sequential result exactly,
//!   provided `b` is empty or holds exactly one raw observation (fill-gaps
//!   variants additionally require `b`'s time range to lie strictly after
//!   `a`'s). Anything else fails loudly rather than approximate;
//! - `remap(coord)` re-expresses a state at a later reference coordinate
//!   without adding information;
//! - `serialize`/`deserialize` move state across process boundaries as a
//!   flat sequence of fixed-width little-endian fields (see [`wire`]);
//! - `get`/`get_at` expose the one-step-ahead (or `coord`-step-ahead)
//!   forecast, and `less` orders two states at a common reference.
//!
//! An empty state is the merge identity. The earliest observation of each
//! fragment is tracked in a [`seed::Seed`] so that merging never
//! double-counts or under-weights it relative to a sequential run.
//!
//! [`decaying`] carries the simpler continuous-time half-decay average that
//! established this remap/merge pattern.

pub mod decaying;
pub mod holt;
pub mod holt_winters;
pub mod level;
pub mod scale;
pub mod seed;
pub mod wire;

pub use expsmooth_error::{ExpSmoothError, ExpSmoothResult};

pub mod prelude {
    pub use crate::decaying::DecayingAverage;
    pub use crate::holt::{Holt, HoltParams, HoltWithTime, HoltWithTimeFillGaps};
    pub use crate::holt_winters::{
        HoltWinters, HoltWintersParams, HoltWintersWithTime, HoltWintersWithTimeFillGaps,
        Seasonality,
    };
    pub use crate::level::{Level, LevelParams, LevelWithTime, LevelWithTimeFillGaps};
    pub use crate::scale::scale;
    pub use crate::seed::Seed;
    pub use expsmooth_error::{ExpSmoothError, ExpSmoothResult};
}

#[cfg(test)]
macro_rules! assert_allclose {
    ($x:expr, $y:expr) => {
        $crate::assert_allclose!($x, $y, 1e-9)
    };
    ($x:expr, $y:expr, $tol:expr) => {{
        let (x, y) = ($x, $y);
        assert!(
            (x - y).abs() <= $tol,
            "{} != {} (tolerance {})",
            x,
            y,
            $tol
        );
    }};
}
#[cfg(test)]
pub(crate) use assert_allclose;
