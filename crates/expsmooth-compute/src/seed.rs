//! Bookkeeping for the earliest sample(s) of a state fragment.
//!
//! Each fragment records its first raw observation (and, for trended
//! estimators, the coordinate at which the trend was first established).
//! Merges consult these so the earliest observation is neither double
//! counted nor under-weighted relative to a sequential computation.

/// A value observed at a reference coordinate (an observation count or a
/// timestamp, depending on the estimator's time model).
///
/// Absence is modelled as `Option<Seed>` so an empty-but-present seed is
/// unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seed {
    pub value: f64,
    pub at: u64,
}

impl Seed {
    pub fn new(value: f64, at: u64) -> Self {
        Seed { value, at }
    }
}

/// Merge two optional seeds, keeping the earlier one.
///
/// If only one is present, it wins. If both sit at the same coordinate the
/// values are summed: two fragments attesting the same seed must combine
/// additively.
pub fn earliest_or_sum(a: Option<Seed>, b: Option<Seed>) -> Option<Seed> {
    match (a, b) {
        (None, b) => b,
        (a, None) => a,
        (Some(a), Some(b)) if a.at == b.at => Some(Seed::new(a.value + b.value, a.at)),
        (Some(a), Some(b)) if a.at < b.at => Some(a),
        (_, b) => b,
    }
}

/// Merge two optional seeds, keeping the later one.
///
/// If only one is present, it wins. If both sit at the same coordinate the
/// result is empty: no separate correction term remains, which avoids
/// subtracting the same correction twice downstream.
pub fn latest_or_empty(a: Option<Seed>, b: Option<Seed>) -> Option<Seed> {
    match (a, b) {
        (None, b) => b,
        (a, None) => a,
        (Some(a), Some(b)) if a.at == b.at => None,
        (Some(a), Some(b)) if a.at > b.at => Some(a),
        (_, b) => b,
    }
}
