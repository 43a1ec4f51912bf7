//! Trend-adjusted ("Holt") double exponential smoothing.
//!
//! On top of the smoothed level these states track a smoothed per-time-unit
//! slope. The first observation seeds the level and leaves the trend
//! unestablished; the second initializes the trend to the observed secant,
//! unweighted by beta, *before* the level update, so the level update
//! `alpha * v + (1 - alpha) * (value + trend * dt)` reproduces the second
//! observation exactly. `first_trend` records where that happened.

use expsmooth_error::{expsmooth_ensure, ExpSmoothResult};

use crate::seed::{earliest_or_sum, latest_or_empty, Seed};
use crate::wire::{put_f64, put_seed, put_u64, Reader};

/// Parameters for the Holt family, validated at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use]
pub struct HoltParams {
    pub alpha: f64,
    pub beta: f64,
    /// See [`crate::level::LevelParams::max_gap`].
    pub max_gap: Option<u64>,
}

impl HoltParams {
    pub fn try_new(alpha: f64, beta: f64) -> ExpSmoothResult<Self> {
        expsmooth_ensure!(
            (0.0..=1.0).contains(&alpha),
            InvalidParameter: "Holt requires alpha in [0, 1], got {}", alpha
        );
        expsmooth_ensure!(
            (0.0..=1.0).contains(&beta),
            InvalidParameter: "Holt requires beta in [0, 1], got {}", beta
        );
        Ok(HoltParams {
            alpha,
            beta,
            max_gap: None,
        })
    }

    pub fn with_max_gap(mut self, max_gap: u64) -> Self {
        self.max_gap = Some(max_gap);
        self
    }
}

/// Count-indexed Holt smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Holt {
    pub value: f64,
    pub trend: f64,
    pub count: u64,
    pub first_value: Option<Seed>,
    pub first_trend: Option<Seed>,
}

impl Holt {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn trend(&self) -> f64 {
        self.trend
    }

    pub fn add(&mut self, value: f64, params: &HoltParams) {
        if self.count == 0 {
            self.value = value;
            self.first_value = Some(Seed::new(value, 0));
            self.count = 1;
            return;
        }
        if self.first_trend.is_none() {
            // Second observation: the only defensible slope is the raw
            // delta, taken unweighted.
            self.trend = value - self.value;
            self.first_trend = Some(Seed::new(self.trend, self.count));
            self.value = params.alpha * value + (1.0 - params.alpha) * (self.value + self.trend);
        } else {
            let new_value =
                params.alpha * value + (1.0 - params.alpha) * (self.value + self.trend);
            self.trend =
                params.beta * (new_value - self.value) + (1.0 - params.beta) * self.trend;
            self.value = new_value;
        }
        self.count += 1;
    }

    pub fn merge(a: &Self, b: &Self, params: &HoltParams) -> ExpSmoothResult<Self> {
        if b.is_empty() {
            return Ok(*a);
        }
        if a.is_empty() {
            return Ok(*b);
        }
        expsmooth_ensure!(
            b.count == 1,
            UnsupportedMerge: "Holt: right-hand state holds {} observations, at most one is supported",
            b.count
        );
        let mut out = *a;
        out.add(b.value, params);
        Ok(out)
    }

    pub fn merge_from(&mut self, other: &Self, params: &HoltParams) -> ExpSmoothResult<()> {
        *self = Self::merge(self, other, params)?;
        Ok(())
    }

    /// Re-express the state at a later count: project the level along the
    /// trend, without adding information.
    pub fn remap(&self, count: u64, _params: &HoltParams) -> ExpSmoothResult<Self> {
        expsmooth_ensure!(
            count >= self.count,
            InvalidState: "Holt: cannot remap from count {} back to {}", self.count, count
        );
        Ok(Holt {
            value: self.value + self.trend * (count - self.count) as f64,
            count,
            ..*self
        })
    }

    /// The one-step-ahead forecast, `value + trend`.
    pub fn get(&self) -> f64 {
        self.value + self.trend
    }

    pub fn get_at(&self, count: u64, params: &HoltParams) -> ExpSmoothResult<f64> {
        Ok(self.remap(count, params)?.value)
    }

    pub fn less(&self, other: &Self, _params: &HoltParams) -> bool {
        let at = self.count.max(other.count);
        let lhs = self.value + self.trend * (at - self.count) as f64;
        let rhs = other.value + other.trend * (at - other.count) as f64;
        lhs < rhs
    }

    pub fn serialize(&self, buf: &mut Vec<u8>) {
        put_f64(buf, self.value);
        put_f64(buf, self.trend);
        put_u64(buf, self.count);
        put_seed(buf, self.first_value);
        put_seed(buf, self.first_trend);
    }

    pub fn deserialize(reader: &mut Reader<'_>) -> ExpSmoothResult<Self> {
        Ok(Holt {
            value: reader.get_f64()?,
            trend: reader.get_f64()?,
            count: reader.get_u64()?,
            first_value: reader.get_seed()?,
            first_trend: reader.get_seed()?,
        })
    }
}

/// Time-indexed Holt smoothing, gaps ignored.
///
/// Elapsed time enters the update through the trend: an observation `dt`
/// units later smooths against the projection `value + trend * dt` and the
/// per-unit slope `(new_value - value) / dt`. A repeated timestamp carries
/// no slope information and only smooths the level.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HoltWithTime {
    pub value: f64,
    pub trend: f64,
    pub timestamp: u64,
    pub first_value: Option<Seed>,
    pub first_trend: Option<Seed>,
}

impl HoltWithTime {
    pub fn is_empty(&self) -> bool {
        self.first_value.is_none()
    }

    fn is_singleton(&self) -> bool {
        self.first_value.is_some_and(|s| s.at == self.timestamp)
    }

    pub fn trend(&self) -> f64 {
        self.trend
    }

    pub fn add(&mut self, value: f64, timestamp: u64, params: &HoltParams) -> ExpSmoothResult<()> {
        if self.is_empty() {
            self.value = value;
            self.timestamp = timestamp;
            self.first_value = Some(Seed::new(value, timestamp));
            return Ok(());
        }
        expsmooth_ensure!(
            timestamp >= self.timestamp,
            InvalidState: "Holt (with time): timestamp {} precedes the reference {}",
            timestamp, self.timestamp
        );
        let dt = timestamp - self.timestamp;
        if dt == 0 {
            self.value = params.alpha * value + (1.0 - params.alpha) * self.value;
            return Ok(());
        }
        if self.first_trend.is_none() {
            self.trend = (value - self.value) / dt as f64;
            self.first_trend = Some(Seed::new(self.trend, timestamp));
            self.value = params.alpha * value
                + (1.0 - params.alpha) * (self.value + self.trend * dt as f64);
        } else {
            let new_value = params.alpha * value
                + (1.0 - params.alpha) * (self.value + self.trend * dt as f64);
            self.trend = params.beta * ((new_value - self.value) / dt as f64)
                + (1.0 - params.beta) * self.trend;
            self.value = new_value;
        }
        self.timestamp = timestamp;
        Ok(())
    }

    /// Merge with a singleton. Merging two singletons with differing
    /// timestamps initializes the trend to the secant slope between them.
    pub fn merge(a: &Self, b: &Self, params: &HoltParams) -> ExpSmoothResult<Self> {
        if b.is_empty() {
            return Ok(*a);
        }
        if a.is_empty() {
            return Ok(*b);
        }
        expsmooth_ensure!(
            b.is_singleton(),
            UnsupportedMerge: "Holt (with time): right-hand state spans {}..={}, at most one observation is supported",
            b.first_value.map(|s| s.at).unwrap_or_default(), b.timestamp
        );
        let mut out = *a;
        out.add(b.value, b.timestamp, params)?;
        out.first_value = earliest_or_sum(a.first_value, b.first_value);
        out.first_trend = latest_or_empty(a.first_trend, b.first_trend).or(out.first_trend);
        Ok(out)
    }

    pub fn merge_from(&mut self, other: &Self, params: &HoltParams) -> ExpSmoothResult<()> {
        *self = Self::merge(self, other, params)?;
        Ok(())
    }

    pub fn remap(&self, timestamp: u64, _params: &HoltParams) -> ExpSmoothResult<Self> {
        expsmooth_ensure!(
            timestamp >= self.timestamp,
            InvalidState: "Holt (with time): cannot remap from timestamp {} back to {}",
            self.timestamp, timestamp
        );
        Ok(HoltWithTime {
            value: self.value + self.trend * (timestamp - self.timestamp) as f64,
            timestamp,
            ..*self
        })
    }

    pub fn get(&self) -> f64 {
        self.value + self.trend
    }

    pub fn get_at(&self, timestamp: u64, params: &HoltParams) -> ExpSmoothResult<f64> {
        Ok(self.remap(timestamp, params)?.value)
    }

    pub fn less(&self, other: &Self, _params: &HoltParams) -> bool {
        let at = self.timestamp.max(other.timestamp);
        let lhs = self.value + self.trend * (at - self.timestamp) as f64;
        let rhs = other.value + other.trend * (at - other.timestamp) as f64;
        lhs < rhs
    }

    pub fn serialize(&self, buf: &mut Vec<u8>) {
        put_f64(buf, self.value);
        put_f64(buf, self.trend);
        put_u64(buf, self.timestamp);
        put_seed(buf, self.first_value);
        put_seed(buf, self.first_trend);
    }

    pub fn deserialize(reader: &mut Reader<'_>) -> ExpSmoothResult<Self> {
        Ok(HoltWithTime {
            value: reader.get_f64()?,
            trend: reader.get_f64()?,
            timestamp: reader.get_u64()?,
            first_value: reader.get_seed()?,
            first_trend: reader.get_seed()?,
        })
    }
}

/// Time-indexed Holt smoothing, gaps filled.
///
/// Each missing time unit is an observation equal to the model's forecast
/// `value + trend`. Folding that forecast through the update moves the level
/// by exactly `trend` and leaves the slope unchanged, so a gap of `n` steps
/// collapses to the closed form `value += trend * n`, a genuine forward
/// extrapolation, unlike the level-only family. A gap after a single
/// observation first establishes a zero trend.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HoltWithTimeFillGaps {
    pub value: f64,
    pub trend: f64,
    pub timestamp: u64,
    pub first_value: Option<Seed>,
    pub first_trend: Option<Seed>,
}

impl HoltWithTimeFillGaps {
    pub fn is_empty(&self) -> bool {
        self.first_value.is_none()
    }

    fn is_singleton(&self) -> bool {
        self.first_value.is_some_and(|s| s.at == self.timestamp)
    }

    pub fn trend(&self) -> f64 {
        self.trend
    }

    pub fn add(&mut self, value: f64, timestamp: u64, params: &HoltParams) -> ExpSmoothResult<()> {
        if self.is_empty() {
            self.value = value;
            self.timestamp = timestamp;
            self.first_value = Some(Seed::new(value, timestamp));
            return Ok(());
        }
        expsmooth_ensure!(
            timestamp > self.timestamp,
            NonMonotonicTimestamp: "Holt (fill gaps): timestamp {} is not after the reference {}",
            timestamp, self.timestamp
        );
        if let Some(max_gap) = params.max_gap {
            expsmooth_ensure!(
                timestamp - self.timestamp <= max_gap,
                ComputeError: "Holt (fill gaps): gap of {} time units exceeds the configured maximum {}",
                timestamp - self.timestamp, max_gap
            );
        }
        // Absorb the synthesized steps, then fold the real observation as
        // one unit step.
        *self = self.remap(timestamp - 1, params)?;
        if self.first_trend.is_none() {
            self.trend = value - self.value;
            self.first_trend = Some(Seed::new(self.trend, timestamp));
            self.value = params.alpha * value + (1.0 - params.alpha) * (self.value + self.trend);
        } else {
            let new_value =
                params.alpha * value + (1.0 - params.alpha) * (self.value + self.trend);
            self.trend =
                params.beta * (new_value - self.value) + (1.0 - params.beta) * self.trend;
            self.value = new_value;
        }
        self.timestamp = timestamp;
        Ok(())
    }

    pub fn merge(a: &Self, b: &Self, params: &HoltParams) -> ExpSmoothResult<Self> {
        if b.is_empty() {
            return Ok(*a);
        }
        if a.is_empty() {
            return Ok(*b);
        }
        let b_first = b.first_value.map(|s| s.at).unwrap_or_default();
        expsmooth_ensure!(
            b_first > a.timestamp,
            UnorderedMerge: "Holt (fill gaps): time ranges interleave (left ends at {}, right starts at {})",
            a.timestamp, b_first
        );
        expsmooth_ensure!(
            b.is_singleton(),
            UnsupportedMerge: "Holt (fill gaps): right-hand state spans {}..={}, at most one observation is supported",
            b_first, b.timestamp
        );
        let mut out = *a;
        out.add(b.value, b.timestamp, params)?;
        out.first_value = earliest_or_sum(a.first_value, b.first_value);
        out.first_trend = latest_or_empty(a.first_trend, b.first_trend).or(out.first_trend);
        Ok(out)
    }

    pub fn merge_from(&mut self, other: &Self, params: &HoltParams) -> ExpSmoothResult<()> {
        *self = Self::merge(self, other, params)?;
        Ok(())
    }

    /// Absorb a gap with no real observation: each synthesized step feeds
    /// the model its own forecast, which advances the level by the trend.
    pub fn remap(&self, timestamp: u64, _params: &HoltParams) -> ExpSmoothResult<Self> {
        expsmooth_ensure!(
            timestamp >= self.timestamp,
            InvalidState: "Holt (fill gaps): cannot remap from timestamp {} back to {}",
            self.timestamp, timestamp
        );
        let steps = timestamp - self.timestamp;
        let mut out = *self;
        if steps > 0 && out.first_trend.is_none() {
            // First synthesized step after a lone observation: the model's
            // only defensible slope is zero, and it is established now.
            out.trend = 0.0;
            out.first_trend = Some(Seed::new(0.0, self.timestamp + 1));
        }
        out.value += out.trend * steps as f64;
        out.timestamp = timestamp;
        Ok(out)
    }

    pub fn get(&self) -> f64 {
        self.value + self.trend
    }

    pub fn get_at(&self, timestamp: u64, params: &HoltParams) -> ExpSmoothResult<f64> {
        Ok(self.remap(timestamp, params)?.value)
    }

    pub fn less(&self, other: &Self, _params: &HoltParams) -> bool {
        let at = self.timestamp.max(other.timestamp);
        let lhs = self.value + self.trend * (at - self.timestamp) as f64;
        let rhs = other.value + other.trend * (at - other.timestamp) as f64;
        lhs < rhs
    }

    pub fn serialize(&self, buf: &mut Vec<u8>) {
        put_f64(buf, self.value);
        put_f64(buf, self.trend);
        put_u64(buf, self.timestamp);
        put_seed(buf, self.first_value);
        put_seed(buf, self.first_trend);
    }

    pub fn deserialize(reader: &mut Reader<'_>) -> ExpSmoothResult<Self> {
        Ok(HoltWithTimeFillGaps {
            value: reader.get_f64()?,
            trend: reader.get_f64()?,
            timestamp: reader.get_u64()?,
            first_value: reader.get_seed()?,
            first_trend: reader.get_seed()?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::assert_allclose;
    use expsmooth_error::ExpSmoothError;

    fn params(alpha: f64, beta: f64) -> HoltParams {
        HoltParams::try_new(alpha, beta).unwrap()
    }

    #[test]
    fn test_params_range() {
        assert!(HoltParams::try_new(0.0, 1.0).is_ok());
        assert!(matches!(
            HoltParams::try_new(-0.5, 0.5),
            Err(ExpSmoothError::InvalidParameter(_))
        ));
        assert!(HoltParams::try_new(0.5, 1.01).is_err());
        assert!(HoltParams::try_new(0.5, f64::NAN).is_err());
    }

    #[test]
    fn test_linear_series_converges_exactly() {
        // 10, 12, 14 is exactly linear: the secant seeding makes the state
        // exact from the second observation on.
        let p = params(0.5, 0.5);
        let mut st = Holt::default();
        st.add(10.0, &p);
        assert_eq!(st.trend, 0.0);
        st.add(12.0, &p);
        assert_allclose!(st.value, 12.0);
        assert_allclose!(st.trend, 2.0);
        st.add(14.0, &p);
        assert_allclose!(st.value, 14.0);
        assert_allclose!(st.trend, 2.0);
        assert_allclose!(st.get(), 16.0);
    }

    #[test]
    fn test_merge_identity() {
        let p = params(0.5, 0.3);
        let empty = Holt::default();
        let mut st = Holt::default();
        st.add(1.0, &p);
        st.add(2.0, &p);
        st.add(4.0, &p);
        assert_eq!(Holt::merge(&empty, &st, &p).unwrap(), st);
        assert_eq!(Holt::merge(&st, &empty, &p).unwrap(), st);
    }

    #[test]
    fn test_merge_singleton_equals_sequential() {
        let p = params(0.4, 0.2);
        let observations = [5.0, 6.5, 6.0, 9.0];

        let mut sequential = Holt::default();
        for &v in &observations {
            sequential.add(v, &p);
        }

        let mut head = Holt::default();
        for &v in &observations[..3] {
            head.add(v, &p);
        }
        let mut tail = Holt::default();
        tail.add(observations[3], &p);

        let merged = Holt::merge(&head, &tail, &p).unwrap();
        assert_allclose!(merged.value, sequential.value);
        assert_allclose!(merged.trend, sequential.trend);
        assert_eq!(merged.count, sequential.count);
    }

    #[test]
    fn test_merge_two_blocks_is_unsupported() {
        let p = params(0.4, 0.2);
        let mut a = Holt::default();
        a.add(1.0, &p);
        a.add(2.0, &p);
        assert!(matches!(
            Holt::merge(&a, &a, &p),
            Err(ExpSmoothError::UnsupportedMerge(_))
        ));
    }

    #[test]
    fn test_with_time_secant_merge() {
        let p = params(0.5, 0.5);
        let mut a = HoltWithTime::default();
        a.add(10.0, 2, &p).unwrap();
        let mut b = HoltWithTime::default();
        b.add(22.0, 6, &p).unwrap();

        // Neither side has an established trend; the merge bridges them
        // with the secant slope (22 - 10) / (6 - 2).
        let merged = HoltWithTime::merge(&a, &b, &p).unwrap();
        assert_allclose!(merged.trend, 3.0);
        assert_allclose!(merged.value, 22.0);
        assert_eq!(merged.timestamp, 6);
        assert_eq!(merged.first_value, Some(Seed::new(10.0, 2)));
        assert!(merged.first_trend.is_some());
    }

    #[test]
    fn test_with_time_merge_equals_sequential() {
        let p = params(0.6, 0.4);
        let data = [(1.0, 0u64), (4.0, 2), (9.0, 3), (7.0, 7)];

        let mut sequential = HoltWithTime::default();
        for &(v, t) in &data {
            sequential.add(v, t, &p).unwrap();
        }

        let mut head = HoltWithTime::default();
        for &(v, t) in &data[..3] {
            head.add(v, t, &p).unwrap();
        }
        let mut tail = HoltWithTime::default();
        tail.add(7.0, 7, &p).unwrap();

        let merged = HoltWithTime::merge(&head, &tail, &p).unwrap();
        assert_allclose!(merged.value, sequential.value);
        assert_allclose!(merged.trend, sequential.trend);
    }

    #[test]
    fn test_remap_projects_along_trend() {
        let p = params(0.5, 0.5);
        let mut st = HoltWithTime::default();
        st.add(10.0, 0, &p).unwrap();
        st.add(12.0, 1, &p).unwrap();

        let projected = st.remap(5, &p).unwrap();
        assert_allclose!(projected.value, 12.0 + 2.0 * 4.0);
        assert_allclose!(projected.trend, st.trend);

        let via = st.remap(3, &p).unwrap().remap(5, &p).unwrap();
        assert_allclose!(via.value, projected.value, 1e-12);

        assert!(matches!(
            st.remap(0, &p),
            Err(ExpSmoothError::InvalidState(_))
        ));
    }

    #[test]
    fn test_fill_gaps_alpha_one_snaps_to_observation() {
        // Four synthesized steps extrapolate from the zero trend, then the
        // real sample fully overrides the forecast.
        let p = params(1.0, 0.5);
        let mut st = HoltWithTimeFillGaps::default();
        st.add(0.0, 0, &p).unwrap();
        st.add(10.0, 5, &p).unwrap();
        assert_allclose!(st.value, 10.0);
        assert_allclose!(st.trend, 5.0); // beta * (10 - 0) + (1 - beta) * 0
        assert_eq!(st.timestamp, 5);
    }

    #[test]
    fn test_fill_gaps_extrapolates_across_gap() {
        let p = params(0.5, 0.5);
        let mut st = HoltWithTimeFillGaps::default();
        st.add(0.0, 0, &p).unwrap();
        st.add(1.0, 1, &p).unwrap();
        assert_allclose!(st.value, 1.0);
        assert_allclose!(st.trend, 1.0);

        // Gap of 4 units: the level rides the trend.
        let projected = st.remap(5, &p).unwrap();
        assert_allclose!(projected.value, 5.0);
        assert_allclose!(projected.trend, 1.0);

        // Continuing the exact line keeps the state exact.
        st.add(5.0, 5, &p).unwrap();
        assert_allclose!(st.value, 5.0);
        assert_allclose!(st.trend, 1.0);
    }

    #[test]
    fn test_fill_gaps_merge_equals_sequential() {
        let p = params(0.3, 0.6);
        let data = [(2.0, 1u64), (3.0, 4), (10.0, 6), (4.0, 11)];

        let mut sequential = HoltWithTimeFillGaps::default();
        for &(v, t) in &data {
            sequential.add(v, t, &p).unwrap();
        }

        let mut head = HoltWithTimeFillGaps::default();
        for &(v, t) in &data[..3] {
            head.add(v, t, &p).unwrap();
        }
        let mut tail = HoltWithTimeFillGaps::default();
        tail.add(4.0, 11, &p).unwrap();

        let merged = HoltWithTimeFillGaps::merge(&head, &tail, &p).unwrap();
        assert_allclose!(merged.value, sequential.value);
        assert_allclose!(merged.trend, sequential.trend);
        assert_eq!(merged.timestamp, sequential.timestamp);
    }

    #[test]
    fn test_fill_gaps_interleaved_ranges_are_rejected() {
        let p = params(0.3, 0.6);
        let mut a = HoltWithTimeFillGaps::default();
        a.add(1.0, 0, &p).unwrap();
        a.add(2.0, 10, &p).unwrap();
        let mut b = HoltWithTimeFillGaps::default();
        b.add(5.0, 4, &p).unwrap();
        b.add(6.0, 12, &p).unwrap();

        // Interleaving is detected before the arity check: this is bad
        // data, not engine misuse.
        assert!(matches!(
            HoltWithTimeFillGaps::merge(&a, &b, &p),
            Err(ExpSmoothError::UnorderedMerge(_))
        ));
    }

    #[test]
    fn test_fill_gaps_non_monotonic_add() {
        let p = params(0.3, 0.6);
        let mut st = HoltWithTimeFillGaps::default();
        st.add(1.0, 5, &p).unwrap();
        assert!(matches!(
            st.add(2.0, 5, &p),
            Err(ExpSmoothError::NonMonotonicTimestamp(_))
        ));
    }

    #[test]
    fn test_serialize_round_trip() {
        let p = params(0.5, 0.25);
        let mut st = Holt::default();
        st.add(10.0, &p);
        st.add(12.0, &p);
        st.add(11.0, &p);
        let mut buf = Vec::new();
        st.serialize(&mut buf);
        assert_eq!(Holt::deserialize(&mut Reader::new(&buf)).unwrap(), st);

        let mut st = HoltWithTimeFillGaps::default();
        st.add(10.0, 3, &p).unwrap();
        st.add(12.0, 9, &p).unwrap();
        let mut buf = Vec::new();
        st.serialize(&mut buf);
        assert_eq!(
            HoltWithTimeFillGaps::deserialize(&mut Reader::new(&buf)).unwrap(),
            st
        );
    }

    #[test]
    fn test_less_orders_forecasts() {
        let p = params(0.5, 0.5);
        let mut slow = HoltWithTime::default();
        slow.add(0.0, 0, &p).unwrap();
        slow.add(1.0, 1, &p).unwrap();
        let mut fast = HoltWithTime::default();
        fast.add(0.0, 0, &p).unwrap();
        fast.add(3.0, 1, &p).unwrap();
        assert!(slow.less(&fast, &p));
        assert!(!fast.less(&slow, &p));
    }
}
