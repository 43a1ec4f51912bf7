//! Plain exponential smoothing (a smoothed level, no trend).

use expsmooth_error::{expsmooth_ensure, ExpSmoothResult};

use crate::scale::scale;
use crate::seed::{earliest_or_sum, Seed};
use crate::wire::{put_f64, put_seed, put_u64, Reader};

/// Parameters for the level family, validated at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use]
pub struct LevelParams {
    pub alpha: f64,
    /// Largest timestamp gap a fill-gaps state accepts. A gap beyond this
    /// (usually a time-unit mismatch upstream) is reported instead of
    /// silently extrapolated over. `None` disables the check.
    pub max_gap: Option<u64>,
}

impl LevelParams {
    pub fn try_new(alpha: f64) -> ExpSmoothResult<Self> {
        expsmooth_ensure!(
            (0.0..=1.0).contains(&alpha),
            InvalidParameter: "exponential smoothing requires alpha in [0, 1], got {}", alpha
        );
        Ok(LevelParams {
            alpha,
            max_gap: None,
        })
    }

    pub fn with_max_gap(mut self, max_gap: u64) -> Self {
        self.max_gap = Some(max_gap);
        self
    }
}

/// Count-indexed exponential smoothing.
///
/// The reference coordinate is the number of observations folded in; the
/// first observation seeds the level unweighted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Level {
    pub value: f64,
    pub count: u64,
}

impl Level {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn add(&mut self, value: f64, params: &LevelParams) {
        if self.count == 0 {
            self.value = value;
        } else {
            self.value = params.alpha * value + (1.0 - params.alpha) * self.value;
        }
        self.count += 1;
    }

    /// Merge two partial states. `other` must be empty or a singleton; the
    /// result is what sequentially folding `other`'s observation into `self`
    /// would have produced.
    pub fn merge(a: &Self, b: &Self, params: &LevelParams) -> ExpSmoothResult<Self> {
        if b.is_empty() {
            return Ok(*a);
        }
        if a.is_empty() {
            return Ok(*b);
        }
        expsmooth_ensure!(
            b.count == 1,
            UnsupportedMerge: "exponential smoothing: right-hand state holds {} observations, at most one is supported",
            b.count
        );
        let mut out = *a;
        out.add(b.value, params);
        Ok(out)
    }

    pub fn merge_from(&mut self, other: &Self, params: &LevelParams) -> ExpSmoothResult<()> {
        *self = Self::merge(self, other, params)?;
        Ok(())
    }

    /// Re-express the state at a later observation count without adding
    /// information: the level decays by `(1 - alpha)` per skipped count.
    pub fn remap(&self, count: u64, params: &LevelParams) -> ExpSmoothResult<Self> {
        expsmooth_ensure!(
            count >= self.count,
            InvalidState: "exponential smoothing: cannot remap from count {} back to {}",
            self.count, count
        );
        Ok(Level {
            value: self.value * scale(1.0 - params.alpha, count - self.count),
            count,
        })
    }

    /// The one-step-ahead forecast.
    pub fn get(&self) -> f64 {
        self.value
    }

    pub fn get_at(&self, count: u64, params: &LevelParams) -> ExpSmoothResult<f64> {
        Ok(self.remap(count, params)?.value)
    }

    /// Order two states by their value at a common reference coordinate.
    pub fn less(&self, other: &Self, params: &LevelParams) -> bool {
        let at = self.count.max(other.count);
        let lhs = self.value * scale(1.0 - params.alpha, at - self.count);
        let rhs = other.value * scale(1.0 - params.alpha, at - other.count);
        lhs < rhs
    }

    pub fn serialize(&self, buf: &mut Vec<u8>) {
        put_f64(buf, self.value);
        put_u64(buf, self.count);
    }

    pub fn deserialize(reader: &mut Reader<'_>) -> ExpSmoothResult<Self> {
        Ok(Level {
            value: reader.get_f64()?,
            count: reader.get_u64()?,
        })
    }
}

/// Time-indexed exponential smoothing, gaps ignored.
///
/// The level decays by real elapsed time: an observation `dt` units after
/// the previous one folds in as `alpha * v + (1 - alpha)^dt * value`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LevelWithTime {
    pub value: f64,
    pub timestamp: u64,
    pub first_value: Option<Seed>,
}

impl LevelWithTime {
    pub fn is_empty(&self) -> bool {
        self.first_value.is_none()
    }

    fn is_singleton(&self) -> bool {
        self.first_value.is_some_and(|s| s.at == self.timestamp)
    }

    pub fn add(&mut self, value: f64, timestamp: u64, params: &LevelParams) -> ExpSmoothResult<()> {
        if self.is_empty() {
            self.value = value;
            self.timestamp = timestamp;
            self.first_value = Some(Seed::new(value, timestamp));
            return Ok(());
        }
        expsmooth_ensure!(
            timestamp >= self.timestamp,
            InvalidState: "exponential smoothing (with time): timestamp {} precedes the reference {}",
            timestamp, self.timestamp
        );
        let decay = scale(1.0 - params.alpha, timestamp - self.timestamp);
        self.value = params.alpha * value + decay * self.value;
        self.timestamp = timestamp;
        Ok(())
    }

    pub fn merge(a: &Self, b: &Self, params: &LevelParams) -> ExpSmoothResult<Self> {
        if b.is_empty() {
            return Ok(*a);
        }
        if a.is_empty() {
            return Ok(*b);
        }
        expsmooth_ensure!(
            b.is_singleton(),
            UnsupportedMerge: "exponential smoothing (with time): right-hand state spans {}..={}, at most one observation is supported",
            b.first_value.map(|s| s.at).unwrap_or_default(), b.timestamp
        );
        let mut out = *a;
        out.add(b.value, b.timestamp, params)?;
        out.first_value = earliest_or_sum(a.first_value, b.first_value);
        Ok(out)
    }

    pub fn merge_from(&mut self, other: &Self, params: &LevelParams) -> ExpSmoothResult<()> {
        *self = Self::merge(self, other, params)?;
        Ok(())
    }

    pub fn remap(&self, timestamp: u64, params: &LevelParams) -> ExpSmoothResult<Self> {
        expsmooth_ensure!(
            timestamp >= self.timestamp,
            InvalidState: "exponential smoothing (with time): cannot remap from timestamp {} back to {}",
            self.timestamp, timestamp
        );
        Ok(LevelWithTime {
            value: self.value * scale(1.0 - params.alpha, timestamp - self.timestamp),
            timestamp,
            first_value: self.first_value,
        })
    }

    pub fn get(&self) -> f64 {
        self.value
    }

    pub fn get_at(&self, timestamp: u64, params: &LevelParams) -> ExpSmoothResult<f64> {
        Ok(self.remap(timestamp, params)?.value)
    }

    pub fn less(&self, other: &Self, params: &LevelParams) -> bool {
        let at = self.timestamp.max(other.timestamp);
        let lhs = self.value * scale(1.0 - params.alpha, at - self.timestamp);
        let rhs = other.value * scale(1.0 - params.alpha, at - other.timestamp);
        lhs < rhs
    }

    pub fn serialize(&self, buf: &mut Vec<u8>) {
        put_f64(buf, self.value);
        put_u64(buf, self.timestamp);
        put_seed(buf, self.first_value);
    }

    pub fn deserialize(reader: &mut Reader<'_>) -> ExpSmoothResult<Self> {
        Ok(LevelWithTime {
            value: reader.get_f64()?,
            timestamp: reader.get_u64()?,
            first_value: reader.get_seed()?,
        })
    }
}

/// Time-indexed exponential smoothing, gaps filled.
///
/// Missing time units are treated as observations equal to the model's own
/// forecast. For a level-only model that forecast is the level itself, a
/// fixed point of the update, so a gap only advances the reference
/// coordinate; the next real observation then folds in as one unit step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LevelWithTimeFillGaps {
    pub value: f64,
    pub timestamp: u64,
    pub first_value: Option<Seed>,
}

impl LevelWithTimeFillGaps {
    pub fn is_empty(&self) -> bool {
        self.first_value.is_none()
    }

    fn is_singleton(&self) -> bool {
        self.first_value.is_some_and(|s| s.at == self.timestamp)
    }

    fn check_gap(&self, timestamp: u64, params: &LevelParams) -> ExpSmoothResult<()> {
        expsmooth_ensure!(
            timestamp > self.timestamp,
            NonMonotonicTimestamp: "exponential smoothing (fill gaps): timestamp {} is not after the reference {}",
            timestamp, self.timestamp
        );
        if let Some(max_gap) = params.max_gap {
            expsmooth_ensure!(
                timestamp - self.timestamp <= max_gap,
                ComputeError: "exponential smoothing (fill gaps): gap of {} time units exceeds the configured maximum {}",
                timestamp - self.timestamp, max_gap
            );
        }
        Ok(())
    }

    pub fn add(&mut self, value: f64, timestamp: u64, params: &LevelParams) -> ExpSmoothResult<()> {
        if self.is_empty() {
            self.value = value;
            self.timestamp = timestamp;
            self.first_value = Some(Seed::new(value, timestamp));
            return Ok(());
        }
        self.check_gap(timestamp, params)?;
        // Synthesized steps leave the level unchanged; only the real
        // observation moves it.
        self.value = params.alpha * value + (1.0 - params.alpha) * self.value;
        self.timestamp = timestamp;
        Ok(())
    }

    /// Merge two partial states whose time ranges must be strictly ordered
    /// and disjoint, with `other` holding at most one raw observation.
    pub fn merge(a: &Self, b: &Self, params: &LevelParams) -> ExpSmoothResult<Self> {
        if b.is_empty() {
            return Ok(*a);
        }
        if a.is_empty() {
            return Ok(*b);
        }
        let b_first = b.first_value.map(|s| s.at).unwrap_or_default();
        expsmooth_ensure!(
            b_first > a.timestamp,
            UnorderedMerge: "exponential smoothing (fill gaps): time ranges interleave (left ends at {}, right starts at {})",
            a.timestamp, b_first
        );
        expsmooth_ensure!(
            b.is_singleton(),
            UnsupportedMerge: "exponential smoothing (fill gaps): right-hand state spans {}..={}, at most one observation is supported",
            b_first, b.timestamp
        );
        let mut out = *a;
        out.add(b.value, b.timestamp, params)?;
        out.first_value = earliest_or_sum(a.first_value, b.first_value);
        Ok(out)
    }

    pub fn merge_from(&mut self, other: &Self, params: &LevelParams) -> ExpSmoothResult<()> {
        *self = Self::merge(self, other, params)?;
        Ok(())
    }

    /// Absorb a gap with no real observation: the level is its own forecast,
    /// so only the reference coordinate moves.
    pub fn remap(&self, timestamp: u64, _params: &LevelParams) -> ExpSmoothResult<Self> {
        expsmooth_ensure!(
            timestamp >= self.timestamp,
            InvalidState: "exponential smoothing (fill gaps): cannot remap from timestamp {} back to {}",
            self.timestamp, timestamp
        );
        Ok(LevelWithTimeFillGaps {
            timestamp,
            ..*self
        })
    }

    pub fn get(&self) -> f64 {
        self.value
    }

    pub fn get_at(&self, timestamp: u64, params: &LevelParams) -> ExpSmoothResult<f64> {
        Ok(self.remap(timestamp, params)?.value)
    }

    pub fn less(&self, other: &Self, _params: &LevelParams) -> bool {
        self.value < other.value
    }

    pub fn serialize(&self, buf: &mut Vec<u8>) {
        put_f64(buf, self.value);
        put_u64(buf, self.timestamp);
        put_seed(buf, self.first_value);
    }

    pub fn deserialize(reader: &mut Reader<'_>) -> ExpSmoothResult<Self> {
        Ok(LevelWithTimeFillGaps {
            value: reader.get_f64()?,
            timestamp: reader.get_u64()?,
            first_value: reader.get_seed()?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::assert_allclose;
    use expsmooth_error::ExpSmoothError;

    fn params(alpha: f64) -> LevelParams {
        LevelParams::try_new(alpha).unwrap()
    }

    #[test]
    fn test_params_range() {
        assert!(LevelParams::try_new(0.0).is_ok());
        assert!(LevelParams::try_new(1.0).is_ok());
        assert!(matches!(
            LevelParams::try_new(1.5),
            Err(ExpSmoothError::InvalidParameter(_))
        ));
        assert!(LevelParams::try_new(-0.1).is_err());
        assert!(LevelParams::try_new(f64::NAN).is_err());
    }

    #[test]
    fn test_count_indexed_smoothing() {
        let p = params(0.5);
        let mut st = Level::default();
        st.add(10.0, &p);
        assert_eq!(st.get(), 10.0); // unweighted seed
        st.add(20.0, &p);
        assert_allclose!(st.get(), 15.0);
        st.add(20.0, &p);
        assert_allclose!(st.get(), 17.5);
        assert_eq!(st.count, 3);
    }

    #[test]
    fn test_merge_identity() {
        let p = params(0.3);
        let empty = Level::default();
        let mut st = Level::default();
        st.add(5.0, &p);
        st.add(7.0, &p);
        assert_eq!(Level::merge(&empty, &st, &p).unwrap(), st);
        assert_eq!(Level::merge(&st, &empty, &p).unwrap(), st);
        assert_eq!(Level::merge(&empty, &empty, &p).unwrap(), empty);
    }

    #[test]
    fn test_merge_singleton_equals_sequential() {
        let p = params(0.4);
        let observations = [3.0, -1.0, 4.5, 2.0, 8.0];

        let mut sequential = Level::default();
        for &v in &observations {
            sequential.add(v, &p);
        }

        let mut head = Level::default();
        for &v in &observations[..observations.len() - 1] {
            head.add(v, &p);
        }
        let mut tail = Level::default();
        tail.add(*observations.last().unwrap(), &p);

        let merged = Level::merge(&head, &tail, &p).unwrap();
        assert_allclose!(merged.get(), sequential.get());
        assert_eq!(merged.count, sequential.count);
    }

    #[test]
    fn test_merge_two_blocks_is_unsupported() {
        let p = params(0.4);
        let mut a = Level::default();
        a.add(1.0, &p);
        a.add(2.0, &p);
        let b = a;
        assert!(matches!(
            Level::merge(&a, &b, &p),
            Err(ExpSmoothError::UnsupportedMerge(_))
        ));
    }

    #[test]
    fn test_remap_composition() {
        let p = params(0.25);
        let mut st = LevelWithTime::default();
        st.add(4.0, 10, &p).unwrap();
        st.add(6.0, 12, &p).unwrap();

        let via = st.remap(20, &p).unwrap().remap(33, &p).unwrap();
        let direct = st.remap(33, &p).unwrap();
        assert_allclose!(via.value, direct.value, 1e-12);
        assert_eq!(via.timestamp, direct.timestamp);

        // Remapping to the current coordinate is the identity.
        assert_eq!(st.remap(12, &p).unwrap(), st);
        // Remapping backwards is an internal invariant violation.
        assert!(matches!(
            st.remap(11, &p),
            Err(ExpSmoothError::InvalidState(_))
        ));
    }

    #[test]
    fn test_with_time_decays_by_elapsed_time() {
        let p = params(0.5);
        let mut st = LevelWithTime::default();
        st.add(8.0, 0, &p).unwrap();
        st.add(2.0, 3, &p).unwrap();
        // alpha * 2 + (1 - alpha)^3 * 8
        assert_allclose!(st.get(), 0.5 * 2.0 + 0.125 * 8.0);
    }

    #[test]
    fn test_with_time_merge_equals_sequential() {
        let p = params(0.35);
        let data = [(2.0, 1u64), (5.0, 4), (3.0, 9)];

        let mut sequential = LevelWithTime::default();
        for &(v, t) in &data {
            sequential.add(v, t, &p).unwrap();
        }

        let mut head = LevelWithTime::default();
        head.add(2.0, 1, &p).unwrap();
        head.add(5.0, 4, &p).unwrap();
        let mut tail = LevelWithTime::default();
        tail.add(3.0, 9, &p).unwrap();

        let merged = LevelWithTime::merge(&head, &tail, &p).unwrap();
        assert_allclose!(merged.get(), sequential.get());
        assert_eq!(merged.first_value, sequential.first_value);
    }

    #[test]
    fn test_fill_gaps_is_noop_across_gap() {
        let p = params(0.3);
        let mut st = LevelWithTimeFillGaps::default();
        st.add(6.0, 0, &p).unwrap();
        let before = st.get();
        // A long gap synthesizes forecast observations, a fixed point of the
        // level update: the value must not move until real data arrives.
        st.add(before, 1_000, &p).unwrap();
        assert_allclose!(st.get(), before);
        assert_eq!(st.timestamp, 1_000);
    }

    #[test]
    fn test_fill_gaps_rejects_stale_timestamp() {
        let p = params(0.3);
        let mut st = LevelWithTimeFillGaps::default();
        st.add(6.0, 10, &p).unwrap();
        assert!(matches!(
            st.add(1.0, 10, &p),
            Err(ExpSmoothError::NonMonotonicTimestamp(_))
        ));
        assert!(st.add(1.0, 9, &p).is_err());
    }

    #[test]
    fn test_fill_gaps_max_gap() {
        let p = params(0.3).with_max_gap(100);
        let mut st = LevelWithTimeFillGaps::default();
        st.add(6.0, 0, &p).unwrap();
        assert!(st.add(7.0, 100, &p).is_ok());
        assert!(matches!(
            st.add(8.0, 500, &p),
            Err(ExpSmoothError::ComputeError(_))
        ));
    }

    #[test]
    fn test_fill_gaps_merge_ordering() {
        let p = params(0.3);
        let mut a = LevelWithTimeFillGaps::default();
        a.add(1.0, 0, &p).unwrap();
        a.add(2.0, 10, &p).unwrap();

        let mut interleaved = LevelWithTimeFillGaps::default();
        interleaved.add(9.0, 5, &p).unwrap();
        assert!(matches!(
            LevelWithTimeFillGaps::merge(&a, &interleaved, &p),
            Err(ExpSmoothError::UnorderedMerge(_))
        ));

        let mut after = LevelWithTimeFillGaps::default();
        after.add(9.0, 15, &p).unwrap();
        let merged = LevelWithTimeFillGaps::merge(&a, &after, &p).unwrap();

        let mut sequential = LevelWithTimeFillGaps::default();
        for (v, t) in [(1.0, 0u64), (2.0, 10), (9.0, 15)] {
            sequential.add(v, t, &p).unwrap();
        }
        assert_allclose!(merged.get(), sequential.get());
    }

    #[test]
    fn test_serialize_round_trip() {
        let p = params(0.6);
        let mut st = LevelWithTime::default();
        st.add(3.0, 7, &p).unwrap();
        st.add(-2.0, 11, &p).unwrap();

        let mut buf = Vec::new();
        st.serialize(&mut buf);
        let restored = LevelWithTime::deserialize(&mut Reader::new(&buf)).unwrap();
        assert_eq!(restored, st);

        let mut buf = Vec::new();
        let mut st = Level::default();
        st.add(3.0, &p);
        st.serialize(&mut buf);
        let restored = Level::deserialize(&mut Reader::new(&buf)).unwrap();
        assert_eq!(restored, st);
    }

    #[test]
    fn test_less_orders_at_common_reference() {
        let p = params(0.5);
        let mut a = Level::default();
        a.add(1.0, &p);
        let mut b = Level::default();
        b.add(4.0, &p);
        b.add(4.0, &p);
        assert!(a.less(&b, &p));
        assert!(!b.less(&a, &p));
    }
}
