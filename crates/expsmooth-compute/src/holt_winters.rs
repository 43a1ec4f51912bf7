//! Triple ("Holt-Winters") exponential smoothing: level, trend and a
//! periodic correction per cycle position.
//!
//! The seasonal ring holds one correction per position of a fixed cycle and
//! comes into existence only once a full cycle has been observed; until
//! then the seasonal contribution is neutral and the state behaves like the
//! Holt family. Each observation is deseasonalized with the prior value of
//! its slot, folded through the Holt update, and then re-estimates its slot
//! with the gamma equation.
//!
//! Multiplicative mode divides by the level and by slot values; it assumes
//! a series bounded away from zero, as is conventional for this model.

use expsmooth_error::{expsmooth_ensure, ExpSmoothResult};

use crate::seed::{earliest_or_sum, latest_or_empty, Seed};
use crate::wire::{put_bool, put_f64, put_seed, put_u64, Reader};

/// How the seasonal correction combines with `level + trend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seasonality {
    /// Correction is added: forecast `value + trend + season`.
    Additive,
    /// Correction is a ratio: forecast `(value + trend) * season`.
    Multiplicative,
}

impl Seasonality {
    /// The correction carrying no seasonal information.
    pub fn neutral(self) -> f64 {
        match self {
            Seasonality::Additive => 0.0,
            Seasonality::Multiplicative => 1.0,
        }
    }

    fn deseasonalize(self, value: f64, season: f64) -> f64 {
        match self {
            Seasonality::Additive => value - season,
            Seasonality::Multiplicative => value / season,
        }
    }

    fn compose(self, forecast: f64, season: f64) -> f64 {
        match self {
            Seasonality::Additive => forecast + season,
            Seasonality::Multiplicative => forecast * season,
        }
    }

    /// What the observation says its slot's correction should be, given the
    /// level it smoothed into.
    fn residual(self, value: f64, level: f64) -> f64 {
        match self {
            Seasonality::Additive => value - level,
            Seasonality::Multiplicative => value / level,
        }
    }
}

/// Parameters for the Holt-Winters family, validated at construction.
///
/// `seasons_count` and `seasonality` are fixed for the lifetime of every
/// state built against these parameters; states from differently configured
/// instances are never merged.
#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use]
pub struct HoltWintersParams {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub seasons_count: usize,
    pub seasonality: Seasonality,
    /// See [`crate::level::LevelParams::max_gap`].
    pub max_gap: Option<u64>,
}

impl HoltWintersParams {
    pub fn try_new(
        alpha: f64,
        beta: f64,
        gamma: f64,
        seasons_count: usize,
        seasonality: Seasonality,
    ) -> ExpSmoothResult<Self> {
        expsmooth_ensure!(
            (0.0..=1.0).contains(&alpha),
            InvalidParameter: "Holt-Winters requires alpha in [0, 1], got {}", alpha
        );
        expsmooth_ensure!(
            (0.0..=1.0).contains(&beta),
            InvalidParameter: "Holt-Winters requires beta in [0, 1], got {}", beta
        );
        expsmooth_ensure!(
            (0.0..=1.0).contains(&gamma),
            InvalidParameter: "Holt-Winters requires gamma in [0, 1], got {}", gamma
        );
        expsmooth_ensure!(
            seasons_count > 0,
            InvalidParameter: "Holt-Winters requires a non-zero cycle length"
        );
        Ok(HoltWintersParams {
            alpha,
            beta,
            gamma,
            seasons_count,
            seasonality,
            max_gap: None,
        })
    }

    pub fn with_max_gap(mut self, max_gap: u64) -> Self {
        self.max_gap = Some(max_gap);
        self
    }

    fn neutral_ring(&self) -> Box<[f64]> {
        vec![self.seasonality.neutral(); self.seasons_count].into_boxed_slice()
    }
}

/// Count-indexed Holt-Winters smoothing. The observation's cycle position
/// is its zero-based index modulo the cycle length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HoltWinters {
    pub value: f64,
    pub trend: f64,
    pub count: u64,
    pub first_value: Option<Seed>,
    pub first_trend: Option<Seed>,
    seasons: Option<Box<[f64]>>,
}

impl HoltWinters {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn trend(&self) -> f64 {
        self.trend
    }

    /// The seasonal ring, absent until a full cycle has been observed.
    pub fn seasons(&self) -> Option<&[f64]> {
        self.seasons.as_deref()
    }

    fn prime_if_ready(&mut self, params: &HoltWintersParams) {
        if self.seasons.is_none() && self.count as usize >= params.seasons_count {
            self.seasons = Some(params.neutral_ring());
        }
    }

    fn season_at(&self, idx: usize, params: &HoltWintersParams) -> f64 {
        self.seasons
            .as_ref()
            .map_or(params.seasonality.neutral(), |s| s[idx])
    }

    pub fn add(&mut self, value: f64, params: &HoltWintersParams) {
        if self.count == 0 {
            self.value = value;
            self.first_value = Some(Seed::new(value, 0));
            self.count = 1;
            return;
        }
        self.prime_if_ready(params);
        let idx = self.count as usize % params.seasons_count;
        let season = self.season_at(idx, params);
        let dv = params.seasonality.deseasonalize(value, season);
        if self.first_trend.is_none() {
            self.trend = dv - self.value;
            self.first_trend = Some(Seed::new(self.trend, self.count));
            self.value = params.alpha * dv + (1.0 - params.alpha) * (self.value + self.trend);
        } else {
            let new_value = params.alpha * dv + (1.0 - params.alpha) * (self.value + self.trend);
            self.trend =
                params.beta * (new_value - self.value) + (1.0 - params.beta) * self.trend;
            self.value = new_value;
        }
        if let Some(seasons) = self.seasons.as_mut() {
            let residual = params.seasonality.residual(value, self.value);
            seasons[idx] = params.gamma * residual + (1.0 - params.gamma) * seasons[idx];
        }
        self.count += 1;
    }

    pub fn merge(a: &Self, b: &Self, params: &HoltWintersParams) -> ExpSmoothResult<Self> {
        if b.is_empty() {
            return Ok(a.clone());
        }
        if a.is_empty() {
            return Ok(b.clone());
        }
        expsmooth_ensure!(
            b.count == 1,
            UnsupportedMerge: "Holt-Winters: right-hand state holds {} observations, at most one is supported",
            b.count
        );
        let mut out = a.clone();
        out.add(b.value, params);
        Ok(out)
    }

    pub fn merge_from(&mut self, other: &Self, params: &HoltWintersParams) -> ExpSmoothResult<()> {
        *self = Self::merge(self, other, params)?;
        Ok(())
    }

    /// Project the level along the trend to a later count; seasonal
    /// corrections are per-position and do not move.
    pub fn remap(&self, count: u64, _params: &HoltWintersParams) -> ExpSmoothResult<Self> {
        expsmooth_ensure!(
            count >= self.count,
            InvalidState: "Holt-Winters: cannot remap from count {} back to {}", self.count, count
        );
        let mut out = self.clone();
        out.value += out.trend * (count - out.count) as f64;
        out.count = count;
        Ok(out)
    }

    /// The one-step forecast, composed with the next position's correction.
    pub fn get(&self, params: &HoltWintersParams) -> f64 {
        let idx = self.count as usize % params.seasons_count;
        params
            .seasonality
            .compose(self.value + self.trend, self.season_at(idx, params))
    }

    /// The expected observation at a later count.
    pub fn get_at(&self, count: u64, params: &HoltWintersParams) -> ExpSmoothResult<f64> {
        let projected = self.remap(count, params)?;
        let idx = count as usize % params.seasons_count;
        Ok(params
            .seasonality
            .compose(projected.value, self.season_at(idx, params)))
    }

    pub fn less(&self, other: &Self, params: &HoltWintersParams) -> bool {
        let at = self.count.max(other.count);
        let lhs = self.value + self.trend * (at - self.count) as f64;
        let rhs = other.value + other.trend * (at - other.count) as f64;
        let idx = at as usize % params.seasons_count;
        params.seasonality.compose(lhs, self.season_at(idx, params))
            < params.seasonality.compose(rhs, other.season_at(idx, params))
    }

    pub fn serialize(&self, buf: &mut Vec<u8>) {
        put_f64(buf, self.value);
        put_f64(buf, self.trend);
        put_u64(buf, self.count);
        put_seed(buf, self.first_value);
        put_seed(buf, self.first_trend);
        put_ring(buf, self.seasons.as_deref());
    }

    pub fn deserialize(
        reader: &mut Reader<'_>,
        params: &HoltWintersParams,
    ) -> ExpSmoothResult<Self> {
        Ok(HoltWinters {
            value: reader.get_f64()?,
            trend: reader.get_f64()?,
            count: reader.get_u64()?,
            first_value: reader.get_seed()?,
            first_trend: reader.get_seed()?,
            seasons: get_ring(reader, params)?,
        })
    }
}

/// Time-indexed Holt-Winters smoothing, gaps ignored. The cycle position is
/// the observation's timestamp modulo the cycle length, and the ring primes
/// once a full cycle of time has elapsed since the first observation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HoltWintersWithTime {
    pub value: f64,
    pub trend: f64,
    pub timestamp: u64,
    pub first_value: Option<Seed>,
    pub first_trend: Option<Seed>,
    seasons: Option<Box<[f64]>>,
}

impl HoltWintersWithTime {
    pub fn is_empty(&self) -> bool {
        self.first_value.is_none()
    }

    fn is_singleton(&self) -> bool {
        self.first_value.is_some_and(|s| s.at == self.timestamp)
    }

    pub fn trend(&self) -> f64 {
        self.trend
    }

    pub fn seasons(&self) -> Option<&[f64]> {
        self.seasons.as_deref()
    }

    fn prime_if_ready(&mut self, params: &HoltWintersParams) {
        let covered = match self.first_value {
            Some(first) => self.timestamp - first.at + 1,
            None => 0,
        };
        if self.seasons.is_none() && covered >= params.seasons_count as u64 {
            self.seasons = Some(params.neutral_ring());
        }
    }

    fn season_at(&self, idx: usize, params: &HoltWintersParams) -> f64 {
        self.seasons
            .as_ref()
            .map_or(params.seasonality.neutral(), |s| s[idx])
    }

    pub fn add(
        &mut self,
        value: f64,
        timestamp: u64,
        params: &HoltWintersParams,
    ) -> ExpSmoothResult<()> {
        if self.is_empty() {
            self.value = value;
            self.timestamp = timestamp;
            self.first_value = Some(Seed::new(value, timestamp));
            return Ok(());
        }
        expsmooth_ensure!(
            timestamp >= self.timestamp,
            InvalidState: "Holt-Winters (with time): timestamp {} precedes the reference {}",
            timestamp, self.timestamp
        );
        self.prime_if_ready(params);
        let idx = (timestamp % params.seasons_count as u64) as usize;
        let season = self.season_at(idx, params);
        let dv = params.seasonality.deseasonalize(value, season);
        let dt = timestamp - self.timestamp;
        if dt == 0 {
            self.value = params.alpha * dv + (1.0 - params.alpha) * self.value;
        } else if self.first_trend.is_none() {
            self.trend = (dv - self.value) / dt as f64;
            self.first_trend = Some(Seed::new(self.trend, timestamp));
            self.value =
                params.alpha * dv + (1.0 - params.alpha) * (self.value + self.trend * dt as f64);
        } else {
            let new_value =
                params.alpha * dv + (1.0 - params.alpha) * (self.value + self.trend * dt as f64);
            self.trend = params.beta * ((new_value - self.value) / dt as f64)
                + (1.0 - params.beta) * self.trend;
            self.value = new_value;
        }
        if let Some(seasons) = self.seasons.as_mut() {
            let residual = params.seasonality.residual(value, self.value);
            seasons[idx] = params.gamma * residual + (1.0 - params.gamma) * seasons[idx];
        }
        self.timestamp = timestamp;
        Ok(())
    }

    pub fn merge(a: &Self, b: &Self, params: &HoltWintersParams) -> ExpSmoothResult<Self> {
        if b.is_empty() {
            return Ok(a.clone());
        }
        if a.is_empty() {
            return Ok(b.clone());
        }
        expsmooth_ensure!(
            b.is_singleton(),
            UnsupportedMerge: "Holt-Winters (with time): right-hand state spans {}..={}, at most one observation is supported",
            b.first_value.map(|s| s.at).unwrap_or_default(), b.timestamp
        );
        let mut out = a.clone();
        out.add(b.value, b.timestamp, params)?;
        out.first_value = earliest_or_sum(a.first_value, b.first_value);
        out.first_trend = latest_or_empty(a.first_trend, b.first_trend).or(out.first_trend);
        Ok(out)
    }

    pub fn merge_from(&mut self, other: &Self, params: &HoltWintersParams) -> ExpSmoothResult<()> {
        *self = Self::merge(self, other, params)?;
        Ok(())
    }

    pub fn remap(&self, timestamp: u64, _params: &HoltWintersParams) -> ExpSmoothResult<Self> {
        expsmooth_ensure!(
            timestamp >= self.timestamp,
            InvalidState: "Holt-Winters (with time): cannot remap from timestamp {} back to {}",
            self.timestamp, timestamp
        );
        let mut out = self.clone();
        out.value += out.trend * (timestamp - out.timestamp) as f64;
        out.timestamp = timestamp;
        Ok(out)
    }

    pub fn get(&self, params: &HoltWintersParams) -> f64 {
        let idx = ((self.timestamp + 1) % params.seasons_count as u64) as usize;
        params
            .seasonality
            .compose(self.value + self.trend, self.season_at(idx, params))
    }

    pub fn get_at(&self, timestamp: u64, params: &HoltWintersParams) -> ExpSmoothResult<f64> {
        let projected = self.remap(timestamp, params)?;
        let idx = (timestamp % params.seasons_count as u64) as usize;
        Ok(params
            .seasonality
            .compose(projected.value, self.season_at(idx, params)))
    }

    pub fn less(&self, other: &Self, params: &HoltWintersParams) -> bool {
        let at = self.timestamp.max(other.timestamp);
        let lhs = self.value + self.trend * (at - self.timestamp) as f64;
        let rhs = other.value + other.trend * (at - other.timestamp) as f64;
        let idx = (at % params.seasons_count as u64) as usize;
        params.seasonality.compose(lhs, self.season_at(idx, params))
            < params.seasonality.compose(rhs, other.season_at(idx, params))
    }

    pub fn serialize(&self, buf: &mut Vec<u8>) {
        put_f64(buf, self.value);
        put_f64(buf, self.trend);
        put_u64(buf, self.timestamp);
        put_seed(buf, self.first_value);
        put_seed(buf, self.first_trend);
        put_ring(buf, self.seasons.as_deref());
    }

    pub fn deserialize(
        reader: &mut Reader<'_>,
        params: &HoltWintersParams,
    ) -> ExpSmoothResult<Self> {
        Ok(HoltWintersWithTime {
            value: reader.get_f64()?,
            trend: reader.get_f64()?,
            timestamp: reader.get_u64()?,
            first_value: reader.get_seed()?,
            first_trend: reader.get_seed()?,
            seasons: get_ring(reader, params)?,
        })
    }
}

/// Time-indexed Holt-Winters smoothing, gaps filled.
///
/// A synthesized step feeds the model its own seasonal forecast, which is a
/// fixed point of the full update: the level advances by the trend and the
/// slot re-estimates to itself. A gap therefore collapses to the Holt
/// closed form `value += trend * steps` with the ring untouched, except
/// that crossing the priming boundary brings a neutral ring into existence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HoltWintersWithTimeFillGaps {
    pub value: f64,
    pub trend: f64,
    pub timestamp: u64,
    pub first_value: Option<Seed>,
    pub first_trend: Option<Seed>,
    seasons: Option<Box<[f64]>>,
}

impl HoltWintersWithTimeFillGaps {
    pub fn is_empty(&self) -> bool {
        self.first_value.is_none()
    }

    fn is_singleton(&self) -> bool {
        self.first_value.is_some_and(|s| s.at == self.timestamp)
    }

    pub fn trend(&self) -> f64 {
        self.trend
    }

    pub fn seasons(&self) -> Option<&[f64]> {
        self.seasons.as_deref()
    }

    fn prime_if_ready(&mut self, params: &HoltWintersParams) {
        let covered = match self.first_value {
            Some(first) => self.timestamp - first.at + 1,
            None => 0,
        };
        if self.seasons.is_none() && covered >= params.seasons_count as u64 {
            self.seasons = Some(params.neutral_ring());
        }
    }

    fn season_at(&self, idx: usize, params: &HoltWintersParams) -> f64 {
        self.seasons
            .as_ref()
            .map_or(params.seasonality.neutral(), |s| s[idx])
    }

    pub fn add(
        &mut self,
        value: f64,
        timestamp: u64,
        params: &HoltWintersParams,
    ) -> ExpSmoothResult<()> {
        if self.is_empty() {
            self.value = value;
            self.timestamp = timestamp;
            self.first_value = Some(Seed::new(value, timestamp));
            return Ok(());
        }
        expsmooth_ensure!(
            timestamp > self.timestamp,
            NonMonotonicTimestamp: "Holt-Winters (fill gaps): timestamp {} is not after the reference {}",
            timestamp, self.timestamp
        );
        if let Some(max_gap) = params.max_gap {
            expsmooth_ensure!(
                timestamp - self.timestamp <= max_gap,
                ComputeError: "Holt-Winters (fill gaps): gap of {} time units exceeds the configured maximum {}",
                timestamp - self.timestamp, max_gap
            );
        }
        *self = self.remap(timestamp - 1, params)?;
        self.prime_if_ready(params);
        let idx = (timestamp % params.seasons_count as u64) as usize;
        let season = self.season_at(idx, params);
        let dv = params.seasonality.deseasonalize(value, season);
        if self.first_trend.is_none() {
            self.trend = dv - self.value;
            self.first_trend = Some(Seed::new(self.trend, timestamp));
            self.value = params.alpha * dv + (1.0 - params.alpha) * (self.value + self.trend);
        } else {
            let new_value = params.alpha * dv + (1.0 - params.alpha) * (self.value + self.trend);
            self.trend =
                params.beta * (new_value - self.value) + (1.0 - params.beta) * self.trend;
            self.value = new_value;
        }
        if let Some(seasons) = self.seasons.as_mut() {
            let residual = params.seasonality.residual(value, self.value);
            seasons[idx] = params.gamma * residual + (1.0 - params.gamma) * seasons[idx];
        }
        self.timestamp = timestamp;
        Ok(())
    }

    pub fn merge(a: &Self, b: &Self, params: &HoltWintersParams) -> ExpSmoothResult<Self> {
        if b.is_empty() {
            return Ok(a.clone());
        }
        if a.is_empty() {
            return Ok(b.clone());
        }
        let b_first = b.first_value.map(|s| s.at).unwrap_or_default();
        expsmooth_ensure!(
            b_first > a.timestamp,
            UnorderedMerge: "Holt-Winters (fill gaps): time ranges interleave (left ends at {}, right starts at {})",
            a.timestamp, b_first
        );
        expsmooth_ensure!(
            b.is_singleton(),
            UnsupportedMerge: "Holt-Winters (fill gaps): right-hand state spans {}..={}, at most one observation is supported",
            b_first, b.timestamp
        );
        let mut out = a.clone();
        out.add(b.value, b.timestamp, params)?;
        out.first_value = earliest_or_sum(a.first_value, b.first_value);
        out.first_trend = latest_or_empty(a.first_trend, b.first_trend).or(out.first_trend);
        Ok(out)
    }

    pub fn merge_from(&mut self, other: &Self, params: &HoltWintersParams) -> ExpSmoothResult<()> {
        *self = Self::merge(self, other, params)?;
        Ok(())
    }

    /// Absorb a gap with no real observation.
    pub fn remap(&self, timestamp: u64, params: &HoltWintersParams) -> ExpSmoothResult<Self> {
        expsmooth_ensure!(
            timestamp >= self.timestamp,
            InvalidState: "Holt-Winters (fill gaps): cannot remap from timestamp {} back to {}",
            self.timestamp, timestamp
        );
        let steps = timestamp - self.timestamp;
        let mut out = self.clone();
        if steps > 0 && out.first_trend.is_none() {
            out.trend = 0.0;
            out.first_trend = Some(Seed::new(0.0, self.timestamp + 1));
        }
        out.value += out.trend * steps as f64;
        out.timestamp = timestamp;
        out.prime_if_ready(params);
        Ok(out)
    }

    pub fn get(&self, params: &HoltWintersParams) -> f64 {
        let idx = ((self.timestamp + 1) % params.seasons_count as u64) as usize;
        params
            .seasonality
            .compose(self.value + self.trend, self.season_at(idx, params))
    }

    pub fn get_at(&self, timestamp: u64, params: &HoltWintersParams) -> ExpSmoothResult<f64> {
        let projected = self.remap(timestamp, params)?;
        let idx = (timestamp % params.seasons_count as u64) as usize;
        Ok(params
            .seasonality
            .compose(projected.value, projected.season_at(idx, params)))
    }

    pub fn less(&self, other: &Self, params: &HoltWintersParams) -> bool {
        let at = self.timestamp.max(other.timestamp);
        let lhs = self.value + self.trend * (at - self.timestamp) as f64;
        let rhs = other.value + other.trend * (at - other.timestamp) as f64;
        let idx = (at % params.seasons_count as u64) as usize;
        params.seasonality.compose(lhs, self.season_at(idx, params))
            < params.seasonality.compose(rhs, other.season_at(idx, params))
    }

    pub fn serialize(&self, buf: &mut Vec<u8>) {
        put_f64(buf, self.value);
        put_f64(buf, self.trend);
        put_u64(buf, self.timestamp);
        put_seed(buf, self.first_value);
        put_seed(buf, self.first_trend);
        put_ring(buf, self.seasons.as_deref());
    }

    pub fn deserialize(
        reader: &mut Reader<'_>,
        params: &HoltWintersParams,
    ) -> ExpSmoothResult<Self> {
        Ok(HoltWintersWithTimeFillGaps {
            value: reader.get_f64()?,
            trend: reader.get_f64()?,
            timestamp: reader.get_u64()?,
            first_value: reader.get_seed()?,
            first_trend: reader.get_seed()?,
            seasons: get_ring(reader, params)?,
        })
    }
}

fn put_ring(buf: &mut Vec<u8>, seasons: Option<&[f64]>) {
    put_bool(buf, seasons.is_some());
    if let Some(seasons) = seasons {
        for &s in seasons {
            put_f64(buf, s);
        }
    }
}

fn get_ring(
    reader: &mut Reader<'_>,
    params: &HoltWintersParams,
) -> ExpSmoothResult<Option<Box<[f64]>>> {
    if !reader.get_bool()? {
        return Ok(None);
    }
    let mut ring = Vec::with_capacity(params.seasons_count);
    for _ in 0..params.seasons_count {
        ring.push(reader.get_f64()?);
    }
    Ok(Some(ring.into_boxed_slice()))
}
