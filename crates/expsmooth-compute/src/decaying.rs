//! Continuous-time exponentially decaying average.
//!
//! The canonical remap/merge pattern in its simplest form. The state is a
//! weighted sum of observations together with the time it is expressed at;
//! every observation's weight halves each `half_decay` time units. Because
//! decay factors multiply, a state can be re-expressed at any later time by
//! one multiplication, and two states can be merged in full generality by
//! remapping the older onto the newer's clock. None of the singleton
//! restrictions of the discrete families apply here.
//!
//! `half_decay` is a query-level constant, strictly positive, passed to
//! every operation rather than stored per state.

use crate::wire::{put_f64, Reader};
use expsmooth_error::ExpSmoothResult;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DecayingAverage {
    /// Decayed weighted sum, expressed as of `time`.
    pub value: f64,
    pub time: f64,
}

/// Weight of an observation `elapsed` time units in the past.
fn decay(elapsed: f64, half_decay: f64) -> f64 {
    (-elapsed / half_decay).exp2()
}

impl DecayingAverage {
    pub fn new(value: f64, time: f64) -> Self {
        DecayingAverage { value, time }
    }

    /// Sum of the geometric weight series at unit observation spacing,
    /// the normalizer turning the weighted sum into an average.
    pub fn sum_weights(half_decay: f64) -> f64 {
        1.0 / (1.0 - decay(1.0, half_decay))
    }

    /// Re-express the state as of `time`, decaying the sum by the elapsed
    /// interval. Remapping to the state's own time is the identity.
    pub fn remap(&self, time: f64, half_decay: f64) -> Self {
        DecayingAverage {
            value: self.value * decay(time - self.time, half_decay),
            time,
        }
    }

    /// Merge two states by remapping the older onto the newer's clock and
    /// summing. Either operand may hold any number of observations.
    pub fn merge(a: &Self, b: &Self, half_decay: f64) -> Self {
        if a.time > b.time {
            DecayingAverage::new(a.value + b.remap(a.time, half_decay).value, a.time)
        } else if a.time < b.time {
            DecayingAverage::new(b.value + a.remap(b.time, half_decay).value, b.time)
        } else {
            DecayingAverage::new(a.value + b.value, a.time)
        }
    }

    pub fn merge_from(&mut self, other: &Self, half_decay: f64) {
        *self = Self::merge(self, other, half_decay);
    }

    pub fn add(&mut self, value: f64, time: f64, half_decay: f64) {
        self.merge_from(&DecayingAverage::new(value, time), half_decay);
    }

    /// The decayed average as of the state's own time.
    pub fn get(&self, half_decay: f64) -> f64 {
        self.value / Self::sum_weights(half_decay)
    }

    pub fn get_at(&self, time: f64, half_decay: f64) -> f64 {
        self.remap(time, half_decay).get(half_decay)
    }

    pub fn less(&self, other: &Self, half_decay: f64) -> bool {
        let at = self.time.max(other.time);
        self.get_at(at, half_decay) < other.get_at(at, half_decay)
    }

    pub fn serialize(&self, buf: &mut Vec<u8>) {
        put_f64(buf, self.value);
        put_f64(buf, self.time);
    }

    pub fn deserialize(reader: &mut Reader<'_>) -> ExpSmoothResult<Self> {
        Ok(DecayingAverage {
            value: reader.get_f64()?,
            time: reader.get_f64()?,
        })
    }
}
