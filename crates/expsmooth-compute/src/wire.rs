//! Serialized state layout.
//!
//! States cross process and network boundaries (spill, shuffle of partial
//! aggregates) as a flat, versionless sequence of fixed-width little-endian
//! fields in field-declaration order:
//!
//! - `f64` and `u64` as their 8 little-endian bytes,
//! - `bool` as one byte, `0` or `1`,
//! - an optional seed as a `(value: f64, at: u64, present: bool)` triple
//!   (absent seeds write zeroed value/coordinate),
//! - a seasonal ring as a presence `bool` followed, when set, by
//!   `seasons_count` consecutive `f64`s.
//!
//! No cross-version compatibility is promised beyond matching field order.

use expsmooth_error::{expsmooth_bail, ExpSmoothResult};

use crate::seed::Seed;

pub fn put_f64(buf: &mut Vec<u8>, v: f64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

pub fn put_u64(buf: &mut Vec<u8>, v: u64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

pub fn put_bool(buf: &mut Vec<u8>, v: bool) {
    buf.push(v as u8);
}

pub fn put_seed(buf: &mut Vec<u8>, seed: Option<Seed>) {
    let s = seed.unwrap_or(Seed::new(0.0, 0));
    put_f64(buf, s.value);
    put_u64(buf, s.at);
    put_bool(buf, seed.is_some());
}

/// A bounds-checked cursor over a serialized state.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> ExpSmoothResult<&'a [u8]> {
        if self.remaining() < n {
            expsmooth_bail!(
                ComputeError: "serialized state truncated: need {} bytes at offset {}, have {}",
                n, self.pos, self.remaining()
            );
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn get_f64(&mut self) -> ExpSmoothResult<f64> {
        let bytes = self.take(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(bytes);
        Ok(f64::from_le_bytes(arr))
    }

    pub fn get_u64(&mut self) -> ExpSmoothResult<u64> {
        let bytes = self.take(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(arr))
    }

    pub fn get_bool(&mut self) -> ExpSmoothResult<bool> {
        let byte = self.take(1)?[0];
        match byte {
            0 => Ok(false),
            1 => Ok(true),
            _ => expsmooth_bail!(
                ComputeError: "serialized state corrupt: flag byte {} at offset {}",
                byte, self.pos - 1
            ),
        }
    }

    pub fn get_seed(&mut self) -> ExpSmoothResult<Option<Seed>> {
        let value = self.get_f64()?;
        let at = self.get_u64()?;
        let present = self.get_bool()?;
        Ok(present.then_some(Seed::new(value, at)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fields_round_trip() {
        let mut buf = Vec::new();
        put_f64(&mut buf, -1.25);
        put_u64(&mut buf, u64::MAX - 7);
        put_bool(&mut buf, true);
        put_seed(&mut buf, Some(Seed::new(3.5, 42)));
        put_seed(&mut buf, None);

        let mut r = Reader::new(&buf);
        assert_eq!(r.get_f64().unwrap(), -1.25);
        assert_eq!(r.get_u64().unwrap(), u64::MAX - 7);
        assert!(r.get_bool().unwrap());
        assert_eq!(r.get_seed().unwrap(), Some(Seed::new(3.5, 42)));
        assert_eq!(r.get_seed().unwrap(), None);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_truncated_input_is_reported() {
        let mut buf = Vec::new();
        put_f64(&mut buf, 1.0);
        let mut r = Reader::new(&buf[..5]);
        assert!(r.get_f64().is_err());
    }

    #[test]
    fn test_bad_flag_byte_is_reported() {
        let mut r = Reader::new(&[2u8]);
        assert!(r.get_bool().is_err());
    }
}
