use num_traits::Float;

/// `base.powi(exp)` by exponentiation-by-squaring.
///
/// Every decay factor in this crate is `(1 - alpha)` raised to an integer
/// number of elapsed steps; a generic `powf` loses precision there, while
/// binary power stays within a few ulps over the exponent ranges the
/// estimators produce.
pub fn scale<T: Float>(base: T, mut exp: u64) -> T {
    let mut result = T::one();
    let mut base = base;
    while exp != 0 {
        if exp & 1 == 1 {
            result = result * base;
        }
        exp >>= 1;
        base = base * base;
    }
    result
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::assert_allclose;

    #[test]
    fn test_zero_exponent_is_one() {
        assert_eq!(scale(0.3f64, 0), 1.0);
        assert_eq!(scale(0.0f64, 0), 1.0);
        assert_eq!(scale(0.7f32, 0), 1.0);
    }

    #[test]
    fn test_matches_repeated_multiplication() {
        let base = 0.65f64;
        let mut expected = 1.0;
        for exp in 0..64 {
            assert_allclose!(scale(base, exp), expected, 1e-12);
            expected *= base;
        }
    }

    #[test]
    fn test_exponent_addition() {
        let base = 0.93f64;
        for a in [0u64, 1, 2, 7, 31, 100] {
            for b in [0u64, 1, 5, 64, 999] {
                assert_allclose!(scale(base, a + b), scale(base, a) * scale(base, b), 1e-12);
            }
        }
    }

    #[test]
    fn test_large_exponent_underflows_to_zero() {
        // (1/2)^2000 is far below the smallest subnormal.
        assert_eq!(scale(0.5f64, 2000), 0.0);
    }
}
