//! Stateless statistics and elementwise helpers over real sequences.
//!
//! Every function is generic over [`Float`] so the same code serves `f32`
//! and `f64` data. Functions returning a sequence never modify their input.

use alloc::vec::Vec;

use crate::error::DspError;
use crate::num::Float;

fn len_as<T: Float>(v: &[T]) -> T {
    // slices longer than the exact integer range of T lose at most rounding
    T::from_usize(v.len()).unwrap_or_else(|| T::from_f32(v.len() as f32))
}

fn is_constant<T: Float>(v: &[T]) -> bool {
    v.windows(2).all(|w| w[0] == w[1])
}

/// `sqrt(Σ x²)` evaluated as `s · sqrt(Σ (x/s)²)` with `s = max |x|`, so
/// values whose squares overflow `T` still give a finite norm.
fn scaled_norm<T, I>(values: I) -> T
where
    T: Float,
    I: Iterator<Item = T> + Clone,
{
    let scale = values.clone().fold(T::zero(), |m, x| {
        let a = x.abs();
        if a > m {
            a
        } else {
            m
        }
    });
    if scale == T::zero() || !scale.is_finite() {
        return values.fold(T::zero(), |acc, x| x.mul_add(x, acc)).sqrt();
    }
    let ss = values.fold(T::zero(), |acc, x| {
        let r = x / scale;
        r.mul_add(r, acc)
    });
    scale * ss.sqrt()
}

fn require_same_len<T: Float>(v1: &[T], v2: &[T]) -> Result<(), DspError> {
    if v1.len() != v2.len() {
        return Err(DspError::LengthMismatch {
            expected: v1.len(),
            actual: v2.len(),
        });
    }
    Ok(())
}

/// Sum of all elements.
pub fn sum<T: Float>(v: &[T]) -> T {
    v.iter().fold(T::zero(), |acc, &x| acc + x)
}

/// Arithmetic mean. An empty sequence has mean zero.
pub fn mean<T: Float>(v: &[T]) -> T {
    if v.is_empty() {
        return T::zero();
    }
    sum(v) / len_as(v)
}

/// Squared Euclidean norm (signal energy).
///
/// Overflows to infinity once the energy exceeds the range of `T`, e.g.
/// `f32` samples around `1e20`; [`length`] stays finite there.
pub fn power<T: Float>(v: &[T]) -> T {
    v.iter().fold(T::zero(), |acc, &x| x.mul_add(x, acc))
}

/// Euclidean norm.
pub fn length<T: Float>(v: &[T]) -> T {
    scaled_norm(v.iter().copied())
}

/// Largest element, `None` for an empty sequence.
pub fn max<T: Float>(v: &[T]) -> Option<T> {
    let (&first, rest) = v.split_first()?;
    Some(rest.iter().fold(first, |m, &x| if x > m { x } else { m }))
}

/// Smallest element, `None` for an empty sequence.
pub fn min<T: Float>(v: &[T]) -> Option<T> {
    let (&first, rest) = v.split_first()?;
    Some(rest.iter().fold(first, |m, &x| if x < m { x } else { m }))
}

/// Sample variance (normalized by `n - 1`). Fewer than two samples yield zero.
///
/// Like [`power`], this is a sum of squares and can overflow where
/// [`std_dev`] does not.
pub fn variance<T: Float>(v: &[T]) -> T {
    if v.len() < 2 {
        return T::zero();
    }
    let m = mean(v);
    let ss = v.iter().fold(T::zero(), |acc, &x| {
        let c = x - m;
        c.mul_add(c, acc)
    });
    ss / (len_as(v) - T::one())
}

/// Sample standard deviation, `sqrt(variance(v))`.
pub fn std_dev<T: Float>(v: &[T]) -> T {
    if v.len() < 2 {
        return T::zero();
    }
    let m = mean(v);
    scaled_norm(v.iter().map(|&x| x - m)) / (len_as(v) - T::one()).sqrt()
}

/// `v[i] + value` for every element.
pub fn add<T: Float>(v: &[T], value: T) -> Vec<T> {
    v.iter().map(|&x| x + value).collect()
}

/// `v[i] * value` for every element.
pub fn multiply<T: Float>(v: &[T], value: T) -> Vec<T> {
    v.iter().map(|&x| x * value).collect()
}

/// Floating remainder `fmod(v[i], value)`; a zero divisor yields NaN as in C.
pub fn modulo<T: Float>(v: &[T], value: T) -> Vec<T> {
    v.iter().map(|&x| x.rem(value)).collect()
}

/// Elementwise square root; negative inputs yield NaN.
pub fn sqrt<T: Float>(v: &[T]) -> Vec<T> {
    v.iter().map(|&x| x.sqrt()).collect()
}

/// `v` minus its mean.
pub fn remove_mean<T: Float>(v: &[T]) -> Vec<T> {
    let m = mean(v);
    v.iter().map(|&x| x - m).collect()
}

/// Scale `v` to unit Euclidean length, optionally removing the mean first.
///
/// # Errors
///
/// [`DspError::DegenerateVector`] when the (centralized) vector has zero
/// norm: an all-zero input, or a constant input with `centralize` set.
pub fn normalize_to_unit_length<T: Float>(v: &[T], centralize: bool) -> Result<Vec<T>, DspError> {
    let base = if centralize {
        if is_constant(v) {
            return Err(DspError::DegenerateVector);
        }
        remove_mean(v)
    } else {
        v.to_vec()
    };
    let norm = length(&base);
    if !(norm > T::zero()) || !norm.is_finite() {
        return Err(DspError::DegenerateVector);
    }
    Ok(base.into_iter().map(|x| x / norm).collect())
}

/// Scale `v` to unit sample variance, optionally removing the mean first.
///
/// # Errors
///
/// [`DspError::DegenerateVector`] when the standard deviation is zero,
/// which includes any sequence shorter than two samples.
pub fn normalize_to_unit_variance<T: Float>(
    v: &[T],
    centralize: bool,
) -> Result<Vec<T>, DspError> {
    if v.len() < 2 || is_constant(v) {
        return Err(DspError::DegenerateVector);
    }
    let sd = std_dev(v);
    if !(sd > T::zero()) || !sd.is_finite() {
        return Err(DspError::DegenerateVector);
    }
    let m = if centralize { mean(v) } else { T::zero() };
    Ok(v.iter().map(|&x| (x - m) / sd).collect())
}

/// Inner product of two equally long sequences.
pub fn dot_product<T: Float>(v1: &[T], v2: &[T]) -> Result<T, DspError> {
    require_same_len(v1, v2)?;
    Ok(v1
        .iter()
        .zip(v2)
        .fold(T::zero(), |acc, (&a, &b)| a.mul_add(b, acc)))
}

/// Pearson correlation: the dot product of both sequences after centralizing
/// and scaling them to unit length.
///
/// # Errors
///
/// [`DspError::LengthMismatch`] for unequal lengths and
/// [`DspError::DegenerateVector`] if either input is constant.
pub fn correlation_coefficient<T: Float>(v1: &[T], v2: &[T]) -> Result<T, DspError> {
    require_same_len(v1, v2)?;
    let a = normalize_to_unit_length(v1, true)?;
    let b = normalize_to_unit_length(v2, true)?;
    dot_product(&a, &b)
}


#[cfg(all(feature = "internal-tests", test))]
mod coverage_tests {
    use super::*;
    use proptest::prop_assert;
    use proptest::proptest;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn correlation_is_shift_and_scale_invariant() {
        let mut rng = StdRng::seed_from_u64(7);
        let v: Vec<f64> = (0..64).map(|_| rng.gen_range(-10.0..10.0)).collect();
        let w = add(&multiply(&v, 3.5), -2.0);
        let cc = correlation_coefficient(&v, &w).unwrap();
        assert!((cc - 1.0).abs() < 1e-12, "cc = {}", cc);
    }

    proptest! {
        #[test]
        fn prop_correlation_is_bounded(ref pairs in proptest::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 3..48)) {
            let a: Vec<f64> = pairs.iter().map(|p| p.0).collect();
            let b: Vec<f64> = pairs.iter().map(|p| p.1).collect();
            if let Ok(cc) = correlation_coefficient(&a, &b) {
                prop_assert!(cc.abs() <= 1.0 + 1e-9);
            }
        }

        #[test]
        fn prop_unit_length_has_norm_one(ref v in proptest::collection::vec(-1000.0f64..1000.0, 2..64)) {
            if let Ok(n) = normalize_to_unit_length(v, true) {
                prop_assert!((length(&n) - 1.0).abs() < 1e-9);
                prop_assert!(mean(&n).abs() < 1e-9);
            }
        }
    }
}
