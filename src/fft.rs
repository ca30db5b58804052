//! Complex Fast Fourier Transform kernel.
//!
//! Power-of-two lengths run through an iterative radix-2
//! [Cooley–Tukey](https://en.wikipedia.org/wiki/Cooley%E2%80%93Tukey_FFT_algorithm)
//! transform; every other length is mapped onto a power-of-two convolution
//! with Bluestein's chirp-z algorithm. A [`FftPlanner`] caches per-stage
//! twiddle tables and Bluestein chirps so repeated transforms of the same
//! length never recompute trigonometric values.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::RefCell;

use hashbrown::HashMap;

pub use crate::num::{Complex, Complex32, Complex64, Float};

type BluesteinPair<T> = (Arc<[Complex<T>]>, Arc<[Complex<T>]>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftError {
    EmptyInput,
    MismatchedLengths,
    InvalidValue,
}

impl core::fmt::Display for FftError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FftError::EmptyInput => write!(f, "empty FFT input"),
            FftError::MismatchedLengths => write!(f, "mismatched FFT buffer lengths"),
            FftError::InvalidValue => write!(f, "FFT length cannot be represented"),
        }
    }
}

pub struct FftPlanner<T: Float> {
    /// Cache of per-stage twiddle tables. The table for butterfly size
    /// `len` has `len/2` elements holding `exp(-2πi k / len)`.
    cache: HashMap<usize, Arc<[Complex<T>]>>,
    /// Chirp and transformed convolution kernel per Bluestein length.
    bluestein_cache: HashMap<usize, BluesteinPair<T>>,
}

impl<T: Float> Default for FftPlanner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> FftPlanner<T> {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            bluestein_cache: HashMap::new(),
        }
    }

    /// Retrieve a contiguous table of twiddle factors for a given stage size
    /// `n`. The returned slice has length `n/2` and contains
    /// `exp(-2πi * k / n)` for `k = 0..n/2`.
    pub fn get_twiddles(&mut self, n: usize) -> Result<Arc<[Complex<T>]>, FftError> {
        if let Some(table) = self.cache.get(&n) {
            return Ok(Arc::clone(table));
        }
        let n_t = T::from_usize(n).ok_or(FftError::InvalidValue)?;
        let step = -T::from_f32(2.0) * T::pi() / n_t;
        let mut table: Vec<Complex<T>> = Vec::with_capacity(n / 2);
        for k in 0..n / 2 {
            let k_t = T::from_usize(k).ok_or(FftError::InvalidValue)?;
            table.push(Complex::expi(step * k_t));
        }
        let table: Arc<[Complex<T>]> = Arc::from(table);
        self.cache.insert(n, Arc::clone(&table));
        Ok(table)
    }

    fn cached_bluestein(&self, n: usize) -> Option<BluesteinPair<T>> {
        self.bluestein_cache
            .get(&n)
            .map(|(chirp, kernel)| (Arc::clone(chirp), Arc::clone(kernel)))
    }

    /// Number of distinct stage sizes with cached twiddles.
    pub fn cached_stages(&self) -> usize {
        self.cache.len()
    }
}

pub trait FftImpl<T: Float> {
    /// In-place forward transform, `X[k] = Σ x[n]·exp(-2πi kn/N)`.
    fn fft(&self, input: &mut [Complex<T>]) -> Result<(), FftError>;

    fn fft_out_of_place(
        &self,
        input: &[Complex<T>],
        output: &mut [Complex<T>],
    ) -> Result<(), FftError> {
        if input.len() != output.len() {
            return Err(FftError::MismatchedLengths);
        }
        output.copy_from_slice(input);
        self.fft(output)
    }
}

pub struct ScalarFftImpl<T: Float> {
    planner: RefCell<FftPlanner<T>>,
}

impl<T: Float> Default for ScalarFftImpl<T> {
    fn default() -> Self {
        Self {
            planner: RefCell::new(FftPlanner::new()),
        }
    }
}

impl<T: Float> ScalarFftImpl<T> {
    pub fn with_planner(planner: FftPlanner<T>) -> Self {
        Self {
            planner: RefCell::new(planner),
        }
    }

    /// Iterative decimation-in-time radix-2 transform. `input.len()` must be
    /// a power of two.
    fn radix2(&self, input: &mut [Complex<T>]) -> Result<(), FftError> {
        let n = input.len();
        bit_reverse_permute(input);
        let mut len = 2;
        while len <= n {
            let twiddles = self.planner.borrow_mut().get_twiddles(len)?;
            let half = len / 2;
            for block in input.chunks_exact_mut(len) {
                let (lo, hi) = block.split_at_mut(half);
                for ((a, b), &w) in lo.iter_mut().zip(hi.iter_mut()).zip(twiddles.iter()) {
                    let t = *b * w;
                    *b = *a - t;
                    *a = *a + t;
                }
            }
            len <<= 1;
        }
        Ok(())
    }

    fn bluestein_tables(&self, n: usize) -> Result<BluesteinPair<T>, FftError> {
        if let Some(pair) = self.planner.borrow().cached_bluestein(n) {
            return Ok(pair);
        }
        let m = (2 * n - 1).next_power_of_two();
        let n_t = T::from_usize(n).ok_or(FftError::InvalidValue)?;
        let mut chirp: Vec<Complex<T>> = Vec::with_capacity(n);
        let mut kernel: Vec<Complex<T>> = Vec::with_capacity(m);
        for i in 0..n {
            // exp(iπ i²/n) has period 2n in i², reducing keeps the angle small
            let sq = (i * i) % (2 * n);
            let sq_t = T::from_usize(sq).ok_or(FftError::InvalidValue)?;
            let angle = T::pi() * sq_t / n_t;
            chirp.push(Complex::expi(-angle));
            kernel.push(Complex::expi(angle));
        }
        kernel.resize(m, Complex::zero());
        for i in 1..n {
            kernel[m - i] = kernel[i];
        }
        self.radix2(&mut kernel)?;
        let pair: BluesteinPair<T> = (Arc::from(chirp), Arc::from(kernel));
        self.planner
            .borrow_mut()
            .bluestein_cache
            .insert(n, (Arc::clone(&pair.0), Arc::clone(&pair.1)));
        Ok(pair)
    }

    fn bluestein(&self, input: &mut [Complex<T>]) -> Result<(), FftError> {
        let n = input.len();
        let (chirp, kernel) = self.bluestein_tables(n)?;
        let m = kernel.len();
        let mut a: Vec<Complex<T>> = Vec::with_capacity(m);
        for (&x, &c) in input.iter().zip(chirp.iter()) {
            a.push(x * c);
        }
        a.resize(m, Complex::zero());
        self.radix2(&mut a)?;
        // inverse transform of the product via conj(fft(conj(.)))
        for (ai, &bi) in a.iter_mut().zip(kernel.iter()) {
            *ai = (*ai * bi).conj();
        }
        self.radix2(&mut a)?;
        let scale = T::one() / T::from_usize(m).ok_or(FftError::InvalidValue)?;
        for ((out, &ai), &c) in input.iter_mut().zip(a.iter()).zip(chirp.iter()) {
            *out = ai.conj().scale(scale) * c;
        }
        Ok(())
    }
}

impl<T: Float> FftImpl<T> for ScalarFftImpl<T> {
    fn fft(&self, input: &mut [Complex<T>]) -> Result<(), FftError> {
        let n = input.len();
        if n == 0 {
            return Err(FftError::EmptyInput);
        }
        if n == 1 {
            return Ok(());
        }
        if n.is_power_of_two() {
            self.radix2(input)
        } else {
            self.bluestein(input)
        }
    }
}

fn bit_reverse_permute<T: Float>(data: &mut [Complex<T>]) {
    let n = data.len();
    let mut j = 0;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;
        if i < j {
            data.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::f64::consts::PI;

    fn naive_dft(input: &[Complex64]) -> Vec<Complex64> {
        let n = input.len();
        (0..n)
            .map(|k| {
                input.iter().enumerate().fold(Complex64::zero(), |acc, (i, &x)| {
                    let angle = -2.0 * PI * (k * i) as f64 / n as f64;
                    acc + x * Complex64::expi(angle)
                })
            })
            .collect()
    }

    fn ramp(n: usize) -> Vec<Complex64> {
        (0..n)
            .map(|i| Complex64::new(i as f64 * 0.5 - 1.0, (i % 3) as f64))
            .collect()
    }

    #[test]
    fn impulse_is_flat() {
        let mut data = vec![Complex32::zero(); 4];
        data[0] = Complex32::new(1.0, 0.0);
        let fft = ScalarFftImpl::<f32>::default();
        fft.fft(&mut data).unwrap();
        for c in &data {
            assert!((c.re - 1.0).abs() < 1e-6, "re = {}", c.re);
            assert!(c.im.abs() < 1e-6, "im = {}", c.im);
        }
    }

    #[test]
    fn all_ones_concentrates_in_dc() {
        let mut data = vec![Complex32::new(1.0, 0.0); 8];
        let fft = ScalarFftImpl::<f32>::default();
        fft.fft(&mut data).unwrap();
        assert!((data[0].re - 8.0).abs() < 1e-6);
        for c in &data[1..] {
            assert!(c.re.abs() < 1e-6);
            assert!(c.im.abs() < 1e-6);
        }
    }

    #[test]
    fn matches_naive_dft_for_pow2_and_bluestein_lengths() {
        let fft = ScalarFftImpl::<f64>::default();
        for &n in &[2usize, 3, 5, 8, 12, 16, 25, 50, 64] {
            let input = ramp(n);
            let expected = naive_dft(&input);
            let mut data = input.clone();
            fft.fft(&mut data).unwrap();
            for (a, b) in data.iter().zip(expected.iter()) {
                assert!((a.re - b.re).abs() < 1e-9, "n={} re {} vs {}", n, a.re, b.re);
                assert!((a.im - b.im).abs() < 1e-9, "n={} im {} vs {}", n, a.im, b.im);
            }
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        let mut data: Vec<Complex32> = vec![];
        let fft = ScalarFftImpl::<f32>::default();
        assert_eq!(fft.fft(&mut data), Err(FftError::EmptyInput));
    }

    #[test]
    fn single_element_is_identity() {
        let mut data = vec![Complex32::new(3.0, -1.0)];
        let fft = ScalarFftImpl::<f32>::default();
        fft.fft(&mut data).unwrap();
        assert_eq!(data[0], Complex32::new(3.0, -1.0));
    }

    #[test]
    fn out_of_place_mismatched_lengths() {
        let input = vec![Complex32::new(1.0, 0.0), Complex32::new(2.0, 0.0)];
        let mut output = vec![Complex32::zero(); 3];
        let fft = ScalarFftImpl::<f32>::default();
        assert_eq!(
            fft.fft_out_of_place(&input, &mut output),
            Err(FftError::MismatchedLengths)
        );
    }

    #[test]
    fn planner_reuses_stage_tables() {
        let fft = ScalarFftImpl::<f32>::with_planner(FftPlanner::new());
        let mut data = vec![Complex32::new(1.0, 0.0); 16];
        fft.fft(&mut data).unwrap();
        fft.fft(&mut data).unwrap();
        // stages 2, 4, 8, 16
        assert_eq!(fft.planner.borrow().cached_stages(), 4);
    }
}
