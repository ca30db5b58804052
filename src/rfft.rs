//! Real FFT (RFFT) built on top of the complex kernel.
//!
//! A real signal of even length `N` is packed into `N/2` complex values
//! (even samples in the real part, odd samples in the imaginary part),
//! transformed with a half-length complex FFT and split back into the
//! `N/2 + 1` one-sided bins from DC to Nyquist.

use alloc::vec::Vec;

use crate::fft::{Complex, FftError, FftImpl};
use crate::num::Float;

/// Number of real samples that make up a complex pair.
pub const STRIDE: usize = 2;

/// Scalar used for halving values during post-processing.
pub const HALF: f32 = 0.5;

/// Smallest supported transform length.
pub const MIN_LEN: usize = STRIDE;

/// Number of one-sided bins produced for a real transform of length `n`.
#[inline]
pub const fn bins_for_len(n: usize) -> usize {
    n / STRIDE + 1
}

/// Build the post-processing table `exp(-iπ k / m)` for `k = 0..m`.
///
/// Returns an error if `m` is zero or cannot be represented as the
/// floating-point type `T`.
fn build_twiddle_table<T: Float>(m: usize) -> Result<Vec<Complex<T>>, FftError> {
    if m == 0 {
        return Err(FftError::InvalidValue);
    }
    let m_t = T::from_usize(m).ok_or(FftError::InvalidValue)?;
    let step = -T::pi() / m_t;
    let mut table = Vec::with_capacity(m);
    for k in 0..m {
        let k_t = T::from_usize(k).ok_or(FftError::InvalidValue)?;
        table.push(Complex::expi(step * k_t));
    }
    Ok(table)
}

/// Planner for real-input transforms of one fixed length.
///
/// Holds the split twiddles for that length and a reusable scratch buffer so
/// that a steady stream of transforms performs no allocation.
pub struct RfftPlanner<T: Float> {
    len: usize,
    twiddles: Vec<Complex<T>>,
    scratch: Vec<Complex<T>>,
}

impl<T: Float> RfftPlanner<T> {
    /// Create a planner for real transforms of length `len`.
    ///
    /// `len` must be even and at least [`MIN_LEN`].
    pub fn new(len: usize) -> Result<Self, FftError> {
        if len == 0 {
            return Err(FftError::EmptyInput);
        }
        if len < MIN_LEN || len % STRIDE != 0 {
            return Err(FftError::InvalidValue);
        }
        let m = len / STRIDE;
        Ok(Self {
            len,
            twiddles: build_twiddle_table(m)?,
            scratch: alloc::vec![Complex::zero(); m],
        })
    }

    /// Transform length this planner was built for.
    pub fn transform_len(&self) -> usize {
        self.len
    }

    /// Compute the one-sided spectrum of `input` into `output`.
    ///
    /// `input.len()` must equal [`RfftPlanner::transform_len`] and `output.len()` must
    /// be `len/2 + 1`.
    pub fn rfft<F: FftImpl<T> + ?Sized>(
        &mut self,
        fft: &F,
        input: &[T],
        output: &mut [Complex<T>],
    ) -> Result<(), FftError> {
        let n = input.len();
        if n == 0 {
            return Err(FftError::EmptyInput);
        }
        if n != self.len || output.len() != bins_for_len(n) {
            return Err(FftError::MismatchedLengths);
        }
        let m = n / STRIDE;
        let scratch = &mut self.scratch[..m];
        for (z, pair) in scratch.iter_mut().zip(input.chunks_exact(STRIDE)) {
            *z = Complex::new(pair[0], pair[1]);
        }
        fft.fft(scratch)?;

        let y0 = scratch[0];
        output[0] = Complex::new(y0.re + y0.im, T::zero());
        output[m] = Complex::new(y0.re - y0.im, T::zero());
        let half = T::from_f32(HALF);
        for k in 1..m {
            let a = scratch[k];
            let b = scratch[m - k].conj();
            let sum = a + b;
            let diff = a - b;
            let t = self.twiddles[k] * diff;
            // sum - i·t
            let temp = sum + Complex::new(t.im, -t.re);
            output[k] = temp.scale(half);
        }
        Ok(())
    }
}
