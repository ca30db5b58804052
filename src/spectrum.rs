//! One-sided spectral analysis of a real window with a lazily refreshed cache.
//!
//! [`SpectralAnalyzer`] owns the FFT kernel, a real-FFT plan for one window
//! length, the last computed `N/2 + 1` bins and a copy of the samples they
//! were computed from. The owner marks the cache stale whenever the window
//! changes; the next spectral query recomputes the bins once and every later
//! query on the same samples reuses them. A window whose contents differ from
//! that copy is transformed again even if nobody called
//! [`invalidate`](SpectralAnalyzer::invalidate).
//!
//! The free functions at the bottom derive views from any bin slice and
//! are what the analyzer uses internally.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::DspError;
use crate::fft::{FftError, ScalarFftImpl};
use crate::num::{Complex, Float};
use crate::rfft::{bins_for_len, RfftPlanner};
use crate::window::SlidingWindow;

/// Freshness of the cached spectrum relative to the window contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// Bins match the last transformed samples.
    Fresh,
    /// Window changed (or nothing computed yet); bins must be recomputed.
    Stale,
}

struct SpectrumCache<T: Float> {
    input: Vec<T>,
    bins: Vec<Complex<T>>,
    state: CacheState,
}

/// Real-FFT analyzer for windows of one fixed, even length.
pub struct SpectralAnalyzer<T: Float> {
    len: usize,
    fft: ScalarFftImpl<T>,
    plan: RfftPlanner<T>,
    cache: SpectrumCache<T>,
    transforms: usize,
}

impl<T: Float> SpectralAnalyzer<T> {
    /// Create an analyzer for windows of `len` samples.
    ///
    /// `len` must be even and at least two; odd lengths are the caller's to
    /// round.
    pub fn new(len: usize) -> Result<Self, DspError> {
        if len == 0 {
            return Err(DspError::InvalidSize);
        }
        let plan = RfftPlanner::new(len)?;
        Ok(Self {
            len,
            fft: ScalarFftImpl::default(),
            plan,
            cache: SpectrumCache {
                input: vec![T::zero(); len],
                bins: vec![Complex::zero(); bins_for_len(len)],
                state: CacheState::Stale,
            },
            transforms: 0,
        })
    }

    /// Window length `N`.
    pub fn window_len(&self) -> usize {
        self.len
    }

    /// Number of one-sided bins, `N/2 + 1`.
    pub fn bin_count(&self) -> usize {
        bins_for_len(self.len)
    }

    /// Mark the cached bins as outdated.
    #[inline]
    pub fn invalidate(&mut self) {
        self.cache.state = CacheState::Stale;
    }

    pub fn state(&self) -> CacheState {
        self.cache.state
    }

    pub fn is_stale(&self) -> bool {
        self.cache.state == CacheState::Stale
    }

    /// Number of FFTs actually computed since construction.
    pub fn transform_count(&self) -> usize {
        self.transforms
    }

    /// One-sided spectrum of `window`.
    ///
    /// The cached bins are returned while the cache is fresh and `window`
    /// holds the samples they were computed from; otherwise the window is
    /// copied and transformed.
    pub fn spectrum(&mut self, window: &SlidingWindow<T>) -> Result<&[Complex<T>], DspError> {
        if window.capacity() != self.len {
            return Err(DspError::LengthMismatch {
                expected: self.len,
                actual: window.capacity(),
            });
        }
        let cache = &mut self.cache;
        let unchanged = cache.state == CacheState::Fresh
            && window.iter().eq(cache.input.iter().copied());
        if !unchanged {
            #[cfg(feature = "verbose-logging")]
            log::trace!("recomputing spectrum of {} samples", self.len);
            window.copy_into(&mut cache.input)?;
            self.plan.rfft(&self.fft, &cache.input, &mut cache.bins)?;
            cache.state = CacheState::Fresh;
            self.transforms += 1;
        }
        Ok(&self.cache.bins)
    }

    /// Bin center frequencies `k * fs / N` for `k` in `0..=N/2`.
    pub fn frequencies(&self, sampling_rate: T) -> Result<Vec<T>, DspError> {
        frequencies(self.len, sampling_rate)
    }

    pub fn magnitudes(&mut self, window: &SlidingWindow<T>) -> Result<Vec<T>, DspError> {
        Ok(magnitudes(self.spectrum(window)?))
    }

    pub fn squared_power_spectrum(
        &mut self,
        window: &SlidingWindow<T>,
    ) -> Result<Vec<T>, DspError> {
        Ok(squared_power_spectrum(self.spectrum(window)?))
    }

    pub fn mean_squared_power_spectrum(
        &mut self,
        window: &SlidingWindow<T>,
    ) -> Result<Vec<T>, DspError> {
        let n = self.len;
        mean_squared_power_spectrum(self.spectrum(window)?, n)
    }

    pub fn power_spectral_density(
        &mut self,
        window: &SlidingWindow<T>,
        sampling_rate: T,
    ) -> Result<Vec<T>, DspError> {
        check_sampling_rate(sampling_rate)?;
        let n = self.len;
        power_spectral_density(self.spectrum(window)?, n, sampling_rate)
    }

    /// Raw mean of `re² + im²` over the bins covering `[from, to]` Hz.
    ///
    /// Preconditions are checked before any FFT work is done.
    pub fn average_band_power(
        &mut self,
        window: &SlidingWindow<T>,
        from_freq: T,
        to_freq: T,
        sampling_rate: T,
    ) -> Result<T, DspError> {
        let (lo, hi) = band_bins(self.len, from_freq, to_freq, sampling_rate)?;
        let bins = self.spectrum(window)?;
        Ok(mean_norm_sqr(&bins[lo..=hi]))
    }
}

impl<T: Float> core::fmt::Debug for SpectralAnalyzer<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpectralAnalyzer")
            .field("len", &self.len)
            .field("state", &self.cache.state)
            .field("transforms", &self.transforms)
            .finish()
    }
}

fn check_sampling_rate<T: Float>(fs: T) -> Result<T, DspError> {
    if fs > T::zero() && fs.is_finite() {
        Ok(fs)
    } else {
        Err(DspError::InvalidSamplingRate)
    }
}

fn len_as<T: Float>(n: usize) -> Result<T, DspError> {
    T::from_usize(n).ok_or(DspError::Fft(FftError::InvalidValue))
}

fn mean_norm_sqr<T: Float>(bins: &[Complex<T>]) -> T {
    let total = bins.iter().fold(T::zero(), |acc, c| acc + c.norm_sqr());
    let count = T::from_usize(bins.len()).unwrap_or_else(|| T::from_f32(bins.len() as f32));
    total / count
}

/// Bin center frequencies for a window of `n` samples.
pub fn frequencies<T: Float>(n: usize, sampling_rate: T) -> Result<Vec<T>, DspError> {
    let fs = check_sampling_rate(sampling_rate)?;
    let df = fs / len_as(n)?;
    (0..bins_for_len(n))
        .map(|k| -> Result<T, DspError> { Ok(len_as::<T>(k)? * df) })
        .collect()
}

/// `|X[k]|` per bin.
pub fn magnitudes<T: Float>(bins: &[Complex<T>]) -> Vec<T> {
    bins.iter().map(|c| c.norm()).collect()
}

/// `2 |X[k]|²` per bin, with the DC bin left at `|X[0]|²`.
pub fn squared_power_spectrum<T: Float>(bins: &[Complex<T>]) -> Vec<T> {
    one_sided(bins, T::one())
}

/// [`squared_power_spectrum`] divided by the window length `n`.
pub fn mean_squared_power_spectrum<T: Float>(
    bins: &[Complex<T>],
    n: usize,
) -> Result<Vec<T>, DspError> {
    Ok(one_sided(bins, T::one() / len_as(n)?))
}

/// [`squared_power_spectrum`] divided by `fs * n`.
pub fn power_spectral_density<T: Float>(
    bins: &[Complex<T>],
    n: usize,
    sampling_rate: T,
) -> Result<Vec<T>, DspError> {
    let fs = check_sampling_rate(sampling_rate)?;
    Ok(one_sided(bins, T::one() / (fs * len_as(n)?)))
}

fn one_sided<T: Float>(bins: &[Complex<T>], scale: T) -> Vec<T> {
    let two = T::from_f32(2.0);
    let mut out: Vec<T> = bins.iter().map(|c| c.norm_sqr() * two * scale).collect();
    if let Some(dc) = out.first_mut() {
        // DC folds only once
        *dc = *dc / two;
    }
    out
}

/// Inclusive bin range `[floor(from·N/fs), ceil(to·N/fs)]` clamped to
/// `[0, N/2]`.
///
/// # Errors
///
/// [`DspError::InvalidSamplingRate`] for a non-positive or non-finite `fs`,
/// [`DspError::InvalidBand`] unless `0 <= from <= to <= fs/2`.
pub fn band_bins<T: Float>(
    n: usize,
    from_freq: T,
    to_freq: T,
    sampling_rate: T,
) -> Result<(usize, usize), DspError> {
    let fs = check_sampling_rate(sampling_rate)?;
    let nyquist = fs / T::from_f32(2.0);
    // written so that NaN bounds fail every comparison
    let ordered = from_freq >= T::zero() && from_freq <= to_freq && to_freq <= nyquist;
    if !ordered {
        return Err(DspError::InvalidBand);
    }
    let n_t = len_as::<T>(n)?;
    let last = n / 2;
    let lo = (from_freq * n_t / fs).floor().to_usize().unwrap_or(0);
    let hi = (to_freq * n_t / fs).ceil().to_usize().unwrap_or(last);
    Ok((lo.min(last), hi.min(last)))
}

/// Raw band power over a bin slice of a window of `n` samples.
pub fn average_band_power<T: Float>(
    bins: &[Complex<T>],
    n: usize,
    from_freq: T,
    to_freq: T,
    sampling_rate: T,
) -> Result<T, DspError> {
    if bins.len() != bins_for_len(n) {
        return Err(DspError::LengthMismatch {
            expected: bins_for_len(n),
            actual: bins.len(),
        });
    }
    let (lo, hi) = band_bins(n, from_freq, to_freq, sampling_rate)?;
    Ok(mean_norm_sqr(&bins[lo..=hi]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::PI;

    fn sinusoid(n: usize, bin: usize, amplitude: f64) -> Vec<f64> {
        (0..n)
            .map(|i| amplitude * (2.0 * PI * (bin * i) as f64 / n as f64).cos())
            .collect()
    }

    #[test]
    fn rejects_bad_lengths() {
        assert_eq!(SpectralAnalyzer::<f32>::new(0).err(), Some(DspError::InvalidSize));
        assert!(matches!(
            SpectralAnalyzer::<f32>::new(5).err(),
            Some(DspError::Fft(_))
        ));
        let mut a = SpectralAnalyzer::<f32>::new(4).unwrap();
        let short = SlidingWindow::from_slice(&[1.0, 2.0]).unwrap();
        assert_eq!(
            a.spectrum(&short).err(),
            Some(DspError::LengthMismatch {
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn cache_is_reused_until_invalidated() {
        let x = SlidingWindow::from_slice(&sinusoid(16, 3, 1.0)).unwrap();
        let mut a = SpectralAnalyzer::<f64>::new(16).unwrap();
        assert!(a.is_stale());
        let first = a.spectrum(&x).unwrap().to_vec();
        assert_eq!(a.state(), CacheState::Fresh);
        let second = a.spectrum(&x).unwrap().to_vec();
        assert_eq!(first, second);
        assert_eq!(a.transform_count(), 1);
        a.invalidate();
        a.spectrum(&x).unwrap();
        assert_eq!(a.transform_count(), 2);
    }

    #[test]
    fn new_samples_are_transformed_without_invalidate() {
        let mut a = SpectralAnalyzer::<f64>::new(4).unwrap();
        let ones = SlidingWindow::from_slice(&[1.0, 1.0, 1.0, 1.0]).unwrap();
        let impulse = SlidingWindow::from_slice(&[5.0, 0.0, 0.0, 0.0]).unwrap();
        assert!((a.spectrum(&ones).unwrap()[0].re - 4.0).abs() < 1e-12);
        // same layout, new contents: the DC bin must follow the samples
        let dc = a.spectrum(&impulse).unwrap()[0];
        assert!((dc.re - 5.0).abs() < 1e-12 && dc.im.abs() < 1e-12);
        assert_eq!(a.transform_count(), 2);
        a.spectrum(&impulse).unwrap();
        assert_eq!(a.transform_count(), 2);

        // a window pushed into the same contents counts as unchanged
        let mut pushed = SlidingWindow::<f64>::new(4).unwrap();
        for v in [9.0, 5.0, 0.0, 0.0, 0.0] {
            pushed.push(v);
        }
        let dc = a.spectrum(&pushed).unwrap()[0];
        assert!((dc.re - 5.0).abs() < 1e-12);
        assert_eq!(a.transform_count(), 2);
    }

    #[test]
    fn sinusoid_peaks_at_its_bin() {
        let amp = 1.5;
        let x = SlidingWindow::from_slice(&sinusoid(16, 3, amp)).unwrap();
        let mut a = SpectralAnalyzer::<f64>::new(16).unwrap();
        let mags = a.magnitudes(&x).unwrap();
        assert_eq!(mags.len(), 9);
        let expected = amp * 16.0 / 2.0;
        assert!(((mags[3] - expected) / expected).abs() < 1e-4);
        for (k, m) in mags.iter().enumerate().filter(|(k, _)| *k != 3) {
            assert!(m.abs() < 1e-9, "bin {} = {}", k, m);
        }
    }

    #[test]
    fn one_sided_power_keeps_parseval() {
        let n = 16;
        let x: Vec<f64> = sinusoid(n, 2, 1.0)
            .iter()
            .zip(sinusoid(n, 5, 0.5))
            .map(|(a, b)| a + b + 0.25)
            .collect();
        let w = SlidingWindow::from_slice(&x).unwrap();
        let mut a = SpectralAnalyzer::<f64>::new(n).unwrap();
        let sps = a.squared_power_spectrum(&w).unwrap();
        let energy: f64 = x.iter().map(|v| v * v).sum();
        let total: f64 = sps.iter().sum();
        assert!((total - n as f64 * energy).abs() < 1e-9 * total);

        let bins = a.spectrum(&w).unwrap().to_vec();
        assert!((sps[0] - bins[0].norm_sqr()).abs() < 1e-12);
        assert!((sps[2] - 2.0 * bins[2].norm_sqr()).abs() < 1e-9);

        let msps = a.mean_squared_power_spectrum(&w).unwrap();
        let psd = a.power_spectral_density(&w, 100.0).unwrap();
        for k in 0..sps.len() {
            assert!((msps[k] - sps[k] / n as f64).abs() < 1e-9);
            assert!((psd[k] - sps[k] / (100.0 * n as f64)).abs() < 1e-12);
        }
        assert_eq!(a.transform_count(), 1);
    }

    #[test]
    fn frequencies_span_dc_to_nyquist() {
        let f = frequencies(8, 1000.0f32).unwrap();
        assert_eq!(f, vec![0.0, 125.0, 250.0, 375.0, 500.0]);
        assert_eq!(frequencies(8, 0.0f32), Err(DspError::InvalidSamplingRate));
        assert_eq!(
            frequencies(8, f32::INFINITY),
            Err(DspError::InvalidSamplingRate)
        );
    }

    #[test]
    fn band_power_over_full_band_is_mean_bin_power() {
        let x = SlidingWindow::from_slice(&sinusoid(16, 4, 2.0)).unwrap();
        let mut a = SpectralAnalyzer::<f64>::new(16).unwrap();
        let bins = a.spectrum(&x).unwrap().to_vec();
        let mean = bins.iter().map(|c| c.norm_sqr()).sum::<f64>() / bins.len() as f64;
        let full = a.average_band_power(&x, 0.0, 50.0, 100.0).unwrap();
        assert!((full - mean).abs() < 1e-9);
        assert_eq!(
            average_band_power(&bins, 16, 0.0, 50.0, 100.0).unwrap(),
            full
        );
    }

    #[test]
    fn band_edges_round_outwards() {
        // N = 16, fs = 100: df = 6.25 Hz
        assert_eq!(band_bins(16, 10.0f32, 20.0, 100.0), Ok((1, 4)));
        assert_eq!(band_bins(16, 12.5f32, 12.5, 100.0), Ok((2, 2)));
        assert_eq!(band_bins(16, 0.0f32, 0.0, 100.0), Ok((0, 0)));
        assert_eq!(band_bins(16, 50.0f32, 50.0, 100.0), Ok((8, 8)));
    }

    #[test]
    fn band_preconditions() {
        let mut a = SpectralAnalyzer::<f32>::new(8).unwrap();
        let x = SlidingWindow::<f32>::new(8).unwrap();
        assert_eq!(
            a.average_band_power(&x, 20.0, 10.0, 100.0),
            Err(DspError::InvalidBand)
        );
        assert_eq!(
            a.average_band_power(&x, -1.0, 10.0, 100.0),
            Err(DspError::InvalidBand)
        );
        assert_eq!(
            a.average_band_power(&x, 0.0, 60.0, 100.0),
            Err(DspError::InvalidBand)
        );
        assert_eq!(
            a.average_band_power(&x, f32::NAN, 10.0, 100.0),
            Err(DspError::InvalidBand)
        );
        assert_eq!(
            a.average_band_power(&x, 0.0, 10.0, -100.0),
            Err(DspError::InvalidSamplingRate)
        );
        assert_eq!(a.transform_count(), 0);
    }
}
