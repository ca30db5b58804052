//! The analysis session: one sliding window plus its spectral and FIR views.
//!
//! [`SignalBuffer`] is the only place samples enter. Every mutation goes
//! through [`push`](SignalBuffer::push) or [`clear`](SignalBuffer::clear),
//! which also mark the spectral cache stale, so the analyzer and the filter
//! can only ever observe the window the session owns.
//!
//! ```
//! use sigwin::SignalBuffer;
//!
//! let mut buf = SignalBuffer::<f32>::new(8, true)?;
//! for x in [1.0, 4.0, 2.0, 5.0] {
//!     buf.push(x);
//! }
//! assert_eq!(buf.sum(), 12.0);
//! let mags = buf.fft_magnitudes()?;
//! assert_eq!(mags.len(), 5);
//! # Ok::<(), sigwin::DspError>(())
//! ```

use alloc::vec::Vec;
use core::fmt;

use crate::config::BufferConfig;
use crate::error::DspError;
use crate::fir::FirFilter;
use crate::num::{Complex, Float};
use crate::spectrum::SpectralAnalyzer;
use crate::vector;
use crate::window::SlidingWindow;

/// Fixed-length window over a sample stream with statistics, spectra and
/// FIR filtering of its current contents.
pub struct SignalBuffer<T: Float = f32> {
    window: SlidingWindow<T>,
    analyzer: Option<SpectralAnalyzer<T>>,
    fir: FirFilter<T>,
}

impl<T: Float> SignalBuffer<T> {
    /// Zero-filled buffer of `capacity` samples.
    ///
    /// With `fft_enabled` an odd capacity is rounded up by one so that the
    /// real FFT applies.
    pub fn new(capacity: usize, fft_enabled: bool) -> Result<Self, DspError> {
        Self::with_config(BufferConfig::new(capacity).fft(fft_enabled))
    }

    pub fn with_config(config: BufferConfig<T>) -> Result<Self, DspError> {
        if config.capacity == 0 {
            return Err(DspError::InvalidSize);
        }
        let capacity = config.effective_capacity()?;
        #[cfg(feature = "verbose-logging")]
        if capacity != config.capacity {
            log::warn!(
                "odd capacity {} rounded up to {} for FFT support",
                config.capacity,
                capacity
            );
        }
        let analyzer = if config.fft_enabled {
            Some(SpectralAnalyzer::new(capacity)?)
        } else {
            None
        };
        Ok(Self {
            window: SlidingWindow::with_fill(capacity, config.fill)?,
            analyzer,
            fir: FirFilter::new(),
        })
    }

    // ---- window ----

    /// Append the newest sample, evicting the oldest.
    pub fn push(&mut self, value: T) {
        self.window.push(value);
        self.invalidate_spectrum();
    }

    /// Zero every sample. FIR taps are kept.
    pub fn clear(&mut self) {
        self.window.clear();
        self.invalidate_spectrum();
    }

    fn invalidate_spectrum(&mut self) {
        if let Some(analyzer) = self.analyzer.as_mut() {
            analyzer.invalidate();
        }
    }

    /// Snapshot of the window, oldest-first.
    pub fn data(&self) -> Vec<T> {
        self.window.to_vec()
    }

    pub fn at(&self, index: usize) -> Result<T, DspError> {
        self.window.at(index)
    }

    pub fn buffer_size(&self) -> usize {
        self.window.capacity()
    }

    /// Most recently pushed sample.
    pub fn latest(&self) -> T {
        self.window.latest()
    }

    pub fn fft_enabled(&self) -> bool {
        self.analyzer.is_some()
    }

    pub fn window(&self) -> &SlidingWindow<T> {
        &self.window
    }

    // ---- time-domain statistics ----

    pub fn mean(&self) -> T {
        vector::mean(&self.window.contiguous())
    }

    pub fn sum(&self) -> T {
        vector::sum(&self.window.contiguous())
    }

    /// Euclidean norm of the window.
    pub fn length(&self) -> T {
        vector::length(&self.window.contiguous())
    }

    /// Squared norm of the window.
    pub fn energy(&self) -> T {
        vector::power(&self.window.contiguous())
    }

    pub fn max(&self) -> T {
        self.window.max()
    }

    pub fn min(&self) -> T {
        self.window.min()
    }

    /// Sample variance of the window.
    pub fn variance(&self) -> T {
        vector::variance(&self.window.contiguous())
    }

    pub fn std(&self) -> T {
        vector::std_dev(&self.window.contiguous())
    }

    pub fn add(&self, value: T) -> Vec<T> {
        vector::add(&self.window.contiguous(), value)
    }

    pub fn multiply(&self, value: T) -> Vec<T> {
        vector::multiply(&self.window.contiguous(), value)
    }

    pub fn modulo(&self, value: T) -> Vec<T> {
        vector::modulo(&self.window.contiguous(), value)
    }

    pub fn sqrt(&self) -> Vec<T> {
        vector::sqrt(&self.window.contiguous())
    }

    /// Window minus its mean.
    pub fn centralized(&self) -> Vec<T> {
        vector::remove_mean(&self.window.contiguous())
    }

    pub fn normalized_to_unit_length(&self, centralize: bool) -> Result<Vec<T>, DspError> {
        vector::normalize_to_unit_length(&self.window.contiguous(), centralize)
    }

    pub fn normalized_to_unit_variance(&self, centralize: bool) -> Result<Vec<T>, DspError> {
        vector::normalize_to_unit_variance(&self.window.contiguous(), centralize)
    }

    pub fn dot_product(&self, other: &[T]) -> Result<T, DspError> {
        vector::dot_product(&self.window.contiguous(), other)
    }

    // ---- spectrum ----

    fn spectral_parts(
        &mut self,
    ) -> Result<(&mut SpectralAnalyzer<T>, &SlidingWindow<T>), DspError> {
        let analyzer = self.analyzer.as_mut().ok_or(DspError::FftUnsupported)?;
        Ok((analyzer, &self.window))
    }

    /// One-sided spectrum, `N/2 + 1` bins from DC to Nyquist.
    ///
    /// Computed at most once per window state.
    pub fn fft(&mut self) -> Result<&[Complex<T>], DspError> {
        let (analyzer, window) = self.spectral_parts()?;
        analyzer.spectrum(window)
    }

    pub fn fft_frequencies(&self, sampling_rate: T) -> Result<Vec<T>, DspError> {
        self.analyzer
            .as_ref()
            .ok_or(DspError::FftUnsupported)?
            .frequencies(sampling_rate)
    }

    pub fn fft_magnitudes(&mut self) -> Result<Vec<T>, DspError> {
        let (analyzer, window) = self.spectral_parts()?;
        analyzer.magnitudes(window)
    }

    pub fn squared_power_spectrum(&mut self) -> Result<Vec<T>, DspError> {
        let (analyzer, window) = self.spectral_parts()?;
        analyzer.squared_power_spectrum(window)
    }

    pub fn mean_squared_power_spectrum(&mut self) -> Result<Vec<T>, DspError> {
        let (analyzer, window) = self.spectral_parts()?;
        analyzer.mean_squared_power_spectrum(window)
    }

    pub fn power_spectral_density(&mut self, sampling_rate: T) -> Result<Vec<T>, DspError> {
        let (analyzer, window) = self.spectral_parts()?;
        analyzer.power_spectral_density(window, sampling_rate)
    }

    pub fn average_band_power(
        &mut self,
        from_freq: T,
        to_freq: T,
        sampling_rate: T,
    ) -> Result<T, DspError> {
        let (analyzer, window) = self.spectral_parts()?;
        analyzer.average_band_power(window, from_freq, to_freq, sampling_rate)
    }

    /// `false` when the buffer has no FFT support.
    pub fn spectrum_is_stale(&self) -> bool {
        self.analyzer.as_ref().is_some_and(|a| a.is_stale())
    }

    pub fn fft_transform_count(&self) -> usize {
        self.analyzer.as_ref().map_or(0, |a| a.transform_count())
    }

    pub fn spectral_analyzer(&self) -> Option<&SpectralAnalyzer<T>> {
        self.analyzer.as_ref()
    }

    // ---- FIR ----

    pub fn setup_fir_filter(&mut self, taps: &[T]) -> Result<(), DspError> {
        self.fir.setup(taps, self.window.capacity())
    }

    pub fn latest_fir_output(&mut self) -> Result<T, DspError> {
        self.fir.latest_output(&self.window)
    }

    pub fn fir_filtered(&mut self) -> Result<Vec<T>, DspError> {
        self.fir.filtered(&self.window)
    }

    pub fn fir_filter(&self) -> &FirFilter<T> {
        &self.fir
    }
}

impl<T: Float> fmt::Display for SignalBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SignalBuffer size: {}", self.buffer_size())?;
        for (i, v) in self.window.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            fmt::Display::fmt(&v, f)?;
        }
        Ok(())
    }
}

impl<T: Float> fmt::Debug for SignalBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalBuffer")
            .field("window", &self.window)
            .field("analyzer", &self.analyzer)
            .field("fir", &self.fir)
            .finish()
    }
}
