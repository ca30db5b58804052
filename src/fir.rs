//! Finite impulse response filtering of a sliding window.
//!
//! Taps are aligned with the newest end of the window: for `L` taps the
//! output at window position `p` is
//!
//! ```text
//! y[p] = Σ taps[i] · x[p + 1 + i - L],   i = 0..L
//! ```
//!
//! where samples before the start of the window count as zero. The last
//! position of [`FirFilter::filtered`] equals [`FirFilter::latest_output`].

use alloc::vec::Vec;

use crate::error::DspError;
use crate::num::Float;
use crate::window::SlidingWindow;

/// Coefficients plus the most recent output value.
#[derive(Debug, Clone, PartialEq)]
pub struct FirFilter<T: Float> {
    taps: Vec<T>,
    last_output: T,
}

impl<T: Float> Default for FirFilter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> FirFilter<T> {
    /// An unconfigured filter; call [`setup`](Self::setup) before asking for
    /// output.
    pub fn new() -> Self {
        Self {
            taps: Vec::new(),
            last_output: T::zero(),
        }
    }

    /// Replace the coefficients.
    ///
    /// Validation happens before anything is changed, so on error the
    /// previous taps stay in place.
    pub fn setup(&mut self, taps: &[T], capacity: usize) -> Result<(), DspError> {
        if taps.is_empty() {
            return Err(DspError::EmptyTaps);
        }
        if taps.len() > capacity {
            return Err(DspError::TapsTooLong {
                taps: taps.len(),
                capacity,
            });
        }
        #[cfg(feature = "verbose-logging")]
        if taps.len() < capacity {
            log::debug!(
                "FIR filter uses the newest {} of {} samples",
                taps.len(),
                capacity
            );
        }
        let mut next = Vec::with_capacity(taps.len());
        next.extend_from_slice(taps);
        self.taps = next;
        self.last_output = T::zero();
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        !self.taps.is_empty()
    }

    pub fn taps(&self) -> &[T] {
        &self.taps
    }

    /// Result of the most recent output computation; zero before the first.
    pub fn last_output(&self) -> T {
        self.last_output
    }

    fn check(&self, capacity: usize) -> Result<(), DspError> {
        if self.taps.is_empty() {
            return Err(DspError::FilterNotConfigured);
        }
        if self.taps.len() > capacity {
            return Err(DspError::TapsTooLong {
                taps: self.taps.len(),
                capacity,
            });
        }
        Ok(())
    }

    /// Convolve the taps with the newest `taps.len()` samples of the window.
    ///
    /// Touches only those samples, whatever the ring layout.
    pub fn latest_output(&mut self, window: &SlidingWindow<T>) -> Result<T, DspError> {
        self.check(window.capacity())?;
        let start = window.capacity() - self.taps.len();
        let y = self
            .taps
            .iter()
            .zip(window.iter().skip(start))
            .fold(T::zero(), |acc, (&c, x)| c.mul_add(x, acc));
        self.last_output = y;
        Ok(y)
    }

    /// One output per window position, zero-padding before the window start.
    pub fn filtered(&mut self, window: &SlidingWindow<T>) -> Result<Vec<T>, DspError> {
        self.check(window.capacity())?;
        let samples = window.contiguous();
        let l = self.taps.len();
        let mut out = Vec::with_capacity(samples.len());
        for pos in 0..samples.len() {
            // taps[i] pairs with x[pos + 1 + i - l]; indices below zero are padding
            let skip = (l - 1).saturating_sub(pos);
            let first = pos + 1 + skip - l;
            let y = self.taps[skip..]
                .iter()
                .zip(&samples[first..=pos])
                .fold(T::zero(), |acc, (&c, &x)| c.mul_add(x, acc));
            out.push(y);
        }
        if let Some(&y) = out.last() {
            self.last_output = y;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn window<T: Float>(samples: &[T]) -> SlidingWindow<T> {
        SlidingWindow::from_slice(samples).unwrap()
    }

    #[test]
    fn setup_validates_before_replacing() {
        let mut f = FirFilter::<f32>::new();
        assert!(!f.is_configured());
        assert_eq!(f.setup(&[], 4), Err(DspError::EmptyTaps));
        f.setup(&[0.5, 0.5], 4).unwrap();
        assert_eq!(
            f.setup(&[1.0; 5], 4),
            Err(DspError::TapsTooLong {
                taps: 5,
                capacity: 4
            })
        );
        assert_eq!(f.taps(), &[0.5, 0.5]);
    }

    #[test]
    fn output_requires_taps() {
        let mut f = FirFilter::<f64>::new();
        assert_eq!(
            f.latest_output(&window(&[1.0, 2.0])),
            Err(DspError::FilterNotConfigured)
        );
        assert_eq!(
            f.filtered(&window(&[1.0])),
            Err(DspError::FilterNotConfigured)
        );
        f.setup(&[1.0; 3], 3).unwrap();
        assert_eq!(
            f.latest_output(&window(&[1.0, 2.0])),
            Err(DspError::TapsTooLong {
                taps: 3,
                capacity: 2
            })
        );
    }

    #[test]
    fn latest_output_is_newest_aligned() {
        let mut f = FirFilter::<f64>::new();
        f.setup(&[1.0, 10.0, 100.0], 6).unwrap();
        let x = window(&[9.0, 9.0, 9.0, 1.0, 2.0, 3.0]);
        // 1·1 + 10·2 + 100·3
        assert_eq!(f.latest_output(&x), Ok(321.0));
        assert_eq!(f.last_output(), 321.0);
    }

    #[test]
    fn filtered_pads_with_zeros() {
        let mut f = FirFilter::<f64>::new();
        f.setup(&[1.0, 10.0], 4).unwrap();
        let x = window(&[1.0, 2.0, 3.0, 4.0]);
        let y = f.filtered(&x).unwrap();
        assert_eq!(y, vec![10.0, 21.0, 32.0, 43.0]);
        assert_eq!(f.last_output(), 43.0);
        assert_eq!(f.latest_output(&x), Ok(43.0));
    }

    #[test]
    fn identity_and_zero_taps() {
        let x = window(&[0.5f32, -1.0, 2.0, 7.0, -3.0]);
        let mut f = FirFilter::new();
        f.setup(&[1.0], x.capacity()).unwrap();
        assert_eq!(f.filtered(&x).unwrap(), x.to_vec());

        f.setup(&[0.0; 5], x.capacity()).unwrap();
        assert_eq!(f.filtered(&x).unwrap(), vec![0.0; 5]);
    }

    #[test]
    fn moving_average_over_full_window() {
        let mut f = FirFilter::<f64>::new();
        f.setup(&[0.25; 4], 4).unwrap();
        let x = window(&[4.0, 8.0, 12.0, 16.0]);
        assert_eq!(f.latest_output(&x), Ok(10.0));
        assert_eq!(f.filtered(&x).unwrap(), vec![1.0, 3.0, 6.0, 10.0]);
    }

    #[test]
    fn wrapped_ring_matches_linear_window() {
        let mut ring = SlidingWindow::<f64>::new(6).unwrap();
        for v in 1..=9 {
            ring.push(v as f64);
        }
        // contents are [4, 5, 6, 7, 8, 9], split across the ring storage
        let linear = window(&[4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);

        let mut f = FirFilter::new();
        f.setup(&[1.0, 10.0, 100.0], 6).unwrap();
        // 1·7 + 10·8 + 100·9
        assert_eq!(f.latest_output(&ring), Ok(987.0));
        assert_eq!(f.filtered(&ring), f.filtered(&linear));
        assert_eq!(f.last_output(), 987.0);
        assert_eq!(ring.to_vec(), linear.to_vec());
    }
}
