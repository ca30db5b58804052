//! Run-time construction options for [`SignalBuffer`](crate::buffer::SignalBuffer).

use crate::error::DspError;
use crate::num::Float;

/// Construction parameters of a signal buffer.
///
/// ```
/// use sigwin::BufferConfig;
///
/// let config = BufferConfig::<f32>::new(128).fft(false).fill(1.0);
/// assert_eq!(config.capacity, 128);
/// assert!(!config.fft_enabled);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferConfig<T: Float> {
    /// Requested number of samples in the window. Rounded up to the next
    /// even value when `fft_enabled` is set.
    pub capacity: usize,
    /// Whether spectral operations are available.
    pub fft_enabled: bool,
    /// Initial value of every slot. `clear` always resets to zero.
    pub fill: T,
}

impl<T: Float> BufferConfig<T> {
    /// FFT enabled, zero fill.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            fft_enabled: true,
            fill: T::zero(),
        }
    }

    pub fn fft(mut self, enabled: bool) -> Self {
        self.fft_enabled = enabled;
        self
    }

    pub fn fill(mut self, value: T) -> Self {
        self.fill = value;
        self
    }

    /// Capacity the buffer will actually have once odd sizes are rounded
    /// up for the real FFT.
    ///
    /// Fails with [`DspError::InvalidSize`] when the rounded value does not
    /// fit in `usize`.
    pub fn effective_capacity(&self) -> Result<usize, DspError> {
        if self.fft_enabled && self.capacity % 2 == 1 {
            self.capacity.checked_add(1).ok_or(DspError::InvalidSize)
        } else {
            Ok(self.capacity)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_rounding() {
        let c = BufferConfig::<f64>::new(7);
        assert!(c.fft_enabled);
        assert_eq!(c.fill, 0.0);
        assert_eq!(c.effective_capacity(), Ok(8));
        assert_eq!(c.fft(false).effective_capacity(), Ok(7));
        assert_eq!(BufferConfig::<f32>::new(0).effective_capacity(), Ok(0));
    }

    #[test]
    fn rounding_past_usize_max_fails() {
        let c = BufferConfig::<f32>::new(usize::MAX);
        assert_eq!(c.effective_capacity(), Err(DspError::InvalidSize));
        assert_eq!(c.fft(false).effective_capacity(), Ok(usize::MAX));
    }
}
