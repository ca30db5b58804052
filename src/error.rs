//! Error type shared by the window, statistics, spectral and FIR stages.

use core::fmt;

use crate::fft::FftError;

/// Errors reported by buffer construction and analysis calls.
///
/// Every variant is a deterministic precondition failure: retrying the same
/// call on the same window yields the same error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DspError {
    /// Window capacity must be at least one sample.
    InvalidSize,

    /// Sample index outside `[0, len)`.
    IndexOutOfRange { index: usize, len: usize },

    /// Two sequences that must share a length do not.
    LengthMismatch { expected: usize, actual: usize },

    /// More FIR taps than samples held by the window.
    TapsTooLong { taps: usize, capacity: usize },

    /// Spectral operation on a buffer constructed without FFT support.
    FftUnsupported,

    /// Frequency band outside `0 <= from <= to <= fs/2`.
    InvalidBand,

    /// Normalization of a zero-norm or zero-variance sequence.
    DegenerateVector,

    /// Sampling rate must be positive and finite.
    InvalidSamplingRate,

    /// FIR setup with an empty coefficient list.
    EmptyTaps,

    /// FIR output requested before any taps were set.
    FilterNotConfigured,

    /// Failure inside the FFT kernel.
    Fft(FftError),
}

impl fmt::Display for DspError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DspError::InvalidSize => write!(f, "Invalid size: capacity must be positive"),
            DspError::IndexOutOfRange { index, len } => {
                write!(f, "Index out of range: {} not in [0, {})", index, len)
            }
            DspError::LengthMismatch { expected, actual } => {
                write!(f, "Length mismatch: expected {}, got {}", expected, actual)
            }
            DspError::TapsTooLong { taps, capacity } => write!(
                f,
                "Taps too long: {} taps for a window of {} samples",
                taps, capacity
            ),
            DspError::FftUnsupported => write!(f, "FFT is not supported on this buffer"),
            DspError::InvalidBand => {
                write!(f, "Invalid band: expected 0 <= from <= to <= fs/2")
            }
            DspError::DegenerateVector => {
                write!(f, "Degenerate vector: zero norm or zero variance")
            }
            DspError::InvalidSamplingRate => {
                write!(f, "Invalid sampling rate: must be positive and finite")
            }
            DspError::EmptyTaps => write!(f, "FIR filter needs at least one tap"),
            DspError::FilterNotConfigured => write!(f, "FIR filter has no taps"),
            DspError::Fft(err) => write!(f, "FFT error: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DspError {}

impl From<FftError> for DspError {
    fn from(err: FftError) -> Self {
        DspError::Fft(err)
    }
}
