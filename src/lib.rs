//! # sigwin - Sliding-window signal analysis for Rust
//!
//! A small DSP library that keeps the most recent `N` samples of a stream and
//! analyses that window on demand: time-domain statistics, a one-sided real
//! FFT with lazily refreshed cache, and FIR filtering. Built for wearables and
//! MCUs first, so the core is `no_std` and only needs `alloc`.
//!
//! ## Features
//!
//! - **Fixed-capacity ring buffer** with O(1) push
//! - **Real FFT** of even-length windows (`N/2 + 1` bins), radix-2 for powers
//!   of two and Bluestein for every other length
//! - **Cached spectrum**: repeated spectral queries on an unchanged window
//!   run a single transform
//! - **Power views**: magnitudes, one-sided power, mean-squared power, PSD,
//!   band power
//! - **FIR filtering** aligned with the newest samples
//! - **Generic statistics** over `f32` and `f64` slices
//!
//! ## Cargo Features
//!
//! - `std` (default): implements `std::error::Error` for [`DspError`]
//! - `verbose-logging`: emits `log` records for capacity rounding, short
//!   FIR taps and spectrum recomputation
//! - `internal-tests`: enables the property-based unit tests
//!
//! ## Example
//!
//! ```
//! use sigwin::SignalBuffer;
//!
//! let mut buf = SignalBuffer::<f32>::new(16, true)?;
//! for x in [1.0, 4.0, 2.0, 5.0, 6.0, 7.0, -1.0, -8.0] {
//!     buf.push(x);
//! }
//! assert_eq!(buf.mean(), 1.0);
//!
//! let power = buf.average_band_power(0.0, 25.0, 100.0)?;
//! assert!(power > 0.0);
//!
//! buf.setup_fir_filter(&[0.5, 0.5])?;
//! assert_eq!(buf.latest_fir_output()?, -4.5);
//! # Ok::<(), sigwin::DspError>(())
//! ```
//!
//! Run the demos with:
//! ```bash
//! cargo run --example stream_analysis
//! cargo run --example verbose_logging --features verbose-logging
//! ```
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or https://www.apache.org/licenses/LICENSE-2.0)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or https://opensource.org/licenses/MIT)
//!
//! at your option.

#![no_std]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

/// Scalar trait and complex numbers
pub mod num;

/// Complex FFT kernel
///
/// Radix-2 and Bluestein transforms with cached twiddle tables.
pub mod fft;

/// Real-input FFT built on the complex kernel.
pub mod rfft;

pub mod error;

/// Statistics and elementwise helpers over real slices
pub mod vector;

/// Fixed-capacity sample window
pub mod window;

/// Cached one-sided spectrum of a window
pub mod spectrum;

/// FIR filtering of a window
pub mod fir;

pub mod config;

/// The analysis session tying window, spectrum and filter together
pub mod buffer;

pub use buffer::SignalBuffer;
pub use config::BufferConfig;
pub use error::DspError;
pub use fft::{FftError, FftPlanner};
pub use fir::FirFilter;
pub use num::{Complex, Complex32, Complex64, Float};
pub use spectrum::{CacheState, SpectralAnalyzer};
pub use window::SlidingWindow;
