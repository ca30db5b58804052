//! Fixed-capacity FIFO of the most recent samples of a stream.

use alloc::borrow::Cow;
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt;

use crate::error::DspError;
use crate::num::Float;

/// Ring buffer holding exactly `capacity` samples, oldest first.
///
/// The window is always full: it starts out filled with a constant and every
/// [`push`](SlidingWindow::push) evicts the oldest sample.
#[derive(Clone, Debug, PartialEq)]
pub struct SlidingWindow<T: Float> {
    samples: VecDeque<T>,
}

impl<T: Float> SlidingWindow<T> {
    /// Create a zero-filled window.
    pub fn new(capacity: usize) -> Result<Self, DspError> {
        Self::with_fill(capacity, T::zero())
    }

    /// Create a window with every slot set to `fill`.
    pub fn with_fill(capacity: usize, fill: T) -> Result<Self, DspError> {
        if capacity == 0 {
            return Err(DspError::InvalidSize);
        }
        let mut samples = VecDeque::with_capacity(capacity);
        samples.resize(capacity, fill);
        Ok(Self { samples })
    }

    /// Create a window holding `samples`, oldest-first; capacity is their
    /// count.
    pub fn from_slice(samples: &[T]) -> Result<Self, DspError> {
        if samples.is_empty() {
            return Err(DspError::InvalidSize);
        }
        Ok(Self {
            samples: samples.iter().copied().collect(),
        })
    }

    /// Number of samples held; fixed at construction.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Append `value` as the newest sample and drop the oldest.
    #[inline]
    pub fn push(&mut self, value: T) {
        self.samples.pop_front();
        self.samples.push_back(value);
    }

    /// Sample at `index`, where `0` is the oldest.
    pub fn at(&self, index: usize) -> Result<T, DspError> {
        self.samples
            .get(index)
            .copied()
            .ok_or(DspError::IndexOutOfRange {
                index,
                len: self.capacity(),
            })
    }

    /// Most recently pushed sample.
    pub fn latest(&self) -> T {
        self.samples[self.capacity() - 1]
    }

    /// Largest sample.
    pub fn max(&self) -> T {
        self.iter().fold(self.latest(), |m, x| if x > m { x } else { m })
    }

    /// Smallest sample.
    pub fn min(&self) -> T {
        self.iter().fold(self.latest(), |m, x| if x < m { x } else { m })
    }

    /// Reset every slot to zero.
    pub fn clear(&mut self) {
        for s in self.samples.iter_mut() {
            *s = T::zero();
        }
    }

    /// Samples oldest-first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = T> + ExactSizeIterator + '_ {
        self.samples.iter().copied()
    }

    /// The two ring segments, which concatenated give the samples oldest-first.
    pub fn as_slices(&self) -> (&[T], &[T]) {
        self.samples.as_slices()
    }

    /// Rotate the storage so that all samples sit in one slice, oldest-first.
    ///
    /// Contents are unchanged; only the internal layout moves.
    pub fn make_contiguous(&mut self) -> &[T] {
        self.samples.make_contiguous()
    }

    /// Samples oldest-first as one slice, borrowed when the ring happens to be
    /// unwrapped and copied otherwise.
    pub fn contiguous(&self) -> Cow<'_, [T]> {
        match self.samples.as_slices() {
            (front, []) => Cow::Borrowed(front),
            _ => Cow::Owned(self.to_vec()),
        }
    }

    /// Owned snapshot of the samples, oldest-first.
    pub fn to_vec(&self) -> Vec<T> {
        self.samples.iter().copied().collect()
    }

    /// Copy the samples oldest-first into `out`, which must be exactly
    /// `capacity` long.
    pub fn copy_into(&self, out: &mut [T]) -> Result<(), DspError> {
        if out.len() != self.capacity() {
            return Err(DspError::LengthMismatch {
                expected: self.capacity(),
                actual: out.len(),
            });
        }
        let (front, back) = self.samples.as_slices();
        out[..front.len()].copy_from_slice(front);
        out[front.len()..].copy_from_slice(back);
        Ok(())
    }
}

impl<T: Float> fmt::Display for SlidingWindow<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SlidingWindow size: {}", self.capacity())?;
        for (i, v) in self.samples.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            fmt::Display::fmt(v, f)?;
        }
        Ok(())
    }
}


#[cfg(all(feature = "internal-tests", test))]
mod coverage_tests {
    use super::*;
    use proptest::prop_assert_eq;
    use proptest::proptest;

    proptest! {
        #[test]
        fn prop_window_keeps_last_pushes(capacity in 1usize..32, ref pushed in proptest::collection::vec(-1000.0f32..1000.0, 0..96)) {
            let mut w = SlidingWindow::new(capacity).unwrap();
            for &x in pushed {
                w.push(x);
            }
            let kept = pushed.len().min(capacity);
            let mut expected = alloc::vec![0.0f32; capacity - kept];
            expected.extend_from_slice(&pushed[pushed.len() - kept..]);
            prop_assert_eq!(w.capacity(), capacity);
            prop_assert_eq!(w.to_vec(), expected);
        }
    }
}
