//! Pull-based sample supply for training and evaluation.
//!
//! A [`SampleStream`] hands out one [`Matrix`] per call until it runs dry.
//! Its logical length is known up front and may be capped with
//! [`SampleStream::limit`] at any point before iteration finishes.

use crate::math::matrix::Matrix;

pub trait SampleStream {
    /// Next sample, or `None` once the stream is exhausted.
    fn next_sample(&mut self) -> Option<Matrix>;

    /// Logical length: the total number of samples this stream will ever
    /// yield, counting those already handed out.
    fn len(&self) -> usize;

    /// Truncates the logical length to `limit`. Never extends it.
    fn limit(&mut self, limit: usize);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: SampleStream + ?Sized> SampleStream for &mut S {
    fn next_sample(&mut self) -> Option<Matrix> {
        (**self).next_sample()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn limit(&mut self, limit: usize) {
        (**self).limit(limit)
    }
}

impl<S: SampleStream + ?Sized> SampleStream for Box<S> {
    fn next_sample(&mut self) -> Option<Matrix> {
        (**self).next_sample()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn limit(&mut self, limit: usize) {
        (**self).limit(limit)
    }
}

/// In-memory stream over an owned list of samples.
#[derive(Debug, Clone, Default)]
pub struct VecStream {
    samples: Vec<Matrix>,
    length: usize,
    position: usize,
}

impl VecStream {
    pub fn new(samples: Vec<Matrix>) -> VecStream {
        let length = samples.len();
        VecStream { samples, length, position: 0 }
    }

    /// Samples not yet handed out.
    pub fn remaining(&self) -> usize {
        self.length.saturating_sub(self.position)
    }
}

impl From<Vec<Matrix>> for VecStream {
    fn from(samples: Vec<Matrix>) -> Self {
        VecStream::new(samples)
    }
}

impl SampleStream for VecStream {
    fn next_sample(&mut self) -> Option<Matrix> {
        if self.position >= self.length {
            return None;
        }
        let sample = std::mem::take(&mut self.samples[self.position]);
        self.position += 1;
        Some(sample)
    }

    fn len(&self) -> usize {
        self.length
    }

    fn limit(&mut self, limit: usize) {
        if limit < self.length {
            self.length = limit;
        }
    }
}
