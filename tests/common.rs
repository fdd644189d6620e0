#![allow(dead_code)]

use rand::{rngs::StdRng, Rng, SeedableRng};
use sigma_nn::{Matrix, SampleStream};

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// `n` random 2-vectors labeled 1 when the first component is larger.
pub fn comparison_data(n: usize, rng: &mut StdRng) -> (Vec<Matrix>, Vec<Matrix>) {
    let inputs: Vec<Matrix> = (0..n)
        .map(|_| Matrix::column(&[rng.gen::<f64>(), rng.gen::<f64>()]))
        .collect();
    let outputs = inputs
        .iter()
        .map(|m| Matrix::column(&[if m.data[0][0] > m.data[1][0] { 1.0 } else { 0.0 }]))
        .collect();
    (inputs, outputs)
}

/// Stream that records how often it was pulled.
pub struct CountingStream {
    samples: Vec<Matrix>,
    length: usize,
    pub pulls: usize,
}

impl CountingStream {
    pub fn new(samples: Vec<Matrix>) -> Self {
        let length = samples.len();
        CountingStream { samples, length, pulls: 0 }
    }
}

impl SampleStream for CountingStream {
    fn next_sample(&mut self) -> Option<Matrix> {
        if self.pulls >= self.length {
            return None;
        }
        let sample = self.samples[self.pulls].clone();
        self.pulls += 1;
        Some(sample)
    }

    fn len(&self) -> usize {
        self.length
    }

    fn limit(&mut self, limit: usize) {
        self.length = self.length.min(limit);
    }
}
