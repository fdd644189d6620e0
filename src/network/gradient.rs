use crate::math::matrix::Matrix;

/// Gradients of one training example, one entry per layer transition.
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleGradient {
    pub weights: Vec<Matrix>,
    pub biases: Vec<Matrix>,
    /// Mean-squared error of the example; also the weight its gradient
    /// carries when the batch is applied.
    pub loss: f64,
}

/// What a call to [`Network::learn`](super::Network::learn) did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LearnSummary {
    /// Examples consumed from the streams.
    pub samples: usize,
    /// Size of every applied batch, in order.
    pub batches: Vec<usize>,
    /// Mean per-example loss, measured before each example's own update.
    pub mean_loss: f64,
}
