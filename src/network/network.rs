use std::path::Path;

use rand::Rng;
use tracing::{debug, info};

use crate::error::{NetworkError, Result};
use crate::loss::mse::mean_squared_error;
use crate::math::matrix::Matrix;
use crate::network::gradient::{ExampleGradient, LearnSummary};
use crate::network::options::{NetworkOptions, NetworkOptionsUpdate};
use crate::network::snapshot::SerializedNetwork;
use crate::stream::SampleStream;

/// Fully connected sigmoid network.
///
/// `weights[i]` maps a column of height `layers[i]` to a column of height
/// `layers[i + 1]`, so it has `layers[i + 1]` rows and `layers[i]` columns;
/// `biases[i]` is a column of height `layers[i + 1]`.
///
/// Only [`Network::apply_batch`] writes to weights and biases. Read paths
/// (`feed_forward`, `serialize`) borrow `&self`; everything that mutates
/// borrows `&mut self`.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    layers: Vec<usize>,
    weights: Vec<Matrix>,
    biases: Vec<Matrix>,
    options: NetworkOptions,
}

impl Network {
    /// Fresh network with default options.
    pub fn new(layers: Vec<usize>) -> Network {
        Network::with_options(layers, NetworkOptionsUpdate::default())
    }

    /// Fresh network; `options` is overlaid on the defaults.
    pub fn with_options(layers: Vec<usize>, options: NetworkOptionsUpdate) -> Network {
        Network::with_rng(layers, options, &mut rand::thread_rng())
    }

    /// Fresh network drawing its initial weights from `rng`.
    ///
    /// Weights are standard-normal samples scaled by `1 / sqrt(fan_in)`,
    /// biases start at zero.
    pub fn with_rng<R: Rng + ?Sized>(
        layers: Vec<usize>,
        options: NetworkOptionsUpdate,
        rng: &mut R,
    ) -> Network {
        let weights = layers
            .windows(2)
            .map(|pair| {
                let (from, to) = (pair[0], pair[1]);
                Matrix::normal(to, from, 1.0 / (from as f64).sqrt(), rng)
            })
            .collect();
        let biases = layers.windows(2).map(|pair| Matrix::zeros(pair[1], 1)).collect();

        Network {
            layers,
            weights,
            biases,
            options: NetworkOptions::default().merged(options),
        }
    }

    /// Loads a network from a JSON model file written by
    /// [`SerializedNetwork::save_json`].
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Network> {
        Ok(Network::from(SerializedNetwork::load_json(path)?))
    }

    pub fn layers(&self) -> &[usize] {
        &self.layers
    }

    pub fn weights(&self) -> &[Matrix] {
        &self.weights
    }

    pub fn biases(&self) -> &[Matrix] {
        &self.biases
    }

    pub fn options(&self) -> &NetworkOptions {
        &self.options
    }

    /// Forward pass. `input` must be a column of height `layers[0]`; the
    /// result is a column of height `layers[last]` with every cell in (0, 1).
    pub fn feed_forward(&self, input: &Matrix) -> Result<Matrix> {
        self.weights
            .iter()
            .zip(&self.biases)
            .try_fold(input.clone(), |a, (w, b)| -> Result<Matrix> {
                Ok(w.multiply(&a)?.add(b)?.activate())
            })
    }

    /// Loss of a single example, without touching the network.
    pub fn error_of(&self, input: &Matrix, expected: &Matrix) -> Result<f64> {
        let output = self.feed_forward(input)?;
        let error = expected.add(&output.scalar_multiply(-1.0))?;
        Ok(mean_squared_error(&error))
    }

    /// Back-propagates one example and returns its gradients.
    ///
    /// The error is taken as `expected - output`, so the returned gradients
    /// point downhill on the squared error and are *added* to the weights.
    pub fn learn_example(&self, input: &Matrix, expected: &Matrix) -> Result<ExampleGradient> {
        let depth = self.weights.len();
        let mut layer_inputs = Vec::with_capacity(depth);
        let mut pre_activations = Vec::with_capacity(depth);

        let mut activation = input.clone();
        for (w, b) in self.weights.iter().zip(&self.biases) {
            let z = w.multiply(&activation)?.add(b)?;
            let next = z.activate();
            pre_activations.push(z);
            layer_inputs.push(activation);
            activation = next;
        }

        let mut error = expected.add(&activation.scalar_multiply(-1.0))?;
        let loss = mean_squared_error(&error);

        let mut weights = Vec::with_capacity(depth);
        let mut biases = Vec::with_capacity(depth);
        for layer in (0..depth).rev() {
            let delta = error.elementwise_multiply(&pre_activations[layer].activate_derivative())?;
            weights.push(delta.multiply(&layer_inputs[layer].transpose())?);
            error = self.weights[layer].transpose().multiply(&delta)?;
            biases.push(delta);
        }
        weights.reverse();
        biases.reverse();

        Ok(ExampleGradient { weights, biases, loss })
    }

    /// Applies every buffered gradient, each scaled by its own loss times the
    /// learning rate. Gradients are applied one after another, not averaged.
    ///
    /// Shapes are checked before anything is written, so a mismatched
    /// gradient leaves the network untouched.
    pub fn apply_batch(&mut self, batch: &[ExampleGradient]) -> Result<()> {
        for gradient in batch {
            if gradient.weights.len() != self.weights.len()
                || gradient.biases.len() != self.biases.len()
            {
                return Err(NetworkError::LayerCountMismatch {
                    expected: self.weights.len(),
                    weights: gradient.weights.len(),
                    biases: gradient.biases.len(),
                });
            }
            for (w, g) in self.weights.iter().zip(&gradient.weights) {
                ensure_same_shape(w, g)?;
            }
            for (b, g) in self.biases.iter().zip(&gradient.biases) {
                ensure_same_shape(b, g)?;
            }
        }

        let rate = self.options.learning_rate;
        for gradient in batch {
            let step = gradient.loss * rate;
            for (w, g) in self.weights.iter_mut().zip(&gradient.weights) {
                w.add_scaled(g, step)?;
            }
            for (b, g) in self.biases.iter_mut().zip(&gradient.biases) {
                b.add_scaled(g, step)?;
            }
        }
        Ok(())
    }

    /// Trains on two streams pulled in lockstep until either runs dry.
    ///
    /// A batch is flushed whenever the 0-based sample index is a multiple of
    /// `batch_size`, which includes index 0, and once more at the end for any
    /// leftover gradients. A shape error aborts the whole call.
    pub fn learn<I, O>(&mut self, mut inputs: I, mut outputs: O) -> Result<LearnSummary>
    where
        I: SampleStream,
        O: SampleStream,
    {
        let batch_size = self.options.batch_size;
        let mut summary = LearnSummary::default();
        let mut buffer: Vec<ExampleGradient> = Vec::with_capacity(batch_size.max(1));
        let mut total_loss = 0.0;

        debug!(
            inputs = inputs.len(),
            outputs = outputs.len(),
            batch_size,
            learning_rate = self.options.learning_rate,
            "learning"
        );

        let mut index = 0usize;
        while let (Some(input), Some(expected)) = (inputs.next_sample(), outputs.next_sample()) {
            let gradient = self.learn_example(&input, &expected)?;
            total_loss += gradient.loss;
            buffer.push(gradient);
            summary.samples += 1;

            if index.checked_rem(batch_size) == Some(0) {
                self.flush(&mut buffer, &mut summary, total_loss)?;
            }
            index += 1;
        }
        if !buffer.is_empty() {
            self.flush(&mut buffer, &mut summary, total_loss)?;
        }

        if summary.samples > 0 {
            summary.mean_loss = total_loss / summary.samples as f64;
        }
        debug!(
            samples = summary.samples,
            batches = summary.batches.len(),
            mean_loss = summary.mean_loss,
            "learning finished"
        );
        Ok(summary)
    }

    fn flush(
        &mut self,
        buffer: &mut Vec<ExampleGradient>,
        summary: &mut LearnSummary,
        total_loss: f64,
    ) -> Result<()> {
        self.apply_batch(buffer)?;
        summary.batches.push(buffer.len());
        if self.options.progress {
            info!(
                samples = summary.samples,
                batch = buffer.len(),
                mean_loss = total_loss / summary.samples as f64,
                "applied batch"
            );
        }
        buffer.clear();
        Ok(())
    }

    /// Overlays the given fields onto the current options.
    pub fn update_options(&mut self, update: NetworkOptionsUpdate) {
        self.options = self.options.merged(update);
    }

    /// Independent snapshot of layers, weights, biases and options.
    pub fn serialize(&self) -> SerializedNetwork {
        SerializedNetwork {
            layers: self.layers.clone(),
            weights: self.weights.clone(),
            biases: self.biases.clone(),
            options: self.options.clone(),
        }
    }

    /// Replaces the whole state with `snapshot`. The snapshot is trusted:
    /// no shape validation happens here.
    pub fn load(&mut self, snapshot: SerializedNetwork) {
        let SerializedNetwork { layers, weights, biases, options } = snapshot;
        self.layers = layers;
        self.weights = weights;
        self.biases = biases;
        self.options = options;
    }
}

impl From<SerializedNetwork> for Network {
    fn from(snapshot: SerializedNetwork) -> Self {
        let mut network = Network::new(Vec::new());
        network.load(snapshot);
        network
    }
}

fn ensure_same_shape(target: &Matrix, gradient: &Matrix) -> Result<()> {
    if target.shape() != gradient.shape() {
        return Err(NetworkError::ShapeMismatch {
            op: "apply_batch",
            left: target.shape(),
            right: gradient.shape(),
        });
    }
    Ok(())
}
