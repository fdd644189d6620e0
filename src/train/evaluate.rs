use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::loss::mse::mean_squared_error;
use crate::network::network::Network;
use crate::stream::SampleStream;

/// Classification results over a labeled stream pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub samples: usize,
    pub correct: usize,
    /// `correct / samples`, or 0 for an empty run.
    pub accuracy: f64,
    pub mean_loss: f64,
}

/// Runs inference over both streams in lockstep and counts how often the
/// highest-scoring output row matches the label's highest row.
pub fn evaluate<I, O>(network: &Network, mut inputs: I, mut labels: O) -> Result<Evaluation>
where
    I: SampleStream,
    O: SampleStream,
{
    let mut samples = 0usize;
    let mut correct = 0usize;
    let mut total_loss = 0.0;

    while let (Some(input), Some(label)) = (inputs.next_sample(), labels.next_sample()) {
        let output = network.feed_forward(&input)?;
        let error = label.add(&output.scalar_multiply(-1.0))?;
        total_loss += mean_squared_error(&error);
        if output.argmax().is_some() && output.argmax() == label.argmax() {
            correct += 1;
        }
        samples += 1;
    }

    let (accuracy, mean_loss) = if samples == 0 {
        (0.0, 0.0)
    } else {
        (correct as f64 / samples as f64, total_loss / samples as f64)
    };
    debug!(samples, correct, accuracy, "evaluated");
    Ok(Evaluation { samples, correct, accuracy, mean_loss })
}
