use serde::{Deserialize, Serialize};

/// Statistics for one completed epoch of `train_loop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    pub total_epochs: usize,
    /// Examples consumed this epoch.
    pub samples: usize,
    /// Number of weight updates applied.
    pub batches: usize,
    /// Batch size in effect during this epoch.
    pub batch_size: usize,
    /// Mean per-example loss over the epoch.
    pub mean_loss: f64,
    /// Wall-clock duration of the epoch in milliseconds.
    pub elapsed_ms: u64,
}
