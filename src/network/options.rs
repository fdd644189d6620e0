use serde::{Deserialize, Serialize};

/// Training hyperparameters carried by a [`Network`](super::Network).
///
/// Field names serialize in camelCase (`learningRate`, `batchSize`) so saved
/// models stay readable by the JSON front ends that consume them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkOptions {
    /// Scale applied to every loss-weighted gradient step.
    pub learning_rate: f64,
    /// Number of examples buffered between weight updates.
    pub batch_size: usize,
    /// Log each applied batch at `info` level. Advisory only.
    #[serde(default)]
    pub progress: bool,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        NetworkOptions {
            learning_rate: 1.0,
            batch_size: 1,
            progress: false,
        }
    }
}

/// Partial options; `None` fields keep their current value when merged.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NetworkOptionsUpdate {
    pub learning_rate: Option<f64>,
    pub batch_size: Option<usize>,
    pub progress: Option<bool>,
}

impl NetworkOptionsUpdate {
    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = Some(learning_rate);
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    pub fn progress(mut self, progress: bool) -> Self {
        self.progress = Some(progress);
        self
    }
}

impl NetworkOptions {
    /// Field-wise overlay of `update` onto `self`.
    pub fn merged(&self, update: NetworkOptionsUpdate) -> NetworkOptions {
        NetworkOptions {
            learning_rate: update.learning_rate.unwrap_or(self.learning_rate),
            batch_size: update.batch_size.unwrap_or(self.batch_size),
            progress: update.progress.unwrap_or(self.progress),
        }
    }
}
