use std::sync::mpsc;
use std::sync::{atomic::AtomicBool, Arc};

use crate::network::options::NetworkOptionsUpdate;
use crate::train::epoch_stats::EpochStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`       — number of full passes over freshly opened streams
/// - `options`      — overlaid on the network's options before the first epoch
/// - `batch_growth` — factor the batch size is multiplied by after every
///                    epoch; `1` keeps it fixed
/// - `limit`        — optional cap on samples per epoch
/// - `progress_tx`  — optional channel; one `EpochStats` is sent per
///                    completed epoch. If the receiver is dropped the loop
///                    stops early.
/// - `stop_flag`    — optional atomic flag checked between epochs
pub struct TrainConfig {
    pub epochs: usize,
    pub options: NetworkOptionsUpdate,
    pub batch_growth: usize,
    pub limit: Option<usize>,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` that keeps the network's options, grows
    /// nothing and reports nowhere.
    pub fn new(epochs: usize) -> Self {
        TrainConfig {
            epochs,
            options: NetworkOptionsUpdate::default(),
            batch_growth: 1,
            limit: None,
            progress_tx: None,
            stop_flag: None,
        }
    }
}
