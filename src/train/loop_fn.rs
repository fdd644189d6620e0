use std::sync::atomic::Ordering;
use std::time::Instant;

use tracing::{info, warn};

use crate::error::Result;
use crate::network::network::Network;
use crate::network::options::NetworkOptionsUpdate;
use crate::stream::SampleStream;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs and returns the statistics of
/// every completed epoch.
///
/// # Arguments
/// - `network`      — modified in place
/// - `open_streams` — called with the 1-based epoch number; returns a fresh
///                    `(inputs, expected_outputs)` pair for that epoch
/// - `config`       — epochs, option overrides, batch growth, limit, optional
///                    progress channel, optional stop flag
///
/// # Early termination
/// The loop breaks between epochs if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// A single epoch always runs to stream exhaustion. Any error aborts the run.
pub fn train_loop<F, I, O>(
    network: &mut Network,
    mut open_streams: F,
    config: &TrainConfig,
) -> Result<Vec<EpochStats>>
where
    F: FnMut(usize) -> Result<(I, O)>,
    I: SampleStream,
    O: SampleStream,
{
    network.update_options(config.options);
    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            break;
        }

        let t_start = Instant::now();
        let (mut inputs, mut outputs) = open_streams(epoch)?;
        if let Some(limit) = config.limit {
            inputs.limit(limit);
            outputs.limit(limit);
        }
        if inputs.len() != outputs.len() {
            warn!(
                inputs = inputs.len(),
                outputs = outputs.len(),
                "stream lengths differ; training stops at the shorter one"
            );
        }

        let batch_size = network.options().batch_size;
        let summary = network.learn(inputs, outputs)?;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            samples: summary.samples,
            batches: summary.batches.len(),
            batch_size,
            mean_loss: summary.mean_loss,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        info!(
            epoch,
            total = config.epochs,
            samples = stats.samples,
            batch_size,
            mean_loss = stats.mean_loss,
            elapsed_ms = stats.elapsed_ms,
            "epoch finished"
        );
        history.push(stats.clone());

        if config.batch_growth > 1 {
            let grown = batch_size.saturating_mul(config.batch_growth);
            network.update_options(NetworkOptionsUpdate::default().batch_size(grown));
        }

        if let Some(ref tx) = config.progress_tx {
            if tx.send(stats).is_err() {
                break;
            }
        }
    }

    Ok(history)
}

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .map_or(false, |flag| flag.load(Ordering::Relaxed))
}
