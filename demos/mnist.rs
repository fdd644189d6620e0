/// MNIST digit classification with a 784 → 200 → 80 → 10 sigmoid network.
///
/// Trains for two epochs, doubling the batch size after each one, then
/// reports test accuracy.
///
/// Run with:
///   cargo run --example mnist --release -- <mnist-dir>
///
/// `<mnist-dir>` must contain the four IDX files
/// (train-images-idx3-ubyte, train-labels-idx1-ubyte,
///  t10k-images-idx3-ubyte, t10k-labels-idx1-ubyte).
use std::sync::mpsc;
use std::thread;

use sigma_nn::data::{open_mnist_test, open_mnist_training};
use sigma_nn::{evaluate, train_loop, EpochStats, Network, NetworkOptionsUpdate, TrainConfig};

fn main() -> sigma_nn::Result<()> {
    tracing_subscriber::fmt::init();

    let dir = std::env::args().nth(1).unwrap_or_else(|| "mnist_data".to_owned());
    let mut network = Network::new(vec![784, 200, 80, 10]);

    let (tx, rx) = mpsc::channel::<EpochStats>();
    let printer = thread::spawn(move || {
        for stats in rx {
            println!(
                "epoch {}/{}: mean loss {:.6}, batch size {}, {} ms",
                stats.epoch, stats.total_epochs, stats.mean_loss, stats.batch_size, stats.elapsed_ms
            );
        }
    });

    let mut config = TrainConfig::new(2);
    config.options = NetworkOptionsUpdate::default().learning_rate(0.01).batch_size(1);
    config.batch_growth = 2;
    config.progress_tx = Some(tx);

    train_loop(
        &mut network,
        |_| {
            let training = open_mnist_training(&dir)?;
            Ok((training.images, training.labels))
        },
        &config,
    )?;
    drop(config);
    if printer.join().is_err() {
        tracing::error!("progress printer thread panicked");
    }

    let test = open_mnist_test(&dir)?;
    let eval = evaluate(&network, test.images, test.labels)?;
    println!("test accuracy: {:.2}%", eval.accuracy * 100.0);
    Ok(())
}
