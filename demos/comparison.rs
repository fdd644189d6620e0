/// Learns whether the first of two numbers is the larger one.
///
/// Architecture: 2 → 5 → 5 → 1 (sigmoid everywhere)
/// Learning rate 1, batch size 5, 100,000 random samples.
///
/// Run with:
///   cargo run --example comparison --release
use rand::Rng;
use sigma_nn::{Matrix, Network, NetworkOptionsUpdate, VecStream};

fn main() -> sigma_nn::Result<()> {
    let mut rng = rand::thread_rng();
    let mut network = Network::with_options(
        vec![2, 5, 5, 1],
        NetworkOptionsUpdate::default().learning_rate(1.0).batch_size(5),
    );

    let inputs: Vec<Matrix> = (0..100_000)
        .map(|_| Matrix::column(&[rng.gen(), rng.gen()]))
        .collect();
    let outputs: Vec<Matrix> = inputs
        .iter()
        .map(|m| Matrix::column(&[if m.data[0][0] > m.data[1][0] { 1.0 } else { 0.0 }]))
        .collect();

    let summary = network.learn(VecStream::new(inputs), VecStream::new(outputs))?;
    println!("trained on {} samples, mean loss {:.6}", summary.samples, summary.mean_loss);

    for pair in [[0.6, 0.45], [0.2, 0.8], [0.51, 0.5], [0.1, 0.9]] {
        let out = network.feed_forward(&Matrix::column(&pair))?;
        println!("{:?} -> {:.4}", pair, out.data[0][0]);
    }
    Ok(())
}
