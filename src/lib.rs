//! sigma-nn: a fully connected sigmoid network trained by hand-written
//! back-propagation over dense `f64` matrices.
//!
//! ```no_run
//! use sigma_nn::{Matrix, Network, NetworkOptionsUpdate, VecStream};
//!
//! let mut network = Network::with_options(
//!     vec![2, 5, 5, 1],
//!     NetworkOptionsUpdate::default().batch_size(5),
//! );
//! let inputs = vec![Matrix::column(&[0.6, 0.45]), Matrix::column(&[0.2, 0.8])];
//! let outputs = vec![Matrix::column(&[1.0]), Matrix::column(&[0.0])];
//! network.learn(VecStream::new(inputs), VecStream::new(outputs))?;
//!
//! let score = network.feed_forward(&Matrix::column(&[0.7, 0.1]))?;
//! # Ok::<(), sigma_nn::NetworkError>(())
//! ```

pub mod activation;
pub mod data;
pub mod error;
pub mod loss;
pub mod math;
pub mod network;
pub mod stream;
pub mod train;

// Convenience re-exports
pub use error::{NetworkError, Result};
pub use math::matrix::Matrix;
pub use network::{ExampleGradient, LearnSummary, Network, NetworkOptions, NetworkOptionsUpdate, SerializedNetwork};
pub use stream::{SampleStream, VecStream};
pub use train::{evaluate, train_loop, EpochStats, Evaluation, TrainConfig};
