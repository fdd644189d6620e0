pub mod gradient;
pub mod network;
pub mod options;
pub mod snapshot;

pub use gradient::{ExampleGradient, LearnSummary};
pub use network::Network;
pub use options::{NetworkOptions, NetworkOptionsUpdate};
pub use snapshot::SerializedNetwork;
