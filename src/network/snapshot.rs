use std::fs::OpenOptions;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::options::NetworkOptions;

/// Self-contained copy of a network's full state.
///
/// Produced by [`Network::serialize`](super::Network::serialize) and consumed
/// by [`Network::load`](super::Network::load). Holds no references back into
/// the live network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedNetwork {
    pub layers: Vec<usize>,
    pub weights: Vec<Matrix>,
    pub biases: Vec<Matrix>,
    pub options: NetworkOptions,
}

impl SerializedNetwork {
    /// Writes the snapshot as pretty-printed JSON.
    ///
    /// Fails if `path` already exists; trained models are never overwritten.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = OpenOptions::new().write(true).create_new(true).open(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        info!(path = %path.display(), layers = ?self.layers, "saved model");
        Ok(())
    }

    /// Reads a snapshot previously written by `save_json`.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<SerializedNetwork> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let snapshot: SerializedNetwork = serde_json::from_reader(reader)?;
        info!(path = %path.display(), layers = ?snapshot.layers, "loaded model");
        Ok(snapshot)
    }
}
