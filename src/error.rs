use thiserror::Error;

/// Everything that can go wrong inside sigma-nn.
///
/// Matrix operations only ever produce `ShapeMismatch` or `RaggedRows`; the
/// remaining variants come from the collaborators around the numeric core
/// (dataset parsing, model files, image decoding).
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Operand shapes violate the algebraic precondition of `op`.
    /// Shapes are reported as `(rows, cols)`.
    #[error("shape mismatch in {op}: left is {left:?}, right is {right:?}")]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// A row's length differs from the matrix's column count, or the row
    /// count differs from `rows`.
    #[error("ragged matrix: row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A gradient does not carry one weight and one bias matrix per layer
    /// transition of the network it is applied to.
    #[error(
        "gradient covers {weights} weight and {biases} bias layers, network has {expected} transitions"
    )]
    LayerCountMismatch {
        expected: usize,
        weights: usize,
        biases: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed IDX dataset bytes.
    #[error("IDX format error: {0}")]
    Idx(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
