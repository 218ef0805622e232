//! Error types shared across the crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong building, running, training, or
/// persisting a network.
#[derive(Debug, Error)]
pub enum Error {
    /// A topology or persisted record described a network with no layers.
    #[error("network must contain at least one layer")]
    EmptyNetwork,

    /// A layer (or the input) was declared with zero neurons. Index 0 is
    /// the network input; layer `i` is the `i`th built layer.
    #[error("layer {index} has zero width")]
    ZeroWidth { index: usize },

    /// A vector's length does not match the width the network expects.
    #[error("{what}: expected length {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A persisted layer record is internally inconsistent or does not
    /// chain onto its neighbor.
    #[error("layer record {index} is malformed: {reason}")]
    MalformedRecord { index: usize, reason: String },

    /// Reading or writing a model file failed.
    #[error("model file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A model file could not be encoded or decoded, including any record
    /// naming an unknown activation function.
    #[error("model format error: {0}")]
    Format(#[from] serde_json::Error),
}
