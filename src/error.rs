//! Error types for the KNN classifier and its collaborators.

use thiserror::Error;

/// Result type for classifier, metric and dataset operations.
pub type Result<T> = std::result::Result<T, KnnError>;

/// Errors raised by fitting, predicting, scoring and generating data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KnnError {
    /// Feature lengths disagree, or two sequences that must be paired differ in length.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A prediction was requested before any successful `fit`.
    #[error("classifier is not fitted, call fit() before predicting")]
    UnfittedModel,

    /// `k` is zero or larger than the number of usable training points.
    #[error("invalid neighbor count k={k} for {n_samples} training samples")]
    InvalidNeighborCount { k: usize, n_samples: usize },

    /// A metric or grid was asked to work on zero samples.
    #[error("input contains no samples")]
    EmptyInput,

    /// A held-out index does not address a training point.
    #[error("index {index} out of range for {len} training samples")]
    IndexOutOfRange { index: usize, len: usize },

    /// Invalid argument to a generator, grid or curve.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
