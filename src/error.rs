//! Error type shared by the bounded heap, the classifier and k-means.

use thiserror::Error;

/// Errors raised by the k-NN and k-means models.
///
/// None of these are transient: each one is a deterministic function of the
/// arguments the caller passed in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KnnError {
    /// A capacity or neighbor count of zero was supplied.
    #[error("InvalidArgument: {0}")]
    InvalidArgument(String),

    /// `insert` was called on a heap that already holds `capacity` elements.
    #[error("CapacityExceeded: bounded heap is already full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },

    /// `remove_max` or `peek_max` was called on an empty heap.
    #[error("EmptyQueue: bounded heap is empty")]
    EmptyQueue,

    /// Prediction was requested before any training point was fitted.
    #[error("EmptyTrainingSet: cannot predict without training data, call fit() first")]
    EmptyTrainingSet,

    /// A model was queried before `fit` produced its state.
    #[error("NotFitted: call fit() before predicting")]
    NotFitted,

    /// `fit` received a different number of vectors and labels.
    #[error("LengthMismatch: {vectors} training vectors but {labels} labels")]
    LengthMismatch { vectors: usize, labels: usize },
}

pub type Result<T> = std::result::Result<T, KnnError>;
