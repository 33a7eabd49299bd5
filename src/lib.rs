//! k-nearest-neighbor classification with a bounded max-heap.
//!
//! Each prediction streams the whole training set through a fixed-capacity
//! max-heap of (distance, label) candidates, keeping the `k` closest in a
//! single pass, then takes a plurality vote among them.
//!
//! [`KMeansClustering`] groups unlabeled points around `k` centroids using the
//! same zero-padded Euclidean distance.

pub mod common_types;
pub mod config;
pub mod error;
pub mod kmeans;
pub mod knn;
#[cfg(feature = "python")]
mod python;

pub use common_types::DataPoint;
pub use config::{KMeansConfig, KnnConfig};
pub use error::{KnnError, Result};
pub use kmeans::KMeansClustering;
pub use knn::heap_utils::{BoundedMaxHeap, Candidate};
pub use knn::{KnnClassifier, euclidean_distance};
