//! Construction-time settings for [`KnnClassifier`](crate::KnnClassifier)
//! and [`KMeansClustering`](crate::KMeansClustering).

use crate::error::{KnnError, Result};

/// Neighbor count used when none is given.
pub const DEFAULT_K: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KnnConfig {
    /// Number of neighbors that vote on each prediction.
    pub k: usize,
    /// Score batch queries on the rayon thread pool.
    pub parallel: bool,
}

impl Default for KnnConfig {
    fn default() -> Self {
        Self { k: DEFAULT_K, parallel: false }
    }
}

impl KnnConfig {
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(KnnError::InvalidArgument(
                "k must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Cluster count used when none is given.
pub const DEFAULT_CLUSTERS: usize = 3;
/// Upper bound on assignment/update rounds.
pub const DEFAULT_N_ITERS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KMeansConfig {
    /// Number of clusters.
    pub k: usize,
    /// Maximum number of assignment/update rounds.
    pub n_iters: usize,
    /// Fixed seed for centroid seeding; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self { k: DEFAULT_CLUSTERS, n_iters: DEFAULT_N_ITERS, seed: None }
    }
}

impl KMeansConfig {
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_n_iters(mut self, n_iters: usize) -> Self {
        self.n_iters = n_iters;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(KnnError::InvalidArgument(
                "number of clusters must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
