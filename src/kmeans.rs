//! K-means clustering with randomly seeded centroids.
//!
//! Centroids start at `k` distinct, randomly chosen training points. Each
//! round assigns every point to its nearest centroid (Euclidean, zero-padded
//! like [`euclidean_distance`]) and moves each centroid to the mean of its
//! members. A centroid whose cluster came out empty is halved, so it drifts
//! toward the origin instead of staying put.

use log::{debug, warn};
use num_traits::{AsPrimitive, Float};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::config::KMeansConfig;
use crate::error::{KnnError, Result};
use crate::knn::euclidean_distance;

/// Picks `k` distinct indices out of `0..n`.
pub(crate) fn seed_indices<R: Rng + ?Sized>(rng: &mut R, n: usize, k: usize) -> Vec<usize> {
    index::sample(rng, n, k).into_vec()
}

/// Folds `point` into `avg`, where `avg` already holds the mean of `count - 1` vectors.
///
/// Coordinates missing from `point` count as zero.
fn fold_into_mean(avg: &mut [f64], point: &[f64], count: usize) {
    let prev = (count - 1) as f64;
    let total = count as f64;
    for (i, slot) in avg.iter_mut().enumerate() {
        let value = point.get(i).copied().unwrap_or(0.0);
        *slot = (*slot * prev + value) / total;
    }
}

/// Index of the centroid closest to `point`, or `None` if no distance is below `f64::MAX`.
fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> Option<usize> {
    let mut closest = None;
    let mut min_dist = f64::MAX;
    for (idx, centroid) in centroids.iter().enumerate() {
        let dist = euclidean_distance(point, centroid);
        if dist < min_dist {
            min_dist = dist;
            closest = Some(idx);
        }
    }
    closest
}

#[derive(Debug, Clone)]
pub struct KMeansClustering {
    config: KMeansConfig,
    centroids: Vec<Vec<f64>>,
    iterations: usize,
}

impl KMeansClustering {
    /// Creates an unfitted model with `k` clusters and the default round limit.
    pub fn new(k: usize) -> Result<Self> {
        Self::from_config(KMeansConfig::default().with_k(k))
    }

    pub fn from_config(config: KMeansConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            centroids: Vec::new(),
            iterations: 0,
        })
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    /// Cluster centers, one per cluster; empty until `fit` succeeds.
    pub fn centroids(&self) -> &[Vec<f64>] {
        &self.centroids
    }

    /// Rounds run by the last `fit`. Fewer than `n_iters` means the centroids stopped moving.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Computes `k` centroids for `points`, replacing any previous fit.
    ///
    /// # Errors
    /// - `EmptyTrainingSet` if `points` is empty
    /// - `InvalidArgument` if there are fewer points than clusters
    pub fn fit<F>(&mut self, points: &[Vec<F>]) -> Result<()>
    where
        F: Float + AsPrimitive<f64>,
    {
        let k = self.config.k;
        if points.is_empty() {
            return Err(KnnError::EmptyTrainingSet);
        }
        if k > points.len() {
            return Err(KnnError::InvalidArgument(format!(
                "cannot form {} clusters from {} points",
                k,
                points.len()
            )));
        }

        let data: Vec<Vec<f64>> = points
            .iter()
            .map(|p| p.iter().map(|v| v.as_()).collect())
            .collect();
        let min_dims = data.iter().map(Vec::len).min().unwrap_or(0);
        let n_features = data.iter().map(Vec::len).max().unwrap_or(0);
        if min_dims != n_features {
            warn!(
                "points have mixed dimensionality ({}..={}), shorter ones are zero-padded",
                min_dims, n_features
            );
        }

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut centroids: Vec<Vec<f64>> = seed_indices(&mut rng, data.len(), k)
            .into_iter()
            .map(|idx| {
                let mut centroid = data[idx].clone();
                centroid.resize(n_features, 0.0);
                centroid
            })
            .collect();

        let mut iterations = 0;
        while iterations < self.config.n_iters {
            let assignments: Vec<Option<usize>> = data
                .par_iter()
                .map(|point| nearest_centroid(point, &centroids))
                .collect();

            let updated: Vec<Vec<f64>> = (0..k)
                .map(|cluster| {
                    let mut avg = vec![0.0; n_features];
                    let mut count = 0;
                    for (point, _) in data
                        .iter()
                        .zip(&assignments)
                        .filter(|(_, assigned)| **assigned == Some(cluster))
                    {
                        count += 1;
                        fold_into_mean(&mut avg, point, count);
                    }
                    if count == 0 {
                        // Mean of a zero vector and the old centroid.
                        fold_into_mean(&mut avg, &centroids[cluster], 2);
                    }
                    avg
                })
                .collect();

            iterations += 1;
            // Every later round would reproduce the same centroids.
            if updated == centroids {
                break;
            }
            centroids = updated;
        }

        debug!(
            "k-means fitted {} points into {} clusters after {} rounds",
            data.len(),
            k,
            iterations
        );
        self.centroids = centroids;
        self.iterations = iterations;
        Ok(())
    }

    /// Assigns each point to its nearest centroid.
    ///
    /// A point whose distance to every centroid is NaN gets `None`.
    pub fn predict<F>(&self, points: &[Vec<F>]) -> Result<Vec<Option<usize>>>
    where
        F: Float + AsPrimitive<f64>,
    {
        if self.centroids.is_empty() {
            return Err(KnnError::NotFitted);
        }
        Ok(points
            .iter()
            .map(|p| {
                let point: Vec<f64> = p.iter().map(|v| v.as_()).collect();
                nearest_centroid(&point, &self.centroids)
            })
            .collect())
    }
}
