//! Brute-force k-nearest-neighbor classification over a bounded max-heap.

pub mod heap_utils;

use std::collections::HashMap;
use std::hash::Hash;

use log::{debug, trace, warn};
use num_traits::{AsPrimitive, Float};
use ordered_float::OrderedFloat;
use rayon::prelude::*;

use crate::common_types::DataPoint;
use crate::config::KnnConfig;
use crate::error::{KnnError, Result};
use heap_utils::{BoundedMaxHeap, Candidate};

/// Calculates the Euclidean distance between two vectors of possibly different lengths.
///
/// The shorter vector is treated as zero-padded, so the trailing coordinates
/// of the longer one contribute their squares. Mismatched lengths are never
/// an error.
pub fn euclidean_distance<F>(a: &[F], b: &[F]) -> f64
where
    F: Float + AsPrimitive<f64>,
{
    let (shorter, longer) = if a.len() > b.len() { (b, a) } else { (a, b) };

    let overlap: f64 = shorter
        .iter()
        .zip(longer.iter())
        .map(|(x, y)| {
            let diff = x.as_() - y.as_();
            diff * diff
        })
        .sum();
    let tail: f64 = longer[shorter.len()..]
        .iter()
        .map(|x| {
            let v: f64 = x.as_();
            v * v
        })
        .sum();

    (overlap + tail).sqrt()
}

/// Counts labels and returns the one with the strictly highest count.
///
/// Labels are scanned in the order they were first seen, and a later label
/// with an equal count does not replace the current winner.
fn majority_vote<'a, L, I>(labels: I) -> Option<&'a L>
where
    L: Eq + Hash + 'a,
    I: IntoIterator<Item = &'a L>,
{
    let mut counts: HashMap<&L, usize> = HashMap::new();
    let mut first_seen: Vec<&L> = Vec::new();

    for label in labels {
        match counts.get_mut(label) {
            Some(count) => *count += 1,
            None => {
                counts.insert(label, 1);
                first_seen.push(label);
            }
        }
    }

    let mut winner = None;
    let mut max_count = 0;
    for label in first_seen {
        let count = counts[label];
        if count > max_count {
            max_count = count;
            winner = Some(label);
        }
    }
    winner
}

/// The K-Nearest Neighbors Classifier.
///
/// Training data is stored as-is by [`fit`](Self::fit); all distance work is
/// deferred to prediction, where each query scans every training point once
/// and keeps the `k` closest in a [`BoundedMaxHeap`].
#[derive(Debug, Clone)]
pub struct KnnClassifier<F, L> {
    config: KnnConfig,
    training_data: Vec<DataPoint<F, L>>,
}

impl<F, L> KnnClassifier<F, L>
where
    F: Float + AsPrimitive<f64> + Send + Sync,
    L: Clone + Eq + Hash + Send + Sync,
{
    /// Creates an untrained classifier. Fails with `InvalidArgument` if `k` is 0.
    pub fn new(k: usize) -> Result<Self> {
        Self::from_config(KnnConfig::default().with_k(k))
    }

    pub fn from_config(config: KnnConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            training_data: Vec::new(),
        })
    }

    pub fn k(&self) -> usize {
        self.config.k
    }

    pub fn config(&self) -> &KnnConfig {
        &self.config
    }

    /// Number of stored training points.
    pub fn n_samples(&self) -> usize {
        self.training_data.len()
    }

    /// Trains the classifier by storing `vectors` paired index-wise with `labels`.
    ///
    /// Any previously fitted data is replaced. Fails with `LengthMismatch`,
    /// leaving the old data in place, if the two sequences differ in length.
    pub fn fit(&mut self, vectors: Vec<Vec<F>>, labels: Vec<L>) -> Result<()> {
        if vectors.len() != labels.len() {
            return Err(KnnError::LengthMismatch {
                vectors: vectors.len(),
                labels: labels.len(),
            });
        }
        let points = vectors
            .into_iter()
            .zip(labels)
            .map(|(features, label)| DataPoint::new(features, label))
            .collect();
        self.fit_points(points);
        Ok(())
    }

    /// Same as [`fit`](Self::fit), for data that is already paired.
    pub fn fit_points(&mut self, training_data: Vec<DataPoint<F, L>>) {
        let min_dims = training_data.iter().map(|dp| dp.features.len()).min().unwrap_or(0);
        let max_dims = training_data.iter().map(|dp| dp.features.len()).max().unwrap_or(0);
        if min_dims != max_dims {
            warn!(
                "training vectors have mixed dimensionality ({}..={}), shorter ones are zero-padded",
                min_dims, max_dims
            );
        }
        debug!(
            "fitted {} training points ({} dims), k = {}",
            training_data.len(),
            max_dims,
            self.config.k
        );
        self.training_data = training_data;
    }

    /// Scans every training point and keeps the `k` with the smallest distance to `query`.
    fn nearest_heap(&self, query: &[F]) -> Result<BoundedMaxHeap<Candidate<&L>>> {
        let mut heap = BoundedMaxHeap::new(self.config.k)?;

        for point in &self.training_data {
            let distance = euclidean_distance(query, &point.features);
            if !heap.is_full() {
                heap.insert(Candidate::new(distance, &point.label))?;
            } else if OrderedFloat(distance) < heap.peek_max()?.distance {
                // Same total order as the heap, so a NaN at the root is displaced.
                heap.remove_max()?;
                heap.insert(Candidate::new(distance, &point.label))?;
            }
        }

        trace!("retained {} of {} training points", heap.len(), self.training_data.len());
        Ok(heap)
    }

    /// Returns the retained neighbors of `query`, closest first.
    pub fn k_nearest(&self, query: &[F]) -> Result<Vec<Candidate<L>>> {
        if self.training_data.is_empty() {
            return Err(KnnError::EmptyTrainingSet);
        }
        let mut heap = self.nearest_heap(query)?;

        let mut neighbors = Vec::with_capacity(heap.len());
        while !heap.is_empty() {
            let candidate = heap.remove_max()?;
            neighbors.push(Candidate::new(candidate.distance(), candidate.label.clone()));
        }
        neighbors.reverse();
        Ok(neighbors)
    }

    /// Predicts the label for a single query point.
    pub fn predict_single(&self, query: &[F]) -> Result<L> {
        if self.training_data.is_empty() {
            return Err(KnnError::EmptyTrainingSet);
        }
        let mut heap = self.nearest_heap(query)?;

        // Drain largest distance first; this is the order the vote scans labels in.
        let mut drained = Vec::with_capacity(heap.len());
        while !heap.is_empty() {
            drained.push(heap.remove_max()?.label);
        }

        majority_vote(drained).cloned().ok_or(KnnError::EmptyTrainingSet)
    }

    /// Predicts one label per query, in input order.
    ///
    /// An empty batch yields an empty result even before `fit` is called.
    pub fn predict(&self, queries: &[Vec<F>]) -> Result<Vec<L>> {
        if queries.is_empty() {
            return Ok(Vec::new());
        }
        if self.training_data.is_empty() {
            return Err(KnnError::EmptyTrainingSet);
        }

        debug!(
            "predicting {} queries against {} training points ({})",
            queries.len(),
            self.training_data.len(),
            if self.config.parallel { "parallel" } else { "sequential" }
        );

        if self.config.parallel {
            queries.par_iter().map(|query| self.predict_single(query)).collect()
        } else {
            queries.iter().map(|query| self.predict_single(query)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_training_data() -> (Vec<Vec<f64>>, Vec<i32>) {
        let vectors = vec![
            vec![1.0, 12.0],
            vec![2.0, 5.0],
            vec![3.0, 6.0],
            vec![3.0, 10.0],
            vec![3.5, 8.0],
            vec![2.0, 11.0],
            vec![2.0, 9.0],
            vec![1.0, 7.0],
            vec![5.0, 3.0],
            vec![3.0, 2.0],
            vec![1.5, 9.0],
            vec![7.0, 1.0],
            vec![5.0, 1.0],
            vec![3.8, 1.0],
            vec![5.6, 4.0],
            vec![4.0, 2.0],
            vec![2.0, 5.0],
        ];
        let labels = vec![0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 0];
        (vectors, labels)
    }

    #[test]
    fn test_euclidean_distance() {
        let epsilon = 1e-9;

        let a = vec![1.0, 2.0, 3.0];
        let b = vec![4.0, 5.0, 6.0];
        let dist = euclidean_distance(&a, &b);
        assert!((dist - 27.0_f64.sqrt()).abs() < epsilon, "Expected sqrt(27), got {}", dist);

        assert_eq!(euclidean_distance(&a, &a), 0.0);

        let empty: Vec<f64> = vec![];
        assert_eq!(euclidean_distance(&empty, &empty), 0.0);
        assert_eq!(euclidean_distance(&empty, &[3.0, 4.0]), 5.0);
    }

    #[test]
    fn test_euclidean_distance_zero_pads_shorter_vector() {
        let short = vec![1.0_f64];
        let long = vec![4.0, 4.0];
        // (1-4)^2 + 4^2 = 25
        assert_eq!(euclidean_distance(&short, &long), 5.0);
        assert_eq!(euclidean_distance(&long, &short), 5.0);
        assert_eq!(euclidean_distance(&[1.0_f32], &[4.0_f32, 4.0]), 5.0);
    }

    #[test]
    fn test_majority_vote_first_seen_wins_ties() {
        let labels = ["b", "a", "a", "b", "c"];
        assert_eq!(majority_vote(labels.iter()), Some(&"b"));

        let labels = ["c", "a", "a"];
        assert_eq!(majority_vote(labels.iter()), Some(&"a"));

        let none: [&str; 0] = [];
        assert_eq!(majority_vote(none.iter()), None);
    }

    #[test]
    fn test_new_rejects_zero_k() {
        let result = KnnClassifier::<f64, i32>::new(0);
        assert!(matches!(result, Err(KnnError::InvalidArgument(_))));
    }

    #[test]
    fn test_predict_scenario() {
        let (vectors, labels) = scenario_training_data();
        let mut classifier = KnnClassifier::new(3).unwrap();
        classifier.fit(vectors, labels).unwrap();

        let predictions = classifier.predict(&[vec![2.5, 7.0], vec![6.0, 1.0]]).unwrap();
        assert_eq!(predictions, vec![0, 1]);
    }

    #[test]
    fn test_predict_parallel_matches_sequential() {
        let (vectors, labels) = scenario_training_data();
        let queries: Vec<Vec<f64>> = (0..40)
            .map(|i| vec![(i % 8) as f64, (i / 4) as f64])
            .collect();

        let mut sequential = KnnClassifier::new(5).unwrap();
        sequential.fit(vectors.clone(), labels.clone()).unwrap();
        let mut parallel =
            KnnClassifier::from_config(KnnConfig::default().with_k(5).with_parallel(true)).unwrap();
        parallel.fit(vectors, labels).unwrap();

        assert_eq!(sequential.predict(&queries).unwrap(), parallel.predict(&queries).unwrap());
    }

    #[test]
    fn test_k_larger_than_training_set() {
        let mut classifier: KnnClassifier<f64, &str> = KnnClassifier::new(5).unwrap();
        classifier
            .fit(vec![vec![0.0], vec![10.0]], vec!["X", "Y"])
            .unwrap();

        // Two retained neighbors with one vote each: the farther one is drained first.
        assert_eq!(classifier.predict_single(&[1.0]).unwrap(), "Y");
        assert_eq!(classifier.k_nearest(&[1.0]).unwrap().len(), 2);
    }

    #[test]
    fn test_k_nearest_is_sorted_ascending() {
        let (vectors, labels) = scenario_training_data();
        let mut classifier = KnnClassifier::new(4).unwrap();
        classifier.fit(vectors, labels).unwrap();

        let neighbors = classifier.k_nearest(&[6.0, 1.0]).unwrap();
        assert_eq!(neighbors.len(), 4);
        assert!(neighbors.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert_eq!(neighbors[0].distance(), 1.0);
        assert!(neighbors.iter().all(|c| c.label == 1));
    }

    #[test]
    fn test_empty_training_set() {
        let classifier: KnnClassifier<f64, i32> = KnnClassifier::new(3).unwrap();
        assert_eq!(classifier.predict_single(&[1.0]), Err(KnnError::EmptyTrainingSet));
        assert_eq!(classifier.predict(&[vec![1.0]]), Err(KnnError::EmptyTrainingSet));
        assert_eq!(classifier.predict(&[]), Ok(Vec::new()));
    }

    #[test]
    fn test_fit_length_mismatch_keeps_previous_data() {
        let mut classifier: KnnClassifier<f64, i32> = KnnClassifier::new(1).unwrap();
        classifier.fit(vec![vec![0.0]], vec![7]).unwrap();

        let result = classifier.fit(vec![vec![1.0], vec![2.0]], vec![1]);
        assert_eq!(result, Err(KnnError::LengthMismatch { vectors: 2, labels: 1 }));
        assert_eq!(classifier.n_samples(), 1);
        assert_eq!(classifier.predict_single(&[0.0]).unwrap(), 7);
    }

    #[test]
    fn test_fit_replaces_previous_data() {
        let mut classifier: KnnClassifier<f64, &str> = KnnClassifier::new(1).unwrap();
        classifier.fit(vec![vec![0.0]], vec!["old"]).unwrap();
        classifier
            .fit_points(vec![DataPoint::new(vec![0.0], "new"), DataPoint::new(vec![9.0], "far")]);

        assert_eq!(classifier.n_samples(), 2);
        assert_eq!(classifier.predict_single(&[0.5]).unwrap(), "new");
    }

    #[test]
    fn test_nan_neighbor_is_displaced_by_real_distance() {
        let mut classifier: KnnClassifier<f64, &str> = KnnClassifier::new(1).unwrap();
        classifier
            .fit(vec![vec![f64::NAN], vec![0.0], vec![0.1]], vec!["nan", "near", "near2"])
            .unwrap();

        assert_eq!(classifier.predict_single(&[0.0]).unwrap(), "near");
        let neighbors = classifier.k_nearest(&[0.0]).unwrap();
        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0].distance(), 0.0);
    }

    #[test]
    fn test_nan_query_distance_never_displaces_full_heap() {
        let mut classifier: KnnClassifier<f64, &str> = KnnClassifier::new(1).unwrap();
        classifier
            .fit(vec![vec![0.0], vec![f64::NAN]], vec!["real", "nan"])
            .unwrap();

        assert_eq!(classifier.predict_single(&[1.0]).unwrap(), "real");
    }

    #[test]
    fn test_mixed_dimensionality_training_set() {
        let mut classifier: KnnClassifier<f64, &str> = KnnClassifier::new(1).unwrap();
        classifier
            .fit(vec![vec![1.0], vec![0.0, 0.0, 5.0]], vec!["short", "long"])
            .unwrap();

        assert_eq!(classifier.predict_single(&[1.0, 0.0]).unwrap(), "short");
        assert_eq!(classifier.predict_single(&[0.0, 0.0, 4.0]).unwrap(), "long");
    }
}
