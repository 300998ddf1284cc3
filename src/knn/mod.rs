//! Brute-force k-nearest-neighbors classification.
//!
//! Every query is compared against every training point with the squared
//! Euclidean distance. No spatial index is built: `fit` only records the
//! borrowed training set, and `predict` does the exhaustive search.

pub mod heap_utils;

use std::collections::BTreeMap;

use num_traits::{AsPrimitive, Float};
use tracing::debug;

use crate::error::{KnnError, Result};
use crate::metrics::accuracy_score;
use heap_utils::{KBestNeighbors, Neighbor};

/// Squared Euclidean distance between two feature vectors, accumulated in `f64`.
///
/// Both vectors must have the same length. The classifier checks shapes
/// before calling this; debug builds assert it for direct callers.
pub fn squared_euclidean_distance<F>(a: &[F], b: &[F]) -> f64
where
    F: Float + AsPrimitive<f64>,
{
    debug_assert_eq!(a.len(), b.len(), "feature vectors differ in length");
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let diff: f64 = (x - y).as_();
            diff * diff
        })
        .sum()
}

/// Most frequent label; ties go to the smallest label value.
///
/// Returns `None` for an empty iterator.
pub fn majority_vote<'l, L, I>(labels: I) -> Option<L>
where
    L: Ord + Clone + 'l,
    I: IntoIterator<Item = &'l L>,
{
    let mut label_counts: BTreeMap<&L, usize> = BTreeMap::new();
    for label in labels {
        *label_counts.entry(label).or_insert(0) += 1;
    }

    // BTreeMap iterates in ascending label order; only a strictly larger count
    // replaces the current winner.
    let mut winner: Option<(&L, usize)> = None;
    for (label, count) in label_counts {
        match winner {
            Some((_, best)) if count <= best => {}
            _ => winner = Some((label, count)),
        }
    }
    winner.map(|(label, _)| label.clone())
}

/// The training set currently bound to a classifier.
#[derive(Debug)]
struct TrainingSet<'a, F, L> {
    features: &'a [Vec<F>],
    labels: &'a [L],
    n_features: usize,
}

// Only borrows are held, so the set is Copy whatever `F` and `L` are.
impl<F, L> Clone for TrainingSet<'_, F, L> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<F, L> Copy for TrainingSet<'_, F, L> {}

/// The K-Nearest Neighbors Classifier.
///
/// Holds shared borrows of the training data between `fit` calls, so the data
/// cannot be mutated while the classifier may still read it.
///
/// Tie rules:
/// - training points at equal distance enter the neighborhood in ascending
///   training index order (same set as a stable argsort);
/// - among labels with the same vote count, the smallest label wins.
#[derive(Debug, Clone)]
pub struct KnnClassifier<'a, F, L> {
    n_neighbors: usize,
    training: Option<TrainingSet<'a, F, L>>,
}

impl<F, L> Default for KnnClassifier<'_, F, L> {
    fn default() -> Self {
        Self {
            n_neighbors: 1,
            training: None,
        }
    }
}

impl<'a, F, L> KnnClassifier<'a, F, L>
where
    F: Float + AsPrimitive<f64>,
    L: Ord + Clone,
{
    /// Creates an unfitted classifier. `k` is validated by `fit`.
    pub fn new(n_neighbors: usize) -> Self {
        Self {
            n_neighbors,
            training: None,
        }
    }

    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    pub fn is_fitted(&self) -> bool {
        self.training.is_some()
    }

    /// Number of bound training points, 0 when unfitted.
    pub fn n_samples(&self) -> usize {
        self.training.map_or(0, |t| t.labels.len())
    }

    /// Dimensionality of the bound training set.
    pub fn n_features(&self) -> Option<usize> {
        self.training.map(|t| t.n_features)
    }

    /// Binds the classifier to `(features, labels)`, replacing any previous binding.
    ///
    /// Nothing is copied or precomputed. If validation fails, the previous
    /// binding stays in place.
    ///
    /// # Errors
    /// - `DimensionMismatch` if `features.len() != labels.len()` or rows differ in length.
    /// - `InvalidNeighborCount` if `k == 0` or `k > features.len()`.
    pub fn fit(&mut self, features: &'a [Vec<F>], labels: &'a [L]) -> Result<&mut Self> {
        if features.len() != labels.len() {
            return Err(KnnError::DimensionMismatch {
                expected: features.len(),
                found: labels.len(),
            });
        }
        if self.n_neighbors == 0 || self.n_neighbors > features.len() {
            return Err(KnnError::InvalidNeighborCount {
                k: self.n_neighbors,
                n_samples: features.len(),
            });
        }

        let n_features = features.first().map_or(0, |row| row.len());
        if let Some(row) = features.iter().find(|row| row.len() != n_features) {
            return Err(KnnError::DimensionMismatch {
                expected: n_features,
                found: row.len(),
            });
        }

        debug!(n_samples = features.len(), n_features, k = self.n_neighbors, "fit");
        self.training = Some(TrainingSet {
            features,
            labels,
            n_features,
        });
        Ok(self)
    }

    fn training(&self) -> Result<TrainingSet<'a, F, L>> {
        self.training.ok_or(KnnError::UnfittedModel)
    }

    fn check_queries(training: &TrainingSet<'a, F, L>, queries: &[Vec<F>]) -> Result<()> {
        match queries.iter().find(|q| q.len() != training.n_features) {
            Some(q) => Err(KnnError::DimensionMismatch {
                expected: training.n_features,
                found: q.len(),
            }),
            None => Ok(()),
        }
    }

    /// The `capacity` nearest training points to `query`, nearest first,
    /// skipping the training index `exclude` if given.
    fn nearest(
        training: &TrainingSet<'a, F, L>,
        query: &[F],
        capacity: usize,
        exclude: Option<usize>,
    ) -> Vec<Neighbor> {
        let mut best = KBestNeighbors::new(capacity);
        for (index, row) in training.features.iter().enumerate() {
            if exclude == Some(index) {
                continue;
            }
            best.add(squared_euclidean_distance(query, row), index);
        }
        best.into_sorted_neighbors()
    }

    fn vote(training: &TrainingSet<'a, F, L>, neighbors: &[Neighbor]) -> Result<L> {
        majority_vote(neighbors.iter().map(|n| &training.labels[n.index])).ok_or(
            KnnError::InvalidNeighborCount {
                k: neighbors.len(),
                n_samples: training.labels.len(),
            },
        )
    }

    /// Nearest training points of every query, nearest first.
    ///
    /// # Errors
    /// `UnfittedModel` before `fit`; `DimensionMismatch` if any query has the wrong length.
    pub fn kneighbors(&self, queries: &[Vec<F>]) -> Result<Vec<Vec<Neighbor>>> {
        let training = self.training()?;
        Self::check_queries(&training, queries)?;
        Ok(queries
            .iter()
            .map(|q| Self::nearest(&training, q, self.n_neighbors, None))
            .collect())
    }

    /// Predicts one label per query, in query order.
    ///
    /// All queries are validated before any distance is computed.
    ///
    /// # Errors
    /// `UnfittedModel` before `fit`; `DimensionMismatch` if any query has the wrong length.
    pub fn predict(&self, queries: &[Vec<F>]) -> Result<Vec<L>> {
        let training = self.training()?;
        Self::check_queries(&training, queries)?;
        debug!(n_queries = queries.len(), k = self.n_neighbors, "predict");

        queries
            .iter()
            .map(|q| {
                let neighbors = Self::nearest(&training, q, self.n_neighbors, None);
                Self::vote(&training, &neighbors)
            })
            .collect()
    }

    pub fn predict_single(&self, query: &[F]) -> Result<L> {
        let training = self.training()?;
        if query.len() != training.n_features {
            return Err(KnnError::DimensionMismatch {
                expected: training.n_features,
                found: query.len(),
            });
        }
        let neighbors = Self::nearest(&training, query, self.n_neighbors, None);
        Self::vote(&training, &neighbors)
    }

    /// Predicts training point `i` from the other training points, for each `i` in `indices`.
    ///
    /// # Errors
    /// - `UnfittedModel` before `fit`.
    /// - `InvalidNeighborCount` if `k` exceeds `n_samples - 1`.
    /// - `IndexOutOfRange` for an index past the training set.
    pub fn predict_held_out(&self, indices: &[usize]) -> Result<Vec<L>> {
        let training = self.training()?;
        let n_samples = training.labels.len();
        if self.n_neighbors >= n_samples {
            return Err(KnnError::InvalidNeighborCount {
                k: self.n_neighbors,
                n_samples: n_samples.saturating_sub(1),
            });
        }
        if let Some(&index) = indices.iter().find(|&&i| i >= n_samples) {
            return Err(KnnError::IndexOutOfRange { index, len: n_samples });
        }

        indices
            .iter()
            .map(|&i| {
                let neighbors = Self::nearest(&training, &training.features[i], self.n_neighbors, Some(i));
                Self::vote(&training, &neighbors)
            })
            .collect()
    }

    /// Leave-one-out predictions for every training point, in training order.
    pub fn predict_leave_one_out(&self) -> Result<Vec<L>> {
        let indices: Vec<usize> = (0..self.n_samples()).collect();
        self.predict_held_out(&indices)
    }

    /// Accuracy of `predict(queries)` against `labels`.
    pub fn score(&self, queries: &[Vec<F>], labels: &[L]) -> Result<f64> {
        let predicted = self.predict(queries)?;
        accuracy_score(labels, &predicted)
    }
}
