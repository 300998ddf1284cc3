//! This module contains the data containers shared by the classifier, the generators and the metrics.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents a single data point, with features and a label.
///
/// - `F`: The type of the features (e.g., `f64`, `f32`).
/// - `L`: The type of the label (e.g., `i32`, `String`, an enum).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataPoint<F, L> {
    pub features: Vec<F>,
    pub label: L,
}

impl<F, L> DataPoint<F, L> {
    pub fn new(features: Vec<F>, label: L) -> Self {
        DataPoint { features, label }
    }
}

/// A labeled point set stored column-wise: `features[i]` is labeled `labels[i]`.
///
/// The classifier borrows both vectors, so a `Dataset` usually outlives the
/// `KnnClassifier` fitted on it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dataset<F, L> {
    pub features: Vec<Vec<F>>,
    pub labels: Vec<L>,
}

impl<F: Clone, L: Clone> Dataset<F, L> {
    pub fn new(features: Vec<Vec<F>>, labels: Vec<L>) -> Self {
        Dataset { features, labels }
    }

    pub fn from_points(points: Vec<DataPoint<F, L>>) -> Self {
        let (features, labels) = points.into_iter().map(|p| (p.features, p.label)).unzip();
        Dataset { features, labels }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Dimensionality of the first row, 0 for an empty set.
    pub fn n_features(&self) -> usize {
        self.features.first().map_or(0, |row| row.len())
    }

    /// Even rows go to the first set, odd rows to the second.
    pub fn split_alternating(&self) -> (Dataset<F, L>, Dataset<F, L>) {
        let mut train = Dataset::new(Vec::new(), Vec::new());
        let mut test = Dataset::new(Vec::new(), Vec::new());
        for (i, (row, label)) in self.features.iter().zip(self.labels.iter()).enumerate() {
            let target = if i % 2 == 0 { &mut train } else { &mut test };
            target.features.push(row.clone());
            target.labels.push(label.clone());
        }
        (train, test)
    }

    /// The first `n` rows go to the first set, the rest to the second.
    /// `n` is clamped to the dataset length.
    pub fn split_at(&self, n: usize) -> (Dataset<F, L>, Dataset<F, L>) {
        let n = n.min(self.len());
        let train = Dataset::new(self.features[..n].to_vec(), self.labels[..n].to_vec());
        let test = Dataset::new(self.features[n..].to_vec(), self.labels[n..].to_vec());
        (train, test)
    }
}

impl<F, L: Ord + Clone> Dataset<F, L> {
    /// Distinct labels in ascending order.
    pub fn classes(&self) -> Vec<L> {
        let mut classes = self.labels.clone();
        classes.sort();
        classes.dedup();
        classes
    }
}
