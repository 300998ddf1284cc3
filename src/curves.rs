//! Error and leave-one-out curves over a range of neighbor counts.

use num_traits::{AsPrimitive, Float};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{trace, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{KnnError, Result};
use crate::knn::KnnClassifier;
use crate::metrics::accuracy_score;

fn check_k_range(k_range: &[usize]) -> Result<()> {
    if k_range.is_empty() {
        return Err(KnnError::InvalidParameter("k_range must not be empty".to_string()));
    }
    Ok(())
}

/// k of the first extremal value, comparing with `better(candidate, current)`.
fn first_best(k_range: &[usize], values: &[f64], better: impl Fn(f64, f64) -> bool) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (&k, &value) in k_range.iter().zip(values) {
        match best {
            Some((_, current)) if !better(value, current) => {}
            _ => best = Some((k, value)),
        }
    }
    best.map(|(k, _)| k)
}

/// Held-out error rate for each k in `k_range`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ErrorCurve {
    pub k_range: Vec<usize>,
    pub errors: Vec<f64>,
}

impl ErrorCurve {
    pub fn new(k_range: Vec<usize>) -> Self {
        ErrorCurve { k_range, errors: Vec::new() }
    }

    /// Fits one classifier per k on the training set and records `1 - accuracy` on the test set.
    pub fn fit_curve<F, L>(
        &mut self,
        x_train: &[Vec<F>],
        y_train: &[L],
        x_test: &[Vec<F>],
        y_test: &[L],
    ) -> Result<&Self>
    where
        F: Float + AsPrimitive<f64>,
        L: Ord + Clone,
    {
        check_k_range(&self.k_range)?;
        let mut errors = Vec::with_capacity(self.k_range.len());
        for &k in &self.k_range {
            let mut classifier = KnnClassifier::new(k);
            let accuracy = classifier
                .fit(x_train, y_train)
                .and_then(|c| c.score(x_test, y_test))
                .inspect_err(|e| warn!(k, error = %e, "error curve point failed"))?;
            trace!(k, error = 1.0 - accuracy, "error curve point");
            errors.push(1.0 - accuracy);
        }
        self.errors = errors;
        Ok(self)
    }

    /// k with the smallest error, the first one on ties.
    pub fn best_k(&self) -> Option<usize> {
        first_best(&self.k_range, &self.errors, |candidate, current| candidate < current)
    }
}

/// Leave-one-out accuracy for each k in `k_range`.
///
/// By default every sample is held out once. `with_iterations` switches to
/// holding out `n_iter` indices drawn with replacement from a seeded RNG.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LooCurve {
    pub k_range: Vec<usize>,
    pub cv_scores: Vec<f64>,
    iterations: Option<(usize, u64)>,
}

impl LooCurve {
    pub fn new(k_range: Vec<usize>) -> Self {
        LooCurve {
            k_range,
            cv_scores: Vec::new(),
            iterations: None,
        }
    }

    pub fn with_iterations(mut self, n_iter: usize, seed: u64) -> Self {
        self.iterations = Some((n_iter, seed));
        self
    }

    fn held_out_indices(&self, n_samples: usize) -> Result<Vec<usize>> {
        match self.iterations {
            None => Ok((0..n_samples).collect()),
            Some((0, _)) => Err(KnnError::InvalidParameter("n_iter must be positive".to_string())),
            Some(_) if n_samples == 0 => Err(KnnError::EmptyInput),
            Some((n_iter, seed)) => {
                let mut rng = StdRng::seed_from_u64(seed);
                Ok((0..n_iter).map(|_| rng.gen_range(0..n_samples)).collect())
            }
        }
    }

    /// Records the mean held-out accuracy of each k over `(x, y)`.
    pub fn fit_curve<F, L>(&mut self, x: &[Vec<F>], y: &[L]) -> Result<&Self>
    where
        F: Float + AsPrimitive<f64>,
        L: Ord + Clone,
    {
        check_k_range(&self.k_range)?;
        let indices = self.held_out_indices(x.len())?;
        let truth: Vec<L> = indices.iter().filter_map(|&i| y.get(i).cloned()).collect();

        let mut scores = Vec::with_capacity(self.k_range.len());
        for &k in &self.k_range {
            let mut classifier = KnnClassifier::new(k);
            let score = classifier
                .fit(x, y)
                .and_then(|c| c.predict_held_out(&indices))
                .and_then(|predicted| accuracy_score(&truth, &predicted))
                .inspect_err(|e| warn!(k, error = %e, "leave-one-out point failed"))?;
            trace!(k, score, "leave-one-out point");
            scores.push(score);
        }
        self.cv_scores = scores;
        Ok(self)
    }

    /// k with the highest score, the first one on ties.
    pub fn best_k(&self) -> Option<usize> {
        first_best(&self.k_range, &self.cv_scores, |candidate, current| candidate > current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_clusters() -> (Vec<Vec<f64>>, Vec<i32>) {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for i in 0..6 {
            features.push(vec![i as f64 * 0.1, 0.0]);
            labels.push(0);
            features.push(vec![10.0 + i as f64 * 0.1, 0.0]);
            labels.push(1);
        }
        (features, labels)
    }

    #[test]
    fn test_error_curve_on_separable_data() {
        let (x, y) = two_clusters();
        let x_test = vec![vec![0.25, 0.0], vec![10.25, 0.0]];
        let y_test = vec![0, 1];

        let mut curve = ErrorCurve::new(vec![1, 3, 12]);
        curve.fit_curve(&x, &y, &x_test, &y_test).unwrap();
        assert_eq!(curve.errors.len(), 3);
        assert_eq!(curve.errors[0], 0.0);
        assert_eq!(curve.errors[1], 0.0);
        // k = 12 votes over the whole set: 6/6 tie, label 0 wins, one test point wrong.
        assert!((curve.errors[2] - 0.5).abs() < 1e-12);
        assert_eq!(curve.best_k(), Some(1));
    }

    #[test]
    fn test_error_curve_propagates_bad_k() {
        let (x, y) = two_clusters();
        let mut curve = ErrorCurve::new(vec![1, 50]);
        assert!(matches!(
            curve.fit_curve(&x, &y, &x, &y),
            Err(KnnError::InvalidNeighborCount { k: 50, n_samples: 12 })
        ));
        let mut empty = ErrorCurve::new(vec![]);
        assert!(matches!(empty.fit_curve(&x, &y, &x, &y), Err(KnnError::InvalidParameter(_))));
    }

    #[test]
    fn test_loo_curve_exact() {
        let (x, y) = two_clusters();
        let mut curve = LooCurve::new(vec![1, 5, 11]);
        curve.fit_curve(&x, &y).unwrap();
        assert_eq!(curve.cv_scores[0], 1.0);
        assert_eq!(curve.cv_scores[1], 1.0);
        // k = 11 sees 5 own-class and 6 other-class points.
        assert_eq!(curve.cv_scores[2], 0.0);
        assert_eq!(curve.best_k(), Some(1));
    }

    #[test]
    fn test_loo_curve_sampled_is_seeded() {
        let (x, y) = two_clusters();
        let mut a = LooCurve::new(vec![1, 3]).with_iterations(40, 9);
        let mut b = LooCurve::new(vec![1, 3]).with_iterations(40, 9);
        a.fit_curve(&x, &y).unwrap();
        b.fit_curve(&x, &y).unwrap();
        assert_eq!(a.cv_scores, b.cv_scores);
        assert_eq!(a.cv_scores, vec![1.0, 1.0]);
    }

    #[test]
    fn test_loo_curve_rejects_k_equal_to_n() {
        let (x, y) = two_clusters();
        let mut curve = LooCurve::new(vec![12]);
        assert!(matches!(
            curve.fit_curve(&x, &y),
            Err(KnnError::InvalidNeighborCount { k: 12, n_samples: 11 })
        ));
        let mut zero_iter = LooCurve::new(vec![1]).with_iterations(0, 1);
        assert!(matches!(zero_iter.fit_curve(&x, &y), Err(KnnError::InvalidParameter(_))));
    }

    #[test]
    fn test_best_k_first_on_ties() {
        let curve = ErrorCurve {
            k_range: vec![1, 2, 3],
            errors: vec![0.2, 0.1, 0.1],
        };
        assert_eq!(curve.best_k(), Some(2));
        assert_eq!(ErrorCurve::new(vec![1]).best_k(), None);
    }
}
