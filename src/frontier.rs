//! Decision-surface sampling for 2D classifiers.

use num_traits::{AsPrimitive, Float};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{KnnError, Result};
use crate::knn::KnnClassifier;

const GLYPHS: &[u8] = b"o+x#*@%&=~";

/// Predicted labels on a regular `step x step` lattice.
///
/// `labels[row][col]` is the prediction at `(xs[col], ys[row])`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecisionGrid<F, L> {
    xs: Vec<F>,
    ys: Vec<F>,
    labels: Vec<Vec<L>>,
}

fn axis_bounds<F: Float>(points: &[Vec<F>], axis: usize) -> (F, F) {
    points.iter().fold((F::infinity(), F::neg_infinity()), |(lo, hi), p| {
        (lo.min(p[axis]), hi.max(p[axis]))
    })
}

fn linspace<F: Float>(lo: F, hi: F, step: usize) -> Result<Vec<F>> {
    let last = F::from(step - 1)
        .ok_or_else(|| KnnError::InvalidParameter(format!("step {step} is not representable")))?;
    (0..step)
        .map(|i| {
            F::from(i)
                .map(|i| lo + (hi - lo) * i / last)
                .ok_or_else(|| KnnError::InvalidParameter(format!("index {i} is not representable")))
        })
        .collect()
}

impl<F, L> DecisionGrid<F, L>
where
    F: Float + AsPrimitive<f64>,
    L: Ord + Clone,
{
    /// Predicts every node of a `step x step` lattice spanning the bounding box of `points`.
    ///
    /// # Errors
    /// - `InvalidParameter` if `step < 2`.
    /// - `EmptyInput` if `points` is empty.
    /// - `DimensionMismatch` if the points are not 2D.
    /// - Any error of `classifier.predict`.
    pub fn sample(classifier: &KnnClassifier<'_, F, L>, points: &[Vec<F>], step: usize) -> Result<Self> {
        if step < 2 {
            return Err(KnnError::InvalidParameter(format!("step must be at least 2, got {step}")));
        }
        if points.is_empty() {
            return Err(KnnError::EmptyInput);
        }
        if let Some(p) = points.iter().find(|p| p.len() != 2) {
            return Err(KnnError::DimensionMismatch { expected: 2, found: p.len() });
        }

        let (x_min, x_max) = axis_bounds(points, 0);
        let (y_min, y_max) = axis_bounds(points, 1);
        let xs = linspace(x_min, x_max, step)?;
        let ys = linspace(y_min, y_max, step)?;

        let nodes: Vec<Vec<F>> = ys
            .iter()
            .flat_map(|&y| xs.iter().map(move |&x| vec![x, y]))
            .collect();
        let predicted = classifier.predict(&nodes)?;
        let labels = predicted.chunks(step).map(|row| row.to_vec()).collect();

        Ok(DecisionGrid { xs, ys, labels })
    }

    pub fn xs(&self) -> &[F] {
        &self.xs
    }

    pub fn ys(&self) -> &[F] {
        &self.ys
    }

    pub fn label_at(&self, row: usize, col: usize) -> Option<&L> {
        self.labels.get(row).and_then(|r| r.get(col))
    }

    /// Distinct predicted labels, ascending.
    pub fn classes(&self) -> Vec<L> {
        let mut classes: Vec<L> = self.labels.iter().flatten().cloned().collect();
        classes.sort();
        classes.dedup();
        classes
    }

    /// One character per node, top line = largest y.
    ///
    /// Labels get glyphs in ascending label order; past ten classes the glyphs repeat.
    pub fn render_ascii(&self) -> String {
        let classes = self.classes();
        let mut out = String::with_capacity((self.xs.len() + 1) * self.ys.len());
        for row in self.labels.iter().rev() {
            for label in row {
                let slot = classes.binary_search(label).unwrap_or(0) % GLYPHS.len();
                out.push(char::from(GLYPHS[slot]));
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_plane() -> (Vec<Vec<f64>>, Vec<i32>) {
        (
            vec![vec![0.0, 0.0], vec![0.0, 4.0], vec![4.0, 0.0], vec![4.0, 4.0]],
            vec![1, 1, 2, 2],
        )
    }

    #[test]
    fn test_grid_spans_bounding_box() {
        let (x, y) = split_plane();
        let mut classifier = KnnClassifier::new(1);
        classifier.fit(&x, &y).unwrap();

        let grid = DecisionGrid::sample(&classifier, &x, 5).unwrap();
        assert_eq!(grid.xs(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(grid.ys(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(grid.label_at(0, 0), Some(&1));
        assert_eq!(grid.label_at(4, 4), Some(&2));
        assert_eq!(grid.label_at(5, 0), None);
        // x = 2 is equidistant; the lower training index (label 1) wins.
        assert_eq!(grid.label_at(0, 2), Some(&1));
        assert_eq!(grid.classes(), vec![1, 2]);
    }

    #[test]
    fn test_render_ascii() {
        let (x, y) = split_plane();
        let mut classifier = KnnClassifier::new(1);
        classifier.fit(&x, &y).unwrap();
        let grid = DecisionGrid::sample(&classifier, &x, 3).unwrap();
        assert_eq!(grid.render_ascii(), "oo+\noo+\noo+\n");
    }

    #[test]
    fn test_sample_errors() {
        let (x, y) = split_plane();
        let mut classifier = KnnClassifier::new(1);
        classifier.fit(&x, &y).unwrap();

        assert!(matches!(
            DecisionGrid::sample(&classifier, &x, 1),
            Err(KnnError::InvalidParameter(_))
        ));
        assert!(matches!(DecisionGrid::sample(&classifier, &[], 3), Err(KnnError::EmptyInput)));
        assert!(matches!(
            DecisionGrid::sample(&classifier, &[vec![1.0, 2.0, 3.0]], 3),
            Err(KnnError::DimensionMismatch { expected: 2, found: 3 })
        ));

        let unfitted: KnnClassifier<f64, i32> = KnnClassifier::new(1);
        assert!(matches!(
            DecisionGrid::sample(&unfitted, &x, 3),
            Err(KnnError::UnfittedModel)
        ));
    }
}
