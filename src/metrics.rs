//! Classification metrics: accuracy and confusion matrix.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{KnnError, Result};

fn check_pair<L>(y_true: &[L], y_pred: &[L]) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(KnnError::DimensionMismatch {
            expected: y_true.len(),
            found: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(KnnError::EmptyInput);
    }
    Ok(())
}

/// Fraction of positions where the predicted label equals the true label.
pub fn accuracy_score<L: PartialEq>(y_true: &[L], y_pred: &[L]) -> Result<f64> {
    check_pair(y_true, y_pred)?;
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Counts of (true label, predicted label) pairs.
///
/// Rows are true labels and columns predicted labels, both in the ascending
/// order of `labels`, which is the sorted union of the two input sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConfusionMatrix<L> {
    labels: Vec<L>,
    counts: Vec<Vec<usize>>,
}

impl<L: Ord + Clone> ConfusionMatrix<L> {
    pub fn new(y_true: &[L], y_pred: &[L]) -> Result<Self> {
        check_pair(y_true, y_pred)?;

        let mut labels: Vec<L> = y_true.iter().chain(y_pred).cloned().collect();
        labels.sort();
        labels.dedup();

        let mut counts = vec![vec![0; labels.len()]; labels.len()];
        for (t, p) in y_true.iter().zip(y_pred) {
            // Both labels come from the union, so the searches always succeed.
            if let (Ok(row), Ok(col)) = (labels.binary_search(t), labels.binary_search(p)) {
                counts[row][col] += 1;
            }
        }
        Ok(ConfusionMatrix { labels, counts })
    }

    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    pub fn counts(&self) -> &[Vec<usize>] {
        &self.counts
    }

    /// Number of samples with true label `truth` predicted as `predicted`.
    pub fn count(&self, truth: &L, predicted: &L) -> usize {
        match (self.labels.binary_search(truth), self.labels.binary_search(predicted)) {
            (Ok(row), Ok(col)) => self.counts[row][col],
            _ => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|row| row.iter().sum::<usize>()).sum()
    }

    /// Trace over total.
    pub fn accuracy(&self) -> f64 {
        let diagonal: usize = (0..self.labels.len()).map(|i| self.counts[i][i]).sum();
        diagonal as f64 / self.total() as f64
    }
}

impl<L: fmt::Display> fmt::Display for ConfusionMatrix<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .labels
            .iter()
            .map(|l| l.to_string().len())
            .chain(self.counts.iter().flatten().map(|c| c.to_string().len()))
            .max()
            .unwrap_or(1)
            .max(4);

        write!(f, "{:>width$}", "t\\p")?;
        for label in &self.labels {
            write!(f, " {:>width$}", label)?;
        }
        writeln!(f)?;
        for (label, row) in self.labels.iter().zip(&self.counts) {
            write!(f, "{:>width$}", label)?;
            for count in row {
                write!(f, " {:>width$}", count)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
