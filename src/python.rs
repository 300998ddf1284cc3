//! Python bindings, built with `--features python` (e.g. through maturin).

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::error::KnnError;
use crate::knn::{squared_euclidean_distance, KnnClassifier};
use crate::metrics::accuracy_score;

impl From<KnnError> for PyErr {
    fn from(err: KnnError) -> Self {
        match err {
            KnnError::UnfittedModel => PyRuntimeError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// Squared Euclidean distance between two vectors of f64.
#[pyfunction]
fn squared_euclidean_distance_py(a: Vec<f64>, b: Vec<f64>) -> PyResult<f64> {
    if a.len() != b.len() {
        return Err(KnnError::DimensionMismatch { expected: a.len(), found: b.len() }.into());
    }
    Ok(squared_euclidean_distance(&a, &b))
}

#[pyfunction]
fn accuracy_score_py(y_true: Vec<i64>, y_pred: Vec<i64>) -> PyResult<f64> {
    Ok(accuracy_score(&y_true, &y_pred)?)
}

/// Python-facing classifier. It owns a copy of the training data and binds a
/// borrowing `KnnClassifier` to it on each call, since fitting only records
/// references.
#[pyclass(name = "KnnClassifier")]
struct PyKnnClassifier {
    n_neighbors: usize,
    training: Option<(Vec<Vec<f64>>, Vec<i64>)>,
}

impl PyKnnClassifier {
    fn with_fitted<T>(&self, f: impl FnOnce(&KnnClassifier<'_, f64, i64>) -> crate::Result<T>) -> PyResult<T> {
        let (features, labels) = self.training.as_ref().ok_or(KnnError::UnfittedModel)?;
        let mut classifier = KnnClassifier::new(self.n_neighbors);
        classifier.fit(features, labels)?;
        Ok(f(&classifier)?)
    }
}

#[pymethods]
impl PyKnnClassifier {
    #[new]
    #[pyo3(signature = (n_neighbors = 1))]
    fn new(n_neighbors: usize) -> Self {
        PyKnnClassifier {
            n_neighbors,
            training: None,
        }
    }

    /// Validates and stores `(X, y)`. A failed fit keeps the previous training set.
    fn fit(&mut self, features: Vec<Vec<f64>>, labels: Vec<i64>) -> PyResult<()> {
        KnnClassifier::new(self.n_neighbors).fit(&features, &labels)?;
        self.training = Some((features, labels));
        Ok(())
    }

    fn predict(&self, features: Vec<Vec<f64>>) -> PyResult<Vec<i64>> {
        self.with_fitted(|c| c.predict(&features))
    }

    fn predict_single(&self, features: Vec<f64>) -> PyResult<i64> {
        self.with_fitted(|c| c.predict_single(&features))
    }

    fn score(&self, features: Vec<Vec<f64>>, labels: Vec<i64>) -> PyResult<f64> {
        self.with_fitted(|c| c.score(&features, &labels))
    }

    #[getter]
    fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }
}

/// The function name is the Python module name; `pyproject.toml` sets the
/// same `module-name` for maturin.
#[pymodule]
fn knn_classroom_py(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(squared_euclidean_distance_py, m)?)?;
    m.add_function(wrap_pyfunction!(accuracy_score_py, m)?)?;
    m.add_class::<PyKnnClassifier>()?;
    Ok(())
}
