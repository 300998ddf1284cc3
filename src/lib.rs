//! A home-made k-nearest-neighbors classifier and the classroom exercise around it.
//!
//! The classifier is brute force on purpose: `fit` only binds the training
//! set, `predict` computes every query-to-training squared Euclidean distance,
//! keeps the k nearest and takes a majority vote.
//!
//! ```
//! use knn_classroom::KnnClassifier;
//!
//! let features = vec![vec![0.0, 0.0], vec![0.1, 0.0], vec![5.0, 5.0]];
//! let labels = vec![0, 0, 1];
//! let mut knn = KnnClassifier::new(1);
//! knn.fit(&features, &labels)?;
//! assert_eq!(knn.predict(&[vec![4.0, 4.5]])?, vec![1]);
//! # Ok::<(), knn_classroom::KnnError>(())
//! ```

pub mod common_types;
pub mod config;
pub mod curves;
pub mod datasets;
pub mod error;
pub mod frontier;
pub mod knn;
pub mod metrics;

#[cfg(feature = "python")]
mod python;

pub use common_types::{DataPoint, Dataset};
pub use config::ExperimentConfig;
pub use curves::{ErrorCurve, LooCurve};
pub use error::{KnnError, Result};
pub use frontier::DecisionGrid;
pub use knn::heap_utils::Neighbor;
pub use knn::{majority_vote, squared_euclidean_distance, KnnClassifier};
pub use metrics::{accuracy_score, ConfusionMatrix};
