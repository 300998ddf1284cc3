//! Property-based tests for the brute-force classifier.
//!
//! These tests verify invariants that should hold regardless of input:
//! - predictions are deterministic and one per query, in order
//! - the bounded-heap neighborhood equals a full stable sort
//! - k = 1 recalls the label of an exact training point

use knn_classroom::{majority_vote, squared_euclidean_distance, KnnClassifier};
use proptest::prelude::*;

prop_compose! {
    fn arb_training_set(dim: usize)(
        rows in prop::collection::vec(prop::collection::vec(-10.0f64..10.0, dim), 1..40),
    )(
        labels in prop::collection::vec(0i32..4, rows.len()),
        rows in Just(rows),
    ) -> (Vec<Vec<f64>>, Vec<i32>) {
        (rows, labels)
    }
}

fn arb_queries(dim: usize) -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(prop::collection::vec(-12.0f64..12.0, dim), 0..20)
}

/// Full stable sort of training indices by distance, then the same vote.
fn reference_predict(train: &[Vec<f64>], labels: &[i32], k: usize, query: &[f64]) -> (Vec<usize>, i32) {
    let mut order: Vec<usize> = (0..train.len()).collect();
    order.sort_by(|&a, &b| {
        squared_euclidean_distance(query, &train[a])
            .partial_cmp(&squared_euclidean_distance(query, &train[b]))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order.truncate(k);
    let label = majority_vote(order.iter().map(|&i| &labels[i])).unwrap_or_default();
    (order, label)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn predict_is_deterministic_and_shaped(
        (train, labels) in arb_training_set(3),
        queries in arb_queries(3),
        k_seed in 1usize..40,
    ) {
        let k = 1 + (k_seed - 1) % train.len();
        let mut knn = KnnClassifier::new(k);
        knn.fit(&train, &labels).unwrap();

        let first = knn.predict(&queries).unwrap();
        let second = knn.predict(&queries).unwrap();
        prop_assert_eq!(first.len(), queries.len());
        prop_assert_eq!(&first, &second);
        for (query, label) in queries.iter().zip(&first) {
            prop_assert_eq!(knn.predict_single(query).unwrap(), *label);
        }
    }

    #[test]
    fn heap_selection_matches_stable_sort(
        (train, labels) in arb_training_set(2),
        queries in arb_queries(2),
        k_seed in 1usize..40,
    ) {
        let k = 1 + (k_seed - 1) % train.len();
        let mut knn = KnnClassifier::new(k);
        knn.fit(&train, &labels).unwrap();

        let neighborhoods = knn.kneighbors(&queries).unwrap();
        let predictions = knn.predict(&queries).unwrap();
        for ((query, neighbors), predicted) in queries.iter().zip(&neighborhoods).zip(&predictions) {
            let (expected_indices, expected_label) = reference_predict(&train, &labels, k, query);
            let indices: Vec<usize> = neighbors.iter().map(|n| n.index).collect();
            prop_assert_eq!(indices, expected_indices);
            prop_assert_eq!(*predicted, expected_label);
        }
    }

    #[test]
    fn snapped_grid_ties_match_stable_sort(
        rows in prop::collection::vec(prop::collection::vec(-3i32..3, 2), 2..30),
        query in prop::collection::vec(-3i32..3, 2),
        k_seed in 1usize..30,
    ) {
        // Integer coordinates produce many exact distance ties.
        let train: Vec<Vec<f64>> = rows.iter().map(|r| r.iter().map(|&v| f64::from(v)).collect()).collect();
        let labels: Vec<i32> = (0..train.len() as i32).map(|i| i % 3).collect();
        let query: Vec<f64> = query.iter().map(|&v| f64::from(v)).collect();
        let k = 1 + (k_seed - 1) % train.len();

        let mut knn = KnnClassifier::new(k);
        knn.fit(&train, &labels).unwrap();
        let (expected_indices, expected_label) = reference_predict(&train, &labels, k, &query);
        let indices: Vec<usize> = knn.kneighbors(&[query.clone()]).unwrap()[0].iter().map(|n| n.index).collect();
        prop_assert_eq!(indices, expected_indices);
        prop_assert_eq!(knn.predict_single(&query).unwrap(), expected_label);
    }

    #[test]
    fn one_neighbor_recalls_unique_points(
        (train, labels) in arb_training_set(4),
    ) {
        let mut knn = KnnClassifier::new(1);
        knn.fit(&train, &labels).unwrap();
        let predictions = knn.predict(&train).unwrap();
        for (i, row) in train.iter().enumerate() {
            // Only points without an exact duplicate earlier in the set are guaranteed.
            if train[..i].iter().all(|other| other != row) {
                prop_assert_eq!(predictions[i], labels[i]);
            }
        }
    }
}
