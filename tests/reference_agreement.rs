//! Agreement with smartcore's KNN classifier on a seeded two-class Gaussian mixture.

use knn_classroom::datasets::rand_bi_gauss;
use knn_classroom::{accuracy_score, squared_euclidean_distance, Dataset, KnnClassifier};
use rand::rngs::StdRng;
use rand::SeedableRng;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::metrics::distance::euclidian::Euclidian;
use smartcore::neighbors::knn_classifier::{KNNClassifier, KNNClassifierParameters};

fn bi_gauss_split(seed: u64) -> (Dataset<f64, i32>, Dataset<f64, i32>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = rand_bi_gauss(&mut rng, 50, 50, &[1.0, 1.0], &[-1.0, -1.0], &[0.9, 0.9], &[0.9, 0.9]).unwrap();
    data.split_alternating()
}

fn smartcore_predict(train: &Dataset<f64, i32>, test: &Dataset<f64, i32>, k: usize) -> Vec<i32> {
    let x_train = DenseMatrix::from_2d_vec(&train.features);
    let x_test = DenseMatrix::from_2d_vec(&test.features);
    let knn: KNNClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>, Euclidian<f64>> =
        KNNClassifier::fit(&x_train, &train.labels, KNNClassifierParameters::default().with_k(k)).unwrap();
    knn.predict(&x_test).unwrap()
}

#[test]
fn test_accuracy_matches_smartcore_for_odd_k() {
    // Odd k with two classes cannot produce a vote tie, and continuous data
    // has no exact distance ties, so both implementations see the same votes.
    // smartcore refuses k = 1; that case is checked by hand below.
    let (train, test) = bi_gauss_split(42);
    assert_eq!(train.len(), 50);
    assert_eq!(test.len(), 50);

    for k in [3, 5, 11, 21] {
        let mut knn = KnnClassifier::new(k);
        knn.fit(&train.features, &train.labels).unwrap();
        let ours = knn.predict(&test.features).unwrap();
        let theirs = smartcore_predict(&train, &test, k);

        assert_eq!(ours, theirs, "predictions differ for k={}", k);
        let acc_ours = accuracy_score(&test.labels, &ours).unwrap();
        let acc_theirs = accuracy_score(&test.labels, &theirs).unwrap();
        assert!((acc_ours - acc_theirs).abs() < 1e-12, "k={}: {} vs {}", k, acc_ours, acc_theirs);
    }
}

#[test]
fn test_agreement_holds_across_seeds() {
    for seed in [1, 7, 2024] {
        let (train, test) = bi_gauss_split(seed);
        let mut knn = KnnClassifier::new(5);
        let acc_ours = knn.fit(&train.features, &train.labels).unwrap().score(&test.features, &test.labels).unwrap();
        let acc_theirs = accuracy_score(&test.labels, &smartcore_predict(&train, &test, 5)).unwrap();
        assert!((acc_ours - acc_theirs).abs() < 1e-12, "seed={}: {} vs {}", seed, acc_ours, acc_theirs);
        // Well separated blobs: both should do far better than chance.
        assert!(acc_ours > 0.75, "seed={}: accuracy {}", seed, acc_ours);
    }
}

#[test]
fn test_one_neighbor_matches_exhaustive_nearest() {
    let (train, test) = bi_gauss_split(42);
    let mut knn = KnnClassifier::new(1);
    knn.fit(&train.features, &train.labels).unwrap();
    let ours = knn.predict(&test.features).unwrap();

    for (query, predicted) in test.features.iter().zip(&ours) {
        let mut nearest = 0;
        for (i, row) in train.features.iter().enumerate() {
            if squared_euclidean_distance(query, row) < squared_euclidean_distance(query, &train.features[nearest]) {
                nearest = i;
            }
        }
        assert_eq!(*predicted, train.labels[nearest]);
    }
}
