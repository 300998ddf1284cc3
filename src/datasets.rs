//! Synthetic 2D datasets used by the exercise: Gaussian blobs, the "clown" and the checkerboard.
//!
//! Every generator draws from the RNG it is given, so a seeded `StdRng`
//! reproduces a dataset exactly. Labeled generators shuffle their output.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal, StandardNormal};

use crate::common_types::Dataset;
use crate::error::{KnnError, Result};

fn normal(mean: f64, std_dev: f64) -> Result<Normal<f64>> {
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(KnnError::InvalidParameter(format!(
            "standard deviation must be finite and non-negative, got {std_dev}"
        )));
    }
    Normal::new(mean, std_dev).map_err(|e| KnnError::InvalidParameter(e.to_string()))
}

fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}

/// Applies one random permutation to rows and labels together.
fn shuffled<R: Rng + ?Sized>(rng: &mut R, features: Vec<Vec<f64>>, labels: Vec<i32>) -> Dataset<f64, i32> {
    let mut rows: Vec<(Vec<f64>, i32)> = features.into_iter().zip(labels).collect();
    rows.shuffle(rng);
    let (features, labels) = rows.into_iter().unzip();
    Dataset::new(features, labels)
}

/// `n` points whose coordinate `d` follows N(`mu[d]`, `sigma[d]`).
pub fn rand_gauss<R: Rng + ?Sized>(rng: &mut R, n: usize, mu: &[f64], sigma: &[f64]) -> Result<Vec<Vec<f64>>> {
    if mu.len() != sigma.len() {
        return Err(KnnError::DimensionMismatch {
            expected: mu.len(),
            found: sigma.len(),
        });
    }
    let axes = mu
        .iter()
        .zip(sigma)
        .map(|(&m, &s)| normal(m, s))
        .collect::<Result<Vec<_>>>()?;

    Ok((0..n)
        .map(|_| axes.iter().map(|axis| axis.sample(rng)).collect())
        .collect())
}

/// Two Gaussian classes: `n1` points labeled `1`, `n2` points labeled `-1`.
pub fn rand_bi_gauss<R: Rng + ?Sized>(
    rng: &mut R,
    n1: usize,
    n2: usize,
    mu1: &[f64],
    mu2: &[f64],
    sigma1: &[f64],
    sigma2: &[f64],
) -> Result<Dataset<f64, i32>> {
    if mu1.len() != mu2.len() {
        return Err(KnnError::DimensionMismatch {
            expected: mu1.len(),
            found: mu2.len(),
        });
    }
    let mut features = rand_gauss(rng, n1, mu1, sigma1)?;
    features.extend(rand_gauss(rng, n2, mu2, sigma2)?);
    let labels = std::iter::repeat(1).take(n1).chain(std::iter::repeat(-1).take(n2)).collect();
    Ok(shuffled(rng, features, labels))
}

/// Three Gaussian classes labeled `1`, `2` and `3`.
#[allow(clippy::too_many_arguments)]
pub fn rand_tri_gauss<R: Rng + ?Sized>(
    rng: &mut R,
    n1: usize,
    n2: usize,
    n3: usize,
    mu1: &[f64],
    mu2: &[f64],
    mu3: &[f64],
    sigma1: &[f64],
    sigma2: &[f64],
    sigma3: &[f64],
) -> Result<Dataset<f64, i32>> {
    if mu1.len() != mu2.len() || mu1.len() != mu3.len() {
        let found = if mu1.len() != mu2.len() { mu2.len() } else { mu3.len() };
        return Err(KnnError::DimensionMismatch {
            expected: mu1.len(),
            found,
        });
    }
    let mut features = rand_gauss(rng, n1, mu1, sigma1)?;
    features.extend(rand_gauss(rng, n2, mu2, sigma2)?);
    features.extend(rand_gauss(rng, n3, mu3, sigma3)?);
    let labels = [(1, n1), (2, n2), (3, n3)]
        .into_iter()
        .flat_map(|(label, n)| std::iter::repeat(label).take(n))
        .collect();
    Ok(shuffled(rng, features, labels))
}

/// A parabola (`1`) above a small blob (`-1`).
///
/// Class `1`: x0 ~ N(0, 1), x1 = x0² + `sigma1`·N(0, 1).
/// Class `-1`: (`sigma2`·N(0, 1) − 1, `sigma2`·N(0, 1) + 2).
pub fn rand_clown<R: Rng + ?Sized>(
    rng: &mut R,
    n1: usize,
    n2: usize,
    sigma1: f64,
    sigma2: f64,
) -> Result<Dataset<f64, i32>> {
    let noise1 = normal(0.0, sigma1)?;
    let noise2 = normal(0.0, sigma2)?;

    let mut features = Vec::with_capacity(n1 + n2);
    for _ in 0..n1 {
        let x0 = standard_normal(rng);
        features.push(vec![x0, x0 * x0 + noise1.sample(rng)]);
    }
    for _ in 0..n2 {
        features.push(vec![noise2.sample(rng) - 1.0, noise2.sample(rng) + 2.0]);
    }
    let labels = std::iter::repeat(1).take(n1).chain(std::iter::repeat(-1).take(n2)).collect();
    Ok(shuffled(rng, features, labels))
}

/// A 4×4 checkerboard on [-2, 2)².
///
/// Cells with even `i + j` hold `n1 / 8` points labeled `1`, odd cells hold
/// `n2 / 8` points labeled `-1`; each coordinate is the cell corner plus
/// U(0, 1) plus `sigma`·N(0, 1).
pub fn rand_checkers<R: Rng + ?Sized>(rng: &mut R, n1: usize, n2: usize, sigma: f64) -> Result<Dataset<f64, i32>> {
    let noise = normal(0.0, sigma)?;
    let per_positive_cell = n1 / 8;
    let per_negative_cell = n2 / 8;

    let mut features = Vec::with_capacity(8 * (per_positive_cell + per_negative_cell));
    let mut labels = Vec::with_capacity(features.capacity());
    for i in -2i32..2 {
        for j in -2i32..2 {
            let (count, label) = if (i + j).rem_euclid(2) == 0 {
                (per_positive_cell, 1)
            } else {
                (per_negative_cell, -1)
            };
            for _ in 0..count {
                let x = f64::from(i) + rng.gen::<f64>() + noise.sample(rng);
                let y = f64::from(j) + rng.gen::<f64>() + noise.sample(rng);
                features.push(vec![x, y]);
                labels.push(label);
            }
        }
    }
    Ok(shuffled(rng, features, labels))
}
