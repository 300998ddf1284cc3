//! Constants of the exercise run, gathered in one place.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters of one two-dimensional Gaussian class.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GaussianClass {
    pub n: usize,
    pub mu: [f64; 2],
    pub sigma: [f64; 2],
}

impl GaussianClass {
    pub const fn new(n: usize, mu: [f64; 2], sigma: [f64; 2]) -> Self {
        GaussianClass { n, mu, sigma }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClownConfig {
    pub n1: usize,
    pub n2: usize,
    pub sigma1: f64,
    pub sigma2: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CheckersConfig {
    pub n1: usize,
    pub n2: usize,
    pub sigma: f64,
}

/// Everything the `knn-exercise` binary needs to reproduce a run.
///
/// `Default` carries the values of the classroom session.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExperimentConfig {
    pub seed: u64,
    pub gauss: GaussianClass,
    pub bi_gauss: [GaussianClass; 2],
    pub tri_gauss: [GaussianClass; 3],
    pub clown: ClownConfig,
    pub checkers: CheckersConfig,
    /// k used to compare the home-made classifier with the reference.
    pub compare_k: usize,
    pub frontier_k: usize,
    pub frontier_step: usize,
    pub sweep_k: Vec<usize>,
    /// Larger checkerboard used for the held-out error curve.
    pub error_curve_checkers: CheckersConfig,
    pub error_curve_k: Vec<usize>,
    pub digits_k: Vec<usize>,
    pub confusion_k: usize,
    pub loo_k: Vec<usize>,
    /// Held-out draws per k for the leave-one-out curve.
    pub loo_iterations: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            seed: 42,
            gauss: GaussianClass::new(100, [1.0, 1.0], [1.0, 1.0]),
            bi_gauss: [
                GaussianClass::new(20, [1.0, 1.0], [0.9, 0.9]),
                GaussianClass::new(20, [-1.0, -1.0], [0.9, 0.9]),
            ],
            tri_gauss: [
                GaussianClass::new(50, [1.0, 1.0], [0.9, 0.9]),
                GaussianClass::new(50, [-1.0, -1.0], [0.9, 0.9]),
                GaussianClass::new(50, [1.0, -1.0], [0.9, 0.9]),
            ],
            clown: ClownConfig {
                n1: 50,
                n2: 50,
                sigma1: 0.01,
                sigma2: 0.1,
            },
            checkers: CheckersConfig {
                n1: 150,
                n2: 150,
                sigma: 0.1,
            },
            compare_k: 10,
            frontier_k: 5,
            frontier_step: 50,
            sweep_k: (1..=10).collect(),
            error_curve_checkers: CheckersConfig {
                n1: 500,
                n2: 500,
                sigma: 0.1,
            },
            error_curve_k: (1..50).collect(),
            digits_k: (1..50).step_by(5).collect(),
            confusion_k: 3,
            loo_k: (1..50).collect(),
            loo_iterations: 200,
        }
    }
}
