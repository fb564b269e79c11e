//! Isolation Forest outlier scoring

use crate::error::{Result, SentinelError};
use ndarray::{Array1, Array2};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Euler-Mascheroni constant, used in the path-length correction.
const EULER_GAMMA: f64 = 0.577_215_664_9;

/// Tolerance below which a feature is considered constant across a subset.
const CONST_EPS: f64 = 1e-10;

/// Isolation Tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IsolationTree {
    /// Internal node with a random split
    Internal {
        /// Feature index for the split
        feature: usize,
        /// Split threshold
        threshold: f64,
        /// Left subtree (values < threshold)
        left: Box<IsolationTree>,
        /// Right subtree (values >= threshold)
        right: Box<IsolationTree>,
    },
    /// External (leaf) node
    External {
        /// Number of training samples that terminated here
        size: usize,
    },
}

impl IsolationTree {
    /// Build an isolation tree over the rows of `x` selected by `indices`.
    pub fn build(
        x: &Array2<f64>,
        indices: &[usize],
        height: usize,
        max_height: usize,
        rng: &mut impl Rng,
    ) -> Self {
        let n_samples = indices.len();

        if height >= max_height || n_samples <= 1 {
            return IsolationTree::External { size: n_samples };
        }

        // Candidate features are those with non-constant value across the
        // subset; if every feature is constant the points are
        // indistinguishable and the node terminates early.
        let candidates: Vec<(usize, f64, f64)> = (0..x.ncols())
            .filter_map(|feature| {
                let mut min_val = f64::INFINITY;
                let mut max_val = f64::NEG_INFINITY;
                for &i in indices {
                    let v = x[[i, feature]];
                    min_val = min_val.min(v);
                    max_val = max_val.max(v);
                }
                if max_val - min_val > CONST_EPS {
                    Some((feature, min_val, max_val))
                } else {
                    None
                }
            })
            .collect();

        if candidates.is_empty() {
            return IsolationTree::External { size: n_samples };
        }

        let (feature, min_val, max_val) = candidates[rng.gen_range(0..candidates.len())];
        let threshold = rng.gen_range(min_val..max_val);

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[[i, feature]] < threshold);

        // A threshold drawn exactly at the minimum leaves one side empty
        if left_indices.is_empty() || right_indices.is_empty() {
            return IsolationTree::External { size: n_samples };
        }

        let left = Box::new(Self::build(x, &left_indices, height + 1, max_height, rng));
        let right = Box::new(Self::build(x, &right_indices, height + 1, max_height, rng));

        IsolationTree::Internal {
            feature,
            threshold,
            left,
            right,
        }
    }

    /// Path length for a sample: depth of the leaf it reaches, plus the
    /// correction for leaves holding more than one point.
    pub fn path_length(&self, sample: &[f64], current_height: usize) -> f64 {
        match self {
            IsolationTree::External { size } => current_height as f64 + Self::c(*size),
            IsolationTree::Internal {
                feature,
                threshold,
                left,
                right,
            } => {
                if sample[*feature] < *threshold {
                    left.path_length(sample, current_height + 1)
                } else {
                    right.path_length(sample, current_height + 1)
                }
            }
        }
    }

    /// Average path length of unsuccessful BST search over `m` points:
    /// c(m) = 2 * (ln(m-1) + gamma) - 2 * (m-1) / m for m > 1, else 0.
    pub(crate) fn c(m: usize) -> f64 {
        if m <= 1 {
            0.0
        } else {
            let m_f = m as f64;
            2.0 * ((m_f - 1.0).ln() + EULER_GAMMA) - 2.0 * (m_f - 1.0) / m_f
        }
    }
}

/// Isolation Forest anomaly scorer
///
/// An ensemble of randomized partition trees, each grown from an independent
/// subsample of the training vectors. Points in sparse regions of feature
/// space are isolated in fewer splits, so a short average path length across
/// the ensemble signals an anomaly. For a fixed seed the whole forest is
/// reproducible: tree `i` draws its subsample and splits from a ChaCha8 rng
/// seeded with `seed + i`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationForest {
    /// Number of trees
    n_estimators: usize,
    /// Subsample size per tree, capped at the corpus size during fit
    max_samples: usize,
    /// Base random seed
    seed: u64,
    /// Fitted trees
    trees: Option<Vec<IsolationTree>>,
    /// Actual subsample size used during fit
    sample_size: Option<usize>,
}

impl IsolationForest {
    pub fn new() -> Self {
        Self {
            n_estimators: 100,
            max_samples: 256,
            seed: 42,
            trees: None,
            sample_size: None,
        }
    }

    /// Set number of trees
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n.max(1);
        self
    }

    /// Set subsample size per tree
    pub fn with_max_samples(mut self, n: usize) -> Self {
        self.max_samples = n.max(2);
        self
    }

    /// Set base random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn is_fitted(&self) -> bool {
        self.trees.is_some()
    }

    /// Build the ensemble from training vectors.
    ///
    /// Tree construction fans out across the rayon pool; each tree owns an
    /// independent rng, so the result is identical regardless of scheduling.
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<()> {
        let n_samples = x.nrows();
        if n_samples < 2 {
            return Err(SentinelError::InsufficientData {
                needed: 2,
                available: n_samples,
            });
        }

        let sample_size = self.max_samples.min(n_samples);
        let max_height = (sample_size as f64).log2().ceil() as usize;
        let base_seed = self.seed;

        let trees: Vec<IsolationTree> = (0..self.n_estimators)
            .into_par_iter()
            .map(|tree_idx| {
                let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(tree_idx as u64));
                // Subsample without replacement
                let indices = rand::seq::index::sample(&mut rng, n_samples, sample_size).into_vec();
                IsolationTree::build(x, &indices, 0, max_height, &mut rng)
            })
            .collect();

        self.trees = Some(trees);
        self.sample_size = Some(sample_size);

        Ok(())
    }

    /// Anomaly score per row, in (0, 1]: s(x) = 2^(-E[h(x)] / c(psi)).
    ///
    /// Near 1 means strongly anomalous (short average path); near 0.5 or
    /// below means normal.
    pub fn score_samples(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let trees = self.trees.as_ref().ok_or(SentinelError::NotTrained)?;
        let sample_size = self.sample_size.ok_or(SentinelError::NotTrained)?;
        let c_psi = IsolationTree::c(sample_size);

        let scores: Vec<f64> = (0..x.nrows())
            .into_par_iter()
            .map(|i| {
                let sample: Vec<f64> = x.row(i).iter().copied().collect();

                let avg_path_length: f64 = trees
                    .iter()
                    .map(|tree| tree.path_length(&sample, 0))
                    .sum::<f64>()
                    / trees.len() as f64;

                2.0_f64.powf(-avg_path_length / c_psi)
            })
            .collect();

        Ok(Array1::from_vec(scores))
    }
}

impl Default for IsolationForest {
    fn default() -> Self {
        Self::new()
    }
}
