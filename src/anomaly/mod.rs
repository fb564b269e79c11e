//! Ensemble-based outlier scoring and verdict labeling
//!
//! The isolation forest estimates how easily each feature vector is isolated
//! from the training population; the classifier turns raw scores into
//! Normal/Anomaly verdicts via a contamination-rate quantile threshold.

pub mod classifier;
mod isolation_forest;

pub use classifier::Verdict;
pub use isolation_forest::{IsolationForest, IsolationTree};
