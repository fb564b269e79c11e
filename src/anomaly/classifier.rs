//! Contamination-based verdict labeling

use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-line verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Normal,
    Anomaly,
}

impl Verdict {
    pub fn is_anomaly(self) -> bool {
        matches!(self, Verdict::Anomaly)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Normal => write!(f, "Normal"),
            Verdict::Anomaly => write!(f, "ANOMALY"),
        }
    }
}

/// Empirical quantile of `values` at `q` in [0, 1], with linear interpolation
/// between order statistics. `values` must be non-empty; the public surface
/// for empty-safe thresholding is [`decision_threshold`].
pub(crate) fn quantile(values: &[f64], q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}

/// Decision threshold for a score distribution: the (1 - contamination)
/// quantile. Returns `None` for an empty distribution.
pub fn decision_threshold(scores: &[f64], contamination: f64) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    Some(quantile(scores, 1.0 - contamination))
}

/// Label each score against the contamination-rate quantile threshold.
///
/// A score at or above the threshold is an anomaly, reproducing "flag the
/// top `contamination` fraction by score"; scores tied at the threshold are
/// included, so groups of identical inputs are labeled together. When every
/// score is identical nothing exceeds the threshold and everything is
/// labeled normal; that is the expected boundary behavior, not a defect.
/// Pure function: an empty input yields an empty output, never an error.
pub fn label(scores: &[f64], contamination: f64) -> Vec<Verdict> {
    let Some(threshold) = decision_threshold(scores, contamination) else {
        return Vec::new();
    };

    // Flat distribution: there is no top fraction to flag
    if scores.iter().all(|&s| s == scores[0]) {
        return vec![Verdict::Normal; scores.len()];
    }

    scores
        .iter()
        .map(|&s| {
            if s >= threshold {
                Verdict::Anomaly
            } else {
                Verdict::Normal
            }
        })
        .collect()
}
