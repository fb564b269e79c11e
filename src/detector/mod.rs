//! Log anomaly detection facade
//!
//! Ties the vectorizer, the isolation forest, and the verdict classifier
//! together behind a train/predict surface. A detector learns a baseline of
//! normal behavior from a historical corpus and scans live lines against it.

use crate::anomaly::{classifier, IsolationForest, Verdict};
use crate::error::{Result, SentinelError};
use crate::features::TfidfVectorizer;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Expected proportion of anomalies in a scanned stream, in (0, 1)
    pub contamination: f64,
    /// Number of isolation trees
    pub n_estimators: usize,
    /// Subsample size per tree, capped at the corpus size
    pub max_samples: usize,
    /// Base random seed; fixed by default so runs are reproducible
    pub seed: u64,
    /// Weight of the out-of-vocabulary novelty signal in the final score,
    /// in [0, 1); the isolation forest carries the rest
    pub novelty_weight: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            contamination: 0.1,
            n_estimators: 100,
            max_samples: 256,
            seed: 42,
            novelty_weight: 0.5,
        }
    }
}

impl DetectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contamination(mut self, contamination: f64) -> Self {
        self.contamination = contamination;
        self
    }

    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    pub fn with_max_samples(mut self, n: usize) -> Self {
        self.max_samples = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_novelty_weight(mut self, weight: f64) -> Self {
        self.novelty_weight = weight;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.contamination > 0.0 && self.contamination < 1.0) {
            return Err(SentinelError::InvalidParameter {
                name: "contamination".to_string(),
                value: self.contamination.to_string(),
                reason: "must lie strictly between 0 and 1".to_string(),
            });
        }
        if !(self.novelty_weight >= 0.0 && self.novelty_weight < 1.0) {
            return Err(SentinelError::InvalidParameter {
                name: "novelty_weight".to_string(),
                value: self.novelty_weight.to_string(),
                reason: "must lie in [0, 1)".to_string(),
            });
        }
        Ok(())
    }
}

/// Verdict for a single scanned line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    /// The original log line
    pub line: String,
    /// Continuous anomaly score in (0, 1]; higher is more anomalous
    pub score: f64,
    pub verdict: Verdict,
}

impl ScoreResult {
    pub fn is_anomaly(&self) -> bool {
        self.verdict.is_anomaly()
    }
}

/// Unsupervised log anomaly detector
///
/// `train` establishes the operational baseline from historical normal logs;
/// `predict` scans a stream of live lines and returns a score and verdict per
/// line. The trained model is an explicit value: it is immutable after
/// `train` and can be shared read-only across concurrent `predict` calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogAnomalyDetector {
    config: DetectorConfig,
    vectorizer: TfidfVectorizer,
    forest: IsolationForest,
}

impl LogAnomalyDetector {
    pub fn new(config: DetectorConfig) -> Self {
        let forest = IsolationForest::new()
            .with_n_estimators(config.n_estimators)
            .with_max_samples(config.max_samples)
            .with_seed(config.seed);
        Self {
            config,
            vectorizer: TfidfVectorizer::new(),
            forest,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn is_trained(&self) -> bool {
        self.vectorizer.is_fitted() && self.forest.is_fitted()
    }

    /// Learn the baseline patterns of normal operation.
    ///
    /// A second call replaces the model wholesale; there is no incremental
    /// update.
    pub fn train(&mut self, lines: &[String]) -> Result<()> {
        self.config.validate()?;

        info!(lines = lines.len(), "learning log patterns");

        let x = self.vectorizer.fit_transform(lines)?;
        self.forest = IsolationForest::new()
            .with_n_estimators(self.config.n_estimators)
            .with_max_samples(self.config.max_samples)
            .with_seed(self.config.seed);
        self.forest.fit(&x)?;

        info!(
            vocabulary = self.vectorizer.vocabulary_len(),
            "operational baseline established"
        );
        Ok(())
    }

    /// Scan a stream of live lines for anomalies.
    ///
    /// Each line's score is a weighted blend of two signals: the isolation
    /// forest's estimate of how easily its feature vector separates from the
    /// training population, and the line's out-of-vocabulary novelty. The
    /// forest alone cannot see novelty: unknown tokens carry no feature
    /// weight, so a line of unrecognized vocabulary collapses toward the
    /// origin, which agrees with the sparse majority on every axis and rides
    /// the densest partition path. The novelty channel is what flags such
    /// lines as anomalous.
    ///
    /// Returns one result per input line, in input order. The decision
    /// threshold is the configured contamination-rate quantile of this
    /// stream's score distribution.
    pub fn predict(&self, lines: &[String]) -> Result<Vec<ScoreResult>> {
        if !self.is_trained() {
            return Err(SentinelError::NotTrained);
        }

        debug!(lines = lines.len(), "scanning live lines");

        let x = self.vectorizer.transform(lines)?;
        let isolation = self.forest.score_samples(&x)?;

        let w = self.config.novelty_weight;
        let mut scores = Vec::with_capacity(lines.len());
        for (line, &iso) in lines.iter().zip(isolation.iter()) {
            let novelty = self.vectorizer.novelty(line)?;
            scores.push((1.0 - w) * iso + w * novelty);
        }

        let verdicts = classifier::label(&scores, self.config.contamination);

        let results: Vec<ScoreResult> = lines
            .iter()
            .zip(scores)
            .zip(verdicts)
            .map(|((line, score), verdict)| ScoreResult {
                line: line.clone(),
                score,
                verdict,
            })
            .collect();

        debug!(
            anomalies = results.iter().filter(|r| r.is_anomaly()).count(),
            "scan complete"
        );
        Ok(results)
    }
}

impl Default for LogAnomalyDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}
