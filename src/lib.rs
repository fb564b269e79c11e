//! log-sentinel - Unsupervised anomaly detection for textual log streams
//!
//! Learns a statistical notion of "normal" from a training corpus of log
//! lines and scores new lines against it, without labeled examples:
//!
//! - [`features`] - TF-IDF vectorization of raw log lines
//! - [`anomaly`] - Isolation Forest scoring and contamination-based labeling
//! - [`detector`] - The train/predict facade combining both
//!
//! # Example
//!
//! ```no_run
//! use log_sentinel::prelude::*;
//!
//! let baseline: Vec<String> = vec![
//!     "200 OK: GET /api/v1/users/profile - Latency 120ms".to_string(),
//!     "INFO: Cache refreshed successfully via Redis".to_string(),
//! ];
//! let live: Vec<String> = vec![
//!     "401 Unauthorized: Failed login attempt from IP 192.168.1.50".to_string(),
//! ];
//!
//! let mut detector = LogAnomalyDetector::new(DetectorConfig::default());
//! detector.train(&baseline)?;
//! for result in detector.predict(&live)? {
//!     println!("{} {}", result.verdict, result.line);
//! }
//! # Ok::<(), log_sentinel::SentinelError>(())
//! ```

pub mod anomaly;
pub mod detector;
pub mod error;
pub mod features;

pub use error::{Result, SentinelError};

/// Re-export of commonly used types
pub mod prelude {
    pub use crate::anomaly::{IsolationForest, Verdict};
    pub use crate::detector::{DetectorConfig, LogAnomalyDetector, ScoreResult};
    pub use crate::error::{Result, SentinelError};
    pub use crate::features::{LogTokenizer, TfidfVectorizer};
}
