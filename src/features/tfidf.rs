//! TF-IDF vectorization of log lines

use crate::error::{Result, SentinelError};
use crate::features::tokenizer::LogTokenizer;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Saturation constant for the novelty measure: two out-of-vocabulary
/// tokens push a line's novelty to 0.5.
const NOVELTY_SATURATION: f64 = 2.0;

/// TF-IDF vectorizer over a frozen vocabulary
///
/// `fit` builds the vocabulary and document frequencies from a training
/// corpus; `transform` maps lines into that fixed feature space. Tokens not
/// seen during training are silently ignored at transform time, which is the
/// generalization policy, not an error. A second `fit` replaces the frozen
/// model wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    tokenizer: LogTokenizer,
    /// Token -> dense feature index, in first-seen order
    vocabulary: HashMap<String, usize>,
    /// Number of training documents containing each token, by feature index
    doc_freq: Vec<usize>,
    /// Training corpus size
    n_docs: usize,
    /// Smoothed inverse document frequency per feature; `Some` once fitted
    idf: Option<Array1<f64>>,
}

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self {
            tokenizer: LogTokenizer::default(),
            vocabulary: HashMap::new(),
            doc_freq: Vec::new(),
            n_docs: 0,
            idf: None,
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: LogTokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Learn the vocabulary and document frequencies from a training corpus.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        self.vocabulary.clear();
        self.doc_freq.clear();
        self.idf = None;
        self.n_docs = documents.len();

        for doc in documents {
            let tokens = self.tokenizer.tokenize(doc);

            // Assign indices in first-seen order, then bump the document
            // frequency once per distinct token in this line.
            let mut seen: HashSet<&str> = HashSet::new();
            for token in &tokens {
                if !self.vocabulary.contains_key(token.as_str()) {
                    self.vocabulary.insert(token.clone(), self.vocabulary.len());
                    self.doc_freq.push(0);
                }
                if seen.insert(token.as_str()) {
                    let idx = self.vocabulary[token.as_str()];
                    self.doc_freq[idx] += 1;
                }
            }
        }

        if self.vocabulary.is_empty() {
            return Err(SentinelError::EmptyVocabulary);
        }

        let n = self.n_docs as f64;
        let idf = Array1::from_iter(
            self.doc_freq
                .iter()
                .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0),
        );
        self.idf = Some(idf);

        Ok(())
    }

    /// Map lines into the frozen feature space as L2-normalized TF-IDF rows.
    ///
    /// Lines with no known tokens become the zero vector rather than failing.
    pub fn transform(&self, documents: &[String]) -> Result<Array2<f64>> {
        let idf = self.idf.as_ref().ok_or(SentinelError::NotTrained)?;

        let n_features = self.vocabulary.len();
        let mut result = Array2::zeros((documents.len(), n_features));

        for (doc_idx, doc) in documents.iter().enumerate() {
            for token in self.tokenizer.tokenize(doc) {
                if let Some(&idx) = self.vocabulary.get(token.as_str()) {
                    result[[doc_idx, idx]] += idf[idx];
                }
            }

            let norm: f64 = result
                .row(doc_idx)
                .iter()
                .map(|&v| v * v)
                .sum::<f64>()
                .sqrt();
            if norm > 0.0 {
                for j in 0..n_features {
                    result[[doc_idx, j]] /= norm;
                }
            }
        }

        Ok(result)
    }

    pub fn fit_transform(&mut self, documents: &[String]) -> Result<Array2<f64>> {
        self.fit(documents)?;
        self.transform(documents)
    }

    /// Out-of-vocabulary novelty of a single line, in [0, 1].
    ///
    /// A line built entirely from known tokens scores 0; each unrecognized
    /// token pushes the value toward 1 (`u / (u + 2)` for `u` unknown
    /// occurrences), so lines carrying more unseen vocabulary are more
    /// novel. A line with no usable tokens at all is maximally novel: it has
    /// no recognizable content to compare against the baseline.
    ///
    /// This is the signal the TF-IDF vector cannot carry, since unknown
    /// tokens contribute no weight there by design.
    pub fn novelty(&self, document: &str) -> Result<f64> {
        if self.idf.is_none() {
            return Err(SentinelError::NotTrained);
        }

        let tokens = self.tokenizer.tokenize(document);
        if tokens.is_empty() {
            return Ok(1.0);
        }

        let unknown = tokens
            .iter()
            .filter(|t| !self.vocabulary.contains_key(t.as_str()))
            .count() as f64;
        Ok(unknown / (unknown + NOVELTY_SATURATION))
    }

    /// Dimensionality of the frozen feature space.
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_fitted(&self) -> bool {
        self.idf.is_some()
    }

    /// Tokens in feature-index order.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = vec![String::new(); self.vocabulary.len()];
        for (term, &idx) in &self.vocabulary {
            names[idx] = term.clone();
        }
        names
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<String> {
        vec![
            "database connection established".to_string(),
            "database connection refused".to_string(),
            "cache refreshed successfully".to_string(),
        ]
    }

    #[test]
    fn test_fit_builds_first_seen_vocabulary() {
        let mut vectorizer = TfidfVectorizer::new();
        vectorizer.fit(&corpus()).unwrap();

        let names = vectorizer.feature_names();
        assert_eq!(names[0], "database");
        assert_eq!(names[1], "connection");
        assert_eq!(names[2], "established");
        assert_eq!(vectorizer.vocabulary_len(), 7);
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let vectorizer = TfidfVectorizer::new();
        let result = vectorizer.transform(&["anything".to_string()]);
        assert!(matches!(result, Err(SentinelError::NotTrained)));
    }

    #[test]
    fn test_empty_vocabulary_is_fatal() {
        let mut vectorizer = TfidfVectorizer::new();
        let result = vectorizer.fit(&["--- !!!".to_string(), "??".to_string()]);
        assert!(matches!(result, Err(SentinelError::EmptyVocabulary)));
        assert!(!vectorizer.is_fitted());
    }

    #[test]
    fn test_rows_are_unit_norm() {
        let mut vectorizer = TfidfVectorizer::new();
        let x = vectorizer.fit_transform(&corpus()).unwrap();

        for i in 0..x.nrows() {
            let norm: f64 = x.row(i).iter().map(|&v| v * v).sum();
            assert!((norm - 1.0).abs() < 1e-12, "row {i} norm was {norm}");
        }
    }

    #[test]
    fn test_unknown_tokens_ignored_and_zero_vector() {
        let mut vectorizer = TfidfVectorizer::new();
        vectorizer.fit(&corpus()).unwrap();

        let x = vectorizer
            .transform(&["totally unseen words".to_string(), String::new()])
            .unwrap();
        assert!(x.row(0).iter().all(|&v| v == 0.0));
        assert!(x.row(1).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_transform_is_idempotent() {
        let mut vectorizer = TfidfVectorizer::new();
        vectorizer.fit(&corpus()).unwrap();

        let line = vec!["database connection refused".to_string()];
        let a = vectorizer.transform(&line).unwrap();
        let b = vectorizer.transform(&line).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_training_order_invariant_weights() {
        let mut forward = TfidfVectorizer::new();
        forward.fit(&corpus()).unwrap();

        let mut reversed_corpus = corpus();
        reversed_corpus.reverse();
        let mut backward = TfidfVectorizer::new();
        backward.fit(&reversed_corpus).unwrap();

        // Indices may permute, but the weight assigned to each token of a
        // fixed line must not depend on training order.
        let line = vec!["database connection refused".to_string()];
        let xa = forward.transform(&line).unwrap();
        let xb = backward.transform(&line).unwrap();

        let names_a = forward.feature_names();
        let names_b = backward.feature_names();
        for (idx_a, name) in names_a.iter().enumerate() {
            let idx_b = names_b.iter().position(|n| n == name).unwrap();
            assert!(
                (xa[[0, idx_a]] - xb[[0, idx_b]]).abs() < 1e-12,
                "weight for token {name} changed with training order"
            );
        }
    }

    #[test]
    fn test_novelty_zero_for_known_lines() {
        let mut vectorizer = TfidfVectorizer::new();
        vectorizer.fit(&corpus()).unwrap();
        let novelty = vectorizer.novelty("database connection refused").unwrap();
        assert_eq!(novelty, 0.0);
    }

    #[test]
    fn test_novelty_grows_with_unknown_tokens() {
        let mut vectorizer = TfidfVectorizer::new();
        vectorizer.fit(&corpus()).unwrap();

        let one = vectorizer.novelty("database zzz").unwrap();
        let two = vectorizer.novelty("zzz qqq").unwrap();
        let four = vectorizer.novelty("zzz qqq xyzzy wubble").unwrap();
        assert!((one - 1.0 / 3.0).abs() < 1e-12);
        assert!((two - 0.5).abs() < 1e-12);
        assert!(one < two && two < four);
        assert!(four < 1.0);
    }

    #[test]
    fn test_novelty_maximal_for_token_free_lines() {
        let mut vectorizer = TfidfVectorizer::new();
        vectorizer.fit(&corpus()).unwrap();
        assert_eq!(vectorizer.novelty("").unwrap(), 1.0);
        assert_eq!(vectorizer.novelty("--- !!!").unwrap(), 1.0);
    }

    #[test]
    fn test_novelty_before_fit_fails() {
        let vectorizer = TfidfVectorizer::new();
        assert!(matches!(
            vectorizer.novelty("anything"),
            Err(SentinelError::NotTrained)
        ));
    }

    #[test]
    fn test_refit_replaces_model() {
        let mut vectorizer = TfidfVectorizer::new();
        vectorizer.fit(&corpus()).unwrap();
        assert_eq!(vectorizer.vocabulary_len(), 7);

        vectorizer
            .fit(&["metrics pushed prometheus".to_string()])
            .unwrap();
        assert_eq!(vectorizer.vocabulary_len(), 3);
        let names = vectorizer.feature_names();
        assert!(!names.contains(&"database".to_string()));
    }
}
