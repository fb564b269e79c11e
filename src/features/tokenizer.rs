//! Log line tokenization

use serde::{Deserialize, Serialize};

/// Tokenizer for raw log lines
///
/// Case-folds, splits on non-alphanumeric boundaries, and drops short tokens
/// and stop words. The same policy is applied at fit and at transform time so
/// training and inference see identical term treatment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogTokenizer {
    lowercase: bool,
    min_token_length: usize,
    stop_words: Vec<String>,
}

impl LogTokenizer {
    pub fn new() -> Self {
        Self {
            lowercase: true,
            min_token_length: 2,
            stop_words: Vec::new(),
        }
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    pub fn with_min_length(mut self, len: usize) -> Self {
        self.min_token_length = len;
        self
    }

    pub fn with_english_stop_words(mut self) -> Self {
        self.stop_words = vec![
            "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for",
            "of", "with", "by", "is", "was", "are", "were", "be", "have", "has",
            "it", "this", "that", "i", "you", "he", "she", "we", "they", "from",
            "via", "due",
        ]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
        self
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let processed = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        processed
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty())
            .filter(|s| s.len() >= self.min_token_length)
            .filter(|s| !self.stop_words.iter().any(|w| w.as_str() == *s))
            .map(|s| s.to_string())
            .collect()
    }
}

impl Default for LogTokenizer {
    fn default() -> Self {
        Self::new().with_english_stop_words()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_case_folds_and_splits() {
        let tokenizer = LogTokenizer::new();
        let tokens = tokenizer.tokenize("200 OK: GET /api/v1/users/profile - Latency 120ms");
        assert!(tokens.contains(&"200".to_string()));
        assert!(tokens.contains(&"get".to_string()));
        assert!(tokens.contains(&"api".to_string()));
        assert!(tokens.contains(&"120ms".to_string()));
    }

    #[test]
    fn test_tokenize_drops_stop_words() {
        let tokenizer = LogTokenizer::default();
        let tokens = tokenizer.tokenize("connection refused to the upstream gateway");
        assert!(!tokens.contains(&"to".to_string()));
        assert!(!tokens.contains(&"the".to_string()));
        assert!(tokens.contains(&"upstream".to_string()));
    }

    #[test]
    fn test_tokenize_drops_short_tokens() {
        let tokenizer = LogTokenizer::new().with_min_length(2);
        let tokens = tokenizer.tokenize("a b cd");
        assert_eq!(tokens, vec!["cd".to_string()]);
    }

    #[test]
    fn test_tokenize_punctuation_only() {
        let tokenizer = LogTokenizer::default();
        assert!(tokenizer.tokenize("--- !!! ???").is_empty());
        assert!(tokenizer.tokenize("").is_empty());
    }
}
