//! Text-to-numeric feature extraction for log lines
//!
//! Converts raw log lines into a fixed-dimensionality TF-IDF representation.
//! The vocabulary and document frequencies are frozen at fit time; transform
//! is deterministic against a frozen model.

mod tfidf;
mod tokenizer;

pub use tfidf::TfidfVectorizer;
pub use tokenizer::LogTokenizer;
