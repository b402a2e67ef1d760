//! Text normalization for model input.
//!
//! Raw task descriptions go through a fixed pipeline before vectorization:
//! - non-word characters become spaces
//! - the text is lowercased
//! - the text is split into word tokens
//! - stop words are dropped
//! - each surviving token is reduced to its Porter stem
//!
//! The pipeline must match the one the artifacts were trained with, so every
//! step is deterministic and free of side effects.

mod porter;
mod stopwords;
mod tokenize;

pub use porter::PorterStemmer;
pub use stopwords::{BundledStopWords, ResourceFetcher, StopWords, DEFAULT_LANGUAGE};
pub use tokenize::word_tokenize;

use regex::Regex;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while preparing text resources.
#[derive(Debug, Error)]
pub enum TextError {
    #[error("Stop-word resource for '{language}' not found at {}", path.display())]
    ResourceMissing { language: String, path: PathBuf },

    #[error("Failed to read stop-word resource {}: {source}", path.display())]
    ResourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch stop-word resource for '{language}': {reason}")]
    FetchFailed { language: String, reason: String },
}

/// Normalizes task descriptions into the token stream the vectorizer expects.
#[derive(Debug, Clone)]
pub struct TextPreprocessor {
    non_word: Regex,
    stop_words: StopWords,
    stemmer: PorterStemmer,
}

impl TextPreprocessor {
    pub fn new(stop_words: StopWords) -> Self {
        Self {
            non_word: Regex::new(r"\W").expect("static regex is valid"),
            stop_words,
            stemmer: PorterStemmer::new(),
        }
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Produce space-joined stems for `text`. Returns an empty string when
    /// every token is a stop word.
    pub fn normalize(&self, text: &str) -> String {
        let cleaned = self.non_word.replace_all(text, " ").to_lowercase();

        word_tokenize(&cleaned)
            .into_iter()
            .filter(|token| !self.stop_words.contains(token))
            .map(|token| self.stemmer.stem(&token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preprocessor() -> TextPreprocessor {
        TextPreprocessor::new(StopWords::english())
    }

    #[test]
    fn test_normalize_login_bug() {
        let text = preprocessor().normalize("The login button is not working");
        assert_eq!(text, "login button work");
    }

    #[test]
    fn test_normalize_strips_punctuation() {
        let text = preprocessor().normalize("Payments fail!!! (again) on checkout-page...");
        assert_eq!(text, "payment fail checkout page");
    }

    #[test]
    fn test_normalize_all_stop_words() {
        let pre = preprocessor();
        assert_eq!(pre.stop_words().language(), "english");
        assert!(pre.stop_words().contains("what"));
        assert_eq!(pre.normalize("it is what it is"), "");
        assert_eq!(preprocessor().normalize("   "), "");
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let pre = preprocessor();
        let input = "Users cannot upload profile pictures since yesterday's deployment";
        let first = pre.normalize(input);
        for _ in 0..5 {
            assert_eq!(pre.normalize(input), first);
        }
        assert_eq!(first, "user upload profil pictur sinc yesterday deploy");
    }

    #[test]
    fn test_apostrophes_split_into_tokens() {
        // "don't" becomes "don t", both of which are stop words
        assert_eq!(preprocessor().normalize("Don't restart"), "restart");
    }
}
