//! Stop-word resource.
//!
//! Stop words live on disk as `<data_dir>/corpora/stopwords/<language>`, one
//! word per line. [`StopWords::initialize`] loads the file and, if it is
//! missing, asks a [`ResourceFetcher`] to install it exactly once before
//! retrying.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::TextError;

pub const DEFAULT_LANGUAGE: &str = "english";

const ENGLISH: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Installs a missing stop-word resource.
pub trait ResourceFetcher: Send + Sync {
    fn fetch(&self, data_dir: &Path, language: &str) -> Result<(), TextError>;
}

/// Fetcher that writes the stop-word list compiled into the binary.
/// Only English is bundled.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledStopWords;

impl ResourceFetcher for BundledStopWords {
    fn fetch(&self, data_dir: &Path, language: &str) -> Result<(), TextError> {
        if language != DEFAULT_LANGUAGE {
            return Err(TextError::FetchFailed {
                language: language.to_string(),
                reason: "no bundled list for this language".to_string(),
            });
        }

        let path = StopWords::resource_path(data_dir, language);
        let write = || -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut contents = ENGLISH.join("\n");
            contents.push('\n');
            std::fs::write(&path, contents)
        };

        write().map_err(|e| TextError::FetchFailed {
            language: language.to_string(),
            reason: e.to_string(),
        })?;

        tracing::info!("Installed bundled stop words at {}", path.display());
        Ok(())
    }
}

/// Set of words dropped before stemming.
#[derive(Debug, Clone)]
pub struct StopWords {
    language: String,
    words: HashSet<String>,
}

impl StopWords {
    /// The bundled English list, without touching disk.
    pub fn english() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            words: ENGLISH.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn resource_path(data_dir: &Path, language: &str) -> PathBuf {
        data_dir.join("corpora").join("stopwords").join(language)
    }

    /// Load the resource file for `language`.
    pub fn load(data_dir: &Path, language: &str) -> Result<Self, TextError> {
        let path = Self::resource_path(data_dir, language);
        if !path.exists() {
            return Err(TextError::ResourceMissing {
                language: language.to_string(),
                path,
            });
        }

        let contents = std::fs::read_to_string(&path)
            .map_err(|source| TextError::ResourceRead { path: path.clone(), source })?;

        let words = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            language: language.to_string(),
            words,
        })
    }

    /// Load the resource, fetching it once if it is missing.
    ///
    /// A failed fetch, or a resource still missing after the fetch, is
    /// returned as an error. No further attempts are made.
    pub fn initialize(
        data_dir: &Path,
        language: &str,
        fetcher: &dyn ResourceFetcher,
    ) -> Result<Self, TextError> {
        match Self::load(data_dir, language) {
            Err(TextError::ResourceMissing { path, .. }) => {
                tracing::warn!(
                    "Stop words for '{}' not found at {}, fetching",
                    language,
                    path.display()
                );
                fetcher.fetch(data_dir, language)?;
                Self::load(data_dir, language)
            }
            other => other,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    /// Counts calls and optionally delegates to the bundled fetcher.
    struct CountingFetcher {
        calls: AtomicUsize,
        install: bool,
    }

    impl CountingFetcher {
        fn new(install: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                install,
            }
        }
    }

    impl ResourceFetcher for CountingFetcher {
        fn fetch(&self, data_dir: &Path, language: &str) -> Result<(), TextError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.install {
                BundledStopWords.fetch(data_dir, language)
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_english_list() {
        let words = StopWords::english();
        assert_eq!(words.len(), 179);
        assert!(words.contains("the"));
        assert!(words.contains("not"));
        assert!(!words.contains("login"));
    }

    #[test]
    fn test_initialize_existing_resource() {
        let temp = tempdir().unwrap();
        let path = StopWords::resource_path(temp.path(), "english");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "alpha\nbeta\n\n").unwrap();

        let fetcher = CountingFetcher::new(true);
        let words = StopWords::initialize(temp.path(), "english", &fetcher).unwrap();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(words.len(), 2);
        assert!(words.contains("beta"));
    }

    #[test]
    fn test_initialize_fetches_once() {
        let temp = tempdir().unwrap();
        let fetcher = CountingFetcher::new(true);

        let words = StopWords::initialize(temp.path(), "english", &fetcher).unwrap();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(words.len(), StopWords::english().len());
        assert!(StopWords::resource_path(temp.path(), "english").exists());

        // Second initialization finds the installed file
        StopWords::initialize(temp.path(), "english", &fetcher).unwrap();
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_initialize_fails_after_single_retry() {
        let temp = tempdir().unwrap();
        let fetcher = CountingFetcher::new(false);

        let result = StopWords::initialize(temp.path(), "english", &fetcher);

        assert!(matches!(result, Err(TextError::ResourceMissing { .. })));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_bundled_fetcher_rejects_other_languages() {
        let temp = tempdir().unwrap();
        let result = StopWords::initialize(temp.path(), "french", &BundledStopWords);
        assert!(matches!(result, Err(TextError::FetchFailed { .. })));
    }
}
