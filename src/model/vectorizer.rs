//! TF-IDF vectorizer loaded from a fitted artifact.

use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

use super::ModelError;

const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Row normalization applied after weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// On-disk form of the vectorizer.
#[derive(Debug, Deserialize)]
struct VectorizerArtifact {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default = "default_token_pattern")]
    token_pattern: String,
    #[serde(default = "default_true")]
    lowercase: bool,
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default = "default_true")]
    use_idf: bool,
    #[serde(default = "default_norm")]
    norm: Option<Norm>,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_true() -> bool {
    true
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// Sparse feature vector with ascending column indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn get(&self, column: usize) -> f64 {
        self.entries
            .binary_search_by_key(&column, |(c, _)| *c)
            .map(|i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product with a dense row.
    pub fn dot(&self, row: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|(column, value)| row.get(*column).copied().unwrap_or(0.0) * value)
            .sum()
    }
}

/// Maps normalized text into the fitted TF-IDF feature space.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    ngram_range: (usize, usize),
    token_pattern: Regex,
    lowercase: bool,
    sublinear_tf: bool,
    use_idf: bool,
    norm: Option<Norm>,
}

impl TfidfVectorizer {
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let artifact: VectorizerArtifact = serde_json::from_str(json)?;
        Self::from_artifact(artifact)
    }

    fn from_artifact(artifact: VectorizerArtifact) -> Result<Self, ModelError> {
        let n_features = artifact.vocabulary.len();

        if artifact.use_idf && artifact.idf.len() != n_features {
            return Err(ModelError::Shape(format!(
                "vectorizer has {} vocabulary terms but {} idf weights",
                n_features,
                artifact.idf.len()
            )));
        }
        if let Some((term, column)) = artifact
            .vocabulary
            .iter()
            .find(|(_, column)| **column >= n_features)
        {
            return Err(ModelError::Shape(format!(
                "vocabulary term '{}' maps to column {} outside 0..{}",
                term, column, n_features
            )));
        }

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ModelError::Shape(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }

        let token_pattern = Regex::new(&artifact.token_pattern)
            .map_err(|e| ModelError::TokenPattern(e.to_string()))?;

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            ngram_range: artifact.ngram_range,
            token_pattern,
            lowercase: artifact.lowercase,
            sublinear_tf: artifact.sublinear_tf,
            use_idf: artifact.use_idf,
            norm: artifact.norm,
        })
    }

    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Vectorize one document.
    pub fn transform(&self, text: &str) -> SparseVector {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let tokens: Vec<&str> = self
            .token_pattern
            .find_iter(&text)
            .map(|m| m.as_str())
            .collect();

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n.min(tokens.len()) {
            for gram in tokens.windows(n) {
                let term = gram.join(" ");
                if let Some(&column) = self.vocabulary.get(&term) {
                    *counts.entry(column).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(column, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                let weight = if self.use_idf { tf * self.idf[column] } else { tf };
                (column, weight)
            })
            .collect();

        let norm = match self.norm {
            Some(Norm::L2) => entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => entries.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            None => 1.0,
        };
        if norm > 0.0 {
            for (_, value) in entries.iter_mut() {
                *value /= norm;
            }
        }

        SparseVector { entries }
    }
}
