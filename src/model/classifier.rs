//! Fitted classifiers operating on TF-IDF vectors.

use serde::{Deserialize, Deserializer};

use super::vectorizer::SparseVector;
use super::ModelError;

/// Classifier artifact, tagged by model family.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    /// Linear decision function (logistic regression, linear SVM, SGD).
    Linear {
        #[serde(deserialize_with = "deserialize_labels")]
        classes: Vec<String>,
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    },
    /// Multinomial naive Bayes joint log-likelihood.
    MultinomialNb {
        #[serde(deserialize_with = "deserialize_labels")]
        classes: Vec<String>,
        feature_log_prob: Vec<Vec<f64>>,
        class_log_prior: Vec<f64>,
    },
}

/// Class labels may be stored as strings or numbers.
fn deserialize_labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
    values
        .into_iter()
        .map(|value| match value {
            serde_json::Value::String(s) => Ok(s),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            serde_json::Value::Bool(b) => Ok(b.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "unsupported class label: {}",
                other
            ))),
        })
        .collect()
}

impl Classifier {
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn classes(&self) -> &[String] {
        match self {
            Self::Linear { classes, .. } | Self::MultinomialNb { classes, .. } => classes,
        }
    }

    /// Check internal consistency and agreement with the vectorizer width.
    pub fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        let classes = self.classes();
        if classes.is_empty() {
            return Err(ModelError::Shape("classifier has no classes".to_string()));
        }

        let (rows, biases) = match self {
            Self::Linear {
                coef, intercept, ..
            } => {
                let binary = classes.len() == 2 && coef.len() == 1;
                if !binary && coef.len() != classes.len() {
                    return Err(ModelError::Shape(format!(
                        "{} coefficient rows for {} classes",
                        coef.len(),
                        classes.len()
                    )));
                }
                (coef, intercept)
            }
            Self::MultinomialNb {
                feature_log_prob,
                class_log_prior,
                ..
            } => {
                if feature_log_prob.len() != classes.len() {
                    return Err(ModelError::Shape(format!(
                        "{} log-probability rows for {} classes",
                        feature_log_prob.len(),
                        classes.len()
                    )));
                }
                (feature_log_prob, class_log_prior)
            }
        };

        if biases.len() != rows.len() {
            return Err(ModelError::Shape(format!(
                "{} bias terms for {} weight rows",
                biases.len(),
                rows.len()
            )));
        }
        if let Some(row) = rows.iter().find(|row| row.len() != n_features) {
            return Err(ModelError::Shape(format!(
                "weight row has {} columns, vectorizer produces {}",
                row.len(),
                n_features
            )));
        }

        Ok(())
    }

    /// Decision score per weight row.
    pub fn decision_scores(&self, x: &SparseVector) -> Vec<f64> {
        let (rows, biases) = match self {
            Self::Linear {
                coef, intercept, ..
            } => (coef, intercept),
            Self::MultinomialNb {
                feature_log_prob,
                class_log_prior,
                ..
            } => (feature_log_prob, class_log_prior),
        };

        rows.iter()
            .zip(biases)
            .map(|(row, bias)| x.dot(row) + bias)
            .collect()
    }

    /// Top label for `x`. Ties resolve to the lowest class index.
    pub fn predict(&self, x: &SparseVector) -> &str {
        let classes = self.classes();
        let scores = self.decision_scores(x);

        if scores.len() == 1 && classes.len() == 2 {
            return if scores[0] > 0.0 { &classes[1] } else { &classes[0] };
        }

        let mut best = 0;
        for (i, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = i;
            }
        }
        &classes[best]
    }
}
