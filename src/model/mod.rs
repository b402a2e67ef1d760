//! Model gateway - loads the fitted artifacts and runs inference.
//!
//! Three artifacts are read once at startup from the model directory:
//! - `tfidf_vectorizer.json`: vocabulary and idf weights
//! - `classifier_model.json`: category classifier
//! - `priority_model.json`: priority classifier
//!
//! All three are immutable after load, so a single [`ModelGateway`] is shared
//! read-only by every session.

mod classifier;
mod vectorizer;

pub use classifier::Classifier;
pub use vectorizer::{Norm, SparseVector, TfidfVectorizer};

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::text::TextPreprocessor;

pub const VECTORIZER_FILE: &str = "tfidf_vectorizer.json";
pub const CATEGORY_MODEL_FILE: &str = "classifier_model.json";
pub const PRIORITY_MODEL_FILE: &str = "priority_model.json";

/// Errors raised while loading artifacts or running inference.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model files not found! Please make sure the model artifact files are in the correct directory. Missing: {}", format_paths(.0))]
    MissingArtifacts(Vec<PathBuf>),

    #[error("Failed to read model artifact {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid model artifact {}: {message}", path.display())]
    Artifact { path: PathBuf, message: String },

    #[error("Malformed artifact JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Artifact shape mismatch: {0}")]
    Shape(String),

    #[error("Invalid token pattern: {0}")]
    TokenPattern(String),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Predicted labels for one task description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub category: String,
    pub priority: String,
}

/// Anything that can label a task description.
pub trait Predictor: Send + Sync {
    fn predict(&self, text: &str) -> Result<Prediction, ModelError>;
}

pub type PredictorRef = Arc<dyn Predictor>;

/// Text preprocessor plus the three fitted artifacts.
#[derive(Debug)]
pub struct ModelGateway {
    preprocessor: TextPreprocessor,
    vectorizer: TfidfVectorizer,
    category_model: Classifier,
    priority_model: Classifier,
}

impl ModelGateway {
    /// Load all artifacts from `model_dir`.
    ///
    /// Every missing file is reported at once, before any file is parsed.
    pub fn load(model_dir: &Path, preprocessor: TextPreprocessor) -> Result<Self, ModelError> {
        let paths = [VECTORIZER_FILE, CATEGORY_MODEL_FILE, PRIORITY_MODEL_FILE]
            .map(|name| model_dir.join(name));

        let missing: Vec<PathBuf> = paths.iter().filter(|p| !p.exists()).cloned().collect();
        if !missing.is_empty() {
            return Err(ModelError::MissingArtifacts(missing));
        }

        let [vectorizer_path, category_path, priority_path] = paths;

        let vectorizer = load_artifact(&vectorizer_path, TfidfVectorizer::from_json)?;
        let category_model = load_artifact(&category_path, Classifier::from_json)?;
        let priority_model = load_artifact(&priority_path, Classifier::from_json)?;

        let gateway = Self::new(preprocessor, vectorizer, category_model, priority_model)?;

        tracing::info!(
            "Loaded models from {} ({} features, {} categories, {} priorities, {} stop words)",
            model_dir.display(),
            gateway.vectorizer.n_features(),
            gateway.category_model.classes().len(),
            gateway.priority_model.classes().len(),
            gateway.preprocessor.stop_words().language()
        );

        Ok(gateway)
    }

    /// Assemble a gateway from already parsed parts.
    pub fn new(
        preprocessor: TextPreprocessor,
        vectorizer: TfidfVectorizer,
        category_model: Classifier,
        priority_model: Classifier,
    ) -> Result<Self, ModelError> {
        let n_features = vectorizer.n_features();
        category_model.validate(n_features)?;
        priority_model.validate(n_features)?;

        Ok(Self {
            preprocessor,
            vectorizer,
            category_model,
            priority_model,
        })
    }

    pub fn category_labels(&self) -> &[String] {
        self.category_model.classes()
    }

    pub fn priority_labels(&self) -> &[String] {
        self.priority_model.classes()
    }
}

impl Predictor for ModelGateway {
    fn predict(&self, text: &str) -> Result<Prediction, ModelError> {
        let normalized = self.preprocessor.normalize(text);
        let features = self.vectorizer.transform(&normalized);

        tracing::debug!(
            normalized = %normalized,
            active_features = features.entries().len(),
            "Vectorized task description"
        );

        Ok(Prediction {
            category: self.category_model.predict(&features).to_string(),
            priority: self.priority_model.predict(&features).to_string(),
        })
    }
}

fn load_artifact<T>(
    path: &Path,
    parse: impl FnOnce(&str) -> Result<T, ModelError>,
) -> Result<T, ModelError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ModelError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse(&contents).map_err(|e| match e {
        ModelError::Parse(err) => ModelError::Artifact {
            path: path.to_path_buf(),
            message: err.to_string(),
        },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use tempfile::tempdir;

    #[test]
    fn test_load_and_predict() {
        let temp = tempdir().unwrap();
        testing::write_artifacts(temp.path());

        let gateway = testing::load_gateway(temp.path());

        assert_eq!(
            gateway.category_labels(),
            ["Capella", "Community", "Infra", "Platform"]
        );
        assert_eq!(gateway.priority_labels(), ["High", "Low", "Medium"]);

        let login = gateway.predict("The login button is not working").unwrap();
        assert_eq!(login.category, "Platform");
        assert_eq!(login.priority, "High");

        let forum = gateway.predict("Forum post shows spam").unwrap();
        assert_eq!(forum.category, "Community");
        assert_eq!(forum.priority, "Low");

        let report = gateway.predict("Export the quarterly report").unwrap();
        assert_eq!(report.category, "Capella");

        let infra = gateway.predict("Deploy the new server").unwrap();
        assert_eq!(infra.category, "Infra");
    }

    #[test]
    fn test_predict_is_deterministic() {
        let temp = tempdir().unwrap();
        testing::write_artifacts(temp.path());
        let gateway = testing::load_gateway(temp.path());

        let first = gateway.predict("Payment screen crashes").unwrap();
        for _ in 0..3 {
            assert_eq!(gateway.predict("Payment screen crashes").unwrap(), first);
        }
    }

    #[test]
    fn test_missing_artifacts_all_reported() {
        let temp = tempdir().unwrap();
        testing::write_artifacts(temp.path());
        std::fs::remove_file(temp.path().join(CATEGORY_MODEL_FILE)).unwrap();
        std::fs::remove_file(temp.path().join(PRIORITY_MODEL_FILE)).unwrap();

        let err = ModelGateway::load(temp.path(), testing::preprocessor()).unwrap_err();
        match &err {
            ModelError::MissingArtifacts(paths) => {
                assert_eq!(paths.len(), 2);
                assert!(paths[0].ends_with(CATEGORY_MODEL_FILE));
                assert!(paths[1].ends_with(PRIORITY_MODEL_FILE));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with("Model files not found!"));
    }

    #[test]
    fn test_malformed_artifact_names_file() {
        let temp = tempdir().unwrap();
        testing::write_artifacts(temp.path());
        std::fs::write(temp.path().join(PRIORITY_MODEL_FILE), "{not json").unwrap();

        let err = ModelGateway::load(temp.path(), testing::preprocessor()).unwrap_err();
        match err {
            ModelError::Artifact { path, .. } => assert!(path.ends_with(PRIORITY_MODEL_FILE)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_classifier_width_must_match_vectorizer() {
        let temp = tempdir().unwrap();
        testing::write_artifacts(temp.path());
        std::fs::write(
            temp.path().join(CATEGORY_MODEL_FILE),
            r#"{"kind": "linear", "classes": ["A", "B", "C"], "coef": [[1.0], [0.0], [0.0]], "intercept": [0, 0, 0]}"#,
        )
        .unwrap();

        let err = ModelGateway::load(temp.path(), testing::preprocessor()).unwrap_err();
        assert!(matches!(err, ModelError::Shape(_)));
    }
}
