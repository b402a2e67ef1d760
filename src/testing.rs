//! Shared fixtures for unit tests.

use serde_json::json;
use std::path::Path;
use std::sync::Arc;

use crate::model::{
    ModelError, ModelGateway, Prediction, Predictor, PredictorRef, CATEGORY_MODEL_FILE,
    PRIORITY_MODEL_FILE, VECTORIZER_FILE,
};
use crate::text::{StopWords, TextPreprocessor};

const VOCABULARY: [&str; 13] = [
    "login", "button", "work", "payment", "screen", "forum", "post", "deploy", "server", "crash",
    "urgent", "export", "report",
];

fn row(weights: &[(&str, f64)], fill: f64) -> Vec<f64> {
    VOCABULARY
        .iter()
        .map(|term| {
            weights
                .iter()
                .find(|(t, _)| t == term)
                .map(|(_, w)| *w)
                .unwrap_or(fill)
        })
        .collect()
}

pub fn preprocessor() -> TextPreprocessor {
    TextPreprocessor::new(StopWords::english())
}

/// Write a small but complete artifact set into `dir`.
///
/// Categories: login/button/payment/screen lean Platform, forum/post lean
/// Community, deploy/server lean Infra, export/report lean Capella.
/// Priorities: login/work/crash/urgent lean High, forum/post/export/report
/// lean Low.
pub fn write_artifacts(dir: &Path) {
    let vocabulary: serde_json::Map<String, serde_json::Value> = VOCABULARY
        .iter()
        .enumerate()
        .map(|(i, term)| (term.to_string(), json!(i)))
        .collect();

    let vectorizer = json!({
        "vocabulary": vocabulary,
        "idf": vec![1.0; VOCABULARY.len()],
    });

    let category = json!({
        "kind": "linear",
        "classes": ["Capella", "Community", "Infra", "Platform"],
        "coef": [
            row(&[("export", 1.0), ("report", 1.0)], 0.0),
            row(&[("forum", 1.0), ("post", 1.0)], 0.0),
            row(&[("deploy", 1.0), ("server", 1.0)], 0.0),
            row(&[("login", 1.0), ("button", 1.0), ("payment", 1.0), ("screen", 1.0), ("crash", 0.5)], 0.0),
        ],
        "intercept": [0.05, 0.0, 0.0, 0.0],
    });

    let priority = json!({
        "kind": "multinomial_nb",
        "classes": ["High", "Low", "Medium"],
        "feature_log_prob": [
            row(&[("login", -1.0), ("work", -1.0), ("crash", -1.0), ("urgent", -1.0)], -4.0),
            row(&[("forum", -1.0), ("post", -1.0), ("export", -1.0), ("report", -1.0)], -4.0),
            row(&[], -2.5),
        ],
        "class_log_prior": [-1.0986, -1.0986, -1.0986],
    });

    std::fs::write(dir.join(VECTORIZER_FILE), vectorizer.to_string()).unwrap();
    std::fs::write(dir.join(CATEGORY_MODEL_FILE), category.to_string()).unwrap();
    std::fs::write(dir.join(PRIORITY_MODEL_FILE), priority.to_string()).unwrap();
}

pub fn load_gateway(dir: &Path) -> ModelGateway {
    ModelGateway::load(dir, preprocessor()).unwrap()
}

/// Gateway over the fixture artifacts, loaded from a throwaway directory.
pub fn gateway() -> PredictorRef {
    let temp = tempfile::tempdir().unwrap();
    write_artifacts(temp.path());
    Arc::new(load_gateway(temp.path()))
}

/// Predictor returning a fixed answer, or failing when built with `failing`.
pub struct StubPredictor {
    answer: Option<Prediction>,
}

impl StubPredictor {
    pub fn new(category: &str, priority: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(Prediction {
                category: category.to_string(),
                priority: priority.to_string(),
            }),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { answer: None })
    }
}

impl Predictor for StubPredictor {
    fn predict(&self, _text: &str) -> Result<Prediction, ModelError> {
        self.answer
            .clone()
            .ok_or_else(|| ModelError::Shape("stub predictor failure".to_string()))
    }
}
