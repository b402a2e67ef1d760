//! Task module - analyzed task records and the per-session store.
//!
//! Records are created once, when a description is analyzed, and never
//! change afterwards. The store only appends, so insertion order is the
//! creation order.

mod export;
mod store;

pub use export::{CsvExport, ExportError, CSV_CONTENT_TYPE, CSV_FILENAME, CSV_HEADER};
pub use store::TaskStore;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::Prediction;

/// Wall-clock format used for display, JSON and CSV.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One analyzed task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub description: String,
    pub category: String,
    pub priority: String,
    /// Resolved from `category` when the record was created
    pub developer: String,
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
}

impl TaskRecord {
    pub fn new(
        description: impl Into<String>,
        prediction: Prediction,
        developer: impl Into<String>,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            description: description.into(),
            category: prediction.category,
            priority: prediction.priority,
            developer: developer.into(),
            timestamp,
        }
    }

    pub fn timestamp_display(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
