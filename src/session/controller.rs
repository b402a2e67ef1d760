//! Per-session interaction state.

use serde::{Deserialize, Serialize};

use crate::assignment::SharedDeveloperDirectory;
use crate::model::{ModelError, PredictorRef};
use crate::task::{CsvExport, ExportError, TaskRecord, TaskStore};

/// Warning surfaced when analysis is requested without a description.
pub const EMPTY_INPUT_WARNING: &str = "Please enter a task description to analyze.";

/// Number of description characters shown in a log entry title.
const SUMMARY_CHARS: usize = 50;

/// The two views a session can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    NewTask,
    ViewTasks,
}

impl View {
    pub fn from_tab(tab: &str) -> Option<Self> {
        match tab {
            "new" => Some(Self::NewTask),
            "tasks" => Some(Self::ViewTasks),
            _ => None,
        }
    }
}

/// Result of an analyze action.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeOutcome {
    /// A record was created and appended.
    Analyzed(TaskRecord),
    /// The buffer was blank. Nothing changed.
    EmptyInput,
}

/// One row of the task log view.
#[derive(Debug, Clone, Serialize)]
pub struct TaskLogEntry {
    pub number: usize,
    pub summary: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub developer: String,
    pub timestamp: String,
}

impl TaskLogEntry {
    fn project(index: usize, record: &TaskRecord) -> Self {
        let head: String = record.description.chars().take(SUMMARY_CHARS).collect();
        Self {
            number: index + 1,
            summary: format!("{}...", head),
            description: record.description.clone(),
            category: record.category.clone(),
            priority: record.priority.clone(),
            developer: record.developer.clone(),
            timestamp: record.timestamp_display(),
        }
    }
}

/// Drives one session: input buffer, view selection and the task store.
///
/// Analysis runs synchronously: `analyze` either appends exactly one record
/// or leaves every piece of state as it was.
pub struct InteractionController {
    buffer: String,
    view: View,
    store: TaskStore,
    predictor: PredictorRef,
    developers: SharedDeveloperDirectory,
}

impl InteractionController {
    pub fn new(predictor: PredictorRef, developers: SharedDeveloperDirectory) -> Self {
        Self {
            buffer: String::new(),
            view: View::default(),
            store: TaskStore::new(),
            predictor,
            developers,
        }
    }

    pub fn input(&self) -> &str {
        &self.buffer
    }

    /// Replace the pending input.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn select_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Analyze the pending input and record the result.
    ///
    /// Blank input is a no-op returning [`AnalyzeOutcome::EmptyInput`].
    /// Prediction errors are returned unchanged and leave the store as is.
    pub fn analyze(&mut self) -> Result<AnalyzeOutcome, ModelError> {
        let description = self.buffer.trim();
        if description.is_empty() {
            tracing::warn!("{}", EMPTY_INPUT_WARNING);
            return Ok(AnalyzeOutcome::EmptyInput);
        }

        let prediction = self.predictor.predict(description)?;
        let developer = self.developers.resolve(&prediction.category).to_string();
        let record = TaskRecord::new(
            description,
            prediction,
            developer,
            chrono::Local::now().naive_local(),
        );

        tracing::info!(
            category = %record.category,
            priority = %record.priority,
            developer = %record.developer,
            "Task analyzed and assigned"
        );

        self.store.append(record.clone());
        Ok(AnalyzeOutcome::Analyzed(record))
    }

    /// Empty the input buffer and return to the input view.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.view = View::NewTask;
    }

    /// Task log projected from the current store contents.
    pub fn task_log(&self) -> Vec<TaskLogEntry> {
        self.store
            .all()
            .iter()
            .enumerate()
            .map(|(i, record)| TaskLogEntry::project(i, record))
            .collect()
    }

    pub fn export_csv(&self) -> Result<CsvExport, ExportError> {
        self.store.export_csv()
    }
}
