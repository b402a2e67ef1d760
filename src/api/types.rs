//! Request and response types for the JSON API.

use serde::{Deserialize, Serialize};

use crate::task::TaskRecord;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub active_sessions: usize,
}

/// Replace the pending input.
#[derive(Debug, Deserialize)]
pub struct UpdateInputRequest {
    pub text: String,
}

/// Current pending input.
#[derive(Debug, Serialize)]
pub struct InputResponse {
    pub input: String,
}

/// Analyze request. Without a description the pending input is analyzed.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub description: Option<String>,
}

/// Analysis result for one task.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub message: String,
    pub category: String,
    pub priority: String,
    pub developer: String,
    pub task: TaskRecord,
}

impl From<TaskRecord> for AnalyzeResponse {
    fn from(task: TaskRecord) -> Self {
        Self {
            message: "Task analyzed and assigned successfully!".to_string(),
            category: task.category.clone(),
            priority: task.priority.clone(),
            developer: task.developer.clone(),
            task,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EndSessionResponse {
    pub ended: bool,
}
