//! # AI Task Manager
//!
//! Classifies free-text task descriptions, predicts their priority and
//! assigns them to a developer.
//!
//! ## Task Flow
//! 1. A description arrives through the page form or the JSON API
//! 2. The text is normalized (tokenize, drop stop words, stem)
//! 3. A TF-IDF vector feeds the category and priority classifiers
//! 4. The category is mapped to a developer
//! 5. The record is appended to the session's task store
//!
//! ## Modules
//! - `text`: normalization pipeline and stop-word resources
//! - `model`: vectorizer and classifier artifacts
//! - `assignment`: category to developer table
//! - `task`: task records, store and CSV export
//! - `session`: per-session controller and registry
//! - `api`: HTTP server

pub mod api;
pub mod assignment;
pub mod config;
pub mod model;
pub mod session;
pub mod task;
pub mod text;

#[cfg(test)]
mod testing;

pub use config::Config;
