//! Category to developer assignment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Developer recorded for categories missing from the table.
pub const UNASSIGNED: &str = "Unassigned";

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("Failed to read developer mapping {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid developer mapping {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Read-only `category -> developer` table, fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct DeveloperDirectory {
    mapping: HashMap<String, String>,
}

impl Default for DeveloperDirectory {
    fn default() -> Self {
        Self::from_pairs([
            ("Capella", "Rohit"),
            ("Platform", "Mohit"),
            ("Community", "Anjali"),
        ])
    }
}

impl DeveloperDirectory {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            mapping: pairs
                .into_iter()
                .map(|(category, developer)| (category.to_string(), developer.to_string()))
                .collect(),
        }
    }

    /// Load a YAML mapping such as `Capella: Rohit`.
    pub fn from_yaml_file(path: &Path) -> Result<Self, MappingError> {
        let contents = std::fs::read_to_string(path).map_err(|source| MappingError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mapping: HashMap<String, String> =
            serde_yaml::from_str(&contents).map_err(|source| MappingError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!(
            "Loaded {} developer assignments from {}",
            mapping.len(),
            path.display()
        );
        Ok(Self { mapping })
    }

    /// Developer for `category`, or [`UNASSIGNED`].
    pub fn resolve(&self, category: &str) -> &str {
        self.mapping
            .get(category)
            .map(String::as_str)
            .unwrap_or(UNASSIGNED)
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}

pub type SharedDeveloperDirectory = Arc<DeveloperDirectory>;
