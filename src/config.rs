//! Server configuration, read from environment variables.
//!
//! | Variable                    | Default                                   |
//! |-----------------------------|-------------------------------------------|
//! | `HOST`                      | `127.0.0.1`                               |
//! | `PORT`                      | `8501`                                    |
//! | `WORKING_DIR`               | current directory                         |
//! | `MODEL_DIR`                 | `WORKING_DIR`                             |
//! | `TEXT_DATA_DIR`             | `WORKING_DIR/.task-manager/text_data`     |
//! | `STOPWORD_LANGUAGE`         | `english`                                 |
//! | `DEVELOPER_MAPPING_PATH`    | unset (built-in table)                    |
//! | `SESSION_IDLE_TIMEOUT_SECS` | `3600`                                    |

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::text::DEFAULT_LANGUAGE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}' ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Cannot determine working directory: {0}")]
    WorkingDir(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub working_dir: PathBuf,
    /// Directory holding the three model artifacts
    pub model_dir: PathBuf,
    /// Root of the stop-word resource tree
    pub text_data_dir: PathBuf,
    pub stopword_language: String,
    /// YAML file replacing the built-in developer table
    pub developer_mapping_path: Option<PathBuf>,
    pub session_idle_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                var: "PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => 8501,
        };

        let working_dir = match get("WORKING_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => std::env::current_dir()?,
        };

        let model_dir = get("MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| working_dir.clone());

        let text_data_dir = get("TEXT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| working_dir.join(".task-manager").join("text_data"));

        let stopword_language = get("STOPWORD_LANGUAGE")
            .map(|l| l.trim().to_lowercase())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        let developer_mapping_path = get("DEVELOPER_MAPPING_PATH").map(PathBuf::from);

        let session_idle_timeout = match get("SESSION_IDLE_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                    var: "SESSION_IDLE_TIMEOUT_SECS",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(3600),
        };

        Ok(Self {
            host,
            port,
            working_dir,
            model_dir,
            text_data_dir,
            stopword_language,
            developer_mapping_path,
            session_idle_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("WORKING_DIR", "/srv/tasks")]).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8501);
        assert_eq!(config.model_dir, PathBuf::from("/srv/tasks"));
        assert_eq!(
            config.text_data_dir,
            PathBuf::from("/srv/tasks/.task-manager/text_data")
        );
        assert_eq!(config.stopword_language, "english");
        assert!(config.developer_mapping_path.is_none());
        assert_eq!(config.session_idle_timeout, Duration::from_secs(3600));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("WORKING_DIR", "/srv/tasks"),
            ("MODEL_DIR", "/models"),
            ("TEXT_DATA_DIR", "/nltk"),
            ("STOPWORD_LANGUAGE", " English "),
            ("DEVELOPER_MAPPING_PATH", "/etc/developers.yaml"),
            ("SESSION_IDLE_TIMEOUT_SECS", "60"),
        ])
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.model_dir, PathBuf::from("/models"));
        assert_eq!(config.text_data_dir, PathBuf::from("/nltk"));
        assert_eq!(config.stopword_language, "english");
        assert_eq!(
            config.developer_mapping_path,
            Some(PathBuf::from("/etc/developers.yaml"))
        );
        assert_eq!(config.session_idle_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_port() {
        let err = config(&[("WORKING_DIR", "/srv"), ("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "PORT", .. }));
    }

    #[test]
    fn test_empty_values_fall_back_to_defaults() {
        let config = config(&[("WORKING_DIR", "/srv"), ("PORT", "  ")]).unwrap();
        assert_eq!(config.port, 8501);
    }
}
