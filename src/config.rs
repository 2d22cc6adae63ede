//! Configuration for training and serving.
//!
//! # Examples
//!
//! ```
//! use disaster_response::config::TrainingConfig;
//!
//! let config = TrainingConfig::default();
//! assert_eq!(config.folds, 5);
//! assert_eq!(config.n_estimators, vec![100, 150]);
//!
//! // Partial JSON falls back to the defaults.
//! let config = TrainingConfig::from_json(r#"{"folds": 3, "seed": 42}"#).unwrap();
//! assert_eq!(config.folds, 3);
//! assert_eq!(config.seed, Some(42));
//! assert_eq!(config.test_size, 0.2);
//! ```

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dataset::store::DEFAULT_TABLE_NAME;
use crate::error::{DisasterError, Result};

/// Hyperparameter grid and evaluation settings for `train`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Fraction of rows held out for the final evaluation.
    pub test_size: f64,
    /// Number of cross-validation folds.
    pub folds: usize,
    /// Candidate boosting round counts.
    pub n_estimators: Vec<usize>,
    /// Candidate boosting learning rates.
    pub learning_rates: Vec<f64>,
    /// Seed for the train/test shuffle. `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            folds: 5,
            n_estimators: vec![100, 150],
            learning_rates: vec![0.8, 1.0],
            seed: None,
        }
    }
}

impl TrainingConfig {
    /// Parse a JSON document, filling unspecified fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TrainingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(DisasterError::invalid_argument(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if self.folds < 2 {
            return Err(DisasterError::invalid_argument(format!(
                "folds must be at least 2, got {}",
                self.folds
            )));
        }
        if self.n_estimators.is_empty() || self.n_estimators.contains(&0) {
            return Err(DisasterError::invalid_argument(
                "n_estimators must be a non-empty list of positive counts",
            ));
        }
        if self.learning_rates.is_empty() || self.learning_rates.iter().any(|&rate| rate <= 0.0) {
            return Err(DisasterError::invalid_argument(
                "learning_rates must be a non-empty list of positive rates",
            ));
        }
        Ok(())
    }
}

/// Settings for the web process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
    pub database: PathBuf,
    pub model: PathBuf,
    pub table: String,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database: PathBuf::from("data/DisasterResponse.db"),
            model: PathBuf::from("models/classifier.bin"),
            table: DEFAULT_TABLE_NAME.to_string(),
        }
    }
}

impl ServeConfig {
    /// The socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                DisasterError::invalid_argument(format!(
                    "invalid listen address {}:{}: {e}",
                    self.host, self.port
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_training_defaults() {
        let config = TrainingConfig::default();
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.learning_rates, vec![0.8, 1.0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_training_config() {
        assert!(TrainingConfig::from_json(r#"{"folds": 1}"#).is_err());
        assert!(TrainingConfig::from_json(r#"{"test_size": 1.5}"#).is_err());
        assert!(TrainingConfig::from_json(r#"{"n_estimators": []}"#).is_err());
        assert!(TrainingConfig::from_json(r#"{"learning_rates": [0.0]}"#).is_err());
        assert!(matches!(
            TrainingConfig::from_json("not json"),
            Err(DisasterError::Json(_))
        ));
    }

    #[test]
    fn test_training_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"n_estimators": [10], "learning_rates": [0.5]}}"#).unwrap();

        let config = TrainingConfig::from_file(file.path()).unwrap();
        assert_eq!(config.n_estimators, vec![10]);
        assert_eq!(config.learning_rates, vec![0.5]);
        assert_eq!(config.folds, 5);
    }

    #[test]
    fn test_serve_socket_addr() {
        let config = ServeConfig::default();
        assert_eq!(config.socket_addr().unwrap().port(), 3000);
        assert_eq!(config.table, "disaster_table");

        let bad = ServeConfig {
            host: "not a host".to_string(),
            ..ServeConfig::default()
        };
        assert!(bad.socket_addr().is_err());
    }
}
