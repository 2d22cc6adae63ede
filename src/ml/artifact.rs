//! Persisted model artifacts.
//!
//! File layout (bincode): a `u32` format version followed by the
//! [`ModelArtifact`] itself. Artifacts with another version are rejected.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DisasterError, Result};
use crate::ml::boosting::BoostingParams;
use crate::ml::pipeline::TextPipeline;

/// Current artifact format version.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// A fitted pipeline with its training metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub trained_at: DateTime<Utc>,
    pub label_names: Vec<String>,
    pub params: BoostingParams,
    /// Mean cross-validated micro recall of the chosen parameters.
    pub cv_score: Option<f64>,
    pub training_rows: usize,
    pub pipeline: TextPipeline,
}

impl ModelArtifact {
    pub fn new(pipeline: TextPipeline, cv_score: Option<f64>, training_rows: usize) -> Self {
        ModelArtifact {
            trained_at: Utc::now(),
            label_names: pipeline.label_names().to_vec(),
            params: pipeline.params(),
            cv_score,
            training_rows,
            pipeline,
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(&mut writer, &ARTIFACT_FORMAT_VERSION)?;
        bincode::serialize_into(&mut writer, self)?;
        writer.flush()?;

        log::info!("Saved model artifact to {}", path.display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path).map_err(|e| {
            DisasterError::invalid_argument(format!(
                "cannot open model {}: {e}",
                path.display()
            ))
        })?);

        let version: u32 = bincode::deserialize_from(&mut reader)?;
        if version != ARTIFACT_FORMAT_VERSION {
            return Err(DisasterError::model(format!(
                "model {} has format version {version}, expected {ARTIFACT_FORMAT_VERSION}",
                path.display()
            )));
        }

        let artifact: ModelArtifact = bincode::deserialize_from(&mut reader)?;
        log::info!(
            "Loaded model trained at {} with {} labels ({})",
            artifact.trained_at.to_rfc3339(),
            artifact.label_names.len(),
            artifact.params
        );
        Ok(artifact)
    }

    pub fn predict(&self, text: &str) -> Result<Vec<u8>> {
        self.pipeline.predict(text)
    }

    pub fn classify(&self, text: &str) -> Result<Vec<(String, u8)>> {
        self.pipeline.classify(text)
    }
}

/// `models/classifier.bin` → `models/classifier-20240101120000.bin`.
pub fn versioned_path(path: &Path, timestamp: DateTime<Utc>) -> PathBuf {
    let stamp = timestamp.format("%Y%m%d%H%M%S");
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    let file_name = match path.extension() {
        Some(ext) => format!("{stem}-{stamp}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{stamp}"),
    };
    path.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;

    fn trained_pipeline() -> TextPipeline {
        let mut pipeline =
            TextPipeline::new(BoostingParams::default(), vec!["water".into(), "food".into()]);
        pipeline
            .fit(
                &["need water", "send food", "storm over", "water please"],
                &[vec![1, 0], vec![0, 1], vec![0, 0], vec![1, 0]],
            )
            .unwrap();
        pipeline
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("models").join("classifier.bin");

        let artifact = ModelArtifact::new(trained_pipeline(), Some(0.9), 4);
        artifact.save(&path).unwrap();

        let loaded = ModelArtifact::load(&path).unwrap();
        assert_eq!(loaded.label_names, vec!["water", "food"]);
        assert_eq!(loaded.params, BoostingParams::default());
        assert_eq!(loaded.cv_score, Some(0.9));
        assert_eq!(loaded.trained_at, artifact.trained_at);
        assert_eq!(
            loaded.predict("Water!").unwrap(),
            artifact.predict("Water!").unwrap()
        );
        assert_eq!(loaded.predict("food").unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_wrong_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("old.bin");
        let mut file = File::create(&path).unwrap();
        bincode::serialize_into(&mut file, &99u32).unwrap();
        drop(file);

        assert!(matches!(
            ModelArtifact::load(&path),
            Err(DisasterError::Model(_))
        ));
    }

    #[test]
    fn test_missing_model() {
        let dir = TempDir::new().unwrap();
        assert!(ModelArtifact::load(dir.path().join("absent.bin")).is_err());
    }

    #[test]
    fn test_versioned_path() {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();

        assert_eq!(
            versioned_path(Path::new("models/classifier.bin"), timestamp),
            PathBuf::from("models/classifier-20240309140507.bin")
        );
        assert_eq!(
            versioned_path(Path::new("classifier"), timestamp),
            PathBuf::from("classifier-20240309140507")
        );
    }
}
