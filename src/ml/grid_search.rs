//! Exhaustive hyperparameter search with K-fold cross-validation.

use crate::config::TrainingConfig;
use crate::error::{DisasterError, Result};
use crate::ml::boosting::BoostingParams;
use crate::ml::metrics::recall_micro;
use crate::ml::pipeline::TextPipeline;
use crate::ml::split::KFold;

/// Cross-validation outcome of one candidate.
#[derive(Debug, Clone)]
pub struct CandidateResult {
    pub params: BoostingParams,
    pub fold_scores: Vec<f64>,
    pub mean_score: f64,
}

/// Every candidate's scores plus the winner refitted on all rows.
#[derive(Debug, Clone)]
pub struct GridSearchResult {
    pub best_params: BoostingParams,
    pub best_score: f64,
    pub candidates: Vec<CandidateResult>,
    pub best_pipeline: TextPipeline,
}

/// Scores each parameter combination by mean micro-averaged recall over
/// unshuffled folds.
#[derive(Debug, Clone)]
pub struct GridSearch {
    candidates: Vec<BoostingParams>,
    folds: KFold,
}

impl GridSearch {
    /// Build the cartesian grid. Learning rate varies slowest.
    pub fn new(n_estimators: &[usize], learning_rates: &[f64], folds: usize) -> Result<Self> {
        if n_estimators.is_empty() || learning_rates.is_empty() {
            return Err(DisasterError::invalid_argument(
                "parameter grid must not be empty",
            ));
        }

        let candidates = learning_rates
            .iter()
            .flat_map(|&learning_rate| {
                n_estimators.iter().map(move |&n_estimators| BoostingParams {
                    n_estimators,
                    learning_rate,
                })
            })
            .collect();

        Ok(GridSearch {
            candidates,
            folds: KFold::new(folds)?,
        })
    }

    pub fn from_config(config: &TrainingConfig) -> Result<Self> {
        Self::new(&config.n_estimators, &config.learning_rates, config.folds)
    }

    pub fn candidates(&self) -> &[BoostingParams] {
        &self.candidates
    }

    /// Cross-validate every candidate on tokenized `documents`, then refit
    /// the best one on all of them.
    pub fn fit(
        &self,
        documents: &[Vec<String>],
        labels: &[Vec<u8>],
        label_names: &[String],
    ) -> Result<GridSearchResult> {
        if documents.len() != labels.len() {
            return Err(DisasterError::model(format!(
                "{} documents but {} label rows",
                documents.len(),
                labels.len()
            )));
        }

        let splits = self.folds.split(documents.len())?;
        let n_splits = splits.len();
        log::info!(
            "Fitting {n_splits} folds for each of {} candidates, totalling {} fits",
            self.candidates.len(),
            n_splits * self.candidates.len()
        );

        let mut results = Vec::with_capacity(self.candidates.len());
        for &params in &self.candidates {
            let mut fold_scores = Vec::with_capacity(n_splits);
            for (fold, (train, validation)) in splits.iter().enumerate() {
                let score = score_fold(params, documents, labels, label_names, train, validation)?;
                log::info!("[CV {}/{n_splits}] END {params}; score={score:.3}", fold + 1);
                fold_scores.push(score);
            }

            let mean_score = fold_scores.iter().sum::<f64>() / fold_scores.len() as f64;
            results.push(CandidateResult {
                params,
                fold_scores,
                mean_score,
            });
        }

        let best = results
            .iter()
            .fold(None::<&CandidateResult>, |best, candidate| match best {
                Some(current) if current.mean_score >= candidate.mean_score => Some(current),
                _ => Some(candidate),
            })
            .ok_or_else(|| DisasterError::model("no candidates were evaluated"))?;
        let (best_params, best_score) = (best.params, best.mean_score);
        log::info!("Best parameters: {best_params} (mean recall_micro={best_score:.4})");

        let mut best_pipeline = TextPipeline::new(best_params, label_names.to_vec());
        best_pipeline.fit_tokens(documents, labels)?;

        Ok(GridSearchResult {
            best_params,
            best_score,
            candidates: results,
            best_pipeline,
        })
    }
}

fn score_fold(
    params: BoostingParams,
    documents: &[Vec<String>],
    labels: &[Vec<u8>],
    label_names: &[String],
    train: &[usize],
    validation: &[usize],
) -> Result<f64> {
    let train_documents: Vec<Vec<String>> = train.iter().map(|&i| documents[i].clone()).collect();
    let train_labels: Vec<Vec<u8>> = train.iter().map(|&i| labels[i].clone()).collect();

    let mut pipeline = TextPipeline::new(params, label_names.to_vec());
    pipeline.fit_tokens(&train_documents, &train_labels)?;

    let mut predicted = Vec::with_capacity(validation.len());
    let mut actual = Vec::with_capacity(validation.len());
    for &i in validation {
        predicted.push(pipeline.predict_tokens(&documents[i])?);
        actual.push(labels[i].clone());
    }
    recall_micro(&actual, &predicted)
}
