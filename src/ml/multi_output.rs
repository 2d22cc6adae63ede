//! One independent binary classifier per label.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{DisasterError, Result};
use crate::ml::boosting::{AdaBoostClassifier, BoostingParams, FeatureColumns};
use crate::ml::vectorizer::SparseVector;

/// Fits an [`AdaBoostClassifier`] per label column, in parallel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiOutputClassifier {
    params: BoostingParams,
    estimators: Vec<AdaBoostClassifier>,
}

impl MultiOutputClassifier {
    pub fn new(params: BoostingParams) -> Self {
        MultiOutputClassifier {
            params,
            estimators: Vec::new(),
        }
    }

    pub fn params(&self) -> BoostingParams {
        self.params
    }

    pub fn n_outputs(&self) -> usize {
        self.estimators.len()
    }

    pub fn estimators(&self) -> &[AdaBoostClassifier] {
        &self.estimators
    }

    /// Fit on `labels`, a row-major matrix with one vector per sample.
    pub fn fit(&mut self, columns: &FeatureColumns, labels: &[Vec<u8>]) -> Result<()> {
        if labels.len() != columns.n_samples() {
            return Err(DisasterError::model(format!(
                "{} label rows for {} samples",
                labels.len(),
                columns.n_samples()
            )));
        }
        let n_outputs = labels.first().map(Vec::len).unwrap_or(0);
        if n_outputs == 0 {
            return Err(DisasterError::model("no label columns to fit"));
        }
        if let Some(row) = labels.iter().position(|row| row.len() != n_outputs) {
            return Err(DisasterError::model(format!(
                "label row {row} has {} values, expected {n_outputs}",
                labels[row].len()
            )));
        }

        let params = self.params;
        self.estimators = (0..n_outputs)
            .into_par_iter()
            .map(|output| -> Result<AdaBoostClassifier> {
                let targets: Vec<u8> = labels.iter().map(|row| row[output]).collect();
                let mut estimator = AdaBoostClassifier::new(params);
                estimator.fit(columns, &targets)?;
                Ok(estimator)
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "Fitted {n_outputs} label classifiers on {} samples ({params})",
            columns.n_samples()
        );
        Ok(())
    }

    /// Predict the label vector of one sample.
    pub fn predict(&self, x: &SparseVector) -> Vec<u8> {
        self.estimators
            .iter()
            .map(|estimator| estimator.predict(x))
            .collect()
    }
}
