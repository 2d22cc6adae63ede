//! AdaBoost (SAMME) over decision stumps for one binary label.
//!
//! Stumps split a single feature at a threshold. Features are assumed
//! non-negative (TF-IDF weights), so samples without the feature always fall
//! on the left side of the split.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DisasterError, Result};
use crate::ml::vectorizer::SparseVector;

/// Boosting hyperparameters explored by the grid search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostingParams {
    /// Maximum number of boosting rounds.
    pub n_estimators: usize,
    /// Shrinkage applied to every estimator weight.
    pub learning_rate: f64,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 50,
            learning_rate: 1.0,
        }
    }
}

impl fmt::Display for BoostingParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "learning_rate={}, n_estimators={}",
            self.learning_rate, self.n_estimators
        )
    }
}

/// Column-major copy of a sparse design matrix.
///
/// Each column lists `(row, value)` for the rows where the feature is
/// non-zero, sorted by ascending value. Built once and shared by all labels.
#[derive(Debug, Clone)]
pub struct FeatureColumns {
    n_samples: usize,
    columns: Vec<Vec<(usize, f64)>>,
}

impl FeatureColumns {
    pub fn from_rows(rows: &[SparseVector], n_features: usize) -> Result<Self> {
        let mut columns: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n_features];
        for (row, vector) in rows.iter().enumerate() {
            for (feature, value) in vector.iter() {
                if !(value.is_finite() && value > 0.0) {
                    return Err(DisasterError::model(format!(
                        "feature {feature} of row {row} has unsupported value {value}"
                    )));
                }
                columns
                    .get_mut(feature)
                    .ok_or_else(|| {
                        DisasterError::model(format!(
                            "feature index {feature} out of range for {n_features} features"
                        ))
                    })?
                    .push((row, value));
            }
        }
        for column in &mut columns {
            column.sort_by(|a, b| a.1.total_cmp(&b.1));
        }

        Ok(FeatureColumns {
            n_samples: rows.len(),
            columns,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn n_features(&self) -> usize {
        self.columns.len()
    }
}

/// One-level decision tree. `feature == None` is a constant predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionStump {
    feature: Option<usize>,
    threshold: f64,
    left: u8,
    right: u8,
}

impl DecisionStump {
    /// A stump that always predicts `class`.
    pub fn constant(class: u8) -> Self {
        DecisionStump {
            feature: None,
            threshold: 0.0,
            left: class,
            right: class,
        }
    }

    pub fn feature(&self) -> Option<usize> {
        self.feature
    }

    pub fn predict(&self, x: &SparseVector) -> u8 {
        match self.feature {
            Some(feature) if x.get(feature) > self.threshold => self.right,
            _ => self.left,
        }
    }

    /// Find the split with the lowest weighted misclassification error.
    fn fit(columns: &FeatureColumns, y: &[u8], weights: &[f64]) -> Self {
        let mut total = [0.0f64; 2];
        for (&label, &weight) in y.iter().zip(weights) {
            total[usize::from(label)] += weight;
        }

        let mut best = Self::constant(majority(total));
        let mut best_error = side_error(total);

        for (feature, column) in columns.columns.iter().enumerate() {
            if column.is_empty() {
                continue;
            }

            let mut right = [0.0f64; 2];
            for &(row, _) in column {
                right[usize::from(y[row])] += weights[row];
            }
            let mut left = [total[0] - right[0], total[1] - right[1]];

            let mut previous = 0.0;
            let mut position = 0;
            while position < column.len() {
                let value = column[position].1;
                let error = side_error(left) + side_error(right);
                if error < best_error {
                    best_error = error;
                    best = DecisionStump {
                        feature: Some(feature),
                        threshold: (previous + value) / 2.0,
                        left: majority(left),
                        right: majority(right),
                    };
                }

                while position < column.len() && column[position].1 == value {
                    let (row, _) = column[position];
                    let class = usize::from(y[row]);
                    left[class] += weights[row];
                    right[class] -= weights[row];
                    position += 1;
                }
                previous = value;
            }
        }

        best
    }

    /// Predict every training sample at once.
    fn predict_columns(&self, columns: &FeatureColumns, out: &mut [u8]) {
        out.fill(self.left);
        if let Some(feature) = self.feature {
            for &(row, value) in &columns.columns[feature] {
                if value > self.threshold {
                    out[row] = self.right;
                }
            }
        }
    }
}

fn majority(weights: [f64; 2]) -> u8 {
    if weights[1] > weights[0] { 1 } else { 0 }
}

fn side_error(weights: [f64; 2]) -> f64 {
    weights[0].min(weights[1])
}

/// Binary AdaBoost classifier using the SAMME update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaBoostClassifier {
    params: BoostingParams,
    estimators: Vec<DecisionStump>,
    estimator_weights: Vec<f64>,
}

impl AdaBoostClassifier {
    pub fn new(params: BoostingParams) -> Self {
        AdaBoostClassifier {
            params,
            estimators: Vec::new(),
            estimator_weights: Vec::new(),
        }
    }

    pub fn params(&self) -> BoostingParams {
        self.params
    }

    pub fn estimators(&self) -> &[DecisionStump] {
        &self.estimators
    }

    pub fn is_trained(&self) -> bool {
        !self.estimators.is_empty()
    }

    /// Fit on binary targets `y`, one per row of `columns`.
    ///
    /// Boosting stops early once a stump classifies the weighted sample
    /// perfectly or is no better than chance.
    pub fn fit(&mut self, columns: &FeatureColumns, y: &[u8]) -> Result<()> {
        if y.len() != columns.n_samples() {
            return Err(DisasterError::model(format!(
                "{} targets for {} samples",
                y.len(),
                columns.n_samples()
            )));
        }
        if y.is_empty() {
            return Err(DisasterError::model("cannot fit on zero samples"));
        }
        if let Some(&label) = y.iter().find(|&&label| label > 1) {
            return Err(DisasterError::model(format!("target {label} is not binary")));
        }
        if self.params.n_estimators == 0 || self.params.learning_rate <= 0.0 {
            return Err(DisasterError::invalid_argument(format!(
                "invalid boosting parameters: {}",
                self.params
            )));
        }

        self.estimators.clear();
        self.estimator_weights.clear();

        let n = y.len();
        let mut sample_weights = vec![1.0 / n as f64; n];
        let mut predictions = vec![0u8; n];

        for round in 0..self.params.n_estimators {
            let stump = DecisionStump::fit(columns, y, &sample_weights);
            stump.predict_columns(columns, &mut predictions);

            let total: f64 = sample_weights.iter().sum();
            let error = predictions
                .iter()
                .zip(y)
                .zip(&sample_weights)
                .filter(|((predicted, actual), _)| predicted != actual)
                .map(|(_, weight)| weight)
                .sum::<f64>()
                / total;

            if error <= 0.0 {
                self.push(stump, 1.0);
                break;
            }
            if error >= 0.5 {
                if self.estimators.is_empty() {
                    self.push(stump, 1.0);
                }
                break;
            }

            let alpha = self.params.learning_rate * ((1.0 - error) / error).ln();
            self.push(stump, alpha);
            if round + 1 == self.params.n_estimators {
                break;
            }

            let boost = alpha.exp();
            for ((weight, predicted), actual) in sample_weights.iter_mut().zip(&predictions).zip(y) {
                if predicted != actual {
                    *weight *= boost;
                }
            }
            let total: f64 = sample_weights.iter().sum();
            if !(total.is_finite() && total > 0.0) {
                log::warn!("Sample weights degenerated after round {round}; stopping early");
                break;
            }
            for weight in &mut sample_weights {
                *weight /= total;
            }
        }

        Ok(())
    }

    fn push(&mut self, stump: DecisionStump, weight: f64) {
        self.estimators.push(stump);
        self.estimator_weights.push(weight);
    }

    /// Weighted vote: positive means class 1.
    pub fn decision_function(&self, x: &SparseVector) -> f64 {
        self.estimators
            .iter()
            .zip(&self.estimator_weights)
            .map(|(stump, weight)| if stump.predict(x) == 1 { *weight } else { -weight })
            .sum()
    }

    pub fn predict(&self, x: &SparseVector) -> u8 {
        if self.decision_function(x) > 0.0 { 1 } else { 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(dense: &[&[f64]]) -> Vec<SparseVector> {
        dense
            .iter()
            .map(|row| SparseVector::from_sorted(row.iter().copied().enumerate()))
            .collect()
    }

    #[test]
    fn test_single_feature_separable() {
        let x = rows(&[&[1.0, 0.0], &[0.8, 0.3], &[0.0, 1.0], &[0.0, 0.5]]);
        let y = vec![1, 1, 0, 0];
        let columns = FeatureColumns::from_rows(&x, 2).unwrap();

        let mut model = AdaBoostClassifier::new(BoostingParams::default());
        model.fit(&columns, &y).unwrap();

        // A perfect first stump ends boosting.
        assert_eq!(model.estimators().len(), 1);
        let predicted: Vec<u8> = x.iter().map(|row| model.predict(row)).collect();
        assert_eq!(predicted, y);
    }

    #[test]
    fn test_conjunction_needs_several_rounds() {
        let x = rows(&[&[0.0, 0.0], &[1.0, 0.0], &[0.0, 1.0], &[1.0, 1.0]]);
        let y = vec![0, 0, 0, 1];
        let columns = FeatureColumns::from_rows(&x, 2).unwrap();

        let mut model = AdaBoostClassifier::new(BoostingParams {
            n_estimators: 3,
            learning_rate: 1.0,
        });
        model.fit(&columns, &y).unwrap();

        assert_eq!(model.estimators().len(), 3);
        let predicted: Vec<u8> = x.iter().map(|row| model.predict(row)).collect();
        assert_eq!(predicted, y);
    }

    #[test]
    fn test_threshold_between_values() {
        let x = rows(&[&[0.2], &[0.3], &[0.7], &[0.9]]);
        let y = vec![0, 0, 1, 1];
        let columns = FeatureColumns::from_rows(&x, 1).unwrap();

        let mut model = AdaBoostClassifier::new(BoostingParams::default());
        model.fit(&columns, &y).unwrap();

        assert_eq!(model.predict(&SparseVector::from_sorted(vec![(0, 0.6)])), 1);
        assert_eq!(model.predict(&SparseVector::from_sorted(vec![(0, 0.4)])), 0);
        assert_eq!(model.predict(&SparseVector::default()), 0);
    }

    #[test]
    fn test_single_class_is_constant() {
        let x = rows(&[&[1.0], &[0.0], &[0.5]]);
        let columns = FeatureColumns::from_rows(&x, 1).unwrap();

        let mut model = AdaBoostClassifier::new(BoostingParams::default());
        model.fit(&columns, &[0, 0, 0]).unwrap();

        assert_eq!(model.estimators(), &[DecisionStump::constant(0)]);
        assert!(x.iter().all(|row| model.predict(row) == 0));
    }

    #[test]
    fn test_invalid_targets() {
        let x = rows(&[&[1.0], &[0.0]]);
        let columns = FeatureColumns::from_rows(&x, 1).unwrap();
        let mut model = AdaBoostClassifier::new(BoostingParams::default());

        assert!(model.fit(&columns, &[0]).is_err());
        assert!(model.fit(&columns, &[0, 2]).is_err());
    }

    #[test]
    fn test_columns_reject_out_of_range() {
        let x = vec![SparseVector::from_sorted(vec![(3, 1.0)])];
        assert!(FeatureColumns::from_rows(&x, 2).is_err());
    }

    #[test]
    fn test_params_display() {
        let params = BoostingParams {
            n_estimators: 150,
            learning_rate: 0.8,
        };
        assert_eq!(params.to_string(), "learning_rate=0.8, n_estimators=150");
    }
}
