//! Multi-label evaluation metrics.
//!
//! Undefined ratios (no predicted or no true positives) count as `0.0`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DisasterError, Result};

/// Precision, recall, F1 and support of one label or one average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct Counts {
    true_positives: usize,
    false_positives: usize,
    false_negatives: usize,
}

impl Counts {
    fn metrics(&self) -> LabelMetrics {
        let precision = ratio(
            self.true_positives,
            self.true_positives + self.false_positives,
        );
        let recall = ratio(
            self.true_positives,
            self.true_positives + self.false_negatives,
        );
        LabelMetrics {
            precision,
            recall,
            f1: f1_score(precision, recall),
            support: self.true_positives + self.false_negatives,
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

fn check_shapes(y_true: &[Vec<u8>], y_pred: &[Vec<u8>], n_labels: usize) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(DisasterError::model(format!(
            "{} true rows but {} predicted rows",
            y_true.len(),
            y_pred.len()
        )));
    }
    for (row, (actual, predicted)) in y_true.iter().zip(y_pred).enumerate() {
        if actual.len() != n_labels || predicted.len() != n_labels {
            return Err(DisasterError::model(format!(
                "row {row} does not have {n_labels} labels"
            )));
        }
    }
    Ok(())
}

fn label_counts(y_true: &[Vec<u8>], y_pred: &[Vec<u8>], n_labels: usize) -> Vec<Counts> {
    let mut counts = vec![Counts::default(); n_labels];
    for (actual, predicted) in y_true.iter().zip(y_pred) {
        for (label, count) in counts.iter_mut().enumerate() {
            match (actual[label] == 1, predicted[label] == 1) {
                (true, true) => count.true_positives += 1,
                (false, true) => count.false_positives += 1,
                (true, false) => count.false_negatives += 1,
                (false, false) => {}
            }
        }
    }
    counts
}

/// Recall pooled over every label: `TP / (TP + FN)`.
pub fn recall_micro(y_true: &[Vec<u8>], y_pred: &[Vec<u8>]) -> Result<f64> {
    let n_labels = y_true.first().map(Vec::len).unwrap_or(0);
    check_shapes(y_true, y_pred, n_labels)?;

    let counts = label_counts(y_true, y_pred, n_labels);
    let true_positives: usize = counts.iter().map(|c| c.true_positives).sum();
    let false_negatives: usize = counts.iter().map(|c| c.false_negatives).sum();
    Ok(ratio(true_positives, true_positives + false_negatives))
}

/// Per-label metrics plus micro, macro, weighted and per-sample averages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub labels: Vec<(String, LabelMetrics)>,
    pub micro_avg: LabelMetrics,
    pub macro_avg: LabelMetrics,
    pub weighted_avg: LabelMetrics,
    pub samples_avg: LabelMetrics,
}

impl ClassificationReport {
    pub fn new(label_names: &[String], y_true: &[Vec<u8>], y_pred: &[Vec<u8>]) -> Result<Self> {
        let n_labels = label_names.len();
        check_shapes(y_true, y_pred, n_labels)?;

        let counts = label_counts(y_true, y_pred, n_labels);
        let per_label: Vec<LabelMetrics> = counts.iter().map(Counts::metrics).collect();
        let total_support: usize = per_label.iter().map(|m| m.support).sum();

        let pooled = counts.iter().fold(Counts::default(), |acc, c| Counts {
            true_positives: acc.true_positives + c.true_positives,
            false_positives: acc.false_positives + c.false_positives,
            false_negatives: acc.false_negatives + c.false_negatives,
        });
        let micro_avg = pooled.metrics();

        let mean = |metric: fn(&LabelMetrics) -> f64| -> f64 {
            if per_label.is_empty() {
                0.0
            } else {
                per_label.iter().map(metric).sum::<f64>() / per_label.len() as f64
            }
        };
        let macro_avg = LabelMetrics {
            precision: mean(|m| m.precision),
            recall: mean(|m| m.recall),
            f1: mean(|m| m.f1),
            support: total_support,
        };

        let weighted = |metric: fn(&LabelMetrics) -> f64| -> f64 {
            if total_support == 0 {
                0.0
            } else {
                per_label
                    .iter()
                    .map(|m| metric(m) * m.support as f64)
                    .sum::<f64>()
                    / total_support as f64
            }
        };
        let weighted_avg = LabelMetrics {
            precision: weighted(|m| m.precision),
            recall: weighted(|m| m.recall),
            f1: weighted(|m| m.f1),
            support: total_support,
        };

        let samples_avg = samples_average(y_true, y_pred, total_support);

        Ok(ClassificationReport {
            labels: label_names.iter().cloned().zip(per_label).collect(),
            micro_avg,
            macro_avg,
            weighted_avg,
            samples_avg,
        })
    }

    pub fn get(&self, label: &str) -> Option<&LabelMetrics> {
        self.labels
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, metrics)| metrics)
    }
}

fn samples_average(y_true: &[Vec<u8>], y_pred: &[Vec<u8>], support: usize) -> LabelMetrics {
    if y_true.is_empty() {
        return LabelMetrics {
            support,
            ..LabelMetrics::default()
        };
    }

    let (mut precision, mut recall, mut f1) = (0.0, 0.0, 0.0);
    for (actual, predicted) in y_true.iter().zip(y_pred) {
        let true_count = actual.iter().filter(|&&v| v == 1).count();
        let predicted_count = predicted.iter().filter(|&&v| v == 1).count();
        let overlap = actual
            .iter()
            .zip(predicted)
            .filter(|&(&a, &p)| a == 1 && p == 1)
            .count();

        precision += ratio(overlap, predicted_count);
        recall += ratio(overlap, true_count);
        f1 += ratio(2 * overlap, predicted_count + true_count);
    }

    let n = y_true.len() as f64;
    LabelMetrics {
        precision: precision / n,
        recall: recall / n,
        f1: f1 / n,
        support,
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let averages = [
            ("micro avg", &self.micro_avg),
            ("macro avg", &self.macro_avg),
            ("weighted avg", &self.weighted_avg),
            ("samples avg", &self.samples_avg),
        ];
        let width = self
            .labels
            .iter()
            .map(|(name, _)| name.chars().count())
            .chain(averages.iter().map(|(name, _)| name.len()))
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;

        let row = |f: &mut fmt::Formatter<'_>, name: &str, m: &LabelMetrics| {
            writeln!(
                f,
                "{name:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                m.precision, m.recall, m.f1, m.support
            )
        };
        for (name, metrics) in &self.labels {
            row(f, name, metrics)?;
        }
        writeln!(f)?;
        for (name, metrics) in averages {
            row(f, name, metrics)?;
        }
        Ok(())
    }
}
