//! Bag-of-words and TF-IDF feature extraction over sparse vectors.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{DisasterError, Result};

/// A sparse feature vector with strictly increasing indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// Build from `(index, value)` pairs, which must be sorted by index and
    /// free of duplicates. Zero values are dropped.
    pub fn from_sorted(pairs: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut vector = SparseVector::default();
        for (index, value) in pairs {
            if value != 0.0 {
                debug_assert!(vector.indices.last().is_none_or(|&last| last < index));
                vector.indices.push(index);
                vector.values.push(value);
            }
        }
        vector
    }

    /// Value at `index`, zero when absent.
    pub fn get(&self, index: usize) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(position) => self.values[position],
            Err(_) => 0.0,
        }
    }

    /// Iterate over the non-zero entries.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }
}

/// Maps token sequences to term-count vectors.
///
/// Feature indices follow the alphabetical order of the vocabulary, so two
/// vectorizers fitted on the same documents are identical.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountVectorizer {
    vocabulary: HashMap<String, usize>,
    feature_names: Vec<String>,
}

impl CountVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn the vocabulary of `documents`.
    pub fn fit(&mut self, documents: &[Vec<String>]) {
        let terms: BTreeSet<&str> = documents
            .iter()
            .flat_map(|tokens| tokens.iter().map(String::as_str))
            .collect();

        self.feature_names = terms.into_iter().map(str::to_string).collect();
        self.vocabulary = self
            .feature_names
            .iter()
            .enumerate()
            .map(|(index, term)| (term.clone(), index))
            .collect();
    }

    /// Count the known terms of one document. Unknown terms are ignored.
    pub fn transform(&self, tokens: &[String]) -> SparseVector {
        let mut counts: Vec<(usize, f64)> = Vec::with_capacity(tokens.len());
        for token in tokens {
            if let Some(&index) = self.vocabulary.get(token) {
                counts.push((index, 1.0));
            }
        }
        counts.sort_unstable_by_key(|&(index, _)| index);

        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(counts.len());
        for (index, count) in counts {
            match merged.last_mut() {
                Some((last, total)) if *last == index => *total += count,
                _ => merged.push((index, count)),
            }
        }
        SparseVector::from_sorted(merged)
    }

    pub fn fit_transform(&mut self, documents: &[Vec<String>]) -> Vec<SparseVector> {
        self.fit(documents);
        documents.iter().map(|tokens| self.transform(tokens)).collect()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.feature_names.len()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }
}

/// Reweights term counts by smoothed inverse document frequency and
/// L2-normalizes each row.
///
/// `idf(t) = ln((1 + n) / (1 + df(t))) + 1`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TfidfTransformer {
    idf: Vec<f64>,
}

impl TfidfTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute document frequencies over `counts`.
    pub fn fit(&mut self, counts: &[SparseVector], n_features: usize) -> Result<()> {
        let mut document_frequency = vec![0usize; n_features];
        for row in counts {
            for (index, _) in row.iter() {
                let slot = document_frequency.get_mut(index).ok_or_else(|| {
                    DisasterError::model(format!(
                        "feature index {index} out of range for {n_features} features"
                    ))
                })?;
                *slot += 1;
            }
        }

        let n_documents = counts.len() as f64;
        self.idf = document_frequency
            .into_iter()
            .map(|df| ((1.0 + n_documents) / (1.0 + df as f64)).ln() + 1.0)
            .collect();
        Ok(())
    }

    pub fn transform(&self, counts: &SparseVector) -> SparseVector {
        let weighted: Vec<(usize, f64)> = counts
            .iter()
            .map(|(index, count)| (index, count * self.idf.get(index).copied().unwrap_or(0.0)))
            .collect();

        let norm = weighted.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        if norm == 0.0 {
            return SparseVector::from_sorted(weighted);
        }
        SparseVector::from_sorted(weighted.into_iter().map(|(index, v)| (index, v / norm)))
    }

    pub fn fit_transform(
        &mut self,
        counts: &[SparseVector],
        n_features: usize,
    ) -> Result<Vec<SparseVector>> {
        self.fit(counts, n_features)?;
        Ok(counts.iter().map(|row| self.transform(row)).collect())
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }
}
