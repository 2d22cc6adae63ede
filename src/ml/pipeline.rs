//! The end-to-end text classification pipeline.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::MessageAnalyzer;
use crate::error::{DisasterError, Result};
use crate::ml::boosting::{BoostingParams, FeatureColumns};
use crate::ml::multi_output::MultiOutputClassifier;
use crate::ml::vectorizer::{CountVectorizer, SparseVector, TfidfTransformer};

/// tokenize → count → TF-IDF → one boosted classifier per label.
///
/// The analyzer is stateless and is rebuilt on deserialization, so a loaded
/// pipeline tokenizes exactly like the one that was trained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextPipeline {
    #[serde(skip)]
    analyzer: MessageAnalyzer,
    vectorizer: CountVectorizer,
    tfidf: TfidfTransformer,
    classifier: MultiOutputClassifier,
    label_names: Vec<String>,
}

impl TextPipeline {
    pub fn new(params: BoostingParams, label_names: Vec<String>) -> Self {
        TextPipeline {
            analyzer: MessageAnalyzer::new(),
            vectorizer: CountVectorizer::new(),
            tfidf: TfidfTransformer::new(),
            classifier: MultiOutputClassifier::new(params),
            label_names,
        }
    }

    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    pub fn params(&self) -> BoostingParams {
        self.classifier.params()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.vocabulary_size()
    }

    pub fn is_trained(&self) -> bool {
        self.classifier.n_outputs() == self.label_names.len() && !self.label_names.is_empty()
    }

    /// Tokenize many texts with the pipeline's analyzer.
    pub fn tokenize_all(&self, texts: &[&str]) -> Result<Vec<Vec<String>>> {
        texts
            .par_iter()
            .map(|text| self.analyzer.tokenize(text))
            .collect()
    }

    pub fn fit(&mut self, texts: &[&str], labels: &[Vec<u8>]) -> Result<()> {
        let documents = self.tokenize_all(texts)?;
        self.fit_tokens(&documents, labels)
    }

    /// Fit on pre-tokenized documents.
    pub fn fit_tokens(&mut self, documents: &[Vec<String>], labels: &[Vec<u8>]) -> Result<()> {
        if documents.is_empty() {
            return Err(DisasterError::model("cannot train on an empty table"));
        }
        if let Some(row) = labels.iter().position(|row| row.len() != self.label_names.len()) {
            return Err(DisasterError::model(format!(
                "label row {row} has {} values for {} label names",
                labels[row].len(),
                self.label_names.len()
            )));
        }

        let counts = self.vectorizer.fit_transform(documents);
        let n_features = self.vectorizer.vocabulary_size();
        let features = self.tfidf.fit_transform(&counts, n_features)?;
        let columns = FeatureColumns::from_rows(&features, n_features)?;
        self.classifier.fit(&columns, labels)?;

        log::debug!(
            "Trained pipeline on {} documents, vocabulary of {n_features} terms",
            documents.len()
        );
        Ok(())
    }

    fn features(&self, tokens: &[String]) -> SparseVector {
        self.tfidf.transform(&self.vectorizer.transform(tokens))
    }

    /// Predict from pre-tokenized text.
    pub fn predict_tokens(&self, tokens: &[String]) -> Result<Vec<u8>> {
        if !self.is_trained() {
            return Err(DisasterError::model("pipeline has not been trained"));
        }
        Ok(self.classifier.predict(&self.features(tokens)))
    }

    /// Predict the label vector of one message.
    pub fn predict(&self, text: &str) -> Result<Vec<u8>> {
        let tokens = self.analyzer.tokenize(text)?;
        self.predict_tokens(&tokens)
    }

    pub fn predict_batch(&self, texts: &[&str]) -> Result<Vec<Vec<u8>>> {
        texts.par_iter().map(|text| self.predict(text)).collect()
    }

    /// Predict and pair every label name with its value.
    pub fn classify(&self, text: &str) -> Result<Vec<(String, u8)>> {
        let predicted = self.predict(text)?;
        Ok(self.label_names.iter().cloned().zip(predicted).collect())
    }
}
