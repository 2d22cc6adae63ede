//! Multi-label text classification.
//!
//! The model is a [`TextPipeline`]: message tokens are counted by a
//! [`CountVectorizer`], reweighted by a [`TfidfTransformer`] and fed to one
//! boosted decision-stump classifier per label ([`MultiOutputClassifier`]).
//! [`GridSearch`] picks the boosting hyperparameters by cross-validated
//! micro-averaged recall and [`ModelArtifact`] persists the winner.

pub mod artifact;
pub mod boosting;
pub mod grid_search;
pub mod metrics;
pub mod multi_output;
pub mod pipeline;
pub mod split;
pub mod vectorizer;

pub use artifact::{ARTIFACT_FORMAT_VERSION, ModelArtifact, versioned_path};
pub use boosting::{AdaBoostClassifier, BoostingParams, DecisionStump, FeatureColumns};
pub use grid_search::{CandidateResult, GridSearch, GridSearchResult};
pub use metrics::{ClassificationReport, LabelMetrics, recall_micro};
pub use multi_output::MultiOutputClassifier;
pub use pipeline::TextPipeline;
pub use split::{KFold, train_test_split};
pub use vectorizer::{CountVectorizer, SparseVector, TfidfTransformer};
