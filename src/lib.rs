//! # disaster-response
//!
//! Multi-label classification of messages sent during disasters.
//!
//! ## Stages
//!
//! - [`dataset`]: load the message and category CSV files, clean them into a
//!   binary-labelled table and store it in SQLite
//! - [`ml`]: tokenize, vectorize and train one boosted classifier per
//!   category, selected by cross-validated grid search
//! - [`serve`]: a small web application that charts the training data and
//!   classifies ad-hoc queries
//!
//! Text normalization lives in [`analysis`] and is shared by training and
//! serving.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod ml;
pub mod serve;

pub mod prelude {
    pub use crate::analysis::analyzer::{Analyzer, MessageAnalyzer};
    pub use crate::config::{ServeConfig, TrainingConfig};
    pub use crate::dataset::{MessageRow, MessageTable, clean_data, load_data, load_table, save_table};
    pub use crate::error::{DisasterError, Result};
    pub use crate::ml::{ClassificationReport, ModelArtifact, TextPipeline};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
