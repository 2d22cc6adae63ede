//! State shared by all request handlers.

use std::sync::Arc;

use crate::config::ServeConfig;
use crate::dataset::store::load_table;
use crate::dataset::table::MessageTable;
use crate::error::{DisasterError, Result};
use crate::ml::artifact::ModelArtifact;

/// The training table and the fitted model, loaded once before the listener
/// starts and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub table: Arc<MessageTable>,
    pub model: Arc<ModelArtifact>,
}

impl AppContext {
    /// Pair a table with a model trained on the same label columns.
    pub fn new(table: MessageTable, model: ModelArtifact) -> Result<Self> {
        if table.label_names() != model.label_names.as_slice() {
            return Err(DisasterError::schema(format!(
                "model labels {:?} do not match table labels {:?}",
                model.label_names,
                table.label_names()
            )));
        }

        Ok(AppContext {
            table: Arc::new(table),
            model: Arc::new(model),
        })
    }

    pub fn load(config: &ServeConfig) -> Result<Self> {
        let table = load_table(&config.database, &config.table)?;
        let model = ModelArtifact::load(&config.model)?;
        Self::new(table, model)
    }
}
