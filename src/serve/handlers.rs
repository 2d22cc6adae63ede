use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::serve::charts::IndexView;
use crate::serve::context::AppContext;

/// Genre and label distribution charts.
pub async fn index(State(context): State<AppContext>) -> Json<IndexView> {
    Json(IndexView::from_table(&context.table))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoResponse {
    pub query: String,
    pub classification_result: BTreeMap<String, u8>,
}

/// Classify the `query` parameter. A missing query classifies `""`.
pub async fn go(
    State(context): State<AppContext>,
    Query(params): Query<GoParams>,
) -> Result<Json<GoResponse>> {
    let labels = context.model.predict(&params.query)?;
    log::debug!("Classified {:?}", params.query);

    let classification_result = context
        .table
        .label_names()
        .iter()
        .cloned()
        .zip(labels)
        .collect();

    Ok(Json(GoResponse {
        query: params.query,
        classification_result,
    }))
}
