//! HTTP rendering of [`DisasterError`].

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::DisasterError;

impl DisasterError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DisasterError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DisasterError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        log::error!("Request failed ({}): {message}", status.as_u16());

        let body = Json(json!({
            "error": {
                "message": message,
                "status": status.as_u16(),
            }
        }));
        (status, body).into_response()
    }
}
