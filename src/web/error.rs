//! Errors surfaced at the HTTP boundary

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::types::customer::InvalidField;

/// Request failure, mapped to an HTTP status
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Value outside the fixed option sets or numeric domain
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Classifier could not produce a prediction
    #[error("prediction failed: {0:#}")]
    Prediction(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<InvalidField> for ServiceError {
    fn from(err: InvalidField) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
