use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::extractor::ExtractionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Remote service error: {0}")]
    RemoteService(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Extraction(_) | AppError::RemoteService(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The message sent to the client. Extraction and internal detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Extraction(_) => "Failed to parse resume file.".to_string(),
            AppError::RemoteService(msg) => {
                format!("An error occurred during resume analysis: {msg}")
            }
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Validation(msg) => tracing::warn!("Rejected request: {msg}"),
            AppError::Extraction(e) => tracing::error!("Extraction error: {e}"),
            AppError::RemoteService(msg) => tracing::error!("Remote service error: {msg}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
        }

        let body = Json(json!({ "error": self.public_message() }));

        (self.status(), body).into_response()
    }
}
