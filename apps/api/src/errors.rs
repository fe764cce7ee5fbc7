use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::document::DocumentError;
use crate::screening::ScreeningError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Please upload the resume")]
    MissingInput,

    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("No inputs found: {0}")]
    NoInputsFound(String),

    #[error("Document has no pages: {0}")]
    NoPages(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ScreeningError> for AppError {
    fn from(err: ScreeningError) -> Self {
        match err {
            ScreeningError::MissingInput => AppError::MissingInput,
            ScreeningError::DirectoryNotFound(path) => {
                AppError::DirectoryNotFound(format!("{} does not exist", path.display()))
            }
            ScreeningError::NoInputsFound(msg) => AppError::NoInputsFound(msg),
            ScreeningError::Document(DocumentError::NoPages(name)) => AppError::NoPages(name),
            ScreeningError::Document(e) => AppError::Document(e.to_string()),
            ScreeningError::Generation(e) => AppError::Llm(e.to_string()),
            ScreeningError::Io(e) => AppError::Internal(e.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::MissingInput => (
                StatusCode::BAD_REQUEST,
                "MISSING_INPUT",
                "Please upload the resume".to_string(),
            ),
            AppError::DirectoryNotFound(msg) => {
                (StatusCode::NOT_FOUND, "DIRECTORY_NOT_FOUND", msg.clone())
            }
            AppError::NoInputsFound(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "NO_INPUTS_FOUND",
                msg.clone(),
            ),
            AppError::NoPages(name) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "NO_PAGES",
                format!("{name} has no renderable pages"),
            ),
            AppError::Document(msg) => {
                tracing::error!("Document error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DOCUMENT_ERROR",
                    "The resume could not be converted".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
