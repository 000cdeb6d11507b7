use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocscanError {
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl DocscanError {
    pub fn status(&self) -> StatusCode {
        match self {
            DocscanError::NotFound(_) => StatusCode::NOT_FOUND,
            DocscanError::Validation(_) => StatusCode::BAD_REQUEST,
            DocscanError::InvalidImage(_) => StatusCode::BAD_REQUEST,
            DocscanError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DocscanError::Storage(_) => StatusCode::BAD_GATEWAY,
            DocscanError::Ocr(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DocscanError::OcrUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            DocscanError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DocscanError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DocscanError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            DocscanError::NotFound(msg)
            | DocscanError::Validation(msg)
            | DocscanError::InvalidImage(msg)
            | DocscanError::Storage(msg)
            | DocscanError::Ocr(msg)
            | DocscanError::OcrUnavailable(msg)
            | DocscanError::Configuration(msg)
            | DocscanError::Internal(msg) => msg.clone(),
            DocscanError::Database(e) => e.to_string(),
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, DocscanError>;
