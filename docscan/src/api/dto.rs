//! Wire types for the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Document;

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GreetingResponse {
    #[serde(rename = "Hello")]
    pub hello: String,
}

impl Default for GreetingResponse {
    fn default() -> Self {
        Self {
            hello: "FastAPI".to_string(),
        }
    }
}

/// A stored document as returned by upload and lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DocumentResponse {
    pub id: i64,
    pub filename: String,
    /// Location of the stored bytes, or `not_uploaded` when storage is off.
    pub blob_url: String,
    /// OCR output; may be empty.
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename,
            blob_url: doc.blob_url,
            text: doc.text,
            created_at: doc.created_at,
        }
    }
}

/// Error body shared by every failing route.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// HTTP status code, repeated in the body.
    pub code: u16,
}

/// Multipart form accepted by `POST /upload/`. Documentation only.
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
