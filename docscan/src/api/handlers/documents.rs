use axum::extract::State;
use axum::Json;

use crate::api::dto::{DocumentResponse, ErrorResponse, UploadForm};
use crate::api::extractors::{AppMultipart, AppPath};
use crate::api::state::AppState;
use crate::error::{DocscanError, Result};

/// `POST /upload/`
///
/// Reads the `file` field of a multipart form, stores the bytes, runs OCR
/// and records the result. Other form fields are ignored.
#[utoipa::path(
    post,
    path = "/upload/",
    tag = "documents",
    request_body(content_type = "multipart/form-data", content = UploadForm, description = "Image file in the `file` field"),
    responses(
        (status = 200, description = "Document stored", body = DocumentResponse),
        (status = 400, description = "Missing file or undecodable image", body = ErrorResponse),
        (status = 500, description = "OCR or database failure", body = ErrorResponse),
        (status = 502, description = "Blob storage failure", body = ErrorResponse),
        (status = 503, description = "OCR engine unavailable", body = ErrorResponse),
    )
)]
pub async fn upload_file(
    State(state): State<AppState>,
    AppMultipart(mut multipart): AppMultipart,
) -> Result<Json<DocumentResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DocscanError::Validation(format!("Failed to read multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| DocscanError::Validation(format!("Failed to read file: {e}")))?;

        tracing::debug!(filename = %filename, bytes = bytes.len(), "Upload received");

        let document = state.documents.upload(&filename, bytes).await?;
        return Ok(Json(document.into()));
    }

    Err(DocscanError::Validation(
        "Missing required field: file".to_string(),
    ))
}

/// `GET /documents/{id}`
#[utoipa::path(
    get,
    path = "/documents/{id}",
    tag = "documents",
    params(("id" = i64, Path, description = "Document id returned by upload")),
    responses(
        (status = 200, description = "Document found", body = DocumentResponse),
        (status = 400, description = "Id is not an integer", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
    )
)]
pub async fn get_document(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<DocumentResponse>> {
    match state.documents.get(id).await? {
        Some(document) => Ok(Json(document.into())),
        None => Err(DocscanError::NotFound(format!("Document {id} not found"))),
    }
}
