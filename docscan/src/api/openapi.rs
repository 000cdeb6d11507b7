use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "docscan API",
        version = "0.1.0",
        description = "Upload images, extract their text with OCR, and look the results up by id.",
    ),
    paths(
        handlers::root::root,
        handlers::health::health_check,
        handlers::documents::upload_file,
        handlers::documents::get_document,
    ),
    components(schemas(
        dto::GreetingResponse,
        dto::DocumentResponse,
        dto::ErrorResponse,
        dto::UploadForm,
        handlers::health::HealthData,
        handlers::health::DatabaseStatus,
        handlers::health::OcrStatus,
        handlers::health::StorageStatus,
    )),
    tags(
        (name = "root", description = "Greeting"),
        (name = "health", description = "Health check"),
        (name = "documents", description = "Upload and lookup"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
