use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::openapi;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Uploads are read whole; the default 2 MB cap does not apply.
    let upload = post(handlers::documents::upload_file).layer(DefaultBodyLimit::disable());

    Router::new()
        .route("/", get(handlers::root::root))
        .route("/upload", upload.clone())
        .route("/upload/", upload)
        .route("/documents/{id}", get(handlers::documents::get_document))
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(openapi::openapi_json))
        .merge(openapi::redoc_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
