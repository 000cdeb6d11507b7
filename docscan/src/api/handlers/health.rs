use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub database: DatabaseStatus,
    pub ocr: OcrStatus,
    pub storage: StorageStatus,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DatabaseStatus {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct OcrStatus {
    pub status: String,
    pub engine: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct StorageStatus {
    pub enabled: bool,
    pub backend: String,
}

/// `GET /health`
///
/// Always 200; a degraded dependency shows up in the body, not the status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthData> {
    let database = match state.db.ping().await {
        Ok(()) => DatabaseStatus {
            status: "ok".to_string(),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            DatabaseStatus {
                status: "error".to_string(),
            }
        }
    };

    let engine = state.documents.ocr();
    let ocr = OcrStatus {
        status: if engine.is_available() {
            "available"
        } else {
            "unavailable"
        }
        .to_string(),
        engine: engine.name(),
    };

    let store = state.documents.storage();
    let storage = StorageStatus {
        enabled: store.is_enabled(),
        backend: store.name(),
    };

    let status = if database.status == "ok" && engine.is_available() {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthData {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        ocr,
        storage,
    })
}
