use axum::Json;

use crate::api::dto::GreetingResponse;

/// `GET /`
#[utoipa::path(
    get,
    path = "/",
    tag = "root",
    responses(
        (status = 200, description = "Static greeting", body = GreetingResponse),
    )
)]
pub async fn root() -> Json<GreetingResponse> {
    Json(GreetingResponse::default())
}
