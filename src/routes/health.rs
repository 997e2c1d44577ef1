use axum::{extract::State, response::IntoResponse};
use serde_json::json;

use crate::{dto::api_response::ApiResponse, AppState};

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up; `data.database` reports connectivity")
    )
)]
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => "ok",
        Err(err) => {
            tracing::warn!(error = %err, "health check could not reach the database");
            "unavailable"
        }
    };
    ApiResponse::ok("Service is healthy.", json!({ "database": database }))
}
