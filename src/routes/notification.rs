use axum::{extract::State, response::IntoResponse};

use crate::{
    dto::{api_response::ApiResponse, notification_dto::NotificationResponse},
    error::Result,
    middleware::path::ApiPath,
    models::principal::Principal,
    AppState,
};

#[utoipa::path(
    get,
    path = "/notification/",
    responses(
        (status = 200, description = "The caller's notifications, newest first", body = [NotificationResponse]),
        (status = 401, description = "Not authenticated")
    )
)]
#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<impl IntoResponse> {
    let rows = state
        .notification_service
        .list_for_user(principal.user_id())
        .await?;
    let data: Vec<NotificationResponse> =
        rows.into_iter().map(NotificationResponse::from).collect();
    Ok(ApiResponse::ok("Notifications retrieved successfully.", data))
}

#[utoipa::path(
    put,
    path = "/notification/{id}/read/",
    params(("id" = i64, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Marked as read", body = NotificationResponse),
        (status = 404, description = "Notification not found")
    )
)]
#[axum::debug_handler]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    principal: Principal,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse> {
    let row = state
        .notification_service
        .mark_read(principal.user_id(), id)
        .await?;
    Ok(ApiResponse::ok(
        "Notification marked as read.",
        NotificationResponse::from(row),
    ))
}
