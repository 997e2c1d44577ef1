use axum::{extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    dto::{
        api_response::ApiResponse,
        auth_dto::{
            AccessTokenResponse, LoginPayload, LogoutPayload, RefreshPayload, RegisterPayload,
            TokenPairResponse, UserResponse,
        },
    },
    error::Result,
    middleware::json::ApiJson,
    models::principal::Principal,
    AppState,
};

#[utoipa::path(
    post,
    path = "/register/",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid payload or username taken")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.account_service.register(payload).await?;
    Ok(ApiResponse::created(
        "User Registered Successfully!",
        UserResponse::from(user),
    ))
}

#[utoipa::path(
    post,
    path = "/login/",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Access and refresh tokens", body = TokenPairResponse),
        (status = 401, description = "Bad credentials")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let pair = state
        .session_service
        .login(&payload.username, &payload.password)
        .await?;
    Ok(ApiResponse::ok(
        "Login Successful.",
        TokenPairResponse {
            access: pair.access,
            refresh: pair.refresh,
        },
    ))
}

#[utoipa::path(
    post,
    path = "/token/refresh/",
    request_body = RefreshPayload,
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 401, description = "Refresh token invalid, expired or revoked")
    )
)]
#[axum::debug_handler]
pub async fn refresh_token(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RefreshPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let access = state.session_service.refresh(&payload.refresh).await?;
    Ok(ApiResponse::ok(
        "Token refreshed successfully.",
        AccessTokenResponse { access },
    ))
}

#[utoipa::path(
    post,
    path = "/logout/",
    request_body = LogoutPayload,
    responses(
        (status = 200, description = "Refresh token revoked"),
        (status = 400, description = "Token missing, invalid or not owned by the caller"),
        (status = 401, description = "Not authenticated")
    )
)]
#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(payload): ApiJson<LogoutPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state
        .session_service
        .logout(principal.user_id(), &payload.refresh_token)
        .await?;
    Ok(ApiResponse::message("Logged out successfully."))
}
