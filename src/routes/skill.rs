use axum::{extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    dto::{
        api_response::ApiResponse,
        skill_dto::{CreateSkillPayload, SkillResponse},
    },
    error::Result,
    middleware::json::ApiJson,
    models::principal::Principal,
    AppState,
};

#[utoipa::path(
    get,
    path = "/skill/",
    responses(
        (status = 200, description = "All skills", body = [SkillResponse])
    )
)]
#[axum::debug_handler]
pub async fn list_skills(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let skills = state.skill_service.list().await?;
    let data: Vec<SkillResponse> = skills.into_iter().map(SkillResponse::from).collect();
    Ok(ApiResponse::ok("Skills retrieved successfully.", data))
}

#[utoipa::path(
    post,
    path = "/skill/",
    request_body = CreateSkillPayload,
    responses(
        (status = 201, description = "Skill created", body = SkillResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Not authenticated")
    )
)]
#[axum::debug_handler]
pub async fn create_skill(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(payload): ApiJson<CreateSkillPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let skill = state.skill_service.create(&payload.name).await?;
    tracing::info!(skill_id = skill.id, created_by = principal.user_id(), "skill created");
    Ok(ApiResponse::created("Skill Created Successfully!", SkillResponse::from(skill)))
}
