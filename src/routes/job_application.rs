use axum::{extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    dto::{
        api_response::ApiResponse,
        application_dto::{
            ApplicationResponse, AuditResponse, CreateApplicationPayload, UpdateStatusPayload,
        },
    },
    error::{Error, Result},
    middleware::{json::ApiJson, path::ApiPath},
    models::principal::Principal,
    utils::validation::field_error,
    AppState,
};

#[utoipa::path(
    post,
    path = "/job-application/",
    request_body = CreateApplicationPayload,
    responses(
        (status = 201, description = "Application submitted", body = ApplicationResponse),
        (status = 400, description = "Unknown or closed job, or already applied"),
        (status = 404, description = "Caller has no applicant profile")
    )
)]
#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(payload): ApiJson<CreateApplicationPayload>,
) -> Result<impl IntoResponse> {
    let applicant = principal.require_applicant()?;
    let application = state
        .application_service
        .apply(applicant.id, principal.user_id(), &payload)
        .await?;
    Ok(ApiResponse::created(
        "Job Application Submitted Successfully!",
        ApplicationResponse::from(application),
    ))
}

#[utoipa::path(
    get,
    path = "/job-application/",
    responses(
        (status = 200, description = "The caller's applications", body = [ApplicationResponse]),
        (status = 404, description = "Caller has no applicant profile")
    )
)]
#[axum::debug_handler]
pub async fn list_applications(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<impl IntoResponse> {
    let applicant = principal.require_applicant()?;
    let applications = state
        .application_service
        .list_for_applicant(applicant.id)
        .await?;
    let data: Vec<ApplicationResponse> = applications
        .into_iter()
        .map(ApplicationResponse::from)
        .collect();
    Ok(ApiResponse::ok("Job Applications retrieved successfully.", data))
}

#[utoipa::path(
    delete,
    path = "/job-application/{id}/",
    params(("id" = i64, Path, description = "Job application ID")),
    responses(
        (status = 200, description = "Application withdrawn"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn withdraw_application(
    State(state): State<AppState>,
    principal: Principal,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse> {
    let applicant = principal.require_applicant()?;
    state.application_service.withdraw(applicant.id, id).await?;
    Ok(ApiResponse::message("Job Application Withdrawn Successfully"))
}

#[utoipa::path(
    put,
    path = "/job-application/{id}/status/",
    params(("id" = i64, Path, description = "Job application ID")),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status changed", body = ApplicationResponse),
        (status = 400, description = "Unknown status or no change"),
        (status = 403, description = "Caller has no employer profile"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_application_status(
    State(state): State<AppState>,
    principal: Principal,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateStatusPayload>,
) -> Result<impl IntoResponse> {
    let employer = principal.require_employer()?;
    payload.validate()?;
    let status = payload.status().ok_or_else(|| {
        Error::Validation(field_error("status", "invalid_choice", "Invalid status."))
    })?;
    let application = state
        .application_service
        .update_status(employer.id, principal.user_id(), id, status, &payload.notes)
        .await?;
    Ok(ApiResponse::ok(
        "Job Application Status Updated Successfully",
        ApplicationResponse::from(application),
    ))
}

#[utoipa::path(
    get,
    path = "/job-application/{id}/audit/",
    params(("id" = i64, Path, description = "Job application ID")),
    responses(
        (status = 200, description = "Status history, oldest first", body = [AuditResponse]),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn application_audit(
    State(state): State<AppState>,
    principal: Principal,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse> {
    let events = state.application_service.audit_trail(&principal, id).await?;
    let data: Vec<AuditResponse> = events.into_iter().map(AuditResponse::from).collect();
    Ok(ApiResponse::ok("Audit history retrieved successfully.", data))
}
