use axum::{
    extract::{Query, State},
    response::IntoResponse,
};

use crate::{
    dto::{
        api_response::ApiResponse,
        application_dto::ApplicationResponse,
        job_dto::{CreateJobPayload, JobListQuery, JobResponse, UpdateJobPayload},
    },
    error::Result,
    middleware::{json::ApiJson, path::ApiPath},
    models::{job::Job, principal::Principal},
    AppState,
};

fn job_list(jobs: Vec<Job>) -> Vec<JobResponse> {
    jobs.into_iter().map(JobResponse::from).collect()
}

#[utoipa::path(
    post,
    path = "/job/",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job created", body = JobResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller has no employer profile")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(payload): ApiJson<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    let employer = principal.require_employer()?;
    payload.check()?;
    let job = state.job_service.create(employer.id, &payload).await?;
    Ok(ApiResponse::created("New Job Created!", JobResponse::from(job)))
}

#[utoipa::path(
    get,
    path = "/job/",
    params(
        ("search" = Option<String>, Query, description = "Match in title or description"),
        ("location" = Option<String>, Query, description = "Match in location"),
        ("job_type" = Option<String>, Query, description = "FT, PT or CT"),
        ("experience_level" = Option<String>, Query, description = "entry, mid or senior")
    ),
    responses(
        (status = 200, description = "Active jobs", body = [JobResponse])
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list_active(&query).await?;
    Ok(ApiResponse::ok("Jobs retrieved successfully.", job_list(jobs)))
}

#[utoipa::path(
    get,
    path = "/employer/job/",
    responses(
        (status = 200, description = "All of the caller's jobs", body = [JobResponse]),
        (status = 403, description = "Caller has no employer profile")
    )
)]
#[axum::debug_handler]
pub async fn list_employer_jobs(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<impl IntoResponse> {
    let employer = principal.require_employer()?;
    let jobs = state.job_service.list_for_employer(employer.id).await?;
    Ok(ApiResponse::ok("Jobs retrieved successfully.", job_list(jobs)))
}

#[utoipa::path(
    get,
    path = "/job/{id}/",
    params(("id" = i64, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job found", body = JobResponse),
        (status = 403, description = "Caller has no employer profile"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    principal: Principal,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse> {
    let employer = principal.require_employer()?;
    let job = state.job_service.get_owned(employer.id, id).await?;
    Ok(ApiResponse::ok(
        "Jobs Details retrieved successfully.",
        JobResponse::from(job),
    ))
}

#[utoipa::path(
    put,
    path = "/job/{id}/",
    params(("id" = i64, Path, description = "Job ID")),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job updated", body = JobResponse),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Caller has no employer profile"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    principal: Principal,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    let employer = principal.require_employer()?;
    let current = state.job_service.get_owned(employer.id, id).await?;
    payload.check_against(&current)?;
    let job = state.job_service.update(&current, &payload).await?;
    Ok(ApiResponse::ok("Job Updated Successfully", JobResponse::from(job)))
}

#[utoipa::path(
    delete,
    path = "/job/{id}/",
    params(("id" = i64, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job deleted"),
        (status = 403, description = "Caller has no employer profile"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    principal: Principal,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse> {
    let employer = principal.require_employer()?;
    state.job_service.soft_delete(employer.id, id).await?;
    Ok(ApiResponse::message("Job Deleted Successfully"))
}

#[utoipa::path(
    get,
    path = "/job/{id}/applications/",
    params(("id" = i64, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Applications to the job", body = [ApplicationResponse]),
        (status = 403, description = "Caller has no employer profile"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn list_job_applications(
    State(state): State<AppState>,
    principal: Principal,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse> {
    let employer = principal.require_employer()?;
    let job = state.job_service.get_owned(employer.id, id).await?;
    let applications = state.application_service.list_for_job(job.id).await?;
    let data: Vec<ApplicationResponse> = applications
        .into_iter()
        .map(ApplicationResponse::from)
        .collect();
    Ok(ApiResponse::ok("Job applications retrieved successfully.", data))
}
