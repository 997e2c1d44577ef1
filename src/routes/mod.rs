pub mod auth;
pub mod health;
pub mod job;
pub mod job_application;
pub mod notification;
pub mod profile;
pub mod skill;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;

use crate::{error::Error, middleware::rate_limit::rps_middleware, AppState};

/// Room for the multipart framing and text fields around a maximum-size resume.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::register,
        auth::login,
        auth::refresh_token,
        auth::logout,
        profile::create_applicant_profile,
        profile::get_applicant_profile,
        profile::update_applicant_profile,
        profile::create_employer_profile,
        profile::get_employer_profile,
        profile::update_employer_profile,
        skill::list_skills,
        skill::create_skill,
        job::create_job,
        job::list_jobs,
        job::list_employer_jobs,
        job::get_job,
        job::update_job,
        job::delete_job,
        job::list_job_applications,
        job_application::apply,
        job_application::list_applications,
        job_application::withdraw_application,
        job_application::update_application_status,
        job_application::application_audit,
        notification::list_notifications,
        notification::mark_notification_read,
    ),
    info(title = "Job Board API")
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn fallback() -> Error {
    Error::NotFound("Not found.".to_string())
}

pub fn app(state: AppState) -> Router {
    let uploads = ServeDir::new(state.resume_store.root().to_path_buf());
    let body_limit = state.max_resume_bytes + FORM_OVERHEAD_BYTES;

    let credential_routes = Router::new()
        .route("/register/", post(auth::register))
        .route("/login/", post(auth::login))
        .layer(from_fn_with_state(state.auth_limiter.clone(), rps_middleware));

    let api_routes = Router::new()
        .route("/health", get(health::health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/token/refresh/", post(auth::refresh_token))
        .route("/logout/", post(auth::logout))
        .route(
            "/profile/applicant/",
            post(profile::create_applicant_profile)
                .get(profile::get_applicant_profile)
                .put(profile::update_applicant_profile),
        )
        .route(
            "/profile/employer/",
            post(profile::create_employer_profile)
                .get(profile::get_employer_profile)
                .put(profile::update_employer_profile),
        )
        .route("/skill/", get(skill::list_skills).post(skill::create_skill))
        .route("/job/", post(job::create_job).get(job::list_jobs))
        .route("/employer/job/", get(job::list_employer_jobs))
        .route(
            "/job/:id/",
            get(job::get_job).put(job::update_job).delete(job::delete_job),
        )
        .route("/job/:id/applications/", get(job::list_job_applications))
        .route(
            "/job-application/",
            post(job_application::apply).get(job_application::list_applications),
        )
        .route(
            "/job-application/:id/",
            delete(job_application::withdraw_application),
        )
        .route(
            "/job-application/:id/status/",
            put(job_application::update_application_status),
        )
        .route(
            "/job-application/:id/audit/",
            get(job_application::application_audit),
        )
        .route("/notification/", get(notification::list_notifications))
        .route(
            "/notification/:id/read/",
            put(notification::mark_notification_read),
        );

    Router::new()
        .merge(credential_routes)
        .merge(api_routes)
        .nest_service("/uploads", uploads)
        .fallback(fallback)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
}
