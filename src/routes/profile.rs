use std::collections::BTreeSet;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    dto::{
        api_response::ApiResponse,
        profile_dto::{
            parse_form_bool, parse_skill_ids, ApplicantProfileForm, ApplicantProfileResponse,
            CreateEmployerProfilePayload, EmployerProfileResponse, ResumeUpload,
            UpdateEmployerProfilePayload,
        },
    },
    error::{Error, Result},
    middleware::json::ApiJson,
    models::principal::Principal,
    AppState,
};

/// Collects the applicant profile fields from a multipart body. Unknown parts are ignored
/// and repeated `skills` parts accumulate.
async fn read_applicant_form(
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<ApplicantProfileForm> {
    let mut multipart = multipart.map_err(|rejection| Error::BadRequest(rejection.body_text()))?;
    let mut form = ApplicantProfileForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "phone_number" => form.phone_number = Some(field.text().await?.trim().to_string()),
            "address" => form.address = Some(field.text().await?.trim().to_string()),
            "profile_complete" => {
                let raw = field.text().await?;
                form.profile_complete = Some(parse_form_bool("profile_complete", &raw)?);
            }
            "skills" => {
                let raw = field.text().await?;
                let ids = parse_skill_ids(&raw)?;
                form.skills.get_or_insert_with(BTreeSet::new).extend(ids);
            }
            "resume_file" => {
                let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;
                form.resume_file = Some(ResumeUpload {
                    file_name,
                    content_type,
                    data,
                });
            }
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }
    Ok(form)
}

#[utoipa::path(
    post,
    path = "/profile/applicant/",
    request_body(content = ApplicantProfileForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Applicant profile created", body = ApplicantProfileResponse),
        (status = 400, description = "Invalid form, wrong account type or profile exists"),
        (status = 401, description = "Not authenticated")
    )
)]
#[axum::debug_handler]
pub async fn create_applicant_profile(
    State(state): State<AppState>,
    principal: Principal,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse> {
    principal.can_create_applicant_profile()?;
    let form = read_applicant_form(multipart).await?;
    form.check_for_create(state.max_resume_bytes)?;

    let upload = form
        .resume_file
        .as_ref()
        .ok_or_else(|| Error::Internal("resume missing after validation".to_string()))?;
    let resume_path = state.resume_store.save(upload).await?;

    let profile = match state
        .profile_service
        .create_applicant(principal.user_id(), &form, &resume_path)
        .await
    {
        Ok(profile) => profile,
        Err(err) => {
            state.resume_store.remove(&resume_path).await;
            return Err(err);
        }
    };

    Ok(ApiResponse::created(
        "Applicant Profile Created Successfully!",
        ApplicantProfileResponse::new(profile, principal.user),
    ))
}

#[utoipa::path(
    get,
    path = "/profile/applicant/",
    responses(
        (status = 200, description = "The caller's applicant profile", body = ApplicantProfileResponse),
        (status = 404, description = "No applicant profile yet")
    )
)]
#[axum::debug_handler(state = AppState)]
pub async fn get_applicant_profile(principal: Principal) -> Result<impl IntoResponse> {
    let profile = principal.require_applicant()?.clone();
    Ok(ApiResponse::ok(
        "Applicant Profile retrieved successfully.",
        ApplicantProfileResponse::new(profile, principal.user),
    ))
}

#[utoipa::path(
    put,
    path = "/profile/applicant/",
    request_body(content = ApplicantProfileForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Applicant profile updated", body = ApplicantProfileResponse),
        (status = 400, description = "Invalid form"),
        (status = 404, description = "No applicant profile yet")
    )
)]
#[axum::debug_handler]
pub async fn update_applicant_profile(
    State(state): State<AppState>,
    principal: Principal,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse> {
    let current = principal.require_applicant()?.clone();
    let form = read_applicant_form(multipart).await?;
    form.check(state.max_resume_bytes)?;

    let new_resume = match &form.resume_file {
        Some(upload) => Some(state.resume_store.save(upload).await?),
        None => None,
    };

    let profile = match state
        .profile_service
        .update_applicant(current.id, &form, new_resume.as_deref())
        .await
    {
        Ok(profile) => profile,
        Err(err) => {
            if let Some(path) = &new_resume {
                state.resume_store.remove(path).await;
            }
            return Err(err);
        }
    };
    if new_resume.is_some() {
        state.resume_store.remove(&current.resume_file).await;
    }

    Ok(ApiResponse::ok(
        "Applicant Profile Updated Successfully",
        ApplicantProfileResponse::new(profile, principal.user),
    ))
}

#[utoipa::path(
    post,
    path = "/profile/employer/",
    request_body = CreateEmployerProfilePayload,
    responses(
        (status = 201, description = "Employer profile created", body = EmployerProfileResponse),
        (status = 400, description = "Invalid payload, wrong account type or profile exists"),
        (status = 401, description = "Not authenticated")
    )
)]
#[axum::debug_handler]
pub async fn create_employer_profile(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(payload): ApiJson<CreateEmployerProfilePayload>,
) -> Result<impl IntoResponse> {
    principal.can_create_employer_profile()?;
    payload.validate()?;
    let profile = state
        .profile_service
        .create_employer(principal.user_id(), &payload)
        .await?;
    Ok(ApiResponse::created(
        "Employer Profile Created Successfully!",
        EmployerProfileResponse::new(profile, principal.user),
    ))
}

#[utoipa::path(
    get,
    path = "/profile/employer/",
    responses(
        (status = 200, description = "The caller's employer profile", body = EmployerProfileResponse),
        (status = 404, description = "No employer profile yet")
    )
)]
#[axum::debug_handler(state = AppState)]
pub async fn get_employer_profile(principal: Principal) -> Result<impl IntoResponse> {
    let profile = principal.employer_profile()?.clone();
    Ok(ApiResponse::ok(
        "Employer Profile retrieved successfully.",
        EmployerProfileResponse::new(profile, principal.user),
    ))
}

#[utoipa::path(
    put,
    path = "/profile/employer/",
    request_body = UpdateEmployerProfilePayload,
    responses(
        (status = 200, description = "Employer profile updated", body = EmployerProfileResponse),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "No employer profile yet")
    )
)]
#[axum::debug_handler]
pub async fn update_employer_profile(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(payload): ApiJson<UpdateEmployerProfilePayload>,
) -> Result<impl IntoResponse> {
    let current = principal.employer_profile()?;
    payload.validate()?;
    let profile = state
        .profile_service
        .update_employer(current.id, &payload)
        .await?;
    Ok(ApiResponse::ok(
        "Employer Profile Updated Successfully",
        EmployerProfileResponse::new(profile, principal.user),
    ))
}
