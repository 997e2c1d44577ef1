use std::collections::BTreeSet;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::dto::auth_dto::UserResponse;
use crate::models::profile::{ApplicantProfile, EmployerProfile};
use crate::models::user::User;
use crate::utils::validation::{
    field_error, invalid, missing_field, validate_phone_number, validate_website,
};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF";

/// A file part taken from a multipart body.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Applicant profile fields as submitted in a multipart form. Every field is optional so
/// the same shape serves create (required fields checked separately) and partial update.
#[derive(Debug, Clone, Default, Validate)]
pub struct ApplicantProfileForm {
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: Option<String>,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub address: Option<String>,
    /// `Some` whenever the `skills` key was present, even with no values.
    pub skills: Option<BTreeSet<i64>>,
    pub profile_complete: Option<bool>,
    pub resume_file: Option<ResumeUpload>,
}

impl ApplicantProfileForm {
    /// Field validation plus resume checks.
    pub fn check(&self, max_resume_bytes: usize) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        if let Some(resume) = &self.resume_file {
            if let Err(err) = validate_resume(resume, max_resume_bytes) {
                errors.add("resume_file", err);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creation needs phone, address and a resume on top of `check`.
    pub fn check_for_create(&self, max_resume_bytes: usize) -> Result<(), ValidationErrors> {
        if self.phone_number.is_none() {
            return Err(missing_field("phone_number"));
        }
        if self.address.is_none() {
            return Err(missing_field("address"));
        }
        if self.resume_file.is_none() {
            return Err(field_error(
                "resume_file",
                "required",
                "No file was submitted.",
            ));
        }
        self.check(max_resume_bytes)
    }
}

pub fn validate_resume(resume: &ResumeUpload, max_bytes: usize) -> Result<(), ValidationError> {
    if resume.content_type.as_deref() != Some(PDF_CONTENT_TYPE) {
        return Err(invalid(
            "invalid_content_type",
            "Only PDF files are allowed for the resume.",
        ));
    }
    if resume.data.is_empty() {
        return Err(invalid("empty", "The submitted file is empty."));
    }
    if resume.data.len() > max_bytes {
        return Err(invalid(
            "too_large",
            format!("The resume file may not exceed {} bytes.", max_bytes),
        ));
    }
    if !resume.data.starts_with(PDF_MAGIC) {
        return Err(invalid(
            "invalid_pdf",
            "The submitted file is not a valid PDF document.",
        ));
    }
    Ok(())
}

/// Accepts `"3"`, `"1,2,3"` or `"[1, 2]"`; blank input contributes no ids.
pub fn parse_skill_ids(raw: &str) -> Result<Vec<i64>, ValidationErrors> {
    raw.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| {
            piece.parse::<i64>().map_err(|_| {
                field_error(
                    "skills",
                    "incorrect_type",
                    format!("Incorrect type. Expected pk value, received \"{}\".", piece),
                )
            })
        })
        .collect()
}

pub fn parse_form_bool(field: &'static str, raw: &str) -> Result<bool, ValidationErrors> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" | "" => Ok(false),
        _ => Err(field_error(field, "invalid", "Must be a valid boolean.")),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEmployerProfilePayload {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Ensure this field has between 1 and 100 characters."
    ))]
    pub company_name: String,
    #[validate(custom(function = "validate_website"))]
    pub company_website: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Ensure this field has between 1 and 100 characters."
    ))]
    pub location: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateEmployerProfilePayload {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Ensure this field has between 1 and 100 characters."
    ))]
    pub company_name: Option<String>,
    #[validate(custom(function = "validate_website"))]
    pub company_website: Option<String>,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Ensure this field has between 1 and 100 characters."
    ))]
    pub location: Option<String>,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantProfileResponse {
    pub id: i64,
    pub user: UserResponse,
    pub phone_number: String,
    pub address: String,
    pub resume_file: String,
    pub skills: Vec<i64>,
    pub profile_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicantProfileResponse {
    pub fn new(profile: ApplicantProfile, user: User) -> Self {
        Self {
            id: profile.id,
            user: user.into(),
            phone_number: profile.phone_number,
            address: profile.address,
            resume_file: format!("/uploads/{}", profile.resume_file),
            skills: profile.skills,
            profile_complete: profile.profile_complete,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployerProfileResponse {
    pub id: i64,
    pub user: UserResponse,
    pub company_name: String,
    pub company_website: String,
    pub location: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmployerProfileResponse {
    pub fn new(profile: EmployerProfile, user: User) -> Self {
        Self {
            id: profile.id,
            user: user.into(),
            company_name: profile.company_name,
            company_website: profile.company_website,
            location: profile.location,
            description: profile.description,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}
