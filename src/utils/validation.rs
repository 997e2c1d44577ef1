use std::borrow::Cow;

use url::Url;
use validator::{ValidationError, ValidationErrors};

use crate::models::job::{EXPERIENCE_LEVELS, JOB_TYPES};
use crate::models::job_application::ApplicationStatus;

pub fn invalid(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// A single-field `ValidationErrors`, for checks that need the database or the request.
pub fn field_error(
    field: &'static str,
    code: &'static str,
    message: impl Into<Cow<'static, str>>,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, invalid(code, message));
    errors
}

pub fn missing_field(field: &'static str) -> ValidationErrors {
    field_error(field, "required", "This field is required.")
}

pub fn unknown_pk(field: &'static str, id: i64) -> ValidationErrors {
    field_error(
        field,
        "does_not_exist",
        format!("Invalid pk \"{}\" - object does not exist.", id),
    )
}

pub fn validate_user_type(value: &str) -> Result<(), ValidationError> {
    match value {
        "Applicant" | "Employer" => Ok(()),
        _ => Err(invalid("invalid_choice", "Invalid User Type")),
    }
}

pub fn validate_phone_number(value: &str) -> Result<(), ValidationError> {
    if value.len() == 10 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(invalid(
            "invalid_phone_number",
            "Phone number must be exactly 10 digits.",
        ))
    }
}

pub fn validate_website(value: &str) -> Result<(), ValidationError> {
    let parsed = Url::parse(value).map_err(|_| invalid("invalid_url", "Enter a valid URL."))?;
    match (parsed.scheme(), parsed.host_str()) {
        ("http" | "https", Some(host)) if !host.is_empty() => Ok(()),
        _ => Err(invalid("invalid_url", "Enter a valid URL.")),
    }
}

fn choice(value: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(invalid(
            "invalid_choice",
            format!("\"{}\" is not a valid choice.", value),
        ))
    }
}

pub fn validate_job_type(value: &str) -> Result<(), ValidationError> {
    choice(value, &JOB_TYPES)
}

pub fn validate_experience_level(value: &str) -> Result<(), ValidationError> {
    choice(value, &EXPERIENCE_LEVELS)
}

pub fn validate_application_status(value: &str) -> Result<(), ValidationError> {
    let allowed = ApplicationStatus::ALL.map(|status| status.as_str());
    choice(value, &allowed)
}
