use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::job::Job;
use crate::utils::validation::{invalid, validate_experience_level, validate_job_type};

/// NUMERIC(10,2) keeps eight integer digits and two decimal places.
const SALARY_CEILING: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);
const SALARY_SCALE: u32 = 2;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobPayload {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Ensure this field has between 1 and 100 characters."
    ))]
    pub job_title: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub description: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Ensure this field has between 1 and 100 characters."
    ))]
    pub location: String,
    pub salary_min: Decimal,
    pub salary_max: Decimal,
    #[validate(custom(function = "validate_job_type"))]
    pub job_type: String,
    #[validate(custom(function = "validate_experience_level"))]
    pub experience_level: String,
    #[serde(default)]
    pub required_skills: Option<BTreeSet<i64>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl CreateJobPayload {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        if self.required_skills.is_none() {
            errors.add("required_skills", invalid("required", "This field is required."));
        }
        finish(errors, salary_errors(self.salary_min, self.salary_max))
    }

    /// Empty until `check` has confirmed the key was sent.
    pub fn skill_ids(&self) -> BTreeSet<i64> {
        self.required_skills.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateJobPayload {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Ensure this field has between 1 and 100 characters."
    ))]
    pub job_title: Option<String>,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub description: Option<String>,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Ensure this field has between 1 and 100 characters."
    ))]
    pub location: Option<String>,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    #[validate(custom(function = "validate_job_type"))]
    pub job_type: Option<String>,
    #[validate(custom(function = "validate_experience_level"))]
    pub experience_level: Option<String>,
    /// Replaces the whole relation when present; `[]` clears it.
    pub required_skills: Option<BTreeSet<i64>>,
    pub is_active: Option<bool>,
}

impl UpdateJobPayload {
    /// Salary bounds are checked against the stored values for the omitted side.
    pub fn check_against(&self, current: &Job) -> Result<(), ValidationErrors> {
        let errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        let min = self.salary_min.unwrap_or(current.salary_min);
        let max = self.salary_max.unwrap_or(current.salary_max);
        finish(errors, salary_errors(min, max))
    }
}

fn finish(
    mut errors: ValidationErrors,
    extra: Vec<(&'static str, ValidationError)>,
) -> Result<(), ValidationErrors> {
    for (field, err) in extra {
        errors.add(field, err);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn salary_errors(min: Decimal, max: Decimal) -> Vec<(&'static str, ValidationError)> {
    let mut out = Vec::new();
    for (field, value) in [("salary_min", min), ("salary_max", max)] {
        if value.is_sign_negative() && !value.is_zero() {
            out.push((
                field,
                invalid("min_value", "Ensure this value is greater than or equal to 0."),
            ));
        } else if value.normalize().scale() > SALARY_SCALE {
            out.push((
                field,
                invalid(
                    "max_decimal_places",
                    "Ensure that there are no more than 2 decimal places.",
                ),
            ));
        } else if value >= SALARY_CEILING {
            out.push((
                field,
                invalid(
                    "max_digits",
                    "Ensure that there are no more than 10 digits in total.",
                ),
            ));
        }
    }
    if out.is_empty() && min > max {
        out.push((
            "salary_max",
            invalid(
                "salary_range",
                "salary_max must be greater than or equal to salary_min.",
            ),
        ));
    }
    out
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobListQuery {
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    pub id: i64,
    pub employer: i64,
    pub job_title: String,
    pub description: String,
    pub location: String,
    pub salary_min: Decimal,
    pub salary_max: Decimal,
    pub job_type: String,
    pub required_skills: Vec<i64>,
    pub experience_level: String,
    pub posted_date: DateTime<Utc>,
    pub is_active: bool,
}

impl From<Job> for JobResponse {
    fn from(value: Job) -> Self {
        Self {
            id: value.id,
            employer: value.employer_id,
            job_title: value.job_title,
            description: value.description,
            location: value.location,
            salary_min: value.salary_min,
            salary_max: value.salary_max,
            job_type: value.job_type,
            required_skills: value.required_skills,
            experience_level: value.experience_level,
            posted_date: value.posted_date,
            is_active: value.is_active,
        }
    }
}
