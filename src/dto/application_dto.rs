use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::audit_log::JobApplicationAudit;
use crate::models::job_application::{ApplicationStatus, JobApplication};
use crate::utils::validation::validate_application_status;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApplicationPayload {
    /// Id of the job being applied to.
    pub job_listing: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateStatusPayload {
    #[validate(custom(function = "validate_application_status"))]
    pub status: String,
    #[serde(default)]
    pub notes: String,
}

impl UpdateStatusPayload {
    pub fn status(&self) -> Option<ApplicationStatus> {
        self.status.parse().ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationResponse {
    pub id: i64,
    pub applicant: i64,
    pub job_listing: i64,
    pub status: String,
    pub applied_date: DateTime<Utc>,
}

impl From<JobApplication> for ApplicationResponse {
    fn from(value: JobApplication) -> Self {
        Self {
            id: value.id,
            applicant: value.applicant_id,
            job_listing: value.job_id,
            status: value.status,
            applied_date: value.applied_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResponse {
    pub id: i64,
    pub job_application: i64,
    pub status: String,
    pub notes: String,
    pub updated_by: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

impl From<JobApplicationAudit> for AuditResponse {
    fn from(value: JobApplicationAudit) -> Self {
        Self {
            id: value.id,
            job_application: value.job_application_id,
            status: value.status,
            notes: value.notes,
            updated_by: value.updated_by,
            updated_at: value.updated_at,
        }
    }
}
