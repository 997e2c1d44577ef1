use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One immutable status event on a job application.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobApplicationAudit {
    pub id: i64,
    pub job_application_id: i64,
    pub status: String,
    pub notes: String,
    pub updated_by: Option<i64>,
    pub updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
