use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full-time, part-time, contract.
pub const JOB_TYPES: [&str; 3] = ["FT", "PT", "CT"];
pub const EXPERIENCE_LEVELS: [&str; 3] = ["entry", "mid", "senior"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: i64,
    pub employer_id: i64,
    pub job_title: String,
    pub description: String,
    pub location: String,
    pub salary_min: Decimal,
    pub salary_max: Decimal,
    pub job_type: String,
    pub experience_level: String,
    pub required_skills: Vec<i64>,
    pub posted_date: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}
