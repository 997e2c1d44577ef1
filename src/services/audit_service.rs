use sqlx::{PgConnection, PgPool};

use crate::error::Result;
use crate::models::audit_log::JobApplicationAudit;
use crate::models::job_application::ApplicationStatus;

const AUDIT_COLUMNS: &str =
    "id, job_application_id, status, notes, updated_by, updated_at, created_at";

/// Append-only status history of job applications.
#[derive(Clone)]
pub struct AuditService {
    pool: PgPool,
}

impl AuditService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends one event on the caller's connection, normally inside the transaction
    /// that performs the change being recorded.
    pub async fn record(
        &self,
        conn: &mut PgConnection,
        job_application_id: i64,
        status: ApplicationStatus,
        updated_by: Option<i64>,
        notes: &str,
    ) -> Result<JobApplicationAudit> {
        let row = sqlx::query_as::<_, JobApplicationAudit>(&format!(
            r#"
            INSERT INTO job_application_audits (job_application_id, status, notes, updated_by)
            VALUES ($1, $2, $3, $4)
            RETURNING {AUDIT_COLUMNS}
            "#
        ))
        .bind(job_application_id)
        .bind(status.as_str())
        .bind(notes)
        .bind(updated_by)
        .fetch_one(conn)
        .await?;

        tracing::debug!(
            job_application_id,
            status = status.as_str(),
            audit_id = row.id,
            "audit event recorded"
        );
        Ok(row)
    }

    pub async fn history(&self, job_application_id: i64) -> Result<Vec<JobApplicationAudit>> {
        let rows = sqlx::query_as::<_, JobApplicationAudit>(&format!(
            r#"
            SELECT {AUDIT_COLUMNS}
            FROM job_application_audits
            WHERE job_application_id = $1
            ORDER BY updated_at, id
            "#
        ))
        .bind(job_application_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
