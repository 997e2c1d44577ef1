use sqlx::{FromRow, PgPool};

use crate::dto::application_dto::CreateApplicationPayload;
use crate::error::{Error, Result};
use crate::models::audit_log::JobApplicationAudit;
use crate::models::job_application::{ApplicationStatus, JobApplication};
use crate::models::principal::{Principal, PrincipalKind};
use crate::services::audit_service::AuditService;
use crate::services::notification_service::NotificationService;
use crate::utils::validation::{field_error, unknown_pk};

pub const APPLICATION_NOT_FOUND: &str = "Job application not found.";
const SUBMITTED_NOTE: &str = "Application submitted.";

const APPLICATION_COLUMNS: &str =
    "id, applicant_id, job_id, status, applied_date, created_at, updated_at, deleted_at";

#[derive(Debug, FromRow)]
struct JobAvailability {
    is_active: bool,
}

#[derive(Debug, FromRow)]
struct ReviewTarget {
    id: i64,
    status: String,
    job_title: String,
    applicant_user_id: i64,
}

#[derive(Debug, FromRow)]
struct Parties {
    applicant_id: i64,
    employer_id: i64,
}

#[derive(Clone)]
pub struct ApplicationService {
    pool: PgPool,
    audit: AuditService,
    notifications: NotificationService,
}

impl ApplicationService {
    pub fn new(pool: PgPool, audit: AuditService, notifications: NotificationService) -> Self {
        Self {
            pool,
            audit,
            notifications,
        }
    }

    /// Creates the application in `applied` and its first audit event in one transaction.
    pub async fn apply(
        &self,
        applicant_id: i64,
        user_id: i64,
        payload: &CreateApplicationPayload,
    ) -> Result<JobApplication> {
        let job_id = payload.job_listing;
        let job = sqlx::query_as::<_, JobAvailability>(
            "SELECT is_active FROM jobs WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::Validation(unknown_pk("job_listing", job_id)))?;
        if !job.is_active {
            return Err(Error::Validation(field_error(
                "job_listing",
                "inactive",
                "This job is no longer accepting applications.",
            )));
        }

        let already_applied: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM job_applications
                WHERE applicant_id = $1 AND job_id = $2 AND deleted_at IS NULL
            )
            "#,
        )
        .bind(applicant_id)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;
        if already_applied {
            return Err(Error::BadRequest(
                "You have already applied to this job.".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        let application = sqlx::query_as::<_, JobApplication>(&format!(
            r#"
            INSERT INTO job_applications (applicant_id, job_id, status)
            VALUES ($1, $2, $3)
            RETURNING {APPLICATION_COLUMNS}
            "#
        ))
        .bind(applicant_id)
        .bind(job_id)
        .bind(ApplicationStatus::Applied.as_str())
        .fetch_one(&mut *tx)
        .await?;

        self.audit
            .record(
                &mut tx,
                application.id,
                ApplicationStatus::Applied,
                Some(user_id),
                SUBMITTED_NOTE,
            )
            .await?;
        tx.commit().await?;

        tracing::info!(
            application_id = application.id,
            applicant_id,
            job_id,
            "job application submitted"
        );
        Ok(application)
    }

    pub async fn list_for_applicant(&self, applicant_id: i64) -> Result<Vec<JobApplication>> {
        let rows = sqlx::query_as::<_, JobApplication>(&format!(
            r#"
            SELECT {APPLICATION_COLUMNS}
            FROM job_applications
            WHERE applicant_id = $1 AND deleted_at IS NULL
            ORDER BY applied_date DESC, id DESC
            "#
        ))
        .bind(applicant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Applications to one job; ownership of the job is checked by the caller.
    pub async fn list_for_job(&self, job_id: i64) -> Result<Vec<JobApplication>> {
        let rows = sqlx::query_as::<_, JobApplication>(&format!(
            r#"
            SELECT {APPLICATION_COLUMNS}
            FROM job_applications
            WHERE job_id = $1 AND deleted_at IS NULL
            ORDER BY applied_date, id
            "#
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn withdraw(&self, applicant_id: i64, application_id: i64) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE job_applications
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND applicant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(application_id)
        .bind(applicant_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(APPLICATION_NOT_FOUND.to_string()));
        }
        tracing::info!(application_id, applicant_id, "job application withdrawn");
        Ok(())
    }

    /// Moves an application on a job owned by `employer_id` to `status`. The update, its
    /// audit event and the applicant's notification commit together.
    pub async fn update_status(
        &self,
        employer_id: i64,
        updated_by: i64,
        application_id: i64,
        status: ApplicationStatus,
        notes: &str,
    ) -> Result<JobApplication> {
        let mut tx = self.pool.begin().await?;

        let target = sqlx::query_as::<_, ReviewTarget>(
            r#"
            SELECT a.id, a.status, j.job_title, p.user_id AS applicant_user_id
            FROM job_applications a
            JOIN jobs j ON j.id = a.job_id
            JOIN applicant_profiles p ON p.id = a.applicant_id
            WHERE a.id = $1
              AND a.deleted_at IS NULL
              AND j.employer_id = $2
              AND j.deleted_at IS NULL
            FOR UPDATE OF a
            "#,
        )
        .bind(application_id)
        .bind(employer_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound(APPLICATION_NOT_FOUND.to_string()))?;

        if target.status == status.as_str() {
            return Err(Error::BadRequest(format!(
                "Job application is already in status \"{}\".",
                status
            )));
        }

        let application = sqlx::query_as::<_, JobApplication>(&format!(
            r#"
            UPDATE job_applications
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {APPLICATION_COLUMNS}
            "#
        ))
        .bind(target.id)
        .bind(status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        self.audit
            .record(&mut tx, application.id, status, Some(updated_by), notes)
            .await?;

        let message = format!(
            "Your application for \"{}\" is now {}.",
            target.job_title, status
        );
        self.notifications
            .notify(&mut tx, target.applicant_user_id, &message)
            .await?;
        tx.commit().await?;

        tracing::info!(
            application_id,
            employer_id,
            from = %target.status,
            to = %status,
            "job application status changed"
        );
        Ok(application)
    }

    /// Audit history visible to the applicant who applied and to the job's employer.
    pub async fn audit_trail(
        &self,
        principal: &Principal,
        application_id: i64,
    ) -> Result<Vec<JobApplicationAudit>> {
        let parties = sqlx::query_as::<_, Parties>(
            r#"
            SELECT a.applicant_id, j.employer_id
            FROM job_applications a
            JOIN jobs j ON j.id = a.job_id
            WHERE a.id = $1 AND a.deleted_at IS NULL
            "#,
        )
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(APPLICATION_NOT_FOUND.to_string()))?;

        let allowed = match &principal.kind {
            PrincipalKind::Applicant(profile) => profile.id == parties.applicant_id,
            PrincipalKind::Employer(profile) => profile.id == parties.employer_id,
            PrincipalKind::Unaffiliated => false,
        };
        if !allowed {
            return Err(Error::NotFound(APPLICATION_NOT_FOUND.to_string()));
        }

        self.audit.history(application_id).await
    }
}
