use sqlx::{PgConnection, PgPool};

use crate::dto::job_dto::{CreateJobPayload, JobListQuery, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::job::Job;
use crate::services::skill_service::{replace_links, SkillLink, SkillService};

pub const JOB_NOT_FOUND: &str = "Job not found.";

const JOB_SELECT: &str = r#"
    SELECT j.id, j.employer_id, j.job_title, j.description, j.location,
           j.salary_min, j.salary_max, j.job_type, j.experience_level,
           ARRAY(
               SELECT r.skill_id FROM job_required_skills r
               WHERE r.job_id = j.id
               ORDER BY r.skill_id
           ) AS required_skills,
           j.posted_date, j.is_active, j.created_at, j.updated_at, j.deleted_at
    FROM jobs j
"#;

#[derive(Clone)]
pub struct JobService {
    pool: PgPool,
    skills: SkillService,
}

impl JobService {
    pub fn new(pool: PgPool, skills: SkillService) -> Self {
        Self { pool, skills }
    }

    pub async fn create(&self, employer_id: i64, payload: &CreateJobPayload) -> Result<Job> {
        let skill_ids = payload.skill_ids();
        self.skills
            .ensure_exist("required_skills", &skill_ids)
            .await?;

        let mut tx = self.pool.begin().await?;
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO jobs (
                employer_id, job_title, description, location, salary_min, salary_max,
                job_type, experience_level, is_active
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(employer_id)
        .bind(&payload.job_title)
        .bind(&payload.description)
        .bind(&payload.location)
        .bind(payload.salary_min)
        .bind(payload.salary_max)
        .bind(&payload.job_type)
        .bind(&payload.experience_level)
        .bind(payload.is_active)
        .fetch_one(&mut *tx)
        .await?;

        replace_links(&mut tx, SkillLink::Job, id, &skill_ids).await?;
        let job = fetch_job(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!(employer_id, job_id = id, "job created");
        Ok(job)
    }

    /// Active jobs of every employer, newest first.
    pub async fn list_active(&self, query: &JobListQuery) -> Result<Vec<Job>> {
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));
        let location = query
            .location
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let jobs = sqlx::query_as::<_, Job>(&format!(
            r#"
            {JOB_SELECT}
            WHERE j.is_active = TRUE
              AND j.deleted_at IS NULL
              AND ($1::TEXT IS NULL OR j.job_title ILIKE $1 OR j.description ILIKE $1)
              AND ($2::TEXT IS NULL OR j.location ILIKE $2)
              AND ($3::TEXT IS NULL OR j.job_type = $3)
              AND ($4::TEXT IS NULL OR j.experience_level = $4)
            ORDER BY j.posted_date DESC, j.id DESC
            "#
        ))
        .bind(search)
        .bind(location)
        .bind(query.job_type.as_deref())
        .bind(query.experience_level.as_deref())
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    /// Every live job of one employer, active or not.
    pub async fn list_for_employer(&self, employer_id: i64) -> Result<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(&format!(
            r#"
            {JOB_SELECT}
            WHERE j.employer_id = $1 AND j.deleted_at IS NULL
            ORDER BY j.posted_date DESC, j.id DESC
            "#
        ))
        .bind(employer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    /// A job owned by `employer_id`; other employers' jobs look missing.
    pub async fn get_owned(&self, employer_id: i64, job_id: i64) -> Result<Job> {
        sqlx::query_as::<_, Job>(&format!(
            "{JOB_SELECT} WHERE j.id = $1 AND j.employer_id = $2 AND j.deleted_at IS NULL"
        ))
        .bind(job_id)
        .bind(employer_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(JOB_NOT_FOUND.to_string()))
    }

    /// `current` must come from `get_owned`; the payload is already checked against it.
    pub async fn update(&self, current: &Job, payload: &UpdateJobPayload) -> Result<Job> {
        if let Some(skills) = &payload.required_skills {
            self.skills.ensure_exist("required_skills", skills).await?;
        }

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            UPDATE jobs
            SET job_title = COALESCE($3, job_title),
                description = COALESCE($4, description),
                location = COALESCE($5, location),
                salary_min = COALESCE($6, salary_min),
                salary_max = COALESCE($7, salary_max),
                job_type = COALESCE($8, job_type),
                experience_level = COALESCE($9, experience_level),
                is_active = COALESCE($10, is_active),
                updated_at = NOW()
            WHERE id = $1 AND employer_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(current.id)
        .bind(current.employer_id)
        .bind(payload.job_title.as_deref())
        .bind(payload.description.as_deref())
        .bind(payload.location.as_deref())
        .bind(payload.salary_min)
        .bind(payload.salary_max)
        .bind(payload.job_type.as_deref())
        .bind(payload.experience_level.as_deref())
        .bind(payload.is_active)
        .execute(&mut *tx)
        .await?;

        if let Some(skills) = &payload.required_skills {
            replace_links(&mut tx, SkillLink::Job, current.id, skills).await?;
        }
        let job = fetch_job(&mut tx, current.id).await?;
        tx.commit().await?;
        Ok(job)
    }

    pub async fn soft_delete(&self, employer_id: i64, job_id: i64) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND employer_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(job_id)
        .bind(employer_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(JOB_NOT_FOUND.to_string()));
        }
        tracing::info!(employer_id, job_id, "job deleted");
        Ok(())
    }
}

async fn fetch_job(conn: &mut PgConnection, id: i64) -> Result<Job> {
    sqlx::query_as::<_, Job>(&format!(
        "{JOB_SELECT} WHERE j.id = $1 AND j.deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| Error::NotFound(JOB_NOT_FOUND.to_string()))
}
