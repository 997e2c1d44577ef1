use sqlx::{PgConnection, PgPool};

use crate::dto::profile_dto::{
    ApplicantProfileForm, CreateEmployerProfilePayload, UpdateEmployerProfilePayload,
};
use crate::error::{Error, Result};
use crate::models::profile::{ApplicantProfile, EmployerProfile};
use crate::services::account_service::APPLICANT_PROFILE_SELECT;
use crate::services::skill_service::{replace_links, SkillLink, SkillService};

#[derive(Clone)]
pub struct ProfileService {
    pool: PgPool,
    skills: SkillService,
}

impl ProfileService {
    pub fn new(pool: PgPool, skills: SkillService) -> Self {
        Self { pool, skills }
    }

    /// `form` must already have passed `check_for_create`; `resume_path` is the stored file.
    pub async fn create_applicant(
        &self,
        user_id: i64,
        form: &ApplicantProfileForm,
        resume_path: &str,
    ) -> Result<ApplicantProfile> {
        if let Some(skills) = &form.skills {
            self.skills.ensure_exist("skills", skills).await?;
        }

        let mut tx = self.pool.begin().await?;
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO applicant_profiles (user_id, phone_number, address, resume_file, profile_complete)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(form.phone_number.as_deref().unwrap_or_default())
        .bind(form.address.as_deref().unwrap_or_default())
        .bind(resume_path)
        .bind(form.profile_complete.unwrap_or(false))
        .fetch_one(&mut *tx)
        .await?;

        if let Some(skills) = &form.skills {
            replace_links(&mut tx, SkillLink::ApplicantProfile, id, skills).await?;
        }
        let profile = fetch_applicant(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!(user_id, profile_id = id, "applicant profile created");
        Ok(profile)
    }

    /// Applies the supplied fields only; a present `skills` key replaces the set.
    pub async fn update_applicant(
        &self,
        profile_id: i64,
        form: &ApplicantProfileForm,
        new_resume_path: Option<&str>,
    ) -> Result<ApplicantProfile> {
        if let Some(skills) = &form.skills {
            self.skills.ensure_exist("skills", skills).await?;
        }

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            UPDATE applicant_profiles
            SET phone_number = COALESCE($2, phone_number),
                address = COALESCE($3, address),
                resume_file = COALESCE($4, resume_file),
                profile_complete = COALESCE($5, profile_complete),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(profile_id)
        .bind(form.phone_number.as_deref())
        .bind(form.address.as_deref())
        .bind(new_resume_path)
        .bind(form.profile_complete)
        .execute(&mut *tx)
        .await?;

        if let Some(skills) = &form.skills {
            replace_links(&mut tx, SkillLink::ApplicantProfile, profile_id, skills).await?;
        }
        let profile = fetch_applicant(&mut tx, profile_id).await?;
        tx.commit().await?;
        Ok(profile)
    }

    pub async fn create_employer(
        &self,
        user_id: i64,
        payload: &CreateEmployerProfilePayload,
    ) -> Result<EmployerProfile> {
        let profile = sqlx::query_as::<_, EmployerProfile>(
            r#"
            INSERT INTO employer_profiles (user_id, company_name, company_website, location, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, company_name, company_website, location, description,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(user_id)
        .bind(&payload.company_name)
        .bind(&payload.company_website)
        .bind(&payload.location)
        .bind(&payload.description)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id, profile_id = profile.id, "employer profile created");
        Ok(profile)
    }

    pub async fn update_employer(
        &self,
        profile_id: i64,
        payload: &UpdateEmployerProfilePayload,
    ) -> Result<EmployerProfile> {
        let profile = sqlx::query_as::<_, EmployerProfile>(
            r#"
            UPDATE employer_profiles
            SET company_name = COALESCE($2, company_name),
                company_website = COALESCE($3, company_website),
                location = COALESCE($4, location),
                description = COALESCE($5, description),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, user_id, company_name, company_website, location, description,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(profile_id)
        .bind(payload.company_name.as_deref())
        .bind(payload.company_website.as_deref())
        .bind(payload.location.as_deref())
        .bind(payload.description.as_deref())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Employer profile not found.".to_string()))?;
        Ok(profile)
    }
}

async fn fetch_applicant(conn: &mut PgConnection, id: i64) -> Result<ApplicantProfile> {
    sqlx::query_as::<_, ApplicantProfile>(&format!(
        "{APPLICANT_PROFILE_SELECT} WHERE p.id = $1 AND p.deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| Error::NotFound("Applicant profile not found.".to_string()))
}
