use sqlx::PgPool;

use crate::dto::auth_dto::RegisterPayload;
use crate::error::{Error, Result};
use crate::models::principal::Principal;
use crate::models::profile::{ApplicantProfile, EmployerProfile};
use crate::models::user::User;
use crate::utils::crypto::hash_password;
use crate::utils::validation::{field_error, missing_field};

pub(crate) const USER_COLUMNS: &str = "id, username, password_hash, email, first_name, last_name, \
     is_applicant, is_employer, created_at, updated_at, deleted_at";

pub(crate) const APPLICANT_PROFILE_SELECT: &str = r#"
    SELECT p.id, p.user_id, p.phone_number, p.address, p.resume_file, p.profile_complete,
           ARRAY(
               SELECT s.skill_id FROM applicant_profile_skills s
               WHERE s.applicant_profile_id = p.id
               ORDER BY s.skill_id
           ) AS skills,
           p.created_at, p.updated_at, p.deleted_at
    FROM applicant_profiles p
"#;

pub(crate) const EMPLOYER_PROFILE_SELECT: &str = r#"
    SELECT id, user_id, company_name, company_website, location, description,
           created_at, updated_at, deleted_at
    FROM employer_profiles
"#;

#[derive(Clone)]
pub struct AccountService {
    pool: PgPool,
}

impl AccountService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, payload: RegisterPayload) -> Result<User> {
        let user_type = payload
            .user_type()
            .ok_or_else(|| Error::Validation(missing_field("user_type")))?;

        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(&payload.username)
                .fetch_one(&self.pool)
                .await?;
        if taken {
            return Err(Error::Validation(field_error(
                "username",
                "unique",
                "A user with that username already exists.",
            )));
        }

        let password_hash = hash_password(&payload.password)?;
        let (is_applicant, is_employer) = user_type.role_flags();

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, password_hash, email, first_name, last_name, is_applicant, is_employer)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&payload.username)
        .bind(&password_hash)
        .bind(&payload.email)
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(is_applicant)
        .bind(is_employer)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id = user.id, user_type = user_type.as_str(), "user registered");
        Ok(user)
    }

    pub async fn find_active_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 AND deleted_at IS NULL"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Loads the user behind a verified token together with whichever profile it has.
    pub async fn resolve_principal(&self, user_id: i64) -> Result<Principal> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::Unauthorized("User not found".to_string()))?;

        let applicant = sqlx::query_as::<_, ApplicantProfile>(&format!(
            "{APPLICANT_PROFILE_SELECT} WHERE p.user_id = $1 AND p.deleted_at IS NULL"
        ))
        .bind(user.id)
        .fetch_optional(&self.pool)
        .await?;

        let employer = sqlx::query_as::<_, EmployerProfile>(&format!(
            "{EMPLOYER_PROFILE_SELECT} WHERE user_id = $1 AND deleted_at IS NULL"
        ))
        .bind(user.id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(Principal::resolve(user, applicant, employer))
    }
}
