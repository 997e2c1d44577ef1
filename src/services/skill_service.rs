use std::collections::BTreeSet;

use sqlx::{PgConnection, PgPool};

use crate::error::{Error, Result};
use crate::models::skill::Skill;
use crate::utils::validation::unknown_pk;

/// Join tables that link an owner row to skills.
#[derive(Debug, Clone, Copy)]
pub enum SkillLink {
    ApplicantProfile,
    Job,
}

impl SkillLink {
    fn table_and_owner(&self) -> (&'static str, &'static str) {
        match self {
            SkillLink::ApplicantProfile => ("applicant_profile_skills", "applicant_profile_id"),
            SkillLink::Job => ("job_required_skills", "job_id"),
        }
    }
}

#[derive(Clone)]
pub struct SkillService {
    pool: PgPool,
}

impl SkillService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Skill>> {
        let skills = sqlx::query_as::<_, Skill>(
            r#"
            SELECT id, name, created_at, updated_at, deleted_at
            FROM skills
            WHERE deleted_at IS NULL
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(skills)
    }

    pub async fn create(&self, name: &str) -> Result<Skill> {
        let skill = sqlx::query_as::<_, Skill>(
            r#"
            INSERT INTO skills (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at, deleted_at
            "#,
        )
        .bind(name.trim())
        .fetch_one(&self.pool)
        .await?;
        Ok(skill)
    }

    /// Fails with a field error on `field` naming the first id that is not a live skill.
    pub async fn ensure_exist(&self, field: &'static str, ids: &BTreeSet<i64>) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let wanted: Vec<i64> = ids.iter().copied().collect();
        let found: Vec<i64> = sqlx::query_scalar(
            "SELECT id FROM skills WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(&wanted)
        .fetch_all(&self.pool)
        .await?;

        match wanted.iter().find(|id| !found.contains(id)) {
            Some(missing) => Err(Error::Validation(unknown_pk(field, *missing))),
            None => Ok(()),
        }
    }
}

/// Replaces the whole skill set of one owner row inside the caller's transaction.
pub async fn replace_links(
    conn: &mut PgConnection,
    link: SkillLink,
    owner_id: i64,
    skill_ids: &BTreeSet<i64>,
) -> Result<()> {
    let (table, owner) = link.table_and_owner();
    sqlx::query(&format!("DELETE FROM {table} WHERE {owner} = $1"))
        .bind(owner_id)
        .execute(&mut *conn)
        .await?;

    if !skill_ids.is_empty() {
        let ids: Vec<i64> = skill_ids.iter().copied().collect();
        sqlx::query(&format!(
            "INSERT INTO {table} ({owner}, skill_id) SELECT $1, UNNEST($2::BIGINT[])"
        ))
        .bind(owner_id)
        .bind(&ids)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
