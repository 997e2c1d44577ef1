use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::skill::Skill;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSkillPayload {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Ensure this field has between 1 and 100 characters."
    ))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillResponse {
    pub id: i64,
    pub name: String,
}

impl From<Skill> for SkillResponse {
    fn from(value: Skill) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}
