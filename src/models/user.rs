use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_applicant: bool,
    pub is_employer: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// The role chosen at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserType {
    Applicant,
    Employer,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Applicant => "Applicant",
            UserType::Employer => "Employer",
        }
    }

    /// `(is_applicant, is_employer)` for this role.
    pub fn role_flags(&self) -> (bool, bool) {
        match self {
            UserType::Applicant => (true, false),
            UserType::Employer => (false, true),
        }
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Applicant" => Ok(UserType::Applicant),
            "Employer" => Ok(UserType::Employer),
            other => Err(format!("unknown user type: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_user_type_sets_exactly_one_flag() {
        for user_type in [UserType::Applicant, UserType::Employer] {
            let (applicant, employer) = user_type.role_flags();
            assert!(applicant ^ employer);
            assert_eq!(user_type.as_str().parse::<UserType>(), Ok(user_type));
        }
        assert_eq!(UserType::Employer.role_flags(), (false, true));
    }
}
