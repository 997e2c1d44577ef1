use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::{User, UserType};
use crate::utils::validation::validate_user_type;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterPayload {
    #[validate(length(
        min = 1,
        max = 150,
        message = "Ensure this field has between 1 and 150 characters."
    ))]
    pub username: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub password: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    #[validate(custom(function = "validate_user_type"))]
    pub user_type: String,
}

impl RegisterPayload {
    /// Only meaningful after `validate()` has passed.
    pub fn user_type(&self) -> Option<UserType> {
        self.user_type.parse().ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_applicant: bool,
    pub is_employer: bool,
    pub date_joined: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            username: value.username,
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
            is_applicant: value.is_applicant,
            is_employer: value.is_employer,
            date_joined: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogoutPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub access: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::field_messages;

    fn payload(user_type: &str) -> RegisterPayload {
        RegisterPayload {
            username: "sam".into(),
            password: "s3cret!".into(),
            email: "sam@example.com".into(),
            first_name: "Sam".into(),
            last_name: "Ray".into(),
            user_type: user_type.into(),
        }
    }

    #[test]
    fn valid_user_types_resolve_to_roles() {
        for (raw, expected) in [
            ("Applicant", UserType::Applicant),
            ("Employer", UserType::Employer),
        ] {
            let p = payload(raw);
            assert!(p.validate().is_ok());
            assert_eq!(p.user_type(), Some(expected));
        }
    }

    #[test]
    fn unknown_user_type_is_a_field_error() {
        let errors = payload("Recruiter").validate().unwrap_err();
        let messages = field_messages(&errors);
        assert_eq!(messages.get("user_type").map(String::as_str), Some("Invalid User Type"));
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn missing_login_fields_are_reported() {
        let login: LoginPayload = serde_json::from_str("{}").unwrap();
        let messages = field_messages(&login.validate().unwrap_err());
        assert!(messages.contains_key("username"));
        assert!(messages.contains_key("password"));
    }
}
