//! The authenticated identity behind a request.
//!
//! A `Principal` is resolved once per request by the bearer-token extractor and then
//! handed to handlers as a plain parameter. Role checks are answered from the
//! `PrincipalKind` tag instead of re-querying profile tables in every handler.

use crate::error::{Error, Result};
use crate::models::profile::{ApplicantProfile, EmployerProfile};
use crate::models::user::User;

pub const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";
pub const NO_APPLICANT_PROFILE: &str = "An applicant profile does not exist for this user.";
pub const NO_EMPLOYER_PROFILE: &str = "An employer profile does not exist for this user.";

#[derive(Debug, Clone)]
pub enum PrincipalKind {
    Applicant(ApplicantProfile),
    Employer(EmployerProfile),
    /// Authenticated, but no profile has been created yet.
    Unaffiliated,
}

#[derive(Debug, Clone)]
pub struct Principal {
    pub user: User,
    pub kind: PrincipalKind,
}

impl Principal {
    pub fn resolve(
        user: User,
        applicant: Option<ApplicantProfile>,
        employer: Option<EmployerProfile>,
    ) -> Self {
        let kind = match (employer, applicant) {
            (Some(profile), _) => PrincipalKind::Employer(profile),
            (None, Some(profile)) => PrincipalKind::Applicant(profile),
            (None, None) => PrincipalKind::Unaffiliated,
        };
        Self { user, kind }
    }

    pub fn user_id(&self) -> i64 {
        self.user.id
    }

    pub fn has_employer_profile(&self) -> bool {
        matches!(self.kind, PrincipalKind::Employer(_))
    }

    /// Guard for employer-only operations; rejects everyone else with 403.
    pub fn require_employer(&self) -> Result<&EmployerProfile> {
        match &self.kind {
            PrincipalKind::Employer(profile) => Ok(profile),
            _ => Err(Error::Forbidden(PERMISSION_DENIED.to_string())),
        }
    }

    pub fn require_applicant(&self) -> Result<&ApplicantProfile> {
        match &self.kind {
            PrincipalKind::Applicant(profile) => Ok(profile),
            _ => Err(Error::NotFound(NO_APPLICANT_PROFILE.to_string())),
        }
    }

    /// The caller's employer profile for the profile endpoints, 404 when missing.
    pub fn employer_profile(&self) -> Result<&EmployerProfile> {
        match &self.kind {
            PrincipalKind::Employer(profile) => Ok(profile),
            _ => Err(Error::NotFound(NO_EMPLOYER_PROFILE.to_string())),
        }
    }

    /// Checks that the caller may create an applicant profile.
    pub fn can_create_applicant_profile(&self) -> Result<()> {
        if !self.user.is_applicant {
            return Err(Error::BadRequest(
                "Only applicant accounts can create an applicant profile.".to_string(),
            ));
        }
        match self.kind {
            PrincipalKind::Unaffiliated => Ok(()),
            _ => Err(Error::BadRequest(
                "An applicant profile already exists for this user.".to_string(),
            )),
        }
    }

    /// Checks that the caller may create an employer profile.
    pub fn can_create_employer_profile(&self) -> Result<()> {
        if !self.user.is_employer {
            return Err(Error::BadRequest(
                "Only employer accounts can create an employer profile.".to_string(),
            ));
        }
        match self.kind {
            PrincipalKind::Unaffiliated => Ok(()),
            _ => Err(Error::BadRequest(
                "An employer profile already exists for this user.".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(is_applicant: bool, is_employer: bool) -> User {
        let now = Utc::now();
        User {
            id: 1,
            username: "pat".into(),
            password_hash: String::new(),
            email: "pat@example.com".into(),
            first_name: "Pat".into(),
            last_name: "Lee".into(),
            is_applicant,
            is_employer,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn employer_profile() -> EmployerProfile {
        let now = Utc::now();
        EmployerProfile {
            id: 10,
            user_id: 1,
            company_name: "Acme".into(),
            company_website: "https://acme.example.com".into(),
            location: "Pune".into(),
            description: "Widgets".into(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn applicant_profile() -> ApplicantProfile {
        let now = Utc::now();
        ApplicantProfile {
            id: 20,
            user_id: 1,
            phone_number: "1245125412".into(),
            address: "1 Main St".into(),
            resume_file: "resumes/x.pdf".into(),
            profile_complete: true,
            skills: vec![1, 2],
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn employer_guard_admits_only_employer_profiles() {
        let employer = Principal::resolve(user(false, true), None, Some(employer_profile()));
        assert!(employer.has_employer_profile());
        assert_eq!(employer.require_employer().unwrap().id, 10);

        let applicant = Principal::resolve(user(true, false), Some(applicant_profile()), None);
        assert!(!applicant.has_employer_profile());
        assert!(matches!(applicant.require_employer(), Err(Error::Forbidden(_))));

        // Registered as employer but no profile yet.
        let pending = Principal::resolve(user(false, true), None, None);
        assert!(matches!(pending.require_employer(), Err(Error::Forbidden(_))));
    }

    #[test]
    fn missing_applicant_profile_is_not_found() {
        let pending = Principal::resolve(user(true, false), None, None);
        match pending.require_applicant() {
            Err(Error::NotFound(message)) => assert_eq!(message, NO_APPLICANT_PROFILE),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn profile_creation_requires_matching_role_and_no_existing_profile() {
        let fresh_applicant = Principal::resolve(user(true, false), None, None);
        assert!(fresh_applicant.can_create_applicant_profile().is_ok());
        assert!(matches!(
            fresh_applicant.can_create_employer_profile(),
            Err(Error::BadRequest(_))
        ));

        let existing = Principal::resolve(user(true, false), Some(applicant_profile()), None);
        assert!(matches!(
            existing.can_create_applicant_profile(),
            Err(Error::BadRequest(_))
        ));

        let employer = Principal::resolve(user(false, true), None, Some(employer_profile()));
        assert!(matches!(
            employer.can_create_employer_profile(),
            Err(Error::BadRequest(_))
        ));
    }
}
