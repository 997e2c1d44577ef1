pub mod account_service;
pub mod application_service;
pub mod audit_service;
pub mod job_service;
pub mod notification_service;
pub mod profile_service;
pub mod resume_store;
pub mod session_service;
pub mod skill_service;
pub mod token_service;
