pub mod api_response;
pub mod application_dto;
pub mod auth_dto;
pub mod job_dto;
pub mod notification_dto;
pub mod profile_dto;
pub mod skill_dto;
