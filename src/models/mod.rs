pub mod audit_log;
pub mod job;
pub mod job_application;
pub mod notification;
pub mod principal;
pub mod profile;
pub mod skill;
pub mod user;
