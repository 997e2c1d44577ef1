pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use sqlx::PgPool;

use crate::config::Config;
use crate::middleware::rate_limit::RateLimiter;
use crate::services::{
    account_service::AccountService, application_service::ApplicationService,
    audit_service::AuditService, job_service::JobService,
    notification_service::NotificationService, profile_service::ProfileService,
    resume_store::ResumeStore, session_service::SessionService, skill_service::SkillService,
    token_service::TokenService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub token_service: TokenService,
    pub account_service: AccountService,
    pub session_service: SessionService,
    pub profile_service: ProfileService,
    pub skill_service: SkillService,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub notification_service: NotificationService,
    pub resume_store: ResumeStore,
    pub auth_limiter: RateLimiter,
    pub max_resume_bytes: usize,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        let token_service = TokenService::from_config(config);
        let account_service = AccountService::new(pool.clone());
        let session_service =
            SessionService::new(pool.clone(), account_service.clone(), token_service.clone());
        let skill_service = SkillService::new(pool.clone());
        let profile_service = ProfileService::new(pool.clone(), skill_service.clone());
        let job_service = JobService::new(pool.clone(), skill_service.clone());
        let notification_service = NotificationService::new(pool.clone());
        let application_service = ApplicationService::new(
            pool.clone(),
            AuditService::new(pool.clone()),
            notification_service.clone(),
        );

        Self {
            pool,
            token_service,
            account_service,
            session_service,
            profile_service,
            skill_service,
            job_service,
            application_service,
            notification_service,
            resume_store: ResumeStore::new(&config.uploads_dir),
            auth_limiter: RateLimiter::new(config.auth_rps),
            max_resume_bytes: config.max_resume_bytes,
        }
    }
}
