//! Business logic services

pub mod analytics;
pub mod auth;
pub mod borrows;
pub mod catalog;
pub mod email;
pub mod notifications;
pub mod payments;
pub mod redis;

use crate::{
    config::{AuthConfig, EmailConfig},
    error::AppResult,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub borrows: borrows::BorrowsService,
    pub payments: payments::PaymentsService,
    pub analytics: analytics::AnalyticsService,
    pub email: email::EmailService,
    pub redis: redis::RedisService,
}

impl Services {
    /// Create all services with the given repository
    pub async fn new(
        repository: Repository,
        auth_config: AuthConfig,
        email_config: EmailConfig,
        base_url: String,
        redis_service: redis::RedisService,
    ) -> AppResult<Self> {
        let email = email::EmailService::new(email_config);

        Ok(Self {
            auth: auth::AuthService::new(
                repository.clone(),
                auth_config,
                email.clone(),
                base_url,
            ),
            catalog: catalog::CatalogService::new(repository.clone(), redis_service.clone()),
            borrows: borrows::BorrowsService::new(repository.clone()),
            payments: payments::PaymentsService::new(repository.clone()),
            analytics: analytics::AnalyticsService::new(repository, redis_service.clone()),
            email,
            redis: redis_service,
        })
    }
}
