use std::sync::Arc;

use async_trait::async_trait;
use db::DBService;
use services::services::{
    auth::{AuthError, CredentialVerifier},
    catalog::Catalog,
    config::{Config, ConfigError},
    database_validator::DatabaseValidationError,
    submission::SubmissionService,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    DatabaseValidation(#[from] DatabaseValidationError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Everything a request handler needs, built once at startup
#[async_trait]
pub trait Deployment: Clone + Send + Sync + 'static {
    async fn new() -> Result<Self, DeploymentError>;

    fn config(&self) -> &Config;

    fn db(&self) -> &DBService;

    fn catalog(&self) -> &Arc<Catalog>;

    fn credentials(&self) -> &Arc<dyn CredentialVerifier>;

    fn submissions(&self) -> SubmissionService {
        SubmissionService::new(self.db().pool.clone(), self.config().upload_dir.clone())
    }
}
